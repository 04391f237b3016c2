use core::fmt;

/// FMI 2.0 status code returned by every model operation.
///
/// The raw values mirror the C enum so they round-trip across the FFI
/// boundary unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Ok = 0,
    Warning = 1,
    Discard = 2,
    Error = 3,
    Fatal = 4,
    Pending = 5,
}

impl Status {
    /// Convert a raw FFI status. Values outside the standard range are
    /// reported as `Error` rather than trusted.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Status::Ok,
            1 => Status::Warning,
            2 => Status::Discard,
            3 => Status::Error,
            4 => Status::Fatal,
            5 => Status::Pending,
            _ => Status::Error,
        }
    }

    pub fn to_raw(self) -> i32 {
        self as i32
    }

    /// True for the statuses that allow the simulation to continue.
    pub fn is_ok(self) -> bool {
        matches!(self, Status::Ok | Status::Warning)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Ok => "ok",
            Status::Warning => "warning",
            Status::Discard => "discard",
            Status::Error => "error",
            Status::Fatal => "fatal",
            Status::Pending => "pending",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        for raw in 0..=5 {
            assert_eq!(Status::from_raw(raw).to_raw(), raw);
        }
    }

    #[test]
    fn out_of_range_raw_is_error() {
        assert_eq!(Status::from_raw(-1), Status::Error);
        assert_eq!(Status::from_raw(42), Status::Error);
    }

    #[test]
    fn ok_and_warning_continue() {
        assert!(Status::Ok.is_ok());
        assert!(Status::Warning.is_ok());
        assert!(!Status::Discard.is_ok());
        assert!(!Status::Error.is_ok());
        assert!(!Status::Fatal.is_ok());
    }
}
