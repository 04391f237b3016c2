//! Minimal pull-based HTTP endpoint for gauge scrapes.
//!
//! Serves the rendered registry to any HTTP GET. One listener thread per
//! server, shut down via flag + join; the accept loop polls a non-blocking
//! listener so the shutdown flag is observed promptly.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::{MetricsError, MetricsResult};
use crate::registry::MetricsRegistry;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Scrape endpoint bound to a local address.
pub struct ExpositionServer {
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    listener_thread: Option<JoinHandle<()>>,
}

impl ExpositionServer {
    /// Bind `addr` and start serving the shared registry.
    pub fn bind(addr: SocketAddr, registry: Arc<Mutex<MetricsRegistry>>) -> MetricsResult<Self> {
        let listener = TcpListener::bind(addr).map_err(|source| MetricsError::Bind {
            addr,
            source,
        })?;
        let local_addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let listener_thread = thread::spawn(move || {
            serve(&listener, &registry, &flag);
        });

        debug!(%local_addr, "metrics endpoint bound");
        Ok(Self {
            local_addr,
            shutdown,
            listener_thread: Some(listener_thread),
        })
    }

    /// Address actually bound (relevant when binding port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting scrapes and join the listener thread. Idempotent.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.listener_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ExpositionServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn serve(listener: &TcpListener, registry: &Arc<Mutex<MetricsRegistry>>, shutdown: &AtomicBool) {
    while !shutdown.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                trace!(%peer, "metrics scrape");
                if let Err(e) = answer_scrape(stream, registry) {
                    warn!(error = %e, "failed to answer metrics scrape");
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                warn!(error = %e, "metrics listener error");
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

fn answer_scrape(
    mut stream: TcpStream,
    registry: &Arc<Mutex<MetricsRegistry>>,
) -> std::io::Result<()> {
    // Drain whatever request line arrived; the endpoint answers every GET
    // the same way.
    stream.set_read_timeout(Some(Duration::from_millis(200)))?;
    let mut request = [0_u8; 1024];
    let _ = stream.read(&mut request);

    let body = match registry.lock() {
        Ok(registry) => registry.render(),
        // A poisoned registry still serves the last rendered default.
        Err(poisoned) => poisoned.into_inner().render(),
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; version=0.0.4\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrape(addr: SocketAddr) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn serves_registry_over_http() {
        let registry = Arc::new(Mutex::new(MetricsRegistry::new()));
        registry
            .lock()
            .unwrap()
            .register_gauge("wrapper_gain", "Gain parameter", &[("instance", "t1")]);
        registry.lock().unwrap().set("wrapper_gain", 2.0);

        let mut server =
            ExpositionServer::bind("127.0.0.1:0".parse().unwrap(), Arc::clone(&registry)).unwrap();
        let response = scrape(server.local_addr());
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("wrapper_gain{instance=\"t1\"} 2"));

        server.shutdown();
    }

    #[test]
    fn scrapes_observe_updates() {
        let registry = Arc::new(Mutex::new(MetricsRegistry::new()));
        registry
            .lock()
            .unwrap()
            .register_gauge("wrapper_time_seconds", "Simulation time", &[]);

        let mut server =
            ExpositionServer::bind("127.0.0.1:0".parse().unwrap(), Arc::clone(&registry)).unwrap();
        registry.lock().unwrap().set("wrapper_time_seconds", 5.0);
        assert!(scrape(server.local_addr()).contains("wrapper_time_seconds 5"));

        server.shutdown();
    }

    #[test]
    fn shutdown_stops_the_listener() {
        let registry = Arc::new(Mutex::new(MetricsRegistry::new()));
        let mut server =
            ExpositionServer::bind("127.0.0.1:0".parse().unwrap(), registry).unwrap();
        let addr = server.local_addr();
        server.shutdown();
        // The port is released once the listener thread exits.
        assert!(TcpListener::bind(addr).is_ok());
    }
}
