use clap::{Parser, Subcommand};
use std::f64::consts::TAU;
use std::net::SocketAddr;
use std::path::PathBuf;

use ff_core::{Status, VR_GAIN, VR_INPUT, VR_OUTPUT};
use ff_loader::{inner_binary_path, library_extension, location_to_path, platform_tag};
use ff_metrics::ExporterConfig;
use ff_wrapper::{WrapperConfig, WrapperInstance};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "ff-cli")]
#[command(about = "FaultFlow CLI - Fault-injecting co-simulation wrapper driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the inner model binary for this platform
    Locate {
        /// Resource location (file:// URI or plain path) of the unpacked bundle
        resource_location: String,
    },
    /// Drive a simulation with a sine input and print CSV to stdout
    Simulate {
        /// Resource location (file:// URI or plain path) of the unpacked bundle
        resource_location: String,
        /// Communication step size in seconds
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
        /// End time in seconds
        #[arg(long, default_value_t = 5.0)]
        t_end: f64,
        /// Gain parameter k (defaults to the model's own)
        #[arg(long)]
        gain: Option<f64>,
        /// Sine input amplitude
        #[arg(long, default_value_t = 1.0)]
        amplitude: f64,
        /// Sine input frequency in Hz
        #[arg(long, default_value_t = 1.0)]
        frequency: f64,
        /// Address for the metrics scrape endpoint
        #[arg(long)]
        metrics_addr: Option<SocketAddr>,
        /// Disable the metrics exporter entirely
        #[arg(long)]
        no_metrics: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Locate { resource_location } => cmd_locate(&resource_location),
        Commands::Simulate {
            resource_location,
            dt,
            t_end,
            gain,
            amplitude,
            frequency,
            metrics_addr,
            no_metrics,
            output,
        } => cmd_simulate(
            &resource_location,
            dt,
            t_end,
            gain,
            amplitude,
            frequency,
            metrics_addr,
            no_metrics,
            output.as_deref(),
        ),
    }
}

fn cmd_locate(resource_location: &str) -> CliResult<()> {
    let config = WrapperConfig::default();
    let resources = location_to_path(resource_location);
    let binary = inner_binary_path(&resources, &config.inner.model_name, &config.inner.binary_stem);

    println!("Platform tag: {}", platform_tag());
    println!("Library extension: {}", library_extension());
    println!("Inner binary: {}", binary.display());
    if binary.is_file() {
        println!("✓ Binary present");
    } else {
        println!("✗ Binary missing");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_simulate(
    resource_location: &str,
    dt: f64,
    t_end: f64,
    gain: Option<f64>,
    amplitude: f64,
    frequency: f64,
    metrics_addr: Option<SocketAddr>,
    no_metrics: bool,
    output: Option<&std::path::Path>,
) -> CliResult<()> {
    if dt <= 0.0 || t_end <= 0.0 {
        return Err("dt and t_end must be positive".into());
    }

    let mut config = WrapperConfig::default();
    config.metrics = if no_metrics {
        None
    } else {
        Some(match metrics_addr {
            Some(addr) => ExporterConfig { addr },
            None => ExporterConfig::default(),
        })
    };

    println!("Simulating: {}", resource_location);
    println!("  dt = {:.3} s, t_end = {:.3} s", dt, t_end);

    let mut wrapper = WrapperInstance::instantiate(&config, resource_location, false, false)?;
    println!("  Fault: {:?}", wrapper.fault());

    ensure_ok(wrapper.setup_experiment(None, 0.0, Some(t_end)), "setup_experiment")?;
    ensure_ok(wrapper.enter_initialization_mode(), "enter_initialization_mode")?;
    if let Some(k) = gain {
        ensure_ok(wrapper.set_real(&[VR_GAIN], &[k]), "set_real")?;
    }
    ensure_ok(wrapper.exit_initialization_mode(), "exit_initialization_mode")?;

    // Sine input, one row per communication step.
    let steps = (t_end / dt).round() as usize;
    let mut csv = String::from("time_s,u,y\n");
    for i in 0..=steps {
        let t = i as f64 * dt;
        let u = amplitude * (TAU * frequency * t).sin();
        ensure_ok(wrapper.set_real(&[VR_INPUT], &[u]), "set_real")?;
        ensure_ok(wrapper.do_step(t, dt, true), "do_step")?;

        let mut y = [0.0];
        ensure_ok(wrapper.get_real(&[VR_OUTPUT], &mut y), "get_real")?;
        csv.push_str(&format!("{},{},{}\n", t, u, y[0]));
    }

    ensure_ok(wrapper.terminate(), "terminate")?;
    wrapper.free_instance();

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} data points to {}", steps + 1, path.display());
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn ensure_ok(status: Status, call: &'static str) -> CliResult<()> {
    if status.is_ok() {
        Ok(())
    } else {
        Err(format!("{call} returned {status}").into())
    }
}
