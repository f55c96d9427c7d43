//! logic-remote CLI
//!
//! Command-line interface for driving Logic over its scripting socket.

use clap::{Parser, Subcommand};
use logic_remote::{Config, LogicClient, SampleRate};
use tracing_subscriber::{fmt, EnvFilter};

/// Logic remote-control CLI
#[derive(Parser, Debug)]
#[command(name = "logic-cli")]
#[command(about = "Control the Logic analyzer software over its scripting socket")]
#[command(version)]
struct Args {
    /// Host running Logic
    #[arg(long, default_value = logic_remote::config::DEFAULT_HOST)]
    host: String,

    /// Scripting socket port
    #[arg(short, long, default_value_t = logic_remote::config::DEFAULT_PORT)]
    port: u16,

    /// Read/write timeout in milliseconds (0 = wait forever)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List connected devices
    Devices,

    /// List every available sample rate
    Rates,

    /// Find the lowest rate meeting both minimums
    RateAtLeast {
        /// Minimum digital sample rate
        #[arg(short, long, default_value = "0")]
        digital: u64,

        /// Minimum analog sample rate
        #[arg(short, long, default_value = "0")]
        analog: u64,
    },

    /// Show the configured sample rate
    GetRate,

    /// Configure the sample rate
    SetRate {
        digital: u64,
        analog: u64,
    },

    /// Set the capture length in samples
    SetSamples {
        count: u64,
    },

    /// Set the capture length in seconds at the current rate
    SetSeconds {
        seconds: f64,
    },

    /// Run a capture and wait for it to finish
    Capture {
        /// Capture length in samples
        #[arg(long, conflicts_with = "seconds")]
        samples: Option<u64>,

        /// Capture length in seconds at the current rate
        #[arg(long)]
        seconds: Option<f64>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,logic_remote=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .io_timeout_ms(args.timeout_ms)
        .build();

    tracing::debug!("logic-cli v{} talking to {}", logic_remote::VERSION, config.addr());

    let mut logic = LogicClient::new(config);
    let outcome = run(&mut logic, args.command);
    logic.close();

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(logic: &mut LogicClient, command: Commands) -> logic_remote::Result<()> {
    match command {
        Commands::Devices => {
            for device in logic.connected_devices()? {
                println!("{}", device);
            }
        }
        Commands::Rates => {
            for rate in logic.all_sample_rates()? {
                println!("{}", rate);
            }
        }
        Commands::RateAtLeast { digital, analog } => {
            match logic.sample_rate_at_least(digital, analog)? {
                Some(rate) => println!("{}", rate),
                None => tracing::info!("No sample rate satisfies {},{}", digital, analog),
            }
        }
        Commands::GetRate => println!("{}", logic.sample_rate()?),
        Commands::SetRate { digital, analog } => {
            logic.set_sample_rate(SampleRate::new(digital, analog))?;
        }
        Commands::SetSamples { count } => logic.set_num_samples(count)?,
        Commands::SetSeconds { seconds } => logic.set_num_seconds(seconds)?,
        Commands::Capture { samples, seconds } => {
            if let Some(count) = samples {
                logic.set_num_samples(count)?;
            } else if let Some(seconds) = seconds {
                logic.set_num_seconds(seconds)?;
            }
            tracing::info!("Capturing...");
            logic.capture()?;
            tracing::info!("Capture complete");
        }
    }
    Ok(())
}
