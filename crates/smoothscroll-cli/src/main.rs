use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smoothscroll_core::AppConfig;

mod commands;

use commands::simulate::{PolicyArg, SimulateOptions};

#[derive(Parser)]
#[command(name = "smoothscroll")]
#[command(author, version, about = "Smooth scrolling text viewer and step simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a file in the terminal viewer
    View {
        /// File to display
        file: PathBuf,
        /// Open a second pane on the same file
        #[arg(long)]
        split: bool,
    },
    /// Run one scroll request against a headless surface and print every frame
    Simulate {
        /// Distance to scroll in pixels (negative scrolls up)
        #[arg(short, long, allow_hyphen_values = true)]
        distance: f64,
        /// Divisor override; defaults to the configured wheel divisor
        #[arg(long)]
        divisor: Option<f64>,
        /// Step policy
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Per-frame step cap in pixels
        #[arg(long)]
        cap: Option<f64>,
        /// Largest reachable offset; unbounded when omitted
        #[arg(long)]
        bound: Option<f64>,
        /// Emit one JSON object per frame
        #[arg(long)]
        json: bool,
        /// Pace frames at the configured animation fps
        #[arg(long)]
        realtime: bool,
    },
    /// Show or initialize the configuration
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
        /// Let --init replace an existing config file
        #[arg(long, requires = "init")]
        force: bool,
        /// Only print the config path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file must not block rewriting it
    let config = match cli.command {
        Commands::Config { init: true, .. } => AppConfig::default(),
        _ => AppConfig::load()?,
    };
    let config = Arc::new(config);

    init_logging(&config, matches!(cli.command, Commands::View { .. }))?;

    match cli.command {
        Commands::View { file, split } => commands::view::run(config, &file, split).await,
        Commands::Simulate {
            distance,
            divisor,
            policy,
            cap,
            bound,
            json,
            realtime,
        } => {
            let options = SimulateOptions {
                distance,
                divisor,
                policy,
                cap,
                bound,
                json,
                realtime,
            };
            commands::simulate::run(&config, options).await
        }
        Commands::Config { init, force, path } => {
            commands::config::run(&config, init, force, path)
        }
    }
}

/// Initialize tracing; the full-screen viewer logs to a file instead of the terminal
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    let (file_layer, stderr_layer) = if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file));
        (Some(layer), None)
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}
