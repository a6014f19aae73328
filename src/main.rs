//! Reflow oven simulator server.
//!
//! Run with: cargo run -- --port 8080

use clap::Parser;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use reflow_oven_sim::{Error, OvenServer, ServerConfig, ThermalModel};

/// Networked reflow oven simulator.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = ServerConfig::DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Tag attached to every log line
    #[arg(long, default_value = ServerConfig::DEFAULT_TAG)]
    tag: String,

    /// Milliseconds between simulation ticks
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Temperature rise per tick while heating (°C)
    #[arg(long, default_value_t = ThermalModel::DEFAULT_HEAT_RATE)]
    heat_rate: f64,

    /// Temperature drop per tick while cooling (°C)
    #[arg(long, default_value_t = ThermalModel::DEFAULT_COOL_RATE)]
    cool_rate: f64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> ServerConfig {
        ServerConfig::default()
            .with_host(&self.host)
            .with_port(self.port)
            .with_tag(&self.tag)
            .with_tick_interval(Duration::from_millis(self.tick_ms))
            .with_thermal(ThermalModel {
                heat_rate: self.heat_rate,
                cool_rate: self.cool_rate,
            })
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = cli.config();
    let server = match OvenServer::bind(config.clone()).await {
        Ok(server) => server,
        Err(Error::AddressInUse { addr }) => {
            error!(
                tag = %config.tag,
                "Port already in use ({}). Close the other application or pick another --port.",
                addr
            );
            std::process::exit(2);
        }
        Err(e) => {
            error!(tag = %config.tag, "Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    if let Err(e) = server.serve(shutdown).await {
        error!(tag = %config.tag, "Server crashed: {}", e);
        std::process::exit(1);
    }

    info!(tag = %config.tag, "Simulator exited");
}

/// Setup logging based on verbosity level; `RUST_LOG` takes precedence.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
