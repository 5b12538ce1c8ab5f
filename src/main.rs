//! Launch gateway
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ rate limit ─▶ query validation
//!                                                               │
//!                                  ┌────────────────────────────┤
//!                                  ▼                            ▼
//!                          GET /v3/launches             GET /v3/rockets
//!                                  │                            │
//!                                  └────────────┬───────────────┘
//!                                               ▼
//!     Client Response                 join by rocket_id
//!     ◀──────────────────────────────  paginate
//! ```

use std::path::PathBuf;

use clap::Parser;

use launch_gateway::config::load_config;
use launch_gateway::lifecycle::startup;
use launch_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "launch-gateway", version)]
#[command(about = "Paginated, rate-limited view over SpaceX launches and rockets", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "LAUNCH_GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging("info");
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.listener.port,
        default_limit = config.pagination.default_limit,
        rate_limit_window_secs = config.rate_limit.window_secs,
        "launch-gateway starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
