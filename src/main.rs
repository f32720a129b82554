use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;

use service_client::config::validation::validate_config;
use service_client::config::{load_config, ClientConfig, ConfigError, ConnectionTarget};
use service_client::lifecycle::{signals, Shutdown};
use service_client::observability::{logging, metrics};
use service_client::{HealthState, ServiceClient, StatePoller};

#[derive(Parser)]
#[command(name = "service-client")]
#[command(about = "Query the health state of a remote service", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service address, overriding the configuration.
    #[arg(short, long)]
    address: Option<String>,

    /// Service port, overriding the configuration.
    #[arg(short, long, required_unless_present = "config")]
    port: Option<u16>,

    /// Print states as JSON lines.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the service once; exits non-zero unless RUNNING or IDLE
    Check,
    /// Poll the service and print every state change until interrupted
    Watch {
        /// Poll interval in milliseconds.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
    },
    /// Wait until the service is RUNNING or IDLE
    Wait {
        /// Give up after this many seconds.
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability.log_level);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = ServiceClient::from_config(&config)?;
    let target = config.service.clone();

    match cli.command {
        Commands::Check => {
            let state = client.get_health().await;
            print_state(&target, state, cli.json)?;
            Ok(exit_code(state))
        }
        Commands::Watch { interval_ms } => {
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.poll.interval());
            watch(client, &target, interval, cli.json).await
        }
        Commands::Wait { timeout_secs } => {
            let deadline = Duration::from_secs(timeout_secs);
            match tokio::time::timeout(deadline, client.wait_until_ready(config.poll.interval())).await {
                Ok(state) => {
                    print_state(&target, state, cli.json)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(_) => {
                    eprintln!("{target}: not ready after {timeout_secs}s");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Configuration file (if any) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::new(ConnectionTarget::localhost(cli.port.unwrap_or_default())),
    };

    if let Some(address) = &cli.address {
        config.service.address = address.clone();
    }
    if let Some(port) = cli.port {
        config.service.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

async fn watch(
    client: ServiceClient,
    target: &ConnectionTarget,
    interval: Duration,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let (poller, mut rx) = StatePoller::new(Arc::new(client), interval);
    let poller = tokio::spawn(poller.run(shutdown.subscribe()));
    let stopped = shutdown.triggered();
    tokio::pin!(stopped);

    let initial = *rx.borrow_and_update();
    print_state(target, initial, json)?;

    loop {
        tokio::select! {
            _ = &mut stopped => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *rx.borrow_and_update();
                print_state(target, state, json)?;
            }
        }
    }

    poller.await?;
    Ok(ExitCode::SUCCESS)
}

fn print_state(
    target: &ConnectionTarget,
    state: HealthState,
    json: bool,
) -> Result<(), serde_json::Error> {
    if json {
        let line = json!({
            "service": target.server_address(),
            "state": state,
            "value": state.value(),
        });
        println!("{}", serde_json::to_string(&line)?);
    } else {
        println!("{target}: {state}");
    }
    Ok(())
}

fn exit_code(state: HealthState) -> ExitCode {
    if state.is_ready() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
