//! Stand-in service answering `getServiceState` with a fixed or cycling state.

use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use service_client::lifecycle::{signals, Shutdown};
use service_client::observability::logging;
use service_client::server::serve;
use service_client::{HealthState, StateReporter};

#[derive(Parser)]
#[command(name = "mock-service")]
#[command(about = "Serve a fake ServiceBase state for testing service clients", long_about = None)]
struct Cli {
    /// Address to bind.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: String,

    /// Port to bind.
    #[arg(short, long, default_value_t = 50051)]
    port: u16,

    /// State to report (UNKNOWN, RUNNING, IDLE, UNAVAILABLE, ERROR).
    #[arg(short, long, default_value = "IDLE")]
    state: HealthState,

    /// Cycle through every state, switching after this many milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    cycle_ms: Option<u64>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let listener = TcpListener::bind((cli.address.as_str(), cli.port)).await?;
    let reporter = StateReporter::new(cli.state);

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    if let Some(cycle_ms) = cli.cycle_ms {
        tokio::spawn(cycle_states(
            reporter.clone(),
            cli.state,
            Duration::from_millis(cycle_ms),
            shutdown.subscribe(),
        ));
    }

    tracing::info!(state = cli.state.name(), "mock-service starting");
    serve(listener, reporter, shutdown.triggered()).await?;
    Ok(())
}

/// Step through every state after `initial`, one per `period`.
async fn cycle_states(
    reporter: StateReporter,
    initial: HealthState,
    period: Duration,
    mut shutdown: tokio::sync::broadcast::Receiver<()>,
) {
    let mut states = next_states(initial);
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(state) = states.next() {
                    tracing::info!(state = state.name(), "Switching reported state");
                    reporter.set(state);
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}

/// Endless state sequence starting right after `initial`.
fn next_states(initial: HealthState) -> impl Iterator<Item = HealthState> {
    HealthState::ALL
        .into_iter()
        .cycle()
        .skip_while(move |state| *state != initial)
        .skip(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_starts_after_initial_state() {
        let states: Vec<_> = next_states(HealthState::Idle).take(5).collect();
        assert_eq!(
            states,
            vec![
                HealthState::Unavailable,
                HealthState::Error,
                HealthState::Unknown,
                HealthState::Running,
                HealthState::Idle,
            ]
        );
    }

    #[tokio::test]
    async fn first_switch_waits_one_period() {
        let reporter = StateReporter::new(HealthState::Running);
        let shutdown = service_client::Shutdown::new();
        let period = Duration::from_millis(300);
        let handle = tokio::spawn(cycle_states(
            reporter.clone(),
            HealthState::Running,
            period,
            shutdown.subscribe(),
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(reporter.get(), HealthState::Running);

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(reporter.get(), HealthState::Idle);

        shutdown.trigger();
        handle.await.unwrap();
    }
}
