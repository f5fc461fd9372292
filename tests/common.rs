// tests/common.rs
#![allow(dead_code)] // Not every test file uses every helper

use ract::{ActorError, Executor, ExecutorOptions, PendingReply, Reply, SystemEvent};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use std::sync::Once;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::timeout;

// Use std::sync::Once for one-time initialization
static TRACING_INIT: Once = Once::new();

/// Delay used instead of the one-second default so tests stay fast.
pub const TEST_EXEC_DELAY: Duration = Duration::from_millis(100);
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(250);
pub const LONG_TIMEOUT: Duration = Duration::from_secs(5);

// Setup function to initialize tracing
fn setup_tracing() {
  TRACING_INIT.call_once(|| {
    // Can be overridden by RUST_LOG env variable
    let default_filter = "ract=debug,warn";
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
      .with_max_level(tracing::Level::TRACE) // Allow all levels down to TRACE
      .with_env_filter(env_filter)
      .with_target(true) // Show module path
      .with_line_number(true) // Show line numbers
      .with_span_events(FmtSpan::CLOSE) // Log when spans close
      .with_test_writer() // Write to test output capture
      .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing subscriber");
  });
}

/// Options for tests: short throttle delay, fixed seed.
pub fn test_options() -> ExecutorOptions {
  ExecutorOptions::default().exec_delay(TEST_EXEC_DELAY).rng_seed(0x5EED)
}

// Helper to create an executor
pub fn test_executor() -> Executor {
  test_executor_with(test_options())
}

pub fn test_executor_with(options: ExecutorOptions) -> Executor {
  setup_tracing(); // Ensure tracing is initialized before creating the executor
  Executor::with_options(options).expect("Failed to create test executor")
}

// Helper for reading a reply with a timeout assertion
pub async fn recv_timeout(pending: PendingReply, duration: Duration) -> Reply {
  pending.recv_timeout(duration).await
}

/// Waits for the first event matching `check_event`.
pub async fn wait_for_event(
  events: &mut broadcast::Receiver<SystemEvent>,
  duration: Duration,
  check_event: impl Fn(&SystemEvent) -> bool,
) -> Result<SystemEvent, ActorError> {
  timeout(duration, async {
    loop {
      match events.recv().await {
        Ok(event) if check_event(&event) => return Ok(event),
        Ok(_) => continue,
        Err(broadcast::error::RecvError::Lagged(_)) => continue,
        Err(broadcast::error::RecvError::Closed) => {
          return Err(ActorError::Internal("event bus closed".into()));
        }
      }
    }
  })
  .await
  .map_err(|_| ActorError::Timeout)?
}
