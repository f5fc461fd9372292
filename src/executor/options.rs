// src/executor/options.rs

use std::time::Duration;

use crate::runtime::DEFAULT_MAILBOX_CAPACITY;
use crate::ActorError;

/// Default pause before a background task launches its program.
pub const DEFAULT_EXEC_DELAY: Duration = Duration::from_secs(1);

/// Holds validated executor options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
  /// Capacity of the inbound mailbox. `submit` waits once this many requests are queued.
  pub mailbox_capacity: usize,
  /// Fixed delay a background task waits before running its program (throttling stand-in).
  pub exec_delay: Duration,
  /// Upper bound on background tasks running their program at once. `None` is unbounded.
  pub max_background_tasks: Option<usize>,
  /// Seed for the number generator. `None` seeds from the OS.
  pub rng_seed: Option<u64>,
  /// Bound applied by `Executor::call` while waiting for a reply. `None` waits until answered.
  pub reply_timeout: Option<Duration>,
  /// Whether shutdown cancels background tasks that are still running.
  pub cancel_background_on_shutdown: bool,
}

impl Default for ExecutorOptions {
  fn default() -> Self {
    Self {
      mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
      exec_delay: DEFAULT_EXEC_DELAY,
      max_background_tasks: None,
      rng_seed: None,
      reply_timeout: None,
      cancel_background_on_shutdown: true,
    }
  }
}

impl ExecutorOptions {
  pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
    self.mailbox_capacity = capacity;
    self
  }

  pub fn exec_delay(mut self, delay: Duration) -> Self {
    self.exec_delay = delay;
    self
  }

  pub fn max_background_tasks(mut self, limit: Option<usize>) -> Self {
    self.max_background_tasks = limit;
    self
  }

  pub fn rng_seed(mut self, seed: u64) -> Self {
    self.rng_seed = Some(seed);
    self
  }

  pub fn reply_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.reply_timeout = timeout;
    self
  }

  pub fn cancel_background_on_shutdown(mut self, cancel: bool) -> Self {
    self.cancel_background_on_shutdown = cancel;
    self
  }

  /// Checks the options for values the executor cannot run with.
  pub fn validate(&self) -> Result<(), ActorError> {
    if self.mailbox_capacity == 0 {
      return Err(ActorError::InvalidArgument(
        "mailbox_capacity must be at least 1".into(),
      ));
    }
    if self.max_background_tasks == Some(0) {
      return Err(ActorError::InvalidArgument(
        "max_background_tasks must be at least 1 when set".into(),
      ));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_documented_values() {
    let opts = ExecutorOptions::default();
    assert_eq!(opts.mailbox_capacity, 10);
    assert_eq!(opts.exec_delay, Duration::from_secs(1));
    assert_eq!(opts.max_background_tasks, None);
    assert!(opts.cancel_background_on_shutdown);
    assert!(opts.validate().is_ok());
  }

  #[test]
  fn zero_limits_are_rejected() {
    let err = ExecutorOptions::default().mailbox_capacity(0).validate().unwrap_err();
    assert!(matches!(err, ActorError::InvalidArgument(_)));

    let err = ExecutorOptions::default()
      .max_background_tasks(Some(0))
      .validate()
      .unwrap_err();
    assert!(matches!(err, ActorError::InvalidArgument(_)));
  }

  #[test]
  fn setters_chain() {
    let opts = ExecutorOptions::default()
      .exec_delay(Duration::ZERO)
      .rng_seed(42)
      .reply_timeout(Some(Duration::from_secs(3)));
    assert_eq!(opts.exec_delay, Duration::ZERO);
    assert_eq!(opts.rng_seed, Some(42));
    assert_eq!(opts.reply_timeout, Some(Duration::from_secs(3)));
  }
}
