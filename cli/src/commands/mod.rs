pub mod demo;
pub mod generate;
pub mod run;
pub mod submit;

use crate::cli::ExecutorArgs;

use std::time::Duration;

use anyhow::{Context as AnyhowContext, Result};
use ract::{Executor, ExecutorOptions};

/// Maps the shared command-line flags onto executor options and starts the executor.
pub fn build_executor(args: &ExecutorArgs) -> Result<Executor> {
  let mut options = ExecutorOptions::default()
    .mailbox_capacity(args.mailbox_capacity)
    .exec_delay(Duration::from_millis(args.delay_ms))
    .max_background_tasks(args.max_tasks)
    .reply_timeout(args.timeout_ms.map(Duration::from_millis));
  if let Some(seed) = args.seed {
    options = options.rng_seed(seed);
  }
  Executor::with_options(options).context("Failed to start executor")
}
