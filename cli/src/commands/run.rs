use crate::cli::RunArgs;

use anyhow::{Context as AnyhowContext, Result};
use ract::{Executor, PendingReply};

/// Submits every program up front so they share the executor's fan-out, then
/// prints the results in submission order.
pub async fn run_programs(executor: &Executor, args: RunArgs) -> Result<()> {
  let mut pending: Vec<(String, PendingReply)> = Vec::with_capacity(args.programs.len());
  for program in args.programs {
    let reply = executor
      .run_command(&program)
      .await
      .with_context(|| format!("Failed to submit `{}`", program))?;
    pending.push((program, reply));
  }

  let mut failures = 0usize;
  for (program, reply) in pending {
    let outcome = match executor.options().reply_timeout {
      Some(limit) => reply.recv_timeout(limit).await,
      None => reply.recv().await,
    };
    match outcome {
      Ok(response) => print!("{}", response),
      Err(e) => {
        failures += 1;
        eprintln!("`{}` failed: {}", program, e);
      }
    }
  }

  if failures > 0 {
    anyhow::bail!("{} program(s) failed", failures);
  }
  Ok(())
}
