use crate::cli::SubmitArgs;

use anyhow::Result;
use ract::{ActorError, Command, Executor};

/// Sends a request by name. Unknown names still reach the executor, which
/// answers them with a dispatch error.
pub async fn submit_named(executor: &Executor, args: SubmitArgs) -> Result<()> {
  let command = Command::from_name(&args.command);
  tracing::debug!(command = %command, "Submitting named request");

  match executor.call(command, args.payload).await {
    Ok(response) => {
      println!("{}", response);
      Ok(())
    }
    Err(ActorError::Dispatch(reason)) => anyhow::bail!("Rejected: {}", reason),
    Err(e) => Err(e.into()),
  }
}
