use crate::cli::DemoArgs;

use anyhow::{Context as AnyhowContext, Result};
use ract::{Executor, Response};

/// Submits a background program first and a number second, then reads the
/// number before the program output to show the two do not block each other.
pub async fn run_demo(executor: &Executor, args: DemoArgs) -> Result<()> {
  let listing = executor
    .run_command(&args.program)
    .await
    .with_context(|| format!("Failed to submit `{}`", args.program))?;
  let number = executor.generate_number().await.context("Failed to submit GenerateNumber")?;

  match number.recv().await.context("GenerateNumber failed")? {
    Response::Number(n) => println!("Random number: {}", n),
    other => println!("Unexpected reply: {}", other),
  }

  match listing.recv().await {
    Ok(Response::Output(output)) => {
      println!("Output of `{}`:", args.program);
      print!("{}", output);
    }
    Ok(other) => println!("Unexpected reply: {}", other),
    Err(e) => eprintln!("`{}` failed: {}", args.program, e),
  }
  Ok(())
}
