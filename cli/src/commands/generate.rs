use crate::cli::GenArgs;

use anyhow::{bail, Result};
use ract::{Command, Executor, Payload, Response};

pub async fn generate_numbers(executor: &Executor, args: GenArgs) -> Result<()> {
  for _ in 0..args.count {
    match executor.call(Command::GenerateNumber, Payload::Empty).await? {
      Response::Number(n) => println!("{}", n),
      other => bail!("Expected a number, got {:?}", other),
    }
  }
  Ok(())
}
