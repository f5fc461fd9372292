mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_tracing(verbose: u8) -> Result<()> {
  let default_filter = match verbose {
    0 => "warn",
    1 => "ract=info,warn",
    2 => "ract=debug,warn",
    _ => "ract=trace,debug",
  };
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
  let subscriber = FmtSubscriber::builder()
    .with_env_filter(env_filter)
    .with_target(true)
    .with_writer(std::io::stderr)
    .finish();
  tracing::subscriber::set_global_default(subscriber)?;
  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli_args = Cli::parse();
  init_tracing(cli_args.verbose)?;

  let executor = commands::build_executor(&cli_args.executor)?;
  let outcome = match cli_args.command {
    Commands::Demo(args) => commands::demo::run_demo(&executor, args).await,
    Commands::Gen(args) => commands::generate::generate_numbers(&executor, args).await,
    Commands::Run(args) => commands::run::run_programs(&executor, args).await,
    Commands::Submit(args) => commands::submit::submit_named(&executor, args).await,
  };

  // Always tear the executor down, even when the command failed.
  executor.term().await?;
  outcome
}
