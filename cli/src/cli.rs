use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "ract", version, about = "Drive a ract active-object executor from the command line")]
pub struct Cli {
  /// Log executor internals (repeat for more detail). RUST_LOG overrides this.
  #[clap(long, short, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  #[clap(flatten)]
  pub executor: ExecutorArgs,

  #[clap(subcommand)]
  pub command: Commands,
}

/// Executor options shared by every subcommand.
#[derive(Parser, Debug)]
pub struct ExecutorArgs {
  /// Capacity of the inbound mailbox
  #[clap(long, default_value_t = ract::runtime::DEFAULT_MAILBOX_CAPACITY, global = true)]
  pub mailbox_capacity: usize,

  /// Delay before a background task runs its program, in milliseconds
  #[clap(long, default_value_t = 1000, global = true)]
  pub delay_ms: u64,

  /// Maximum number of programs running at once (unbounded if omitted)
  #[clap(long, global = true)]
  pub max_tasks: Option<usize>,

  /// Seed for the number generator (random if omitted)
  #[clap(long, global = true)]
  pub seed: Option<u64>,

  /// Give up waiting for a reply after this many milliseconds
  #[clap(long, global = true)]
  pub timeout_ms: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
  /// Run a program in the background while a number is generated inline
  Demo(DemoArgs),
  /// Generate numbers in [0, 100)
  Gen(GenArgs),
  /// Run a program through the executor and print its output
  Run(RunArgs),
  /// Submit a request by command name (unknown names are answered with an error)
  Submit(SubmitArgs),
}

#[derive(Parser, Debug)]
pub struct DemoArgs {
  /// Program to run in the background
  #[clap(default_value = "ls")]
  pub program: String,
}

#[derive(Parser, Debug)]
pub struct GenArgs {
  /// How many numbers to generate
  #[clap(long, short = 'n', default_value_t = 1)]
  pub count: usize,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
  /// Program identifiers, each run as its own request
  #[clap(required = true)]
  pub programs: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct SubmitArgs {
  /// Command name, e.g. `gen` or `run`
  pub command: String,

  /// Optional payload, e.g. the program for `run`
  pub payload: Option<String>,
}
