//! ract - An active-object executor on Tokio.
//!
//! A single event loop owns the worker state and serves requests one at a time from a
//! bounded mailbox. `GenerateNumber` is answered inline; `RunCommand` is handed to a
//! detached background task that runs an external program and replies on the
//! request's own reply channel.
//!
//! ```no_run
//! # async fn demo() -> Result<(), ract::ActorError> {
//! let executor = ract::Executor::new()?;
//! let listing = executor.run_command("ls").await?;
//! let number = executor.generate_number().await?;
//!
//! // The inline reply arrives while `ls` is still waiting out its delay.
//! println!("{}", number.recv().await?);
//! println!("{}", listing.recv().await?);
//!
//! executor.term().await
//! # }
//! ```

pub mod error;
pub mod executor;
pub mod runtime;

// Re-export core types for user convenience
pub use error::ActorError;
pub use executor::{Executor, ExecutorOptions, ProgramLauncher, SystemLauncher};
pub use runtime::{Command, EventBus, Payload, PendingReply, Reply, Response, SystemEvent};

// --- Top-Level Functions ---

const VERSION_MAJOR: i32 = 0;
const VERSION_MINOR: i32 = 1;
const VERSION_PATCH: i32 = 0;

/// Returns the library version as a tuple (major, minor, patch).
pub fn version() -> (i32, i32, i32) {
  (VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH)
}

/// Creates a new executor with default options.
pub fn executor() -> Result<Executor, ActorError> {
  Executor::new()
}
