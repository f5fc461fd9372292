// src/executor/dispatcher.rs

//! Maps a request's command and payload to the action the event loop performs.
//! Nothing here touches shared state; the number generator is passed in by its owner.

use crate::error::ActorError;
use crate::runtime::{Command, Payload};

use rand::Rng;

/// Generated numbers fall in `[0, GENERATE_NUMBER_UPPER_BOUND)`.
pub const GENERATE_NUMBER_UPPER_BOUND: u32 = 100;

/// What the event loop should do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  /// Answer inline with a generated number.
  GenerateNumber,
  /// Spawn a background task running this program.
  RunProgram(String),
}

/// Decides how a request is served. Total over `Command`: anything that cannot be served
/// comes back as a dispatch error so it can be written to the request's reply channel.
pub fn decide(command: &Command, payload: Payload) -> Result<Action, ActorError> {
  match command {
    Command::GenerateNumber => Ok(Action::GenerateNumber),
    Command::RunCommand => match payload {
      Payload::Text(program) if !program.trim().is_empty() => Ok(Action::RunProgram(program.trim().to_string())),
      _ => Err(ActorError::Dispatch(
        "RunCommand requires a program identifier payload".into(),
      )),
    },
    Command::Unknown(name) => Err(ActorError::Dispatch(format!("unknown command `{}`", name))),
  }
}

/// Draws a number in `[0, GENERATE_NUMBER_UPPER_BOUND)` from `rng`.
pub fn generate_number<R: Rng>(rng: &mut R) -> u32 {
  rng.random_range(0..GENERATE_NUMBER_UPPER_BOUND)
}
