// src/runtime/command.rs

use crate::error::ActorError;

use std::fmt;
use tokio::sync::oneshot; // Using tokio's oneshot for replies

/// The outcome delivered on a request's reply channel.
pub type Reply = Result<Response, ActorError>;

/// Sending half of a request's reply channel. Sending consumes it, so a reply is written at most once.
pub type ReplySender = oneshot::Sender<Reply>;

/// The kind of work a request asks the executor to perform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
  /// Produce a pseudo-random integer in `[0, 100)` inline on the event loop.
  GenerateNumber,
  /// Run the program named by the payload in a background task and reply with its stdout.
  RunCommand,
  /// A command name the executor does not recognize. Answered with a dispatch error.
  Unknown(String),
}

impl Command {
  /// Resolves a textual command name. Never fails: unrecognized names become `Command::Unknown`
  /// so they reach the dispatcher and get answered like any other request.
  pub fn from_name(name: &str) -> Self {
    match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
      "generate_number" | "gen" => Command::GenerateNumber,
      "run_command" | "run" => Command::RunCommand,
      _ => Command::Unknown(name.to_string()),
    }
  }

  /// Returns a string representation of the command variant's name. Useful for logging.
  pub fn variant_name(&self) -> &'static str {
    match self {
      Command::GenerateNumber => "GenerateNumber",
      Command::RunCommand => "RunCommand",
      Command::Unknown(_) => "Unknown",
    }
  }
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Command::Unknown(name) => write!(f, "Unknown({})", name),
      other => f.write_str(other.variant_name()),
    }
  }
}

/// Data attached to a request. Its meaning depends on the command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Payload {
  #[default]
  Empty,
  /// Free text, e.g. the program identifier for `RunCommand`.
  Text(String),
}

impl From<&str> for Payload {
  fn from(value: &str) -> Self {
    Payload::Text(value.to_string())
  }
}

impl From<String> for Payload {
  fn from(value: String) -> Self {
    Payload::Text(value)
  }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
  fn from(value: Option<T>) -> Self {
    value.map(Into::into).unwrap_or_default()
  }
}

/// A successful reply value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
  /// A generated number.
  Number(u32),
  /// Captured standard output of a program.
  Output(String),
}

impl Response {
  pub fn as_number(&self) -> Option<u32> {
    match self {
      Response::Number(n) => Some(*n),
      Response::Output(_) => None,
    }
  }

  pub fn as_output(&self) -> Option<&str> {
    match self {
      Response::Output(text) => Some(text),
      Response::Number(_) => None,
    }
  }
}

impl fmt::Display for Response {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Response::Number(n) => write!(f, "{}", n),
      Response::Output(text) => f.write_str(text),
    }
  }
}

/// One unit of work travelling from the caller to the event loop.
#[derive(Debug)]
pub struct Request {
  /// Correlation id assigned at submit time (logs and lifecycle events only).
  pub id: u64,
  pub command: Command,
  pub payload: Payload,
  pub reply_tx: ReplySender,
}

impl Request {
  /// Builds a request together with the caller's end of its reply channel.
  pub fn new(id: u64, command: Command, payload: Payload) -> (Self, oneshot::Receiver<Reply>) {
    let (reply_tx, reply_rx) = oneshot::channel();
    (
      Self {
        id,
        command,
        payload,
        reply_tx,
      },
      reply_rx,
    )
  }
}

/// Writes `reply` to `reply_tx`. Returns false if the caller stopped listening.
pub(crate) fn send_reply(request_id: u64, reply_tx: ReplySender, reply: Reply) -> bool {
  if reply_tx.send(reply).is_err() {
    // Receiver dropped; nothing else to do with the value.
    tracing::warn!(request_id, "Reply receiver dropped before the reply was delivered");
    false
  } else {
    true
  }
}
