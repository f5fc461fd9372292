// src/error.rs

use std::io;
use thiserror::Error;

/// Errors produced by the executor.
///
/// Errors raised while serving a request travel back to the caller as the `Err`
/// arm of its [`Reply`](crate::Reply), so every variant carries owned text rather
/// than a source error. The `Display` output is the human-readable description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive] // Allows adding more variants later without breaking change
pub enum ActorError {
  // --- Dispatch Errors ---
  #[error("Dispatch error: {0}")]
  Dispatch(String), // Unknown command or unusable payload

  // --- Execution Errors ---
  #[error("Failed to start program `{program}`: {reason}")]
  SpawnFailed { program: String, reason: String },
  #[error("Program `{program}` failed with {status}{}", stderr_suffix(.stderr))]
  ProgramFailed {
    program: String,
    status: String,
    stderr: String,
  },

  // --- Lifecycle Errors ---
  #[error("Request cancelled: executor shut down before a reply was produced")]
  Cancelled,
  #[error("Executor is shut down")]
  Shutdown,

  // --- Timeouts ---
  #[error("Operation timed out")]
  Timeout,

  // --- Resource Limits ---
  #[error("Resource limit reached (inbound mailbox is full)")]
  ResourceLimitReached,

  #[error("Invalid argument provided: {0}")]
  InvalidArgument(String),

  // --- Internal Errors ---
  #[error("Internal executor error: {0}")]
  Internal(String),
}

fn stderr_suffix(stderr: &str) -> String {
  let trimmed = stderr.trim();
  if trimmed.is_empty() {
    String::new()
  } else {
    format!(": {}", trimmed)
  }
}

impl ActorError {
  /// Maps an I/O error raised while starting `program` to an executor error.
  pub fn from_io_program(e: io::Error, program: &str) -> Self {
    let reason = match e.kind() {
      io::ErrorKind::NotFound => "program not found".to_string(),
      io::ErrorKind::PermissionDenied => "permission denied".to_string(),
      io::ErrorKind::TimedOut => "timed out".to_string(),
      _ => e.to_string(), // Default fallback
    };
    ActorError::SpawnFailed {
      program: program.to_string(),
      reason,
    }
  }

  /// True for errors that come from the executor's lifecycle rather than the work itself.
  pub fn is_lifecycle(&self) -> bool {
    matches!(self, ActorError::Cancelled | ActorError::Shutdown)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn not_found_maps_to_spawn_failed() {
    let err = ActorError::from_io_program(io::Error::from(io::ErrorKind::NotFound), "nope");
    assert_eq!(
      err,
      ActorError::SpawnFailed {
        program: "nope".into(),
        reason: "program not found".into()
      }
    );
    assert_eq!(err.to_string(), "Failed to start program `nope`: program not found");
  }

  #[test]
  fn spawn_timeout_keeps_the_program_name() {
    let err = ActorError::from_io_program(io::Error::from(io::ErrorKind::TimedOut), "slowpoke");
    assert_eq!(
      err,
      ActorError::SpawnFailed {
        program: "slowpoke".into(),
        reason: "timed out".into()
      }
    );
    assert_ne!(err.to_string(), ActorError::Timeout.to_string());
    assert!(err.to_string().contains("slowpoke"));
  }

  #[test]
  fn program_failed_display_includes_stderr_only_when_present() {
    let quiet = ActorError::ProgramFailed {
      program: "false".into(),
      status: "exit status: 1".into(),
      stderr: "  \n".into(),
    };
    assert_eq!(quiet.to_string(), "Program `false` failed with exit status: 1");

    let noisy = ActorError::ProgramFailed {
      program: "ls".into(),
      status: "exit status: 2".into(),
      stderr: "ls: cannot access 'x'\n".into(),
    };
    assert_eq!(
      noisy.to_string(),
      "Program `ls` failed with exit status: 2: ls: cannot access 'x'"
    );
  }

  #[test]
  fn lifecycle_errors_are_flagged() {
    assert!(ActorError::Cancelled.is_lifecycle());
    assert!(ActorError::Shutdown.is_lifecycle());
    assert!(!ActorError::Timeout.is_lifecycle());
  }
}
