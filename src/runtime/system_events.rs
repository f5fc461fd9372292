// src/runtime/system_events.rs

use crate::runtime::command::Command;

/// Lifecycle events broadcast by an executor via the `EventBus`, so observers can
/// follow request processing.
#[derive(Debug, Clone, PartialEq, Eq)] // SystemEvent is Cloneable for use with tokio::sync::broadcast
pub enum SystemEvent {
  /// Published once by `Executor::shutdown`, after the shutdown signal has been raised.
  ExecutorTerminating,

  /// Published by the event loop when it takes a request off the mailbox,
  /// before the dispatcher runs.
  RequestDispatched {
    request_id: u64,
    command: Command,
  },

  /// Published by the event loop after spawning a background task for a `RunCommand` request.
  BackgroundTaskStarted {
    request_id: u64,
    program: String,
  },

  /// Published by a background task as it ends, whatever the outcome.
  BackgroundTaskFinished {
    request_id: u64,
    /// Description of the failure, if the task did not produce output.
    /// Using `String` here to keep `SystemEvent` easily `Clone`.
    error_msg: Option<String>,
  },
}
