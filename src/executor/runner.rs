// src/executor/runner.rs

//! Background tasks spawned for `RunCommand` requests.
//!
//! Each task waits out the configured delay, runs one program through a [`ProgramLauncher`]
//! and writes exactly one reply: the captured stdout on success, an `ActorError` otherwise.
//! Tasks run concurrently with the event loop and with each other; their completions are
//! unordered.

use crate::error::ActorError;
use crate::runtime::command::{send_reply, ReplySender};
use crate::runtime::{EventBus, Reply, Response, SystemEvent, WaitGroup};

use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Runs an external program to completion and returns its standard output.
///
/// The executor calls this from background tasks only, never from the event loop.
#[async_trait]
pub trait ProgramLauncher: Send + Sync + fmt::Debug {
  async fn launch(&self, program: &str) -> Result<String, ActorError>;
}

/// Launches programs through the operating system: no arguments, inherited environment,
/// stdin closed, stdout and stderr captured.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

#[async_trait]
impl ProgramLauncher for SystemLauncher {
  async fn launch(&self, program: &str) -> Result<String, ActorError> {
    let output = tokio::process::Command::new(program)
      .stdin(Stdio::null())
      .kill_on_drop(true) // Cancelled tasks must not leave the child running
      .output()
      .await
      .map_err(|e| ActorError::from_io_program(e, program))?;

    if output.status.success() {
      Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
      Err(ActorError::ProgramFailed {
        program: program.to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      })
    }
  }
}

/// Everything a background task needs from its executor. Cloned into each task.
#[derive(Debug, Clone)]
pub(crate) struct RunnerContext {
  pub(crate) launcher: Arc<dyn ProgramLauncher>,
  pub(crate) event_bus: EventBus,
  pub(crate) tasks: WaitGroup,
  pub(crate) limiter: Option<Arc<Semaphore>>,
  pub(crate) exec_delay: Duration,
  pub(crate) cancel_on_shutdown: bool,
  pub(crate) shutdown: CancellationToken,
}

/// Keeps the task count and the lifecycle events honest even if a task is aborted.
struct TaskGuard {
  request_id: u64,
  tasks: WaitGroup,
  event_bus: EventBus,
  // Outer None: the task never reported an outcome.
  outcome: Option<Option<String>>,
}

impl TaskGuard {
  fn new(request_id: u64, tasks: WaitGroup, event_bus: EventBus) -> Self {
    tasks.add(1);
    Self {
      request_id,
      tasks,
      event_bus,
      outcome: None,
    }
  }

  fn finish(&mut self, reply: &Reply) {
    self.outcome = Some(reply.as_ref().err().map(ToString::to_string));
  }
}

impl Drop for TaskGuard {
  fn drop(&mut self) {
    let error_msg = match self.outcome.take() {
      Some(error_msg) => error_msg,
      None => {
        tracing::debug!(
          request_id = self.request_id,
          "Background task stopping abnormally (likely cancelled/aborted)"
        );
        Some("background task aborted".to_string())
      }
    };
    self.event_bus.publish(SystemEvent::BackgroundTaskFinished {
      request_id: self.request_id,
      error_msg,
    });
    self.tasks.done();
  }
}

/// Spawns the background task serving one `RunCommand` request and returns immediately.
///
/// A task spawned after shutdown has been signalled is cancelled before it does any work.
pub(crate) fn spawn_background_task(
  ctx: &RunnerContext,
  request_id: u64,
  program: String,
  reply_tx: ReplySender,
) -> JoinHandle<()> {
  let mut guard = TaskGuard::new(request_id, ctx.tasks.clone(), ctx.event_bus.clone());
  ctx.event_bus.publish(SystemEvent::BackgroundTaskStarted {
    request_id,
    program: program.clone(),
  });
  let ctx = ctx.clone();

  tokio::spawn(async move {
    tracing::debug!(request_id, %program, "Background task started");
    let work = run_program(&ctx, &program);

    let reply = if ctx.cancel_on_shutdown {
      tokio::select! {
        biased;
        _ = ctx.shutdown.cancelled() => {
          tracing::debug!(request_id, %program, "Background task cancelled by shutdown");
          Err(ActorError::Cancelled)
        }
        reply = work => reply,
      }
    } else {
      work.await
    };

    match &reply {
      Ok(_) => tracing::debug!(request_id, %program, "Background task completed"),
      Err(e) => tracing::debug!(request_id, %program, error = %e, "Background task failed"),
    }
    guard.finish(&reply);
    send_reply(request_id, reply_tx, reply);
    drop(guard);
  })
}

async fn run_program(ctx: &RunnerContext, program: &str) -> Reply {
  if !ctx.exec_delay.is_zero() {
    tokio::time::sleep(ctx.exec_delay).await;
  }

  let _permit = match &ctx.limiter {
    Some(limiter) => Some(
      limiter
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| ActorError::Internal("background task limiter closed".into()))?,
    ),
    None => None,
  };

  ctx.launcher.launch(program).await.map(Response::Output)
}
