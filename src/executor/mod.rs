// src/executor/mod.rs

//! The executor handle and the actor behind it.
//!
//! An [`Executor`] owns one event-loop task. Requests go through a bounded mailbox to
//! that loop, which answers `GenerateNumber` inline and hands `RunCommand` to a
//! background task. Every request gets its own reply channel, returned to the caller
//! as a [`PendingReply`].

pub(crate) mod event_loop;
pub mod dispatcher;
pub mod options;
pub mod runner;

pub use dispatcher::{Action, GENERATE_NUMBER_UPPER_BOUND};
pub use options::ExecutorOptions;
pub use runner::{ProgramLauncher, SystemLauncher};

use crate::error::ActorError;
use crate::runtime::{
  mailbox, Command, EventBus, MailboxSender, Payload, PendingReply, Reply, Request, SystemEvent, WaitGroup,
};
use self::event_loop::ExecutorCore;
use self::runner::RunnerContext;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// State shared by every clone of an `Executor` handle.
#[derive(Debug)]
pub(crate) struct ExecutorInner {
  mailbox_sender: MailboxSender,
  event_bus: EventBus,
  /// Live background tasks.
  tasks: WaitGroup,
  options: ExecutorOptions,
  /// Raised once by `shutdown`; the event loop and background tasks select on it.
  shutdown_token: CancellationToken,
  next_request_id: AtomicU64,
  shutdown_initiated: AtomicBool,
  loop_task: Mutex<Option<JoinHandle<()>>>,
}

impl ExecutorInner {
  /// Generates the next request id.
  fn next_request_id(&self) -> u64 {
    // Relaxed ordering is sufficient for a simple counter
    self.next_request_id.fetch_add(1, Ordering::Relaxed)
  }

  fn shutdown(&self) {
    if self
      .shutdown_initiated
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
    {
      tracing::info!("Executor shutdown initiated.");
      // Close before cancelling: once the loop sees the token, nothing new can arrive.
      self.mailbox_sender.close();
      self.shutdown_token.cancel();
      self.event_bus.publish(SystemEvent::ExecutorTerminating);
    } else {
      tracing::debug!("Executor shutdown already initiated.");
    }
  }
}

/// A handle to an active-object executor. Cloneable and thread-safe.
#[derive(Clone)] // Clone is cheap due to Arc
pub struct Executor {
  inner: Arc<ExecutorInner>,
}

impl Executor {
  /// Creates an executor with default options. Must be called within a Tokio runtime.
  pub fn new() -> Result<Self, ActorError> {
    Self::with_options(ExecutorOptions::default())
  }

  /// Creates an executor with the given options. Must be called within a Tokio runtime.
  pub fn with_options(options: ExecutorOptions) -> Result<Self, ActorError> {
    Self::with_launcher(options, Arc::new(SystemLauncher))
  }

  /// Creates an executor whose background tasks run programs through `launcher`.
  pub fn with_launcher(options: ExecutorOptions, launcher: Arc<dyn ProgramLauncher>) -> Result<Self, ActorError> {
    options.validate()?;
    tokio::runtime::Handle::try_current()
      .map_err(|_| ActorError::Internal("Executor requires a running Tokio runtime".into()))?;

    tracing::debug!(options = ?options, "Creating new Executor");
    let (mailbox_sender, mailbox_receiver) = mailbox(options.mailbox_capacity);
    let event_bus = EventBus::new();
    let shutdown_token = CancellationToken::new();
    let tasks = WaitGroup::new();

    let rng = match options.rng_seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };
    let runner = RunnerContext {
      launcher,
      event_bus: event_bus.clone(),
      tasks: tasks.clone(),
      limiter: options.max_background_tasks.map(|n| Arc::new(Semaphore::new(n))),
      exec_delay: options.exec_delay,
      cancel_on_shutdown: options.cancel_background_on_shutdown,
      shutdown: shutdown_token.clone(),
    };

    let executor_core = ExecutorCore::new(mailbox_receiver, event_bus.clone(), rng, runner);
    let loop_task = tokio::spawn(executor_core.run_loop());

    Ok(Self {
      inner: Arc::new(ExecutorInner {
        mailbox_sender,
        event_bus,
        tasks,
        options,
        shutdown_token,
        next_request_id: AtomicU64::new(1),
        shutdown_initiated: AtomicBool::new(false),
        loop_task: Mutex::new(Some(loop_task)),
      }),
    })
  }

  // --- Submitting Work ---

  /// Queues a request and returns the handle to its reply.
  ///
  /// Waits while the mailbox is full. Fails with `ActorError::Shutdown` once the
  /// executor is shut down.
  pub async fn submit(&self, command: Command, payload: impl Into<Payload>) -> Result<PendingReply, ActorError> {
    if self.is_shutdown() {
      return Err(ActorError::Shutdown);
    }
    let id = self.inner.next_request_id();
    let (request, reply_rx) = Request::new(id, command, payload.into());
    tracing::trace!(request_id = id, command = %request.command, "Submitting request");
    self
      .inner
      .mailbox_sender
      .send(request)
      .await
      .map_err(|_| ActorError::Shutdown)?;
    Ok(PendingReply::new(id, reply_rx))
  }

  /// Queues a request without waiting. Fails with `ActorError::ResourceLimitReached`
  /// when the mailbox is full.
  pub fn try_submit(&self, command: Command, payload: impl Into<Payload>) -> Result<PendingReply, ActorError> {
    if self.is_shutdown() {
      return Err(ActorError::Shutdown);
    }
    let id = self.inner.next_request_id();
    let (request, reply_rx) = Request::new(id, command, payload.into());
    match self.inner.mailbox_sender.try_send(request) {
      Ok(()) => Ok(PendingReply::new(id, reply_rx)),
      Err(async_channel::TrySendError::Full(_)) => Err(ActorError::ResourceLimitReached),
      Err(async_channel::TrySendError::Closed(_)) => Err(ActorError::Shutdown),
    }
  }

  /// Submits a request and waits for its reply, bounded by `reply_timeout` if configured.
  pub async fn call(&self, command: Command, payload: impl Into<Payload>) -> Reply {
    let pending = self.submit(command, payload).await?;
    match self.inner.options.reply_timeout {
      Some(timeout) => pending.recv_timeout(timeout).await,
      None => pending.recv().await,
    }
  }

  /// Submits a `GenerateNumber` request.
  pub async fn generate_number(&self) -> Result<PendingReply, ActorError> {
    self.submit(Command::GenerateNumber, Payload::Empty).await
  }

  /// Submits a `RunCommand` request for `program`.
  pub async fn run_command(&self, program: &str) -> Result<PendingReply, ActorError> {
    self.submit(Command::RunCommand, program).await
  }

  // --- Lifecycle ---

  /// Stops the executor from taking new work. Returns immediately.
  ///
  /// Requests still queued are answered with `ActorError::Cancelled`; running background
  /// tasks are cancelled unless `cancel_background_on_shutdown` is off. Safe to call more
  /// than once.
  pub fn shutdown(&self) {
    self.inner.shutdown();
  }

  /// Shuts down and waits for the event loop and every background task to finish.
  /// Consumes the handle. Use for final cleanup.
  pub async fn term(self) -> Result<(), ActorError> {
    self.inner.shutdown();

    let loop_task = self.inner.loop_task.lock().await.take();
    if let Some(handle) = loop_task {
      handle
        .await
        .map_err(|e| ActorError::Internal(format!("event loop task failed: {}", e)))?;
    }

    tracing::debug!(in_flight = self.inner.tasks.get_count(), "Waiting for background tasks");
    self.inner.tasks.wait().await;
    tracing::info!("Executor termination complete.");
    Ok(())
  }

  pub fn is_shutdown(&self) -> bool {
    self.inner.shutdown_initiated.load(Ordering::Acquire)
  }

  /// Number of background tasks that have not finished yet.
  pub fn in_flight(&self) -> usize {
    self.inner.tasks.get_count()
  }

  /// Subscribes to lifecycle events published after this call.
  pub fn subscribe_events(&self) -> broadcast::Receiver<SystemEvent> {
    self.inner.event_bus.subscribe()
  }

  pub fn options(&self) -> &ExecutorOptions {
    &self.inner.options
  }
}

impl fmt::Debug for Executor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Executor")
      .field("shutdown", &self.is_shutdown())
      .field("in_flight", &self.in_flight())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::runtime::Response;
  use std::time::Duration;
  use tokio_test::{assert_err, assert_ok};

  fn quick_options() -> ExecutorOptions {
    ExecutorOptions::default().exec_delay(Duration::ZERO).rng_seed(7)
  }

  #[test]
  fn creation_outside_runtime_fails() {
    let err = Executor::new().unwrap_err();
    assert!(matches!(err, ActorError::Internal(_)));
  }

  #[tokio::test]
  async fn invalid_options_are_rejected() {
    let err = Executor::with_options(ExecutorOptions::default().mailbox_capacity(0)).unwrap_err();
    assert!(matches!(err, ActorError::InvalidArgument(_)));
  }

  #[tokio::test]
  async fn request_ids_are_sequential() {
    let executor = assert_ok!(Executor::with_options(quick_options()));
    let first = assert_ok!(executor.generate_number().await);
    let second = assert_ok!(executor.generate_number().await);
    assert_eq!(first.request_id(), 1);
    assert_eq!(second.request_id(), 2);
    assert!(first.recv().await.is_ok());
    assert!(second.recv().await.is_ok());
  }

  #[tokio::test]
  async fn seeded_executors_generate_the_same_numbers() {
    let a = assert_ok!(Executor::with_options(quick_options()));
    let b = assert_ok!(Executor::with_options(quick_options()));
    for _ in 0..8 {
      let from_a = a.call(Command::GenerateNumber, Payload::Empty).await;
      let from_b = b.call(Command::GenerateNumber, Payload::Empty).await;
      assert_eq!(from_a, from_b);
      assert!(matches!(from_a, Ok(Response::Number(n)) if n < GENERATE_NUMBER_UPPER_BOUND));
    }
  }

  #[tokio::test]
  async fn try_submit_reports_full_mailbox() {
    let executor = assert_ok!(Executor::with_options(quick_options().mailbox_capacity(1)));
    // Current-thread runtime: the event loop cannot drain until we yield.
    let first = assert_ok!(executor.try_submit(Command::GenerateNumber, Payload::Empty));
    let second = executor.try_submit(Command::GenerateNumber, Payload::Empty);
    assert_eq!(second.unwrap_err(), ActorError::ResourceLimitReached);
    assert!(first.recv().await.is_ok());
  }

  #[tokio::test]
  async fn shutdown_rejects_new_work() {
    let executor = assert_ok!(Executor::with_options(quick_options()));
    executor.shutdown();
    executor.shutdown();
    assert!(executor.is_shutdown());
    assert_err!(executor.generate_number().await);
    assert_eq!(
      executor.try_submit(Command::GenerateNumber, Payload::Empty).unwrap_err(),
      ActorError::Shutdown
    );
    assert_ok!(executor.term().await);
  }
}
