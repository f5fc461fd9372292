// src/executor/event_loop.rs

use crate::error::ActorError;
use crate::executor::dispatcher::{self, Action};
use crate::executor::runner::{self, RunnerContext};
use crate::runtime::command::send_reply;
use crate::runtime::{EventBus, MailboxReceiver, Request, Response, SystemEvent};

use rand::rngs::StdRng;

/// The event loop actor. Sole reader of the inbound mailbox and sole owner of the worker
/// state, so requests are served one at a time in arrival order without locks.
#[derive(Debug)]
pub(crate) struct ExecutorCore {
  mailbox_receiver: MailboxReceiver,
  event_bus: EventBus,
  rng: StdRng,
  runner: RunnerContext,
}

impl ExecutorCore {
  pub(crate) fn new(
    mailbox_receiver: MailboxReceiver,
    event_bus: EventBus,
    rng: StdRng,
    runner: RunnerContext,
  ) -> Self {
    Self {
      mailbox_receiver,
      event_bus,
      rng,
      runner,
    }
  }

  /// Runs until the shutdown token is cancelled or every sender is gone.
  pub(crate) async fn run_loop(mut self) {
    // The runner's token is the executor's token.
    let shutdown = self.runner.shutdown.clone();
    tracing::info!("Executor event loop started");

    loop {
      tokio::select! {
        biased; // Shutdown wins over queued work
        _ = shutdown.cancelled() => {
          tracing::info!("Shutdown signalled, stopping event loop");
          self.cancel_queued();
          break;
        }
        request = self.mailbox_receiver.recv() => match request {
          Ok(request) => self.handle_request(request),
          Err(_) => {
            tracing::info!("Mailbox closed and drained, stopping event loop");
            break;
          }
        }
      }
    }

    tracing::info!("Executor event loop finished");
  }

  fn handle_request(&mut self, request: Request) {
    let Request {
      id,
      command,
      payload,
      reply_tx,
    } = request;
    tracing::debug!(request_id = id, command = %command, "Dispatching request");
    self.event_bus.publish(SystemEvent::RequestDispatched {
      request_id: id,
      command: command.clone(),
    });

    match dispatcher::decide(&command, payload) {
      Ok(Action::GenerateNumber) => {
        let number = dispatcher::generate_number(&mut self.rng);
        tracing::trace!(request_id = id, number, "Generated number");
        send_reply(id, reply_tx, Ok(Response::Number(number)));
      }
      Ok(Action::RunProgram(program)) => {
        tracing::debug!(request_id = id, %program, "Spawning background task");
        // Detached; the task owns the reply sender from here on.
        let _ = runner::spawn_background_task(&self.runner, id, program, reply_tx);
      }
      Err(e) => {
        tracing::warn!(request_id = id, command = %command, error = %e, "Rejecting request");
        send_reply(id, reply_tx, Err(e));
      }
    }
  }

  /// Answers every request still waiting in the mailbox with `ActorError::Cancelled`.
  fn cancel_queued(&mut self) {
    // Closing first guarantees nothing lands in the mailbox after the drain.
    self.mailbox_receiver.close();
    let mut cancelled = 0usize;
    while let Ok(request) = self.mailbox_receiver.try_recv() {
      tracing::debug!(request_id = request.id, command = %request.command, "Cancelling queued request");
      send_reply(request.id, request.reply_tx, Err(ActorError::Cancelled));
      cancelled += 1;
    }
    if cancelled > 0 {
      tracing::info!(cancelled, "Cancelled requests still queued at shutdown");
    }
  }
}
