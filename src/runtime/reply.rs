// src/runtime/reply.rs

use crate::error::ActorError;
use crate::runtime::command::Reply;

use std::time::Duration;
use tokio::sync::oneshot;

/// The caller's half of a request's reply channel.
///
/// Reading consumes the handle, so each reply is read exactly once. If the executor drops the
/// request without answering (e.g. it was shut down while the request was queued or running),
/// the read resolves to `ActorError::Cancelled` instead of waiting forever.
#[derive(Debug)]
pub struct PendingReply {
  request_id: u64,
  rx: oneshot::Receiver<Reply>,
}

impl PendingReply {
  pub(crate) fn new(request_id: u64, rx: oneshot::Receiver<Reply>) -> Self {
    Self { request_id, rx }
  }

  /// The id assigned to the request when it was submitted.
  pub fn request_id(&self) -> u64 {
    self.request_id
  }

  /// Waits for the reply.
  pub async fn recv(self) -> Reply {
    match self.rx.await {
      Ok(reply) => reply,
      Err(_) => {
        tracing::debug!(request_id = self.request_id, "Reply sender dropped without a reply");
        Err(ActorError::Cancelled)
      }
    }
  }

  /// Waits for the reply for at most `duration`.
  pub async fn recv_timeout(self, duration: Duration) -> Reply {
    let request_id = self.request_id;
    match tokio::time::timeout(duration, self.recv()).await {
      Ok(reply) => reply,
      Err(_) => {
        tracing::debug!(request_id, ?duration, "Timed out waiting for reply");
        Err(ActorError::Timeout)
      }
    }
  }

  /// Returns the reply if it has already arrived, without waiting.
  /// `Ok(None)` means the reply is still outstanding.
  pub fn try_recv(&mut self) -> Result<Option<Reply>, ActorError> {
    match self.rx.try_recv() {
      Ok(reply) => Ok(Some(reply)),
      Err(oneshot::error::TryRecvError::Empty) => Ok(None),
      Err(oneshot::error::TryRecvError::Closed) => Err(ActorError::Cancelled),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::runtime::command::Response;

  #[tokio::test]
  async fn dropped_sender_reads_as_cancelled() {
    let (tx, rx) = oneshot::channel::<Reply>();
    let pending = PendingReply::new(3, rx);
    drop(tx);
    assert_eq!(pending.recv().await, Err(ActorError::Cancelled));
  }

  #[tokio::test]
  async fn recv_timeout_elapses() {
    let (_tx, rx) = oneshot::channel::<Reply>();
    let pending = PendingReply::new(4, rx);
    assert_eq!(
      pending.recv_timeout(Duration::from_millis(20)).await,
      Err(ActorError::Timeout)
    );
  }

  #[test]
  fn try_recv_reports_outstanding_then_value() {
    let (tx, rx) = oneshot::channel::<Reply>();
    let mut pending = PendingReply::new(5, rx);
    assert_eq!(pending.try_recv(), Ok(None));
    tx.send(Ok(Response::Number(9))).unwrap();
    assert_eq!(pending.try_recv(), Ok(Some(Ok(Response::Number(9)))));
  }
}
