// src/runtime/waitgroup.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counts live background tasks so `Executor::term` can wait for them.
///
/// Tasks register with `add` before they are spawned and call `done` when they end
/// (through `TaskGuard`, so aborted tasks count down too). `wait` resolves once the
/// counter is back at zero.
#[derive(Debug, Clone, Default)]
pub(crate) struct WaitGroup {
  count: Arc<AtomicUsize>,
  notify_on_zero: Arc<Notify>,
}

impl WaitGroup {
  /// Creates a new WaitGroup with an initial count of zero.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a delta to the counter.
  pub fn add(&self, delta: usize) {
    if delta == 0 {
      return;
    }
    let old_count = self.count.fetch_add(delta, Ordering::AcqRel);
    tracing::trace!(delta, new_count = old_count + delta, "WaitGroup count increased");
  }

  /// Decrements the counter by one, waking waiters when it reaches zero.
  ///
  /// Panics if the counter would drop below zero.
  pub fn done(&self) {
    let old_count = self.count.fetch_sub(1, Ordering::AcqRel);

    if old_count == 0 {
      self.count.fetch_add(1, Ordering::Relaxed); // Try to restore
      panic!("WaitGroup::done() called when count was already zero!");
    } else if old_count == 1 {
      self.notify_on_zero.notify_waiters();
      tracing::trace!("WaitGroup count reached zero, notifying waiters");
    }
  }

  /// Waits until the counter becomes zero. Returns immediately if it already is.
  pub async fn wait(&self) {
    loop {
      // Register interest before checking the count so a `done` racing with us is not missed.
      let notified = self.notify_on_zero.notified();
      tokio::pin!(notified);
      notified.as_mut().enable();

      if self.count.load(Ordering::Acquire) == 0 {
        return;
      }
      notified.await;
    }
  }

  /// Returns the current count.
  pub fn get_count(&self) -> usize {
    self.count.load(Ordering::Acquire)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;
  use tokio::time::timeout;

  #[tokio::test]
  async fn wait_returns_immediately_at_zero() {
    let wg = WaitGroup::new();
    assert_eq!(wg.get_count(), 0);
    timeout(Duration::from_millis(50), wg.wait())
      .await
      .expect("wait blocked on an empty group");
  }

  #[tokio::test]
  async fn wait_releases_after_all_done() {
    let wg = WaitGroup::new();
    wg.add(2);
    assert_eq!(wg.get_count(), 2);

    let worker = wg.clone();
    tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(20)).await;
      worker.done();
      tokio::time::sleep(Duration::from_millis(20)).await;
      worker.done();
    });

    timeout(Duration::from_secs(1), wg.wait())
      .await
      .expect("wait never released");
    assert_eq!(wg.get_count(), 0);
  }

  #[test]
  #[should_panic(expected = "already zero")]
  fn done_below_zero_panics() {
    WaitGroup::new().done();
  }
}
