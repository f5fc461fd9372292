// src/runtime/mailbox.rs

//! Type aliases for the executor's inbound channel based on `async-channel`.

use crate::runtime::command::Request;

/// The sending end of the executor's mailbox. Cloneable.
pub type MailboxSender = async_channel::Sender<Request>;

/// The receiving end of the executor's mailbox. Only the event loop reads from it.
pub type MailboxReceiver = async_channel::Receiver<Request>;

/// Default capacity for the inbound mailbox.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 10; // Absorbs short bursts; beyond this, submit waits

/// Creates a new bounded mailbox channel pair.
pub fn mailbox(capacity: usize) -> (MailboxSender, MailboxReceiver) {
  async_channel::bounded(capacity.max(1))
}
