// src/runtime/mod.rs

//! Core asynchronous primitives: Requests, Replies, the Mailbox and lifecycle events.

pub mod command;
pub mod event_bus;
pub mod mailbox;
pub mod reply;
pub mod system_events;
pub(crate) mod waitgroup;

pub use command::{Command, Payload, Reply, ReplySender, Request, Response};
pub use mailbox::{mailbox, MailboxReceiver, MailboxSender, DEFAULT_MAILBOX_CAPACITY};
pub use reply::PendingReply;

// Lifecycle Coordination
pub use event_bus::EventBus;
pub use system_events::SystemEvent;

// Sync Primitives
pub(crate) use waitgroup::WaitGroup;
