//! Category-addressed telegram bus.
//!
//! Controllers register themselves under their [`EntityCategory`] and receive
//! [`Telegram`]s addressed to that category, either synchronously or after a
//! delay measured on the bus clock.
//!
//! [`EntityCategory`]: npc_core::EntityCategory
//! [`Telegram`]: npc_core::Telegram
mod dispatcher;

pub use dispatcher::{HandlerRef, MessageDispatcher};

use npc_core::Telegram;

/// Receiver side of the bus.
pub trait MessageHandler {
    /// Handles `telegram` and returns true if it was consumed.
    fn handle_message(&mut self, telegram: &Telegram) -> bool;
}
