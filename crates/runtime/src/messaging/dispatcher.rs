//! Single-threaded dispatcher with delayed delivery.
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Weak;

use npc_core::{EntityCategory, MessageType, Payload, Telegram};
use tracing::{debug, trace};

use super::MessageHandler;

/// Non-owning handle to a registered receiver.
pub type HandlerRef = Weak<RefCell<dyn MessageHandler>>;

struct Queued {
    due: f64,
    seq: u64,
    telegram: Telegram,
}

/// Message bus shared by every controller of one world.
///
/// The dispatcher is meant to live in an `Rc` and be used through `&self`:
/// handlers may dispatch new telegrams while they are being delivered to.
/// Only one handler is kept per category; registering again replaces it.
///
/// A receiver that is already borrowed when a telegram reaches it (a
/// controller messaging its own category from inside its update) does not
/// see the telegram immediately. It is queued at the current bus time and
/// delivered by the next [`dispatch_delayed`](Self::dispatch_delayed) pump.
pub struct MessageDispatcher {
    handlers: RefCell<HashMap<EntityCategory, HandlerRef>>,
    /// Sorted by due time, then by dispatch order.
    queue: RefCell<VecDeque<Queued>>,
    now: Cell<f64>,
    next_seq: Cell<u64>,
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
            queue: RefCell::new(VecDeque::new()),
            now: Cell::new(0.0),
            next_seq: Cell::new(0),
        }
    }

    /// Bus time in seconds.
    pub fn now(&self) -> f64 {
        self.now.get()
    }

    /// Number of telegrams waiting for delivery.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Registers `handler` for `category`, replacing any previous handler.
    ///
    /// Returns true if a live handler was replaced.
    pub fn register_handler(&self, category: EntityCategory, handler: HandlerRef) -> bool {
        let previous = self.handlers.borrow_mut().insert(category, handler);
        let replaced = previous.is_some_and(|previous| previous.strong_count() > 0);
        if replaced {
            debug!(
                target: "runtime::messaging",
                %category,
                "Replaced message handler"
            );
        }
        replaced
    }

    /// Removes the handler of `category`. Returns false if none was set.
    pub fn unregister_handler(&self, category: EntityCategory) -> bool {
        self.handlers.borrow_mut().remove(&category).is_some()
    }

    /// Returns true if `category` has a handler that is still alive.
    pub fn is_registered(&self, category: EntityCategory) -> bool {
        self.handlers
            .borrow()
            .get(&category)
            .is_some_and(|handler| handler.strong_count() > 0)
    }

    /// Builds a telegram and dispatches it.
    pub fn dispatch_message(
        &self,
        delay: f32,
        sender: EntityCategory,
        receiver: EntityCategory,
        message: MessageType,
        payload: Option<Payload>,
    ) -> bool {
        let mut telegram = Telegram::new(sender, receiver, message).with_delay(delay);
        telegram.payload = payload;
        self.dispatch(telegram)
    }

    /// Delivers `telegram` now, or queues it when it carries a positive delay.
    ///
    /// Returns the receiver's "handled" answer for synchronous delivery and
    /// false for queued, deferred or unroutable telegrams.
    pub fn dispatch(&self, telegram: Telegram) -> bool {
        if telegram.is_immediate() {
            return self.deliver(telegram);
        }

        let due = self.now.get() + f64::from(telegram.delay);
        trace!(
            target: "runtime::messaging",
            message = %telegram.message,
            receiver = %telegram.receiver,
            due,
            "Queued delayed telegram"
        );
        self.enqueue(due, telegram);
        false
    }

    /// Advances the bus clock by `dt` and delivers every telegram now due.
    ///
    /// Returns the number of telegrams handed to a receiver.
    pub fn update(&self, dt: f32) -> usize {
        self.now.set(self.now.get() + f64::from(dt.max(0.0)));
        self.dispatch_delayed()
    }

    /// Delivers every telegram due at the current bus time, in due order.
    ///
    /// Telegrams queued while this pump runs wait for the next one.
    pub fn dispatch_delayed(&self) -> usize {
        let limit = self.next_seq.get();
        let now = self.now.get();
        let mut delivered = 0;

        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let index = queue
                    .iter()
                    .take_while(|queued| queued.due <= now)
                    .position(|queued| queued.seq < limit);
                index.and_then(|index| queue.remove(index))
            };
            let Some(queued) = next else {
                break;
            };

            if self.has_live_receiver(queued.telegram.receiver) {
                delivered += 1;
            }
            self.deliver(queued.telegram);
        }

        delivered
    }

    fn deliver(&self, telegram: Telegram) -> bool {
        let receiver = self
            .handlers
            .borrow()
            .get(&telegram.receiver)
            .and_then(Weak::upgrade);
        let Some(receiver) = receiver else {
            debug!(
                target: "runtime::messaging",
                message = %telegram.message,
                receiver = %telegram.receiver,
                "Dropped telegram without a registered receiver"
            );
            return false;
        };

        let handled = match receiver.try_borrow_mut() {
            Ok(mut handler) => handler.handle_message(&telegram),
            Err(_) => {
                trace!(
                    target: "runtime::messaging",
                    message = %telegram.message,
                    receiver = %telegram.receiver,
                    "Receiver busy; deferring telegram"
                );
                self.enqueue(self.now.get(), telegram);
                return false;
            }
        };

        if !handled {
            trace!(
                target: "runtime::messaging",
                message = %telegram.message,
                receiver = %telegram.receiver,
                "Telegram not handled"
            );
        }
        handled
    }

    fn has_live_receiver(&self, category: EntityCategory) -> bool {
        self.handlers
            .borrow()
            .get(&category)
            .and_then(Weak::upgrade)
            .is_some_and(|receiver| receiver.try_borrow_mut().is_ok())
    }

    fn enqueue(&self, due: f64, telegram: Telegram) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);

        let mut queue = self.queue.borrow_mut();
        let index = queue.partition_point(|queued| queued.due <= due);
        queue.insert(
            index,
            Queued {
                due,
                seq,
                telegram,
            },
        );
    }
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageDispatcher")
            .field("now", &self.now.get())
            .field("pending", &self.queue.borrow().len())
            .field("handlers", &self.handlers.borrow().len())
            .finish()
    }
}
