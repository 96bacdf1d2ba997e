//! Core state trait.
//!
//! This module defines the [`State`] trait, which is the fundamental
//! abstraction for every behavior an agent can be in. The trait is generic
//! over a context type `C`, allowing states to read and mutate agent data.

/// A behavior unit driven by a [`StateMachine`](crate::StateMachine).
///
/// Every hook has a no-op default so concrete states only implement the
/// subset relevant to their behavior.
pub trait State<C> {
    /// Message type routed through [`State::on_message`].
    type Message;

    /// Called once when the machine switches into this state.
    fn enter(&mut self, _ctx: &mut C) {}

    /// Called once per tick while this state is active.
    fn execute(&mut self, _ctx: &mut C) {}

    /// Called once when the machine switches away from this state.
    fn exit(&mut self, _ctx: &mut C) {}

    /// Offers a message to this state.
    ///
    /// # Returns
    ///
    /// `true` if the message was handled and must not be offered to any
    /// other layer.
    fn on_message(&mut self, _ctx: &mut C, _message: &Self::Message) -> bool {
        false
    }
}

/// Context capability for requesting transitions from inside state hooks.
///
/// States never hold a reference to the machine that runs them. Instead they
/// write the next state into their context, and the machine drains it with
/// [`Transitions::take_transition`] as soon as the running hook returns.
pub trait Transitions<S> {
    /// Removes and returns the pending transition, if any.
    fn take_transition(&mut self) -> Option<S>;
}

/// Blanket implementation for boxed states.
///
/// This allows `Box<dyn State<C, Message = M>>` to also implement `State<C>`,
/// enabling machines over open sets of states.
impl<C, M> State<C> for Box<dyn State<C, Message = M>> {
    type Message = M;

    #[inline]
    fn enter(&mut self, ctx: &mut C) {
        (**self).enter(ctx)
    }

    #[inline]
    fn execute(&mut self, ctx: &mut C) {
        (**self).execute(ctx)
    }

    #[inline]
    fn exit(&mut self, ctx: &mut C) {
        (**self).exit(ctx)
    }

    #[inline]
    fn on_message(&mut self, ctx: &mut C, message: &M) -> bool {
        (**self).on_message(ctx, message)
    }
}
