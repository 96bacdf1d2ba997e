//! Two-layer state machine.
//!
//! [`StateMachine`] holds an optional **global** state and an optional
//! **current** state. The global layer runs every tick and sees every message
//! first; the current layer is swapped by transitions.

use crate::{State, Transitions};

/// Routes ticks, transitions and messages to a global and a current state.
///
/// # Semantics
///
/// - [`change_state`](Self::change_state) calls `exit` on the outgoing state
///   (if any), installs the new one, then calls `enter` on it. Changing to a
///   state equal to the current one still exits and re-enters.
/// - [`update`](Self::update) executes the global state, then the current one.
///   A transition requested by either hook is applied before the next hook runs,
///   so the current layer always executes the state that is installed *now*.
/// - [`handle_message`](Self::handle_message) offers the message to the global
///   state first and only falls through to the current state when the global
///   one reports it unhandled.
#[derive(Debug)]
pub struct StateMachine<S, G> {
    current: Option<S>,
    global: Option<G>,
}

impl<S, G> StateMachine<S, G> {
    /// Creates a machine with no states installed.
    pub const fn new() -> Self {
        Self {
            current: None,
            global: None,
        }
    }

    /// Creates a machine with the given global state installed.
    ///
    /// The global state's `enter` hook is **not** called, because no context is
    /// available yet. Use [`set_global_state`](Self::set_global_state) when the
    /// hook matters.
    pub fn with_global(global: G) -> Self {
        Self {
            current: None,
            global: Some(global),
        }
    }

    /// Returns the current state, if one is installed.
    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// Returns the current state mutably, if one is installed.
    pub fn current_mut(&mut self) -> Option<&mut S> {
        self.current.as_mut()
    }

    /// Returns the global state, if one is installed.
    pub fn global(&self) -> Option<&G> {
        self.global.as_ref()
    }

    /// Returns true if a current state is installed and matches `predicate`.
    pub fn is_in(&self, predicate: impl FnOnce(&S) -> bool) -> bool {
        self.current.as_ref().is_some_and(predicate)
    }

    /// Drops the current state without calling its `exit` hook.
    ///
    /// Used when the owning agent is recycled and the old state must not run
    /// any more side effects.
    pub fn reset(&mut self) -> Option<S> {
        self.current.take()
    }
}

impl<S, G> StateMachine<S, G> {
    /// Switches the current state to `state`.
    ///
    /// Transitions requested by the `exit` or `enter` hooks are applied in
    /// order once the incoming state has been entered.
    pub fn change_state<C>(&mut self, ctx: &mut C, state: S)
    where
        C: Transitions<S>,
        S: State<C>,
    {
        let mut next = Some(state);
        while let Some(incoming) = next {
            if let Some(mut outgoing) = self.current.take() {
                outgoing.exit(ctx);
            }
            self.current.insert(incoming).enter(ctx);
            next = ctx.take_transition();
        }
    }

    /// Replaces the global state, pairing `exit` and `enter` the same way as
    /// [`change_state`](Self::change_state).
    pub fn set_global_state<C>(&mut self, ctx: &mut C, global: G)
    where
        C: Transitions<S>,
        S: State<C>,
        G: State<C>,
    {
        if let Some(mut outgoing) = self.global.take() {
            outgoing.exit(ctx);
        }
        self.global.insert(global).enter(ctx);
        self.apply_pending(ctx);
    }

    /// Runs one tick: global `execute`, then current `execute`.
    pub fn update<C>(&mut self, ctx: &mut C)
    where
        C: Transitions<S>,
        S: State<C>,
        G: State<C>,
    {
        if let Some(global) = self.global.as_mut() {
            global.execute(ctx);
        }
        self.apply_pending(ctx);

        if let Some(current) = self.current.as_mut() {
            current.execute(ctx);
        }
        self.apply_pending(ctx);
    }

    /// Offers `message` to the global state, then to the current state.
    ///
    /// # Returns
    ///
    /// `true` if either layer handled the message.
    pub fn handle_message<C>(&mut self, ctx: &mut C, message: &<S as State<C>>::Message) -> bool
    where
        C: Transitions<S>,
        S: State<C>,
        G: State<C, Message = <S as State<C>>::Message>,
    {
        let mut handled = false;
        if let Some(global) = self.global.as_mut() {
            handled = global.on_message(ctx, message);
        }
        self.apply_pending(ctx);

        if !handled && let Some(current) = self.current.as_mut() {
            handled = current.on_message(ctx, message);
        }
        self.apply_pending(ctx);

        handled
    }

    fn apply_pending<C>(&mut self, ctx: &mut C)
    where
        C: Transitions<S>,
        S: State<C>,
    {
        if let Some(next) = ctx.take_transition() {
            self.change_state(ctx, next);
        }
    }
}

impl<S, G> Default for StateMachine<S, G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TestContext {
        log: Vec<String>,
        pending: Option<Phase>,
    }

    impl Transitions<Phase> for TestContext {
        fn take_transition(&mut self) -> Option<Phase> {
            self.pending.take()
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Phase {
        A,
        B,
        /// Requests a switch to `B` on its first execute.
        Hop,
        /// Handles every message.
        Greedy,
    }

    impl State<TestContext> for Phase {
        type Message = &'static str;

        fn enter(&mut self, ctx: &mut TestContext) {
            ctx.log.push(format!("enter {self:?}"));
        }

        fn execute(&mut self, ctx: &mut TestContext) {
            ctx.log.push(format!("execute {self:?}"));
            if *self == Phase::Hop {
                ctx.pending = Some(Phase::B);
            }
        }

        fn exit(&mut self, ctx: &mut TestContext) {
            ctx.log.push(format!("exit {self:?}"));
        }

        fn on_message(&mut self, ctx: &mut TestContext, message: &&'static str) -> bool {
            ctx.log.push(format!("message {self:?} {message}"));
            *self == Phase::Greedy
        }
    }

    struct Global {
        handles: bool,
        redirect: Option<Phase>,
    }

    impl State<TestContext> for Global {
        type Message = &'static str;

        fn execute(&mut self, ctx: &mut TestContext) {
            ctx.log.push("execute global".to_string());
            if let Some(next) = self.redirect.take() {
                ctx.pending = Some(next);
            }
        }

        fn on_message(&mut self, ctx: &mut TestContext, message: &&'static str) -> bool {
            ctx.log.push(format!("message global {message}"));
            self.handles
        }
    }

    fn machine(handles: bool) -> StateMachine<Phase, Global> {
        StateMachine::with_global(Global {
            handles,
            redirect: None,
        })
    }

    #[test]
    fn first_transition_only_enters() {
        let mut fsm = machine(false);
        let mut ctx = TestContext::default();

        fsm.change_state(&mut ctx, Phase::A);

        assert_eq!(ctx.log, ["enter A"]);
        assert_eq!(fsm.current(), Some(&Phase::A));
    }

    #[test]
    fn exit_runs_before_enter() {
        let mut fsm = machine(false);
        let mut ctx = TestContext::default();

        fsm.change_state(&mut ctx, Phase::A);
        fsm.change_state(&mut ctx, Phase::B);

        assert_eq!(ctx.log, ["enter A", "exit A", "enter B"]);
    }

    #[test]
    fn replacing_the_global_state_pairs_exit_and_enter() {
        let mut fsm: StateMachine<Phase, Phase> = StateMachine::new();
        let mut ctx = TestContext::default();

        fsm.set_global_state(&mut ctx, Phase::A);
        fsm.set_global_state(&mut ctx, Phase::B);

        assert_eq!(ctx.log, ["enter A", "exit A", "enter B"]);
        assert_eq!(fsm.global(), Some(&Phase::B));
        assert_eq!(fsm.current(), None);
    }

    #[test]
    fn same_state_is_re_entered() {
        let mut fsm = machine(false);
        let mut ctx = TestContext::default();

        fsm.change_state(&mut ctx, Phase::A);
        fsm.change_state(&mut ctx, Phase::A);

        assert_eq!(ctx.log, ["enter A", "exit A", "enter A"]);
    }

    #[test]
    fn global_executes_before_current() {
        let mut fsm = machine(false);
        let mut ctx = TestContext::default();
        fsm.change_state(&mut ctx, Phase::A);
        ctx.log.clear();

        fsm.update(&mut ctx);
        fsm.update(&mut ctx);

        assert_eq!(
            ctx.log,
            ["execute global", "execute A", "execute global", "execute A"]
        );
    }

    #[test]
    fn transition_from_execute_is_applied_after_the_hook() {
        let mut fsm = machine(false);
        let mut ctx = TestContext::default();
        fsm.change_state(&mut ctx, Phase::Hop);
        ctx.log.clear();

        fsm.update(&mut ctx);

        assert_eq!(
            ctx.log,
            ["execute global", "execute Hop", "exit Hop", "enter B"]
        );
        assert_eq!(fsm.current(), Some(&Phase::B));
    }

    #[test]
    fn global_redirect_is_visible_to_current_layer_in_same_tick() {
        let mut fsm = StateMachine::with_global(Global {
            handles: false,
            redirect: Some(Phase::B),
        });
        let mut ctx = TestContext::default();
        fsm.change_state(&mut ctx, Phase::A);
        ctx.log.clear();

        fsm.update(&mut ctx);

        assert_eq!(
            ctx.log,
            ["execute global", "exit A", "enter B", "execute B"]
        );
    }

    #[test]
    fn global_handled_message_skips_current() {
        let mut fsm = machine(true);
        let mut ctx = TestContext::default();
        fsm.change_state(&mut ctx, Phase::A);
        ctx.log.clear();

        assert!(fsm.handle_message(&mut ctx, &"ping"));
        assert_eq!(ctx.log, ["message global ping"]);
    }

    #[test]
    fn unhandled_message_falls_through_to_current() {
        let mut fsm = machine(false);
        let mut ctx = TestContext::default();
        fsm.change_state(&mut ctx, Phase::Greedy);
        ctx.log.clear();

        assert!(fsm.handle_message(&mut ctx, &"ping"));
        assert_eq!(ctx.log, ["message global ping", "message Greedy ping"]);
    }

    #[test]
    fn message_without_any_handler_reports_unhandled() {
        let mut fsm = machine(false);
        let mut ctx = TestContext::default();
        fsm.change_state(&mut ctx, Phase::A);

        assert!(!fsm.handle_message(&mut ctx, &"ping"));
    }

    #[test]
    fn reset_skips_exit() {
        let mut fsm = machine(false);
        let mut ctx = TestContext::default();
        fsm.change_state(&mut ctx, Phase::A);

        assert_eq!(fsm.reset(), Some(Phase::A));
        fsm.change_state(&mut ctx, Phase::B);

        assert_eq!(ctx.log, ["enter A", "enter B"]);
    }

    #[test]
    fn transitions_never_interleave_with_execute() {
        let mut fsm = machine(false);
        let mut ctx = TestContext::default();
        fsm.change_state(&mut ctx, Phase::Hop);
        for _ in 0..3 {
            fsm.update(&mut ctx);
            fsm.change_state(&mut ctx, Phase::Hop);
        }

        // Every exit is immediately followed by an enter.
        for (index, entry) in ctx.log.iter().enumerate() {
            if entry.starts_with("exit") {
                assert!(ctx.log[index + 1].starts_with("enter"), "{:?}", ctx.log);
            }
        }
    }
}
