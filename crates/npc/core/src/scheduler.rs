//! Keyed, cancellable one-shot timers driven by the frame clock.
//!
//! [`DelayScheduler`] replaces wall-clock waits with timers that only move
//! when the owner advances them, which keeps delayed behavior deterministic.
//! A timer may be registered under a string key; arming a new timer under a
//! key that is still pending cancels the old one first, so at most one timer
//! per key is ever live.
//!
//! Firing is pull-based: after [`advance`](DelayScheduler::advance) the owner
//! drains [`pop_due`](DelayScheduler::pop_due) one callback at a time, so a
//! callback that cancels another due timer still prevents it from running.

use std::collections::HashMap;

/// Deferred action run against the scheduler's owner.
pub type Callback<C> = Box<dyn FnOnce(&mut C)>;

/// Identifier of an armed timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

struct Timer<C> {
    handle: TimerHandle,
    due: f64,
    callback: Callback<C>,
}

/// Timer set with an injectable, tick-driven clock.
pub struct DelayScheduler<C> {
    now: f64,
    next_id: u64,
    /// Handles at or above this id were armed during the current drain and
    /// wait for the next advance.
    fire_limit: u64,
    /// Sorted by due time, then by arming order.
    timers: Vec<Timer<C>>,
    keys: HashMap<String, TimerHandle>,
}

impl<C> DelayScheduler<C> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            fire_limit: 0,
            timers: Vec::new(),
            keys: HashMap::new(),
        }
    }

    /// Scheduler time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Arms a timer that runs `callback` once `duration` seconds have passed.
    ///
    /// With a `key`, any timer still pending under the same key is cancelled
    /// first and the new timer takes its place.
    pub fn delay(
        &mut self,
        duration: f32,
        key: Option<&str>,
        callback: impl FnOnce(&mut C) + 'static,
    ) -> TimerHandle {
        if let Some(key) = key
            && let Some(previous) = self.keys.remove(key)
        {
            self.remove_timer(previous);
        }

        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let due = self.now + f64::from(duration.max(0.0));
        let index = self.timers.partition_point(|timer| timer.due <= due);
        self.timers.insert(
            index,
            Timer {
                handle,
                due,
                callback: Box::new(callback),
            },
        );

        if let Some(key) = key {
            self.keys.insert(key.to_owned(), handle);
        }
        handle
    }

    /// Cancels a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.keys.retain(|_, keyed| *keyed != handle);
        self.remove_timer(handle)
    }

    /// Cancels the timer registered under `key`, if any.
    pub fn cancel_key(&mut self, key: &str) -> bool {
        match self.keys.remove(key) {
            Some(handle) => self.remove_timer(handle),
            None => false,
        }
    }

    /// Cancels every pending timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.keys.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|timer| timer.handle == handle)
    }

    pub fn is_key_pending(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Moves the clock forward by `dt` seconds.
    ///
    /// Timers armed after this call (for example by a callback drained from
    /// [`pop_due`](Self::pop_due)) wait for the next advance even when their
    /// duration is zero.
    pub fn advance(&mut self, dt: f32) {
        self.now += f64::from(dt.max(0.0));
        self.fire_limit = self.next_id;
    }

    /// Removes and returns the earliest due callback.
    pub fn pop_due(&mut self) -> Option<Callback<C>> {
        let index = self
            .timers
            .iter()
            .take_while(|timer| timer.due <= self.now)
            .position(|timer| timer.handle.0 < self.fire_limit)?;

        let timer = self.timers.remove(index);
        self.keys.retain(|_, keyed| *keyed != timer.handle);
        Some(timer.callback)
    }

    fn remove_timer(&mut self, handle: TimerHandle) -> bool {
        match self.timers.iter().position(|timer| timer.handle == handle) {
            Some(index) => {
                self.timers.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<C> Default for DelayScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> core::fmt::Debug for DelayScheduler<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DelayScheduler")
            .field("now", &self.now)
            .field("pending", &self.timers.len())
            .field("keys", &self.keys)
            .finish()
    }
}
