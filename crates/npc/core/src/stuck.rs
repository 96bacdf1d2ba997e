//! Stuck detection for patrol movement.
//!
//! The monitor samples the agent's position once per check interval on the
//! fixed-timestep clock. Intervals with too little displacement accumulate
//! into a stuck timer; when that timer reaches the limit the caller should
//! pick a new destination. Any interval with enough displacement clears the
//! accumulated time.

use glam::Vec3;

/// Tunables of the stuck monitor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StuckConfig {
    /// Seconds between two position samples.
    pub check_interval: f32,
    /// Displacement per interval below which the agent counts as stuck.
    pub threshold: f32,
    /// Accumulated stuck time that triggers a reroute.
    pub time_limit: f32,
    /// Radius of the random destination picked on reroute.
    pub reroute_radius: f32,
}

impl Default for StuckConfig {
    fn default() -> Self {
        Self {
            check_interval: 2.0,
            threshold: 0.5,
            time_limit: 10.0,
            reroute_radius: 5.0,
        }
    }
}

/// Outcome of one fixed tick of the monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum StuckVerdict {
    /// The check interval has not elapsed yet.
    Sampling,
    /// The agent moved at least the threshold during the interval.
    Progressing,
    /// The agent barely moved; stuck time keeps accumulating.
    Stalled,
    /// Stuck time reached the limit; a new destination is needed.
    Reroute,
}

/// Position sampler that detects lack of progress.
#[derive(Clone, Debug, PartialEq)]
pub struct StuckMonitor {
    last_position: Vec3,
    stuck_timer: f32,
    check_timer: f32,
}

impl StuckMonitor {
    pub fn new(position: Vec3) -> Self {
        Self {
            last_position: position,
            stuck_timer: 0.0,
            check_timer: 0.0,
        }
    }

    /// Clears both timers and resamples `position`.
    pub fn reset(&mut self, position: Vec3) {
        *self = Self::new(position);
    }

    /// Advances the check timer by `dt` and evaluates an interval once it
    /// has elapsed.
    ///
    /// The elapsed interval (not the nominal one) is added to the stuck timer,
    /// and the position is resampled at the end of every evaluated interval.
    pub fn fixed_tick(&mut self, dt: f32, position: Vec3, config: &StuckConfig) -> StuckVerdict {
        self.check_timer += dt;
        if self.check_timer < config.check_interval {
            return StuckVerdict::Sampling;
        }

        let moved = position.distance(self.last_position);
        let verdict = if moved < config.threshold {
            self.stuck_timer += self.check_timer;
            if self.stuck_timer >= config.time_limit {
                self.stuck_timer = 0.0;
                StuckVerdict::Reroute
            } else {
                StuckVerdict::Stalled
            }
        } else {
            self.stuck_timer = 0.0;
            StuckVerdict::Progressing
        };

        self.last_position = position;
        self.check_timer = 0.0;
        verdict
    }

    /// Stuck time accumulated so far.
    pub fn stuck_time(&self) -> f32 {
        self.stuck_timer
    }

    /// Time elapsed in the current check interval.
    pub fn check_time(&self) -> f32 {
        self.check_timer
    }

    pub fn last_position(&self) -> Vec3 {
        self.last_position
    }
}

impl Default for StuckMonitor {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.5;

    /// Runs one full 2s interval (four 0.5s fixed ticks) at `position`.
    fn interval(monitor: &mut StuckMonitor, position: Vec3) -> StuckVerdict {
        let config = StuckConfig::default();
        let mut verdict = StuckVerdict::Sampling;
        for _ in 0..4 {
            verdict = monitor.fixed_tick(DT, position, &config);
        }
        verdict
    }

    #[test]
    fn partial_interval_only_samples() {
        let mut monitor = StuckMonitor::default();
        let config = StuckConfig::default();

        for _ in 0..3 {
            assert_eq!(
                monitor.fixed_tick(DT, Vec3::ZERO, &config),
                StuckVerdict::Sampling
            );
        }
        assert_eq!(monitor.check_time(), 1.5);
    }

    #[test]
    fn four_stalled_intervals_do_not_reroute() {
        let mut monitor = StuckMonitor::default();
        let creep = Vec3::new(0.1, 0.0, 0.0);

        for step in 1..=4 {
            let verdict = interval(&mut monitor, creep * step as f32);
            assert_eq!(verdict, StuckVerdict::Stalled);
        }
        assert_eq!(monitor.stuck_time(), 8.0);
    }

    #[test]
    fn fifth_stalled_interval_reroutes_once_and_resets() {
        let mut monitor = StuckMonitor::default();
        for _ in 0..4 {
            interval(&mut monitor, Vec3::ZERO);
        }

        assert_eq!(interval(&mut monitor, Vec3::ZERO), StuckVerdict::Reroute);
        assert_eq!(monitor.stuck_time(), 0.0);

        // Accumulation starts over after a reroute.
        assert_eq!(interval(&mut monitor, Vec3::ZERO), StuckVerdict::Stalled);
        assert_eq!(monitor.stuck_time(), 2.0);
    }

    #[test]
    fn progress_resets_stuck_time_immediately() {
        let mut monitor = StuckMonitor::default();
        for _ in 0..3 {
            interval(&mut monitor, Vec3::ZERO);
        }
        assert_eq!(monitor.stuck_time(), 6.0);

        let verdict = interval(&mut monitor, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(verdict, StuckVerdict::Progressing);
        assert_eq!(monitor.stuck_time(), 0.0);
    }

    #[test]
    fn position_is_resampled_after_every_interval() {
        let mut monitor = StuckMonitor::default();
        let far = Vec3::new(3.0, 0.0, 0.0);

        interval(&mut monitor, far);
        assert_eq!(monitor.last_position(), far);

        // Standing still at the new sample counts as stalled.
        assert_eq!(interval(&mut monitor, far), StuckVerdict::Stalled);
    }
}
