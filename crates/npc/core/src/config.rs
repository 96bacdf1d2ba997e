//! Tunable parameters for an orc controller.

use crate::error::{ErrorSeverity, NpcError};
use crate::ids::EntityCategory;
use crate::perception::FieldOfView;
use crate::stuck::StuckConfig;

/// Per-controller tunables: movement, perception, patrol and attack windows.
///
/// Distances are in world units, durations in seconds, angles in degrees.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrcConfig {
    /// Category this controller registers under on the message bus.
    pub category: EntityCategory,

    /// Field of view used to spot the target.
    pub sight: FieldOfView,

    /// Stuck detection while patrolling.
    pub stuck: StuckConfig,

    /// Walking speed (Idle/Patrol).
    pub move_speed: f32,
    /// Running speed while chasing.
    pub chase_speed: f32,
    /// Slerp factor per second used when turning toward the target.
    pub rotation_speed: f32,

    /// Chase stops re-pathing once the target is this close.
    pub attack_range: f32,
    /// Maximum distance at which a melee attack is started.
    pub melee_attack_range: f32,
    /// Chase gives up once the target is farther than this.
    pub lose_range: f32,

    /// Radius of the random wander destination picked by Idle.
    pub wander_radius: f32,
    /// Time spent idling before patrolling to the wander destination.
    pub idle_duration: f32,
    /// Remaining path distance at which a patrol destination counts as reached.
    pub arrival_tolerance: f32,

    pub attacks: AttackConfig,
}

impl OrcConfig {
    pub const DEFAULT_DETECTION_RANGE: f32 = 10.0;
    pub const DEFAULT_VIEW_ANGLE: f32 = 90.0;
    pub const DEFAULT_MOVE_SPEED: f32 = 2.0;
    pub const DEFAULT_ROTATION_SPEED: f32 = 5.0;
    pub const DEFAULT_ATTACK_RANGE: f32 = 1.0;
    pub const DEFAULT_MELEE_ATTACK_RANGE: f32 = 5.0;

    pub fn new() -> Self {
        Self {
            category: EntityCategory::Orc,
            sight: FieldOfView::new(Self::DEFAULT_VIEW_ANGLE, Self::DEFAULT_DETECTION_RANGE),
            stuck: StuckConfig::default(),
            move_speed: Self::DEFAULT_MOVE_SPEED,
            chase_speed: 3.5,
            rotation_speed: Self::DEFAULT_ROTATION_SPEED,
            attack_range: Self::DEFAULT_ATTACK_RANGE,
            melee_attack_range: Self::DEFAULT_MELEE_ATTACK_RANGE,
            lose_range: 20.0,
            wander_radius: 8.0,
            idle_duration: 3.0,
            arrival_tolerance: 0.5,
            attacks: AttackConfig::default(),
        }
    }

    /// Checks every tunable for a value the controller cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=360.0).contains(&self.sight.view_angle) {
            return Err(ConfigError::ViewAngleOutOfRange(self.sight.view_angle));
        }

        let positive = [
            ("sight.detection_range", self.sight.detection_range),
            ("stuck.check_interval", self.stuck.check_interval),
            ("stuck.time_limit", self.stuck.time_limit),
            ("stuck.reroute_radius", self.stuck.reroute_radius),
            ("move_speed", self.move_speed),
            ("chase_speed", self.chase_speed),
            ("rotation_speed", self.rotation_speed),
            ("lose_range", self.lose_range),
            ("wander_radius", self.wander_radius),
            ("attacks.rush_speed", self.attacks.rush_speed),
            ("attacks.attack_timeout", self.attacks.attack_timeout),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("stuck.threshold", self.stuck.threshold),
            ("attack_range", self.attack_range),
            ("melee_attack_range", self.melee_attack_range),
            ("idle_duration", self.idle_duration),
            ("arrival_tolerance", self.arrival_tolerance),
            ("attacks.melee_cooldown", self.attacks.melee_cooldown),
            ("attacks.rush_cooldown", self.attacks.rush_cooldown),
            ("attacks.throw_cooldown", self.attacks.throw_cooldown),
            ("attacks.stone_release_time", self.attacks.stone_release_time),
            ("attacks.fallback_attack_delay", self.attacks.fallback_attack_delay),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let windows = [
            ("attacks.rush", self.attacks.rush_min_range, self.attacks.rush_max_range),
            ("attacks.throw", self.attacks.throw_min_range, self.attacks.throw_max_range),
        ];
        for (field, min, max) in windows {
            if min > max {
                return Err(ConfigError::InvertedWindow { field, min, max });
            }
        }

        Ok(())
    }
}

impl Default for OrcConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Range windows, cooldowns and timings of the three attack variants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttackConfig {
    pub melee_cooldown: f32,

    pub rush_min_range: f32,
    pub rush_max_range: f32,
    pub rush_speed: f32,
    pub rush_cooldown: f32,

    pub throw_min_range: f32,
    pub throw_max_range: f32,
    pub throw_cooldown: f32,
    /// Delay between the throw animation starting and the stone being spawned.
    pub stone_release_time: f32,

    /// Longest an attack state waits for its animation-end event.
    pub attack_timeout: f32,
    /// Post-attack delay used when the animation-end event never arrived.
    pub fallback_attack_delay: f32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            melee_cooldown: 1.5,
            rush_min_range: 5.0,
            rush_max_range: 9.0,
            rush_speed: 8.0,
            rush_cooldown: 6.0,
            throw_min_range: 6.0,
            throw_max_range: 12.0,
            throw_cooldown: 4.0,
            stone_release_time: 0.6,
            attack_timeout: 3.0,
            fallback_attack_delay: 1.0,
        }
    }
}

/// Errors produced by [`OrcConfig::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("view angle {0} is outside 0..=360 degrees")]
    ViewAngleOutOfRange(f32),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} window is inverted: min {min} > max {max}")]
    InvertedWindow {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

impl NpcError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ViewAngleOutOfRange(_) => "CONFIG_VIEW_ANGLE_OUT_OF_RANGE",
            Self::NotPositive { .. } => "CONFIG_NOT_POSITIVE",
            Self::Negative { .. } => "CONFIG_NEGATIVE",
            Self::InvertedWindow { .. } => "CONFIG_INVERTED_WINDOW",
        }
    }
}
