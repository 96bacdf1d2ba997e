//! Attack variants and their cooldown bookkeeping.
use npc_core::OrcConfig;

/// The three attacks an orc can start from Chase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    Melee,
    Rush,
    Throw,
}

impl AttackKind {
    /// Selection priority used by Chase.
    pub const PRIORITY: [Self; 3] = [Self::Melee, Self::Rush, Self::Throw];

    /// Inclusive distance window in which this attack may start.
    pub fn window(self, config: &OrcConfig) -> (f32, f32) {
        let attacks = &config.attacks;
        match self {
            Self::Melee => (0.0, config.melee_attack_range),
            Self::Rush => (attacks.rush_min_range, attacks.rush_max_range),
            Self::Throw => (attacks.throw_min_range, attacks.throw_max_range),
        }
    }

    pub fn in_range(self, config: &OrcConfig, distance: f32) -> bool {
        let (min, max) = self.window(config);
        (min..=max).contains(&distance)
    }

    pub fn cooldown(self, config: &OrcConfig) -> f32 {
        match self {
            Self::Melee => config.attacks.melee_cooldown,
            Self::Rush => config.attacks.rush_cooldown,
            Self::Throw => config.attacks.throw_cooldown,
        }
    }
}

/// Scheduler time at which each attack becomes available again.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Cooldowns {
    melee: f64,
    rush: f64,
    throw: f64,
}

impl Cooldowns {
    pub(crate) fn is_ready(&self, kind: AttackKind, now: f64) -> bool {
        now >= *self.slot(kind)
    }

    pub(crate) fn start(&mut self, kind: AttackKind, now: f64, duration: f32) {
        *self.slot_mut(kind) = now + f64::from(duration);
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot(&self, kind: AttackKind) -> &f64 {
        match kind {
            AttackKind::Melee => &self.melee,
            AttackKind::Rush => &self.rush,
            AttackKind::Throw => &self.throw,
        }
    }

    fn slot_mut(&mut self, kind: AttackKind) -> &mut f64 {
        match kind {
            AttackKind::Melee => &mut self.melee,
            AttackKind::Rush => &mut self.rush,
            AttackKind::Throw => &mut self.throw,
        }
    }
}
