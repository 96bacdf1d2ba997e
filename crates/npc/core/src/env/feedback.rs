//! Fire-and-forget outputs: animation, audio and progress tracking.

use crate::ids::EntityCategory;

/// Semantic audio cues played by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SoundCue {
    Spawn,
    Damage,
    Death,
}

/// One-shot visual effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum VisualEffect {
    /// Dissolve-out played on death.
    Dissolve,
}

/// Animation signal sink.
pub trait AnimationSink {
    /// Fires a named animator trigger.
    fn set_trigger(&mut self, name: &'static str);

    fn start_effect(&mut self, effect: VisualEffect);
}

pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Quest/progress tracking notified on kills.
pub trait ProgressTracker {
    fn add_kill(&mut self, category: EntityCategory);
}
