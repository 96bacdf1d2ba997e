//! Message records exchanged between entity categories.

use glam::Vec3;

use crate::ids::{EntityCategory, EntityId};

/// Kind of a [`Telegram`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageType {
    /// Something worth investigating happened at the payload point.
    Alert,
    /// The receiver took damage.
    Damaged,
    /// A chaser lost track of its target.
    TargetLost,
    /// Forces the receiver to target the payload entity.
    Taunt,
}

/// Optional data attached to a [`Telegram`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload {
    Point(Vec3),
    Entity(EntityId),
}

/// Immutable message record routed by category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telegram {
    /// Seconds between dispatch and delivery; zero, negative or NaN delivers
    /// at once.
    pub delay: f32,
    pub sender: EntityCategory,
    pub receiver: EntityCategory,
    pub message: MessageType,
    pub payload: Option<Payload>,
}

impl Telegram {
    pub fn new(sender: EntityCategory, receiver: EntityCategory, message: MessageType) -> Self {
        Self {
            delay: 0.0,
            sender,
            receiver,
            message,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Returns true if the telegram is delivered synchronously.
    ///
    /// A NaN delay has no due time, so it is delivered at once as well.
    pub fn is_immediate(&self) -> bool {
        self.delay <= 0.0 || self.delay.is_nan()
    }

    pub fn point(&self) -> Option<Vec3> {
        match self.payload {
            Some(Payload::Point(point)) => Some(point),
            _ => None,
        }
    }

    pub fn entity(&self) -> Option<EntityId> {
        match self.payload {
            Some(Payload::Entity(entity)) => Some(entity),
            _ => None,
        }
    }
}
