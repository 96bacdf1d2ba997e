//! Tracking of objects spawned by an NPC.
//!
//! The registry never creates anything. It only remembers which externally
//! spawned objects belong to its owner so they can all be destroyed when the
//! owner dies.

use crate::env::ProjectileOracle;
use crate::ids::EntityId;

/// Insertion-ordered set of owned object ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnedObjects {
    entries: Vec<EntityId>,
}

impl OwnedObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `object` unless it is already registered.
    ///
    /// Returns true if the object was newly added.
    pub fn register(&mut self, object: EntityId) -> bool {
        if self.entries.contains(&object) {
            return false;
        }
        self.entries.push(object);
        true
    }

    /// Removes `object` if present; unknown ids are ignored.
    ///
    /// Returns true if the object was registered.
    pub fn unregister(&mut self, object: EntityId) -> bool {
        match self.entries.iter().position(|entry| *entry == object) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Destroys every registered object that is still alive, newest first,
    /// then empties the registry.
    ///
    /// Returns the number of objects actually destroyed.
    pub fn destroy_all<P>(&mut self, projectiles: &mut P) -> usize
    where
        P: ProjectileOracle + ?Sized,
    {
        let mut destroyed = 0;
        for object in self.entries.drain(..).rev() {
            if projectiles.is_alive(object) {
                projectiles.destroy(object);
                destroyed += 1;
            }
        }
        destroyed
    }

    pub fn contains(&self, object: EntityId) -> bool {
        self.entries.contains(&object)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct Quarry {
        alive: BTreeSet<EntityId>,
        destroyed: Vec<EntityId>,
    }

    impl ProjectileOracle for Quarry {
        fn spawn_stone(&mut self, _origin: Vec3, _target_point: Vec3) -> EntityId {
            let id = EntityId(100 + self.alive.len() as u32 + self.destroyed.len() as u32);
            self.alive.insert(id);
            id
        }

        fn is_alive(&self, projectile: EntityId) -> bool {
            self.alive.contains(&projectile)
        }

        fn destroy(&mut self, projectile: EntityId) {
            self.alive.remove(&projectile);
            self.destroyed.push(projectile);
        }
    }

    #[test]
    fn duplicate_registration_keeps_one_entry() {
        let mut owned = OwnedObjects::new();
        assert!(owned.register(EntityId(1)));
        assert!(!owned.register(EntityId(1)));
        assert_eq!(owned.len(), 1);
    }

    #[test]
    fn unregister_is_idempotent_and_ignores_foreign_ids() {
        let mut owned = OwnedObjects::new();
        owned.register(EntityId(1));

        assert!(owned.unregister(EntityId(1)));
        assert!(!owned.unregister(EntityId(1)));
        assert!(!owned.unregister(EntityId(42)));
        assert!(owned.is_empty());
    }

    #[test]
    fn destroy_all_skips_already_destroyed_objects() {
        let mut quarry = Quarry::default();
        let mut owned = OwnedObjects::new();
        let a = quarry.spawn_stone(Vec3::ZERO, Vec3::X);
        let b = quarry.spawn_stone(Vec3::ZERO, Vec3::X);
        owned.register(a);
        owned.register(b);
        quarry.alive.remove(&a);

        assert_eq!(owned.destroy_all(&mut quarry), 1);
        assert_eq!(quarry.destroyed, [b]);
        assert!(owned.is_empty());
    }

    #[test]
    fn second_destroy_all_is_a_no_op() {
        let mut quarry = Quarry::default();
        let mut owned = OwnedObjects::new();
        owned.register(quarry.spawn_stone(Vec3::ZERO, Vec3::X));

        assert_eq!(owned.destroy_all(&mut quarry), 1);
        assert_eq!(owned.destroy_all(&mut quarry), 0);
        assert_eq!(quarry.destroyed.len(), 1);
    }
}
