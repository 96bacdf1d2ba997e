//! Data-driven content for NPC controllers.
//!
//! Tunables live in TOML files next to the game data; the loaders here turn
//! them into validated `npc-core` types.
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult};
