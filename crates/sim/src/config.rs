//! Sandbox run configuration and loaders.
use std::env;
use std::path::PathBuf;

/// Parameters of one sandbox run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Number of frame ticks to simulate.
    pub ticks: u32,
    /// Frame delta in seconds.
    pub dt: f32,
    /// Physics step in seconds.
    pub fixed_dt: f32,
    pub seed: u64,
    /// How many monsters to spawn (one per category, at most three).
    pub monsters: usize,
    /// Optional TOML file overriding the default orc tunables.
    pub orc_config: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 1800,
            dt: 1.0 / 30.0,
            fixed_dt: 0.02,
            seed: 42,
            monsters: 3,
            orc_config: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SIM_TICKS` - Frame ticks to run (default: 1800)
    /// - `SIM_FPS` - Frame rate driving `update` (default: 30)
    /// - `SIM_FIXED_DT` - Physics step in seconds (default: 0.02)
    /// - `SIM_SEED` - Seed for the arena and wander destinations (default: 42)
    /// - `SIM_MONSTERS` - Monsters to spawn, 1 to 3 (default: 3)
    /// - `ORC_CONFIG` - Path to an orc TOML config (default: built-in tunables)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u32>("SIM_TICKS") {
            config.ticks = ticks;
        }

        if let Some(fps) = read_env::<f32>("SIM_FPS")
            && fps > 0.0
        {
            config.dt = 1.0 / fps;
        }

        if let Some(fixed_dt) = read_env::<f32>("SIM_FIXED_DT")
            && fixed_dt > 0.0
        {
            config.fixed_dt = fixed_dt;
        }

        if let Some(seed) = read_env::<u64>("SIM_SEED") {
            config.seed = seed;
        }

        if let Some(monsters) = read_env::<usize>("SIM_MONSTERS") {
            config.monsters = monsters.clamp(1, 3);
        }

        config.orc_config = env::var("ORC_CONFIG").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
