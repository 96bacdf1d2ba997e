//! Sandbox runner for the orc controller.
//!
//! Spawns up to three monsters (orc, goblin, troll) around a pillar in a flat
//! arena and lets them idle, patrol, chase and attack a wandering player.
//! The player fights back, so monsters die, drop their stones and get
//! recycled through the deactivate/activate lifecycle.
//!
//! # Examples
//!
//! ```bash
//! # Default run with state changes visible
//! RUST_LOG=runtime=debug cargo run -p npc-sim
//!
//! # Longer run with custom tunables
//! SIM_TICKS=9000 ORC_CONFIG=crates/npc/content/data/orc.toml cargo run -p npc-sim
//! ```
mod config;
mod world;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use npc_content::ConfigLoader;
use npc_core::{EntityCategory, EntityId, MessageType, OrcConfig, Payload};
use npc_runtime::{MessageDispatcher, OrcController, OrcEnv};

use config::SimConfig;
use world::{Arena, ArenaEvent, BodyHandle};

const CATEGORIES: [EntityCategory; 3] = [
    EntityCategory::Orc,
    EntityCategory::Goblin,
    EntityCategory::Troll,
];
/// Post-attack pause reported by every attack clip's end event.
const POST_ATTACK_DELAY: f32 = 0.8;
const RESPAWN_AFTER: f32 = 3.0;
const SPAWN_RING: f32 = 12.0;

struct Monster {
    category: EntityCategory,
    body: usize,
    controller: Rc<RefCell<OrcController>>,
    dead_for: Option<f32>,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let sim = SimConfig::from_env();
    let base = match &sim.orc_config {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("failed to load orc config {}", path.display()))?,
        None => OrcConfig::default(),
    };

    tracing::info!("Starting sandbox");
    tracing::info!("Ticks: {} at dt {:.4}s", sim.ticks, sim.dt);
    tracing::info!("Monsters: {}", sim.monsters);

    run(&sim, &base)
}

fn run(sim: &SimConfig, base: &OrcConfig) -> Result<()> {
    let arena = Rc::new(RefCell::new(Arena::new(sim.seed)));
    let bus = Rc::new(MessageDispatcher::new());

    let mut monsters = Vec::with_capacity(sim.monsters);
    for (index, category) in CATEGORIES.into_iter().take(sim.monsters).enumerate() {
        let angle = index as f32 * std::f32::consts::TAU / CATEGORIES.len() as f32;
        let spawn = glam::Vec3::new(angle.sin(), 0.0, angle.cos()) * SPAWN_RING;
        let body = arena.borrow_mut().add_body(category, spawn);

        let handle = BodyHandle::new(Rc::clone(&arena), body);
        let config = OrcConfig {
            category,
            ..base.clone()
        };
        let controller = OrcController::spawn(
            config,
            OrcEnv::from_shared(&handle),
            &bus,
            sim.seed.wrapping_add(index as u64),
        )
        .with_context(|| format!("failed to spawn {category}"))?;

        monsters.push(Monster {
            category,
            body,
            controller,
            dead_for: None,
        });
    }

    let mut fixed_accumulator = 0.0;
    for tick in 0..sim.ticks {
        fixed_accumulator += sim.dt;
        while fixed_accumulator >= sim.fixed_dt {
            for monster in &monsters {
                monster.controller.borrow_mut().fixed_update(sim.fixed_dt);
            }
            fixed_accumulator -= sim.fixed_dt;
        }

        for monster in &monsters {
            monster.controller.borrow_mut().update(sim.dt);
        }
        bus.update(sim.dt);

        let events = arena.borrow_mut().step(sim.dt);
        for event in events {
            forward_event(&monsters, &bus, event);
        }

        recycle_dead(&mut monsters, &arena, sim.dt);

        if tick % 150 == 0 {
            report(&monsters, &arena, tick);
        }
    }

    let arena = arena.borrow();
    tracing::info!(
        kills = arena.kills().len(),
        stones_in_flight = arena.stones_in_flight(),
        "Sandbox finished"
    );
    Ok(())
}

fn forward_event(monsters: &[Monster], bus: &MessageDispatcher, event: ArenaEvent) {
    match event {
        ArenaEvent::ClipFinished { body, clip } => {
            if let Some(monster) = find(monsters, body) {
                monster
                    .controller
                    .borrow_mut()
                    .on_animation_end(POST_ATTACK_DELAY, clip);
            }
        }
        ArenaEvent::StoneLanded { owner, stone } => {
            if let Some(monster) = find(monsters, owner) {
                monster.controller.borrow_mut().unregister_stone(stone);
            }
        }
        ArenaEvent::Struck { body, damage } => {
            let Some(monster) = find(monsters, body) else {
                return;
            };
            // The telegram plays the damage cue itself.
            bus.dispatch_message(
                0.0,
                EntityCategory::Player,
                monster.category,
                MessageType::Damaged,
                Some(Payload::Entity(EntityId::PLAYER)),
            );
            tracing::debug!(target: "sim", category = %monster.category, damage, "Player struck");
        }
    }
}

fn recycle_dead(monsters: &mut [Monster], arena: &RefCell<Arena>, dt: f32) {
    for monster in monsters {
        if !monster.controller.borrow().is_dead() {
            continue;
        }
        let dead_for = monster.dead_for.get_or_insert(0.0);
        *dead_for += dt;
        if *dead_for < RESPAWN_AFTER {
            continue;
        }

        arena.borrow_mut().respawn(monster.body);
        let mut controller = monster.controller.borrow_mut();
        controller.deactivate();
        controller.activate();
        monster.dead_for = None;
        tracing::info!(target: "sim", category = %monster.category, "Respawned");
    }
}

fn report(monsters: &[Monster], arena: &RefCell<Arena>, tick: u32) {
    let arena = arena.borrow();
    for monster in monsters {
        let body = arena.body(monster.body);
        let state = monster.controller.borrow().current_state();
        tracing::info!(
            target: "sim",
            tick,
            category = %monster.category,
            state = ?state,
            position = ?body.position(),
            health = body.health(),
            distance = body.position().distance(arena.player()),
            "Status"
        );
    }
}

fn find(monsters: &[Monster], body: usize) -> Option<&Monster> {
    monsters.iter().find(|monster| monster.body == body)
}
