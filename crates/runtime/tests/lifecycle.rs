mod common;

use common::{DT, SharedWorld, calm_config, controller, run};
use npc_core::{
    EntityCategory, NpcError, OrcConfig, ProjectileOracle, SoundCue, Vec3, VisualEffect,
};
use npc_runtime::{MessageDispatcher, OrcController, OrcEnv, OrcState, RuntimeError, StateKind};
use std::path::Path;
use std::rc::Rc;

#[test]
fn spawn_plays_cue_and_enters_idle() {
    let world = SharedWorld::new();
    world.with(|w| w.health = 40.0);

    let orc = controller(&world, calm_config());

    assert_eq!(orc.current_state(), Some(StateKind::Idle));
    assert_eq!(world.with(|w| w.sounds.clone()), [SoundCue::Spawn]);
    assert_eq!(world.last_trigger(), Some("Idle"));
    assert_eq!(world.with(|w| w.speed), OrcConfig::DEFAULT_MOVE_SPEED);
    assert_eq!(world.with(|w| w.health), 100.0);
    assert!(orc.orc().is_action_pending("idle"));
}

#[test]
fn death_side_effects_run_exactly_once() {
    let world = SharedWorld::new();
    let mut orc = controller(&world, calm_config());
    let mut quarry = world.clone();
    let first = quarry.spawn_stone(Vec3::ZERO, Vec3::Z);
    let second = quarry.spawn_stone(Vec3::ZERO, Vec3::Z);
    assert!(orc.register_stone(first));
    assert!(orc.register_stone(second));

    world.kill();
    run(&mut orc, &world, 20);

    assert!(orc.is_dead());
    assert_eq!(world.with(|w| w.kills.clone()), [EntityCategory::Orc]);
    assert_eq!(world.count_sound(SoundCue::Death), 1);
    assert_eq!(world.count_trigger("Die"), 1);
    assert_eq!(world.with(|w| w.effects.clone()), [VisualEffect::Dissolve]);
    assert_eq!(world.with(|w| w.stones_destroyed.clone()), [second, first]);
    assert!(orc.orc().owned().is_empty());
    assert!(world.with(|w| w.stopped));
}

#[test]
fn stone_destroyed_elsewhere_is_skipped_on_death() {
    let world = SharedWorld::new();
    let mut orc = controller(&world, calm_config());
    let mut quarry = world.clone();
    let stone = quarry.spawn_stone(Vec3::ZERO, Vec3::Z);
    orc.register_stone(stone);
    quarry.destroy(stone);

    world.kill();
    orc.update(DT);

    assert_eq!(world.with(|w| w.stones_destroyed.clone()), [stone]);
}

#[test]
fn unregistered_stone_survives_death() {
    let world = SharedWorld::new();
    let mut orc = controller(&world, calm_config());
    let mut quarry = world.clone();
    let stone = quarry.spawn_stone(Vec3::ZERO, Vec3::Z);
    orc.register_stone(stone);
    assert!(orc.unregister_stone(stone));
    assert!(!orc.unregister_stone(stone));

    world.kill();
    orc.update(DT);

    assert!(world.with(|w| w.stones_alive.contains(&stone)));
}

#[test]
fn death_cancels_a_pending_stone_release() {
    let world = SharedWorld::new();
    let mut orc = controller(&world, calm_config());
    world.place_player(Vec3::new(0.0, 0.0, 10.0));
    orc.change_state(OrcState::stone_throw());
    assert!(orc.orc().is_action_pending("stone-release"));

    world.kill();
    for _ in 0..11 {
        orc.update(DT);
    }

    assert!(orc.is_dead());
    assert!(world.with(|w| w.stones_spawned.is_empty()));
    assert!(orc.orc().owned().is_empty());
    assert_eq!(orc.orc().pending_actions(), 0);
    assert_eq!(orc.current_state(), Some(StateKind::StoneThrow));
}

#[test]
fn dead_orc_does_not_pick_attacks() {
    let world = SharedWorld::new();
    let mut orc = controller(&world, calm_config());
    world.kill();
    orc.update(DT);
    assert!(orc.is_dead());

    world.place_player(Vec3::new(0.0, 0.0, 2.0));
    orc.change_state(OrcState::chase());
    run(&mut orc, &world, 5);

    assert_eq!(orc.current_state(), Some(StateKind::Chase));
    assert_eq!(world.count_trigger("MeleeAttack"), 0);
    assert!(world.with(|w| w.stopped));
}

#[test]
fn animation_end_after_death_is_ignored() {
    let world = SharedWorld::new();
    let mut orc = controller(&world, calm_config());
    world.kill();
    orc.update(DT);

    orc.on_animation_end(0.5, "orc_melee");

    assert_eq!(orc.current_state(), Some(StateKind::Idle));
    assert_eq!(orc.orc().pending_actions(), 0);
}

#[test]
fn reactivation_restores_health_and_allows_a_second_death() {
    let world = SharedWorld::new();
    let mut orc = controller(&world, calm_config());

    world.kill();
    run(&mut orc, &world, 3);
    assert!(orc.is_dead());

    orc.deactivate();
    orc.activate();

    assert!(!orc.is_dead());
    assert_eq!(orc.current_state(), Some(StateKind::Idle));
    assert_eq!(world.with(|w| w.health), 100.0);
    assert!(world.with(|w| w.enabled));

    run(&mut orc, &world, 3);
    assert_eq!(world.with(|w| w.kills.len()), 1);

    world.kill();
    run(&mut orc, &world, 3);
    assert_eq!(world.with(|w| w.kills.len()), 2);
    assert_eq!(world.count_sound(SoundCue::Death), 2);
}

#[test]
fn deactivation_cancels_delayed_actions() {
    let world = SharedWorld::new();
    let mut orc = controller(&world, calm_config());
    assert!(orc.orc().pending_actions() > 0);

    orc.deactivate();

    assert_eq!(orc.orc().pending_actions(), 0);
    assert!(!world.with(|w| w.enabled));
}

#[test]
fn damage_cue_plays_only_while_alive() {
    let world = SharedWorld::new();
    let mut orc = controller(&world, calm_config());

    orc.on_damaged();
    assert_eq!(world.count_sound(SoundCue::Damage), 1);

    world.kill();
    orc.update(DT);
    orc.on_damaged();
    assert_eq!(world.count_sound(SoundCue::Damage), 1);
}

#[test]
fn invalid_config_is_rejected() {
    let world = SharedWorld::new();
    let mut config = OrcConfig::default();
    config.move_speed = 0.0;

    let error = OrcController::new(
        config,
        OrcEnv::from_shared(&world),
        Rc::new(MessageDispatcher::new()),
        1,
    )
    .unwrap_err();

    assert!(matches!(error, RuntimeError::InvalidConfig(_)));
    assert_eq!(error.error_code(), "CONFIG_NOT_POSITIVE");
    assert!(world.with(|w| w.sounds.is_empty()));
}

#[test]
fn bundled_config_builds_a_controller() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../npc/content/data/orc.toml");
    let config = npc_content::ConfigLoader::load(Path::new(path)).expect("bundled config loads");
    let world = SharedWorld::new();

    let orc = controller(&world, config);

    assert_eq!(orc.orc().category(), EntityCategory::Orc);
    assert_eq!(orc.current_state(), Some(StateKind::Idle));
}
