use bevy::prelude::*;
use bevy_teardrops::asset::TearEffectAsset;
use bevy_teardrops::palette::Rgb;
use bevy_teardrops::runtime::TearShower;
use bevy_teardrops::spawner::{DOWN, Impact, ImpactTarget, ScheduledTear};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn scheduled(delay: f32, x: f32) -> ScheduledTear {
    ScheduledTear {
        delay,
        start: Vec2::new(x, 0.0),
        impact: Impact {
            point: Vec2::new(x, 200.0),
            normal: DOWN,
        },
    }
}

fn shower(schedule: Vec<ScheduledTear>) -> TearShower {
    TearShower::new(
        Entity::PLACEHOLDER,
        10.0,
        schedule,
        Rgb::from_hex("#4a90e2").unwrap(),
        ImpactTarget::Ground,
        Handle::default(),
        TearEffectAsset::default(),
        StdRng::seed_from_u64(1),
    )
}

#[test]
fn tears_are_born_in_delay_order() {
    let mut shower = shower(vec![
        scheduled(0.5, 3.0),
        scheduled(0.1, 1.0),
        scheduled(0.3, 2.0),
    ]);

    assert_eq!(shower.pending_count(), 3);
    assert!(shower.birth_due(10.05).is_empty());

    assert_eq!(shower.birth_due(10.35), vec![0, 1]);
    assert_eq!(shower.slot(0).unwrap().particle.start.x, 1.0);
    assert_eq!(shower.slot(1).unwrap().particle.start.x, 2.0);
    assert_eq!(shower.pending_count(), 1);

    assert_eq!(shower.birth_due(11.0), vec![2]);
    assert_eq!(shower.slot(2).unwrap().particle.start.x, 3.0);
}

#[test]
fn birth_time_is_the_scheduled_time() {
    let mut shower = shower(vec![scheduled(0.25, 0.0)]);
    shower.birth_due(10.6);

    let particle = &shower.slot(0).unwrap().particle;
    assert!((particle.born_at - 10.25).abs() < 1e-5);
}

#[test]
fn dispose_is_idempotent() {
    let mut shower = shower(vec![scheduled(0.0, 0.0), scheduled(0.0, 1.0)]);
    shower.birth_due(10.0);

    let visual = World::new().spawn_empty().id();
    shower.slot_mut(0).unwrap().visual = Some(visual);

    assert_eq!(shower.dispose(0), Some(visual));
    assert_eq!(shower.dispose(0), None);
    assert!(shower.slot(0).is_none());
    assert_eq!(shower.live_count(), 1);
    assert_eq!(shower.born_count(), 2);

    // slot indices stay stable after a disposal
    assert_eq!(shower.live().map(|(index, _)| index).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn disposing_unknown_slot_is_harmless() {
    let mut shower = shower(vec![scheduled(0.0, 0.0)]);
    assert_eq!(shower.dispose(5), None);
    assert_eq!(shower.pending_count(), 1);
}

#[test]
fn finished_once_everything_is_born_and_disposed() {
    let mut shower = shower(vec![scheduled(0.0, 0.0), scheduled(0.2, 1.0)]);
    assert!(!shower.is_finished());

    shower.birth_due(10.0);
    shower.dispose(0);
    assert!(!shower.is_finished(), "one tear is still pending");

    shower.birth_due(10.2);
    assert!(!shower.is_finished());
    shower.dispose(1);
    assert!(shower.is_finished());
}

#[test]
fn empty_shower_is_finished() {
    assert!(shower(Vec::new()).is_finished());
}

#[test]
fn palette_follows_the_base_color() {
    let shower = shower(Vec::new());
    let expected = bevy_teardrops::palette::Palette::from_base(Rgb::from_hex("#4a90e2").unwrap());
    assert_eq!(shower.palette, expected);
    assert_eq!(shower.started_at(), 10.0);
}
