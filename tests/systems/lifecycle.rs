use super::helpers::*;

use bevy::prelude::*;
use bevy_teardrops::prelude::*;

#[test]
fn everything_is_released_after_the_shower() {
    let (mut app, glyph) = setup_scene();
    trigger_hex(&mut app, glyph, "#4a90e2");

    advance_seconds(&mut app, 4.0);

    assert_eq!(shower_count(&mut app), 0);
    assert_eq!(droplet_count(&mut app), 0);
    assert_eq!(layer_count(&mut app), 0);
}

#[test]
fn tears_landing_on_a_target_are_released() {
    let (mut app, glyph) = setup_scene();
    spawn_target(&mut app, Vec2::new(500.0, 700.0), Vec2::splat(120.0));
    app.update();
    trigger_hex(&mut app, glyph, "#4a90e2");

    advance_seconds(&mut app, 4.0);

    assert_eq!(shower_count(&mut app), 0);
    assert_eq!(droplet_count(&mut app), 0);
}

#[test]
fn droplets_never_outnumber_live_tears() {
    let (mut app, glyph) = setup_scene();
    trigger_hex(&mut app, glyph, "#4a90e2");

    for _ in 0..150 {
        app.update();
        let live: usize = app
            .world_mut()
            .query::<&TearShower>()
            .iter(app.world())
            .map(TearShower::live_count)
            .sum();
        assert!(droplet_count(&mut app) <= live);
    }
}

#[test]
fn overlapping_showers_finish_independently() {
    let (mut app, glyph) = setup_scene();
    trigger_hex(&mut app, glyph, "#4a90e2");
    advance_seconds(&mut app, 0.7);
    trigger_hex(&mut app, glyph, "#e24a6f");

    assert_eq!(shower_count(&mut app), 2);

    advance_seconds(&mut app, 3.4);
    assert!(shower_count(&mut app) <= 1);

    advance_seconds(&mut app, 1.0);
    assert_eq!(shower_count(&mut app), 0);
    assert_eq!(layer_count(&mut app), 0);
}

#[test]
fn despawning_the_glyph_does_not_strand_droplets() {
    let (mut app, glyph) = setup_scene();
    trigger_hex(&mut app, glyph, "#4a90e2");
    advance_seconds(&mut app, 0.3);
    app.world_mut().entity_mut(glyph).despawn();

    advance_seconds(&mut app, 4.0);
    assert_eq!(shower_count(&mut app), 0);
    assert_eq!(droplet_count(&mut app), 0);
}

#[test]
fn droplets_removed_externally_are_ignored() {
    let (mut app, glyph) = setup_scene();
    trigger_hex(&mut app, glyph, "#4a90e2");
    advance_seconds(&mut app, 0.4);

    let visuals: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<DropletVisual>>()
        .iter(app.world())
        .collect();
    assert!(!visuals.is_empty());
    for visual in visuals {
        app.world_mut().entity_mut(visual).despawn();
    }
    assert_eq!(droplet_count(&mut app), 0);

    advance_seconds(&mut app, 4.0);
    assert_eq!(shower_count(&mut app), 0);
    assert_eq!(layer_count(&mut app), 0);
}
