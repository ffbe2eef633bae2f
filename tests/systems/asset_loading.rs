use super::helpers::*;

use bevy::prelude::*;
use bevy_teardrops::prelude::*;

#[test]
fn load_minimal_effect() {
    let mut app = create_minimal_app();
    let asset = load_asset(&mut app, "minimal.tears.ron");

    assert_eq!(asset.version(), "0.1");
    assert_eq!(asset.emission, TearEmission::default());
    assert_eq!(asset.fixed_seed, None);
}

#[test]
fn load_heavy_effect() {
    let mut app = create_minimal_app();
    let asset = load_asset(&mut app, "heavy.tears.ron");

    assert_eq!(asset.name, "Heavy Tears");
    assert_eq!(asset.emission.count, CountRange::new(12, 12));
    assert_eq!(asset.fall.gravity, TearRange::new(700.0, 900.0));
    assert_eq!(asset.bounce.squash, Vec2::new(1.3, 0.5));
    assert_eq!(asset.rotation.delta, 45.0);
    assert_eq!(asset.fixed_seed, Some(7));
}

#[test]
fn unknown_version_fails_to_load() {
    let mut app = create_minimal_app();
    let handle = load_fixture(&mut app, "unknown_version.tears.ron");
    assert!(!run_until_loaded(&mut app, &handle, 100));
}

#[test]
fn invalid_effect_fails_to_load() {
    let mut app = create_minimal_app();
    let handle = load_fixture(&mut app, "invalid_count.tears.ron");
    assert!(!run_until_loaded(&mut app, &handle, 100));
}

#[test]
fn loaded_effect_drives_the_shower() {
    let (mut app, glyph) = setup_scene();
    let handle = load_fixture(&mut app, "heavy.tears.ron");
    assert!(run_until_loaded(&mut app, &handle, 100));
    app.world_mut().entity_mut(glyph).insert(TearEffect(handle));

    trigger_hex(&mut app, glyph, "#4a90e2");

    assert_eq!(scheduled_tears(&mut app), vec![12]);
    match *app.world().get::<GlyphState>(glyph).unwrap() {
        GlyphState::Rotating {
            delta, duration, ..
        } => {
            assert_eq!(delta, 45.0);
            assert_eq!(duration, 0.4);
        }
        GlyphState::Idle => panic!("expected the glyph to rotate"),
    }
}

#[test]
fn unloaded_effect_falls_back_to_defaults() {
    let (mut app, glyph) = setup_scene();
    let handle = load_fixture(&mut app, "heavy.tears.ron");
    app.world_mut().entity_mut(glyph).insert(TearEffect(handle));

    trigger_hex(&mut app, glyph, "#4a90e2");

    let counts = scheduled_tears(&mut app);
    assert_eq!(counts.len(), 1);
    assert!((8..=15).contains(&counts[0]));
}
