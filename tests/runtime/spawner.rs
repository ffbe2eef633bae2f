use bevy::math::{Rect, Vec2};
use bevy_teardrops::asset::{CountRange, TearEffectAsset};
use bevy_teardrops::spawner::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn glyph_bounds() -> Rect {
    Rect::new(450.0, 450.0, 550.0, 550.0)
}

fn layout(band: &[Vec2], target: ImpactTarget) -> ShowerLayout<'_> {
    ShowerLayout {
        band,
        bounds: glyph_bounds(),
        target,
        rotation_delta: 90.0,
        rotation_duration: 0.6,
    }
}

fn single_tear() -> TearEffectAsset {
    let mut settings = TearEffectAsset::default();
    settings.emission.count = CountRange::new(1, 1);
    settings
}

const BAND: [Vec2; 3] = [
    Vec2::new(470.0, 450.0),
    Vec2::new(500.0, 450.0),
    Vec2::new(530.0, 450.0),
];

#[test]
fn count_stays_within_default_range() {
    let settings = TearEffectAsset::default();
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let tears = plan_shower(&layout(&BAND, ImpactTarget::Ground), &settings, &mut rng);
        assert!((8..=15).contains(&tears.len()), "seed {seed}: {}", tears.len());
    }
}

#[test]
fn delays_follow_rotation_progress() {
    let settings = TearEffectAsset::default();
    let min = 0.15 * 0.6 * 0.85 - 1e-5;
    let max = 0.95 * 0.6 * 1.05 + 1e-5;

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        for tear in plan_shower(&layout(&BAND, ImpactTarget::Ground), &settings, &mut rng) {
            assert!((min..=max).contains(&tear.delay), "delay {}", tear.delay);
        }
    }
}

#[test]
fn single_tear_is_born_at_full_rotation() {
    let settings = single_tear();
    let band = [Vec2::new(500.0, 400.0)];

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let tears = plan_shower(&layout(&band, ImpactTarget::Ground), &settings, &mut rng);

        assert_eq!(tears.len(), 1);
        let tear = tears[0];
        assert!((0.6 * 0.85 - 1e-5..=0.6 * 1.05 + 1e-5).contains(&tear.delay));

        // (500, 400) turned 90 degrees clockwise about (500, 500)
        assert!((tear.start.x - 600.0).abs() <= 4.0 + 1e-3);
        assert!((tear.start.y - 500.0).abs() <= 4.0 + 1e-3);
    }
}

#[test]
fn start_points_are_jittered_band_points() {
    let settings = TearEffectAsset::default();
    let band = [Vec2::new(500.0, 450.0)];
    let no_rotation = ShowerLayout {
        rotation_delta: 0.0,
        ..layout(&band, ImpactTarget::Ground)
    };

    let mut rng = StdRng::seed_from_u64(3);
    for tear in plan_shower(&no_rotation, &settings, &mut rng) {
        assert!(tear.start.distance(band[0]) <= 4.0 * std::f32::consts::SQRT_2 + 1e-3);
    }
}

#[test]
fn ground_impacts_converge_toward_the_center_below_the_glyph() {
    let settings = TearEffectAsset::default();
    let band = [Vec2::new(400.0, 450.0)];
    let no_rotation = ShowerLayout {
        rotation_delta: 0.0,
        ..layout(&band, ImpactTarget::Ground)
    };

    let mut rng = StdRng::seed_from_u64(9);
    for tear in plan_shower(&no_rotation, &settings, &mut rng) {
        assert!((tear.impact.point.x - 435.0).abs() < 1e-3);
        assert!(tear.impact.point.y > glyph_bounds().max.y);
        assert!(tear.impact.point.y <= 500.0 + 100.0 * 0.85 + 1e-3);
        assert_eq!(tear.impact.normal, DOWN);
    }
}

#[test]
fn rim_impacts_stay_near_the_target_rim() {
    let settings = TearEffectAsset::default();
    let center = Vec2::new(500.0, 700.0);
    let target = ImpactTarget::Circle {
        center,
        radius: 60.0,
    };

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        for tear in plan_shower(&layout(&BAND, target), &settings, &mut rng) {
            let distance = tear.impact.point.distance(center);
            assert!((50.0..=70.0).contains(&distance), "distance {distance}");
            assert!((56.0 - 1e-3..=66.0 + 1e-3).contains(&distance));

            // upper arc only, facing outward
            assert!(tear.impact.point.y < center.y);
            assert!((tear.impact.normal.length() - 1.0).abs() < 1e-4);
            assert!(tear.impact.normal.y <= -(65f32.to_radians().cos()) + 1e-4);
            let outward = (tear.impact.point - center).normalize();
            assert!(outward.distance(tear.impact.normal) < 1e-3);
        }
    }
}

#[test]
fn empty_band_uses_the_fallback() {
    let settings = TearEffectAsset::default();
    let mut rng = StdRng::seed_from_u64(1);
    let tears = plan_shower(&layout(&[], ImpactTarget::Ground), &settings, &mut rng);

    assert!(!tears.is_empty());
    assert!(tears.iter().all(|tear| tear.start.is_finite()));
}

#[test]
fn same_seed_same_shower() {
    let settings = TearEffectAsset::default();
    let plan = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        plan_shower(&layout(&BAND, ImpactTarget::Ground), &settings, &mut rng)
    };
    assert_eq!(plan(5), plan(5));
}

#[test]
fn circle_in_uses_the_smaller_side() {
    assert_eq!(
        ImpactTarget::circle_in(Rect::new(0.0, 0.0, 200.0, 100.0)),
        ImpactTarget::Circle {
            center: Vec2::new(100.0, 50.0),
            radius: 50.0,
        }
    );
}
