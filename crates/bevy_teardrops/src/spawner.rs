use bevy::math::{Rect, Vec2};
use rand::Rng;

use crate::{
    asset::{TearEffectAsset, TearImpact},
    geometry::rotate_about,
    sampler::fallback_band,
};

/// Straight down in surface space.
pub const DOWN: Vec2 = Vec2::new(0.0, 1.0);

/// What falling tears aim for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ImpactTarget {
    /// A round focal object; tears strike its upper rim.
    Circle {
        /// Center in surface space.
        center: Vec2,
        /// Rim radius.
        radius: f32,
    },
    /// No target: tears land on an implicit ground line below the glyph.
    #[default]
    Ground,
}

impl ImpactTarget {
    /// The circle inscribed in a target's bounding box.
    pub fn circle_in(bounds: Rect) -> Self {
        ImpactTarget::Circle {
            center: bounds.center(),
            radius: bounds.width().min(bounds.height()) / 2.0,
        }
    }
}

/// Where and how a tear meets the target surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Impact position in surface space.
    pub point: Vec2,
    /// Outward unit normal of the surface at [`point`](Self::point).
    pub normal: Vec2,
}

/// Everything the spawner needs to know about the glyph that was triggered.
#[derive(Debug, Clone, Copy)]
pub struct ShowerLayout<'a> {
    /// Spawn band points in surface space.
    pub band: &'a [Vec2],
    /// Surface-space bounds of the glyph.
    pub bounds: Rect,
    /// Impact target shared by every tear of the shower.
    pub target: ImpactTarget,
    /// Glyph rotation in degrees, clockwise.
    pub rotation_delta: f32,
    /// Glyph rotation time in seconds.
    pub rotation_duration: f32,
}

/// A tear that has been planned but not born yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTear {
    /// Seconds after the trigger at which the tear is born.
    pub delay: f32,
    /// Surface-space birth position.
    pub start: Vec2,
    /// Where the tear lands.
    pub impact: Impact,
}

/// Plans a whole shower.
///
/// Tears born later in the rotation start from points rotated further around
/// the glyph center, so the shower follows the turning glyph.
pub fn plan_shower(
    layout: &ShowerLayout,
    settings: &TearEffectAsset,
    rng: &mut impl Rng,
) -> Vec<ScheduledTear> {
    let emission = &settings.emission;
    let center = layout.bounds.center();
    let fallback;
    let band = if layout.band.is_empty() {
        fallback = fallback_band(layout.bounds);
        &fallback[..]
    } else {
        layout.band
    };

    let count = emission.count.sample(rng);
    (0..count)
        .map(|_| {
            let progress = if count == 1 {
                1.0
            } else {
                emission.progress.sample(rng)
            };
            let origin = band[rng.random_range(0..band.len())];
            let rotated = rotate_about(origin, center, layout.rotation_delta * progress);
            let jitter = emission.spawn_jitter;
            let start = rotated
                + Vec2::new(
                    symmetric(rng, jitter),
                    symmetric(rng, jitter),
                );

            let fall_target_x = rotated.x + (center.x - rotated.x) * emission.convergence;
            let delay =
                progress * layout.rotation_duration * emission.delay_jitter.sample(rng);

            let impact = match layout.target {
                ImpactTarget::Circle { center, radius } => {
                    rim_impact(center, radius, &settings.impact, rng)
                }
                ImpactTarget::Ground => {
                    ground_impact(layout.bounds, fall_target_x, &settings.impact, rng)
                }
            };

            ScheduledTear {
                delay,
                start,
                impact,
            }
        })
        .collect()
}

/// Picks a point on the upper rim of a round target, within `rim_arc` degrees
/// of its top, together with the outward normal there.
pub fn rim_impact(
    center: Vec2,
    radius: f32,
    settings: &TearImpact,
    rng: &mut impl Rng,
) -> Impact {
    let arc = settings.rim_arc;
    let angle = symmetric(rng, arc) - 90.0;
    let (sin, cos) = angle.to_radians().sin_cos();
    let normal = Vec2::new(cos, sin);
    let distance = radius + settings.rim_jitter.sample(rng);

    Impact {
        point: center + normal * distance,
        normal,
    }
}

/// Picks a landing point on the implicit ground line below the glyph.
pub fn ground_impact(
    bounds: Rect,
    fall_target_x: f32,
    settings: &TearImpact,
    rng: &mut impl Rng,
) -> Impact {
    let depth = bounds.height() * settings.ground_depth.sample(rng);
    Impact {
        point: Vec2::new(fall_target_x, bounds.center().y + depth),
        normal: DOWN,
    }
}

fn symmetric(rng: &mut impl Rng, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    rng.random_range(-extent..=extent)
}
