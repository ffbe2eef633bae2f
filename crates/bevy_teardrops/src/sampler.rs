use bevy::math::{Affine2, Rect, Vec2};

use crate::geometry::GlyphOutline;

/// Offsets, in steps, of the synthetic fallback points around the glyph center.
const FALLBACK_STEPS: std::ops::RangeInclusive<i32> = -3..=3;
const FALLBACK_SPACING: f32 = 0.12;
const FALLBACK_HEIGHT: f32 = 0.15;
const FALLBACK_SAG: f32 = 2.0;

/// Candidate tear origins, in surface space.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnBand {
    /// The band points, top-most first.
    pub points: Vec<Vec2>,
    /// `true` when the outline could not be sampled and the points are synthetic.
    pub synthetic: bool,
}

/// Samples every contour of `outline` and maps the samples to surface space.
///
/// The result is sorted by ascending y, top-most first. An outline without
/// contours, a missing transform or a transform that collapses the plane all
/// produce an empty list.
pub fn sample_outline(
    outline: &GlyphOutline,
    transform: Option<Affine2>,
    samples_per_contour: usize,
) -> Vec<Vec2> {
    let Some(transform) = transform.filter(is_invertible) else {
        return Vec::new();
    };

    let mut points: Vec<Vec2> = outline
        .contours
        .iter()
        .flat_map(|contour| contour.sample_evenly(samples_per_contour))
        .map(|point| transform.transform_point2(point))
        .filter(|point| point.is_finite())
        .collect();

    points.sort_by(|a, b| a.y.total_cmp(&b.y));
    points
}

/// Keeps the first `ceil(len * fraction)` points of a y-sorted sample.
pub fn top_band(sorted: &[Vec2], fraction: f32) -> Vec<Vec2> {
    let count = (sorted.len() as f32 * fraction).ceil() as usize;
    sorted[..count.min(sorted.len())].to_vec()
}

/// A small symmetric fan of points straddling the glyph's horizontal center near its top.
pub fn fallback_band(bounds: Rect) -> Vec<Vec2> {
    let center_x = bounds.center().x;
    let top = bounds.min.y + bounds.height() * FALLBACK_HEIGHT;

    FALLBACK_STEPS
        .map(|step| {
            let step = step as f32;
            Vec2::new(
                center_x + step * bounds.width() * FALLBACK_SPACING,
                top + step.abs() * FALLBACK_SAG,
            )
        })
        .collect()
}

/// Resolves the spawn band for a glyph, falling back to [`fallback_band`] when
/// the outline yields nothing.
pub fn spawn_band(
    outline: &GlyphOutline,
    transform: Option<Affine2>,
    bounds: Rect,
    samples_per_contour: usize,
    fraction: f32,
) -> SpawnBand {
    let sorted = sample_outline(outline, transform, samples_per_contour);
    let points = top_band(&sorted, fraction);

    if points.is_empty() {
        SpawnBand {
            points: fallback_band(bounds),
            synthetic: true,
        }
    } else {
        SpawnBand {
            points,
            synthetic: false,
        }
    }
}

fn is_invertible(transform: &Affine2) -> bool {
    let determinant = transform.matrix2.determinant();
    determinant.is_finite() && determinant.abs() > f32::EPSILON
}
