mod svg_path;

pub use svg_path::SvgPathError;

use bevy::math::{Affine2, Affine3A, Mat2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Subdivisions used to flatten each curved segment before measuring arc length.
const CURVE_SUBDIVISIONS: usize = 16;

/// One drawing command of a contour, continuing from the previous end point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Straight line to a point.
    Line(Vec2),
    /// Quadratic Bézier curve.
    Quadratic {
        /// Control point.
        ctrl: Vec2,
        /// End point.
        to: Vec2,
    },
    /// Cubic Bézier curve.
    Cubic {
        /// First control point.
        ctrl1: Vec2,
        /// Second control point.
        ctrl2: Vec2,
        /// End point.
        to: Vec2,
    },
}

impl PathSegment {
    /// End point of the segment.
    pub fn end(&self) -> Vec2 {
        match *self {
            PathSegment::Line(to) => to,
            PathSegment::Quadratic { to, .. } => to,
            PathSegment::Cubic { to, .. } => to,
        }
    }

    fn point_at(&self, from: Vec2, t: f32) -> Vec2 {
        let u = 1.0 - t;
        match *self {
            PathSegment::Line(to) => from.lerp(to, t),
            PathSegment::Quadratic { ctrl, to } => u * u * from + 2.0 * u * t * ctrl + t * t * to,
            PathSegment::Cubic { ctrl1, ctrl2, to } => {
                u * u * u * from
                    + 3.0 * u * u * t * ctrl1
                    + 3.0 * u * t * t * ctrl2
                    + t * t * t * to
            }
        }
    }

    fn flatten_into(&self, from: Vec2, points: &mut Vec<Vec2>) {
        match self {
            PathSegment::Line(to) => points.push(*to),
            _ => {
                for step in 1..=CURVE_SUBDIVISIONS {
                    let t = step as f32 / CURVE_SUBDIVISIONS as f32;
                    points.push(self.point_at(from, t));
                }
            }
        }
    }
}

/// A single connected run of segments, like one subpath of an SVG path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    /// Where the contour begins.
    pub start: Vec2,
    /// Segments drawn one after another from [`start`](Self::start).
    #[serde(default)]
    pub segments: Vec<PathSegment>,
    /// Whether a closing line back to the start is part of the contour.
    #[serde(default)]
    pub closed: bool,
}

impl Contour {
    /// Creates an open contour with no segments.
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    /// Builds a closed contour through `points`. Returns `None` when `points` is empty.
    pub fn polygon(points: &[Vec2]) -> Option<Self> {
        let (&start, rest) = points.split_first()?;
        Some(Self {
            start,
            segments: rest.iter().copied().map(PathSegment::Line).collect(),
            closed: true,
        })
    }

    /// Flattens the contour into a polyline, including the closing edge if any.
    pub fn flatten(&self) -> Vec<Vec2> {
        let mut points = vec![self.start];
        let mut cursor = self.start;
        for segment in &self.segments {
            segment.flatten_into(cursor, &mut points);
            cursor = segment.end();
        }
        if self.closed && cursor != self.start {
            points.push(self.start);
        }
        points
    }

    /// Total arc length of the flattened contour.
    pub fn length(&self) -> f32 {
        self.flatten()
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }

    /// Takes `count` points at arc lengths `length * i / count` for `i in 0..count`.
    ///
    /// A zero-length contour yields its start point `count` times.
    pub fn sample_evenly(&self, count: usize) -> Vec<Vec2> {
        let polyline = self.flatten();
        let mut cumulative = Vec::with_capacity(polyline.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for pair in polyline.windows(2) {
            total += pair[0].distance(pair[1]);
            cumulative.push(total);
        }

        let mut samples = Vec::with_capacity(count);
        let mut edge = 0;
        for i in 0..count {
            let target = total * i as f32 / count as f32;
            while edge + 1 < cumulative.len() - 1 && cumulative[edge + 1] < target {
                edge += 1;
            }
            if polyline.len() < 2 {
                samples.push(polyline[0]);
                continue;
            }
            let edge_length = cumulative[edge + 1] - cumulative[edge];
            let t = if edge_length > f32::EPSILON {
                ((target - cumulative[edge]) / edge_length).clamp(0.0, 1.0)
            } else {
                0.0
            };
            samples.push(polyline[edge].lerp(polyline[edge + 1], t));
        }
        samples
    }
}

/// The outline of a glyph, in glyph-local space.
///
/// Local space follows SVG conventions: the origin is the top-left corner of
/// the glyph box and y grows downward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphOutline {
    /// Contours making up the outline.
    pub contours: Vec<Contour>,
}

impl GlyphOutline {
    /// Creates an outline from contours.
    pub fn new(contours: Vec<Contour>) -> Self {
        Self { contours }
    }

    /// Parses SVG path data (`M L H V C S Q T Z`, absolute and relative) into an
    /// outline with one contour per subpath.
    pub fn from_svg_path(data: &str) -> Result<Self, SvgPathError> {
        svg_path::parse(data).map(Self::new)
    }

    /// Returns `true` when there is nothing to sample.
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }
}

/// Builds the glyph-local to surface transform.
///
/// `world` is the 2D part of the glyph's world transform (y up), `size` the
/// glyph box. Glyph-local points are centered on the box, lifted into y-up
/// space, moved by `world`, and brought back into the y-down surface space.
pub fn local_to_surface(world: Affine2, size: Vec2) -> Affine2 {
    let flip = Affine2::from_scale(Vec2::new(1.0, -1.0));
    flip * world * flip * Affine2::from_translation(-size / 2.0)
}

/// Drops the z axis of a 3D world transform.
pub fn planar(affine: Affine3A) -> Affine2 {
    Affine2::from_mat2_translation(
        Mat2::from_cols(
            affine.matrix3.x_axis.truncate(),
            affine.matrix3.y_axis.truncate(),
        ),
        affine.translation.truncate(),
    )
}

/// Converts a surface point into a world-space 2D point.
pub fn surface_to_world(point: Vec2) -> Vec2 {
    Vec2::new(point.x, -point.y)
}

/// Converts a world-space 2D point into a surface point.
pub fn world_to_surface(point: Vec2) -> Vec2 {
    Vec2::new(point.x, -point.y)
}

/// Axis-aligned bounds, in surface space, of a `size` box mapped through `transform`.
pub fn transformed_bounds(transform: Affine2, size: Vec2) -> Rect {
    let corners = [
        Vec2::ZERO,
        Vec2::new(size.x, 0.0),
        Vec2::new(0.0, size.y),
        size,
    ]
    .map(|corner| transform.transform_point2(corner));

    corners[1..]
        .iter()
        .fold(Rect::from_corners(corners[0], corners[0]), |rect, &corner| {
            rect.union_point(corner)
        })
}

/// Rotates `point` about `center` by `degrees`, clockwise on screen.
pub fn rotate_about(point: Vec2, center: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let offset = point - center;
    center + Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos)
}
