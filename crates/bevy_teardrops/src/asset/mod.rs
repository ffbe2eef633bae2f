pub(crate) mod serde_helpers;
/// Asset format version tracking and compatibility validation.
pub mod versioning;

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use serde_helpers::*;
use versioning::{VersionStatus, current_format_version};

/// Asset loader for [`TearEffectAsset`] files in RON format.
#[derive(Default, TypePath)]
pub struct TearEffectAssetLoader;

/// Errors that can occur when loading a [`TearEffectAsset`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TearEffectAssetLoaderError {
    /// An I/O error occurred while reading the asset file.
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),
    /// The asset file contained invalid RON syntax.
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// The asset file has an unknown format version, likely from a newer Teardrops.
    #[error("Unknown teardrops_version. You may need a newer version of Teardrops.")]
    UnknownVersion,
    /// The asset parsed but holds values the effect cannot run with.
    #[error("Invalid tear effect: {0}")]
    Invalid(#[from] TearEffectValidationError),
}

/// Reasons a [`TearEffectAsset`] is rejected by [`TearEffectAsset::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TearEffectValidationError {
    /// A range that must stay strictly positive reaches zero or below.
    #[error("`{field}` must be strictly positive, got {min}..{max}")]
    NonPositiveRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Lower bound found.
        min: f32,
        /// Upper bound found.
        max: f32,
    },
    /// A range whose lower bound is above its upper bound.
    #[error("`{field}` has min {min} above max {max}")]
    InvertedRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Lower bound found.
        min: f32,
        /// Upper bound found.
        max: f32,
    },
    /// The particle count range is empty or starts at zero.
    #[error("particle count must satisfy 1 <= min <= max, got {min}..={max}")]
    InvalidCount {
        /// Lower bound found.
        min: u32,
        /// Upper bound found.
        max: u32,
    },
    /// `emission.samples_per_contour` is zero.
    #[error("at least one outline sample per contour is required")]
    NoOutlineSamples,
    /// A ratio outside of `0.0..=1.0`.
    #[error("`{field}` must lie within 0.0..=1.0, got {value}")]
    InvalidFraction {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value found.
        value: f32,
    },
    /// A timing or shape value outside of its usable domain.
    #[error("`{field}` is not a usable duration, got {value}")]
    InvalidDuration {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value found.
        value: f32,
    },
}

impl AssetLoader for TearEffectAssetLoader {
    type Asset = TearEffectAsset;
    type Settings = ();
    type Error = TearEffectAssetLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let (asset, status) = TearEffectAsset::decode(&bytes)?;

        if let VersionStatus::Outdated { found, current } = status {
            let path = load_context.path();
            warn!(
                "{path:?}: loaded asset with teardrops_version \"{found}\", current is \"{current}\""
            );
        }

        Ok(asset)
    }

    fn extensions(&self) -> &[&str] {
        &["tears.ron"]
    }
}

/// A minimum/maximum range of `f32` values, used to randomize tear properties.
///
/// Every draw picks a value uniformly between [`min`](Self::min) and
/// [`max`](Self::max). Defaults to `0.0..1.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Range {
    /// Lower bound of the range. Defaults to `0.0`.
    #[serde(default)]
    pub min: f32,
    /// Upper bound of the range. Defaults to `1.0`.
    #[serde(default = "default_one_f32")]
    pub max: f32,
}

fn default_one_f32() -> f32 {
    1.0
}

impl Default for Range {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl Range {
    /// Creates a new range with the given bounds.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draws a uniformly distributed value from the range.
    ///
    /// A collapsed or inverted range always yields [`min`](Self::min).
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        self.min + (self.max - self.min) * rng.random::<f32>()
    }
}

/// An inclusive range of particle counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountRange {
    /// Fewest particles a trigger may produce.
    pub min: u32,
    /// Most particles a trigger may produce.
    pub max: u32,
}

impl Default for CountRange {
    fn default() -> Self {
        Self { min: 8, max: 15 }
    }
}

impl CountRange {
    /// Creates a new count range.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Draws a uniformly distributed count from the inclusive range.
    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// How many tears a trigger produces and where along the rotation they appear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TearEmission {
    /// Number of tears per trigger. Defaults to `8..=15`.
    pub count: CountRange,
    /// Rotation progress at which each tear is born. Defaults to `0.15..0.95`.
    pub progress: Range,
    /// Maximum positional jitter applied to each spawn point, per axis. Defaults to `4.0`.
    pub spawn_jitter: f32,
    /// Multiplier applied to each birth delay. Defaults to `0.85..1.05`.
    pub delay_jitter: Range,
    /// How far the fall target x is pulled from the spawn x toward the glyph center.
    ///
    /// Defaults to `0.35`.
    pub convergence: f32,
    /// Fraction of the y-sorted outline samples that form the spawn band. Defaults to `0.3`.
    pub spawn_band_fraction: f32,
    /// Arc-length samples taken per contour. Defaults to `12`.
    pub samples_per_contour: u32,
}

impl Default for TearEmission {
    fn default() -> Self {
        Self {
            count: CountRange::default(),
            progress: Range::new(0.15, 0.95),
            spawn_jitter: 4.0,
            delay_jitter: Range::new(0.85, 1.05),
            convergence: 0.35,
            spawn_band_fraction: 0.3,
            samples_per_contour: 12,
        }
    }
}

/// Per-droplet physical parameters for the falling phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TearFall {
    /// Droplet width. Defaults to `9.0..16.0`.
    pub size: Range,
    /// Height-to-width ratio of a droplet. Defaults to `1.35`.
    pub aspect_ratio: f32,
    /// Downward acceleration in units per second squared. Defaults to `400.0..600.0`.
    pub gravity: Range,
    /// Nominal fall duration in seconds. Defaults to `1.25..2.2`.
    pub duration: Range,
    /// Wobble frequency in hertz. Defaults to `0.5..1.5`.
    pub wobble_frequency: Range,
    /// Wobble amplitude in units. Defaults to `2.0..5.0`.
    pub wobble_amplitude: Range,
    /// Fixed visual tilt in degrees. Defaults to `-5.0..5.0`.
    pub base_rotation: Range,
    /// Vertical stretch gained per second of fall. Defaults to `0.18`.
    pub stretch_rate: f32,
    /// Opacity fade-in time at birth, in seconds. Defaults to `0.1`.
    pub fade_in: f32,
}

impl Default for TearFall {
    fn default() -> Self {
        Self {
            size: Range::new(9.0, 16.0),
            aspect_ratio: 1.35,
            gravity: Range::new(400.0, 600.0),
            duration: Range::new(1.25, 2.2),
            wobble_frequency: Range::new(0.5, 1.5),
            wobble_amplitude: Range::new(2.0, 5.0),
            base_rotation: Range::new(-5.0, 5.0),
            stretch_rate: 0.18,
            fade_in: 0.1,
        }
    }
}

/// Where tears land.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TearImpact {
    /// Half-width, in degrees, of the arc around the top of a round target that tears may hit.
    ///
    /// Defaults to `65.0`.
    pub rim_arc: f32,
    /// Offset added to the target radius for each impact. Defaults to `-4.0..6.0`.
    pub rim_jitter: Range,
    /// Ground depth below the glyph center, as a fraction of the glyph height.
    ///
    /// Used when no target is present. Defaults to `0.65..0.85`.
    pub ground_depth: Range,
}

impl Default for TearImpact {
    fn default() -> Self {
        Self {
            rim_arc: 65.0,
            rim_jitter: Range::new(-4.0, 6.0),
            ground_depth: Range::new(0.65, 0.85),
        }
    }
}

/// The squash, slide, fade and tilt played after a tear hits its impact point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TearBounce {
    /// Distance slid along the surface. Defaults to `24.0..40.0`.
    pub slide_distance: Range,
    /// Added to the vertical magnitude of the impact normal before renormalizing.
    ///
    /// Defaults to `0.35`.
    pub downhill_bias: f32,
    /// Scale reached by the impact squash. Defaults to `(1.15, 0.65)`.
    pub squash: Vec2,
    /// Defaults to `0.12`.
    pub squash_duration: f32,
    /// Defaults to `0.35`.
    pub slide_duration: f32,
    /// Delay before the fade-out starts. Defaults to `0.05`.
    pub fade_delay: f32,
    /// Defaults to `0.3`.
    pub fade_duration: f32,
    /// Degrees of tilt per unit of horizontal slide direction. Defaults to `25.0`.
    pub tilt: f32,
    /// Defaults to `0.3`.
    pub tilt_duration: f32,
}

impl Default for TearBounce {
    fn default() -> Self {
        Self {
            slide_distance: Range::new(24.0, 40.0),
            downhill_bias: 0.35,
            squash: Vec2::new(1.15, 0.65),
            squash_duration: 0.12,
            slide_duration: 0.35,
            fade_delay: 0.05,
            fade_duration: 0.3,
            tilt: 25.0,
            tilt_duration: 0.3,
        }
    }
}

impl TearBounce {
    /// Time from impact until every bounce animation has finished.
    pub fn total_duration(&self) -> f32 {
        self.squash_duration
            .max(self.slide_duration)
            .max(self.fade_delay + self.fade_duration)
            .max(self.tilt_duration)
    }
}

/// Glyph rotation used when a trigger leaves it unspecified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TearRotation {
    /// Rotation applied to the glyph, in degrees. Defaults to `90.0`.
    pub delta: f32,
    /// Rotation time in seconds. Defaults to `0.6`.
    pub duration: f32,
    /// If `true`, triggering the effect does not rotate the glyph, only the spawn points.
    ///
    /// Defaults to `false`.
    #[serde(skip_serializing_if = "is_false")]
    pub spawn_only: bool,
}

impl Default for TearRotation {
    fn default() -> Self {
        Self {
            delta: 90.0,
            duration: 0.6,
            spawn_only: false,
        }
    }
}

impl TearRotation {
    /// Resolves a trigger's rotation delta. A missing, zero or non-finite delta
    /// falls back to [`delta`](Self::delta).
    pub fn resolve_delta(&self, requested: Option<f32>) -> f32 {
        match requested {
            Some(delta) if delta.is_finite() && delta != 0.0 => delta,
            _ => self.delta,
        }
    }

    /// Resolves a trigger's rotation duration, ignoring non-positive or non-finite requests.
    pub fn resolve_duration(&self, requested: Option<f32>) -> f32 {
        match requested {
            Some(duration) if duration.is_finite() && duration > 0.0 => duration,
            _ => self.duration,
        }
    }
}

/// A complete tear effect configuration, loadable from `.tears.ron` files.
///
/// Attach it to a glyph with the [`TearEffect`](crate::runtime::TearEffect) component.
/// Glyphs without one use [`TearEffectAsset::default`].
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TearEffectAsset {
    teardrops_version: String,
    /// Display name for this effect.
    #[serde(default)]
    pub name: String,
    /// Particle count, timing and spawn placement.
    #[serde(default)]
    pub emission: TearEmission,
    /// Falling-phase physics.
    #[serde(default)]
    pub fall: TearFall,
    /// Impact point resolution.
    #[serde(default)]
    pub impact: TearImpact,
    /// Bounce-and-slide phase.
    #[serde(default)]
    pub bounce: TearBounce,
    /// Default glyph rotation.
    #[serde(default)]
    pub rotation: TearRotation,
    /// Optional fixed random seed. When set, every trigger replays the same shower.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_seed: Option<u64>,
}

impl Default for TearEffectAsset {
    fn default() -> Self {
        Self::new("Tears")
    }
}

impl TearEffectAsset {
    /// Creates an effect with the built-in parameters and the current format version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            teardrops_version: current_format_version().to_string(),
            name: name.into(),
            emission: TearEmission::default(),
            fall: TearFall::default(),
            impact: TearImpact::default(),
            bounce: TearBounce::default(),
            rotation: TearRotation::default(),
            fixed_seed: None,
        }
    }

    /// Returns the format version this asset was written with.
    pub fn version(&self) -> &str {
        &self.teardrops_version
    }

    /// Sets a fixed random seed.
    pub fn with_fixed_seed(mut self, seed: u64) -> Self {
        self.fixed_seed = Some(seed);
        self
    }

    /// Rewrites a known older `teardrops_version` to the current one.
    ///
    /// Returns the status found before the rewrite.
    pub fn try_upgrade_version(&mut self) -> VersionStatus {
        let status = versioning::validate_version(&self.teardrops_version);
        if matches!(status, VersionStatus::Outdated { .. }) {
            self.teardrops_version = current_format_version().to_string();
        }
        status
    }

    /// Parses, version-checks and validates an effect from RON text.
    pub fn from_ron(source: &str) -> Result<Self, TearEffectAssetLoaderError> {
        Self::decode(source.as_bytes()).map(|(asset, _)| asset)
    }

    fn decode(bytes: &[u8]) -> Result<(Self, VersionStatus), TearEffectAssetLoaderError> {
        let mut asset = ron::de::from_bytes::<TearEffectAsset>(bytes)?;

        let status = asset.try_upgrade_version();
        if status == VersionStatus::Unknown {
            return Err(TearEffectAssetLoaderError::UnknownVersion);
        }

        asset.validate()?;
        Ok((asset, status))
    }

    /// Checks every range and timing the motion engine divides by or samples from.
    pub fn validate(&self) -> Result<(), TearEffectValidationError> {
        let count = self.emission.count;
        if count.min == 0 || count.min > count.max {
            return Err(TearEffectValidationError::InvalidCount {
                min: count.min,
                max: count.max,
            });
        }

        let ranges = [
            ("emission.progress", self.emission.progress),
            ("emission.delay_jitter", self.emission.delay_jitter),
            ("fall.size", self.fall.size),
            ("fall.gravity", self.fall.gravity),
            ("fall.duration", self.fall.duration),
            ("fall.wobble_frequency", self.fall.wobble_frequency),
            ("fall.wobble_amplitude", self.fall.wobble_amplitude),
            ("fall.base_rotation", self.fall.base_rotation),
            ("impact.rim_jitter", self.impact.rim_jitter),
            ("impact.ground_depth", self.impact.ground_depth),
            ("bounce.slide_distance", self.bounce.slide_distance),
        ];
        for (field, range) in ranges {
            if range.min > range.max {
                return Err(TearEffectValidationError::InvertedRange {
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        let positive = [
            ("fall.size", self.fall.size),
            ("fall.gravity", self.fall.gravity),
            ("fall.duration", self.fall.duration),
            ("emission.delay_jitter", self.emission.delay_jitter),
        ];
        for (field, range) in positive {
            if range.min <= 0.0 {
                return Err(TearEffectValidationError::NonPositiveRange {
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        let fractions = [
            ("emission.progress.min", self.emission.progress.min),
            ("emission.progress.max", self.emission.progress.max),
            ("emission.convergence", self.emission.convergence),
            ("emission.spawn_band_fraction", self.emission.spawn_band_fraction),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(TearEffectValidationError::InvalidFraction { field, value });
            }
        }
        if self.emission.spawn_band_fraction == 0.0 {
            return Err(TearEffectValidationError::InvalidFraction {
                field: "emission.spawn_band_fraction",
                value: 0.0,
            });
        }

        let durations = [
            ("fall.aspect_ratio", self.fall.aspect_ratio),
            ("bounce.squash_duration", self.bounce.squash_duration),
            ("bounce.slide_duration", self.bounce.slide_duration),
            ("bounce.fade_duration", self.bounce.fade_duration),
            ("bounce.tilt_duration", self.bounce.tilt_duration),
            ("rotation.duration", self.rotation.duration),
        ];
        for (field, value) in durations {
            if !(value.is_finite() && value > 0.0) {
                return Err(TearEffectValidationError::InvalidDuration { field, value });
            }
        }
        if self.fall.fade_in < 0.0 || self.bounce.fade_delay < 0.0 {
            let (field, value) = if self.fall.fade_in < 0.0 {
                ("fall.fade_in", self.fall.fade_in)
            } else {
                ("bounce.fade_delay", self.bounce.fade_delay)
            };
            return Err(TearEffectValidationError::InvalidDuration { field, value });
        }
        if self.emission.samples_per_contour == 0 {
            return Err(TearEffectValidationError::NoOutlineSamples);
        }

        Ok(())
    }
}
