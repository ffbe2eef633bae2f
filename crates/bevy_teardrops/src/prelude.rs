pub use crate::TeardropsPlugin;

pub use crate::asset::{
    CountRange, Range as TearRange, TearBounce, TearEffectAsset, TearEffectAssetLoaderError,
    TearEffectValidationError, TearEmission, TearFall, TearImpact, TearRotation,
};
pub use crate::geometry::{Contour, GlyphOutline, PathSegment, SvgPathError};
pub use crate::palette::{Palette, Rgb, Rgba};
pub use crate::runtime::{
    DropletLayer, DropletVisual, GlyphState, TearEffect, TearGlyph, TearRng, TearShower,
    TearTarget, TriggerTearEffect,
};
pub use crate::spawner::ImpactTarget;
