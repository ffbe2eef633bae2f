#![deny(missing_docs)]
//! **Teardrops** sheds liquid droplets from glyph-shaped sprites in the
//! [Bevy game engine](https://bevyengine.org/).
//!
//! When a glyph is triggered it turns, and a shower of tears is born along the
//! upper part of its outline. Each tear falls under gravity with a little
//! wobble, drifts toward its landing spot and, when it hits a round target
//! (an avatar, a face, a button), squashes and slides off the rim before
//! fading away.
//!
//! # Getting started
//!
//! ## Add the dependency
//!
//! ```toml
//! [dependencies]
//! bevy_teardrops = "0.1"
//! ```
//!
//! ## Add the plugin
//!
//! Add [`TeardropsPlugin`] to your Bevy app:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_teardrops::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins((DefaultPlugins, TeardropsPlugin))
//!         // ...your other plugins, systems and resources
//!         .run();
//! }
//! ```
//!
//! ## Shedding tears
//!
//! Spawn a [`TearGlyph`] with an outline, optionally a [`TearTarget`] below
//! it, and trigger a [`TriggerTearEffect`]:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_teardrops::prelude::*;
//!
//! fn setup(mut commands: Commands) {
//!     let outline = GlyphOutline::from_svg_path("M50 0 L100 100 L0 100 Z").unwrap();
//!     let glyph = commands
//!         .spawn((TearGlyph::new(outline, Vec2::splat(100.0)), Transform::default()))
//!         .id();
//!     commands.spawn((
//!         TearTarget { size: Vec2::splat(120.0) },
//!         Transform::from_xyz(0.0, -160.0, 0.0),
//!     ));
//!
//!     commands.trigger(TriggerTearEffect::new(glyph, Rgb::from_hex("#4a90e2").unwrap()));
//! }
//! ```
//!
//! Triggers sent while the glyph is still turning are ignored.
//!
//! ### Loading parameters from a file
//!
//! Every range the effect draws from can be tuned through a
//! [`TearEffectAsset`], loaded from `.tears.ron` files:
//!
//! ```
//! use bevy::prelude::*;
//! use bevy_teardrops::prelude::*;
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.spawn((
//!         TearGlyph::new(GlyphOutline::default(), Vec2::splat(64.0)),
//!         TearEffect(asset_server.load("effects/heavy.tears.ron")),
//!     ));
//! }
//! ```
//!
//! Glyphs without a [`TearEffect`] use [`TearEffectAsset::default`].
//!
//! # Coordinates
//!
//! The math runs in a y-down "surface" space measured in world units, so a
//! surface point `(x, y)` is drawn at world `(x, -y)`. Positive angles turn
//! clockwise on screen. Glyph outlines use SVG conventions: origin at the
//! top-left of the glyph box, y downward.
//!
//! # Table of contents
//!
//! - [Outlines](geometry): contours, SVG path data and surface transforms
//! - [Sampling](sampler): picking the spawn band from an outline
//! - [Palettes](palette): deriving droplet tones from a base color
//! - [Spawning](spawner): counts, birth delays, start and impact points
//! - [Motion](motion): the fall, the bounce and disposal
//! - [Runtime](runtime): components, the trigger event and showers
//! - [Textures](textures): baked droplet bodies

/// Tear effect asset definitions and the RON loader.
pub mod asset;
/// Glyph outlines and surface-space transforms.
pub mod geometry;
/// Per-tear kinematics and phases.
pub mod motion;
/// Droplet color derivation.
pub mod palette;
/// Convenience re-exports for common types.
pub mod prelude;
/// Components, events and per-trigger state.
pub mod runtime;
/// Spawn band selection.
pub mod sampler;
/// Shower planning and impact resolution.
pub mod spawner;
mod spawning;
/// Baked droplet textures.
pub mod textures;

use bevy::prelude::*;

use asset::TearEffectAssetLoader;
use runtime::TearRng;
use spawning::{
    advance_glyph_rotation, advance_tear_showers, on_trigger_tear_effect, sync_droplet_layers,
};
use textures::{DropletTextureCache, create_soft_dot_texture};

/// Plugin that adds tear showers to a Bevy app.
///
/// Registers the effect asset and its loader, the texture cache, the trigger
/// observer and the systems that move, draw and dispose of tears.
pub struct TeardropsPlugin;

impl Plugin for TeardropsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<TearEffectAsset>()
            .init_asset_loader::<TearEffectAssetLoader>();

        app.init_resource::<TearRng>()
            .init_resource::<DropletTextureCache>()
            .add_systems(Startup, create_soft_dot_texture);

        app.add_observer(on_trigger_tear_effect);

        app.add_systems(
            Update,
            (
                advance_glyph_rotation,
                advance_tear_showers,
                sync_droplet_layers,
            )
                .chain(),
        );
    }
}

pub use asset::{
    CountRange, Range as TearRange, TearBounce, TearEffectAsset, TearEmission, TearFall,
    TearImpact, TearRotation,
};
pub use geometry::{Contour, GlyphOutline, PathSegment};
pub use palette::{Palette, Rgb, Rgba};
pub use runtime::{
    GlyphState, TearEffect, TearGlyph, TearShower, TearTarget, TriggerTearEffect,
};
