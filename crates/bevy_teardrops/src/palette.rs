use std::fmt;

use bevy::color::{Color, ColorToPacked, HexColorError, Srgba};
use serde::{Deserialize, Serialize};

/// An opaque 8-bit sRGB color, the base input of a tear palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`, `rrggbb` or the short `#rgb` forms.
    ///
    /// Any alpha channel in the input is discarded.
    pub fn from_hex(hex: &str) -> Result<Self, HexColorError> {
        let [r, g, b, _] = Srgba::hex(hex)?.to_u8_array();
        Ok(Self { r, g, b })
    }

    /// Linearly mixes each channel toward `target` by `ratio`.
    ///
    /// Channels are rounded and clamped to `0..=255`, so ratios outside of
    /// `0.0..=1.0` still yield a valid color.
    pub fn mix(self, target: Rgb, ratio: f32) -> Rgb {
        let channel = |source: u8, target: u8| -> u8 {
            let source = f32::from(source);
            let mixed = (source + (f32::from(target) - source) * ratio).round();
            mixed.clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: channel(self.r, target.r),
            g: channel(self.g, target.g),
            b: channel(self.b, target.b),
        }
    }

    /// Attaches an alpha value.
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::srgb_u8(rgb.r, rgb.g, rgb.b)
    }
}

/// A palette tone: 8-bit channels plus a floating alpha.
///
/// Displays in the `rgba(r, g, b, a)` notation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Color channels.
    pub rgb: Rgb,
    /// Opacity from `0.0` to `1.0`.
    pub alpha: f32,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb { r, g, b } = self.rgb;
        write!(f, "rgba({r}, {g}, {b}, {})", self.alpha)
    }
}

impl From<Rgba> for Color {
    fn from(rgba: Rgba) -> Self {
        let Rgb { r, g, b } = rgba.rgb;
        Color::srgba_u8(r, g, b, (rgba.alpha * 255.0).round() as u8)
    }
}

/// The six tones a droplet is shaded with, derived from a single base color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Lit side of the droplet.
    pub highlight: Rgba,
    /// Same hue as [`highlight`](Self::highlight) at half opacity.
    pub highlight_soft: Rgba,
    /// Body tone.
    pub mid: Rgba,
    /// Unlit side of the droplet.
    pub shadow: Rgba,
    /// Same hue as [`shadow`](Self::shadow) at half opacity.
    pub shadow_soft: Rgba,
    /// Faint halo and tail.
    pub glow: Rgba,
}

impl Palette {
    /// Derives the palette for `base`. Identical inputs always yield identical palettes.
    pub fn from_base(base: Rgb) -> Self {
        let highlight = base.mix(Rgb::WHITE, 0.55);
        let mid = base.mix(Rgb::WHITE, 0.25);
        let shadow = base.mix(Rgb::BLACK, 0.35);
        let glow = base.mix(Rgb::WHITE, 0.7);

        Self {
            highlight: highlight.with_alpha(0.95),
            highlight_soft: highlight.with_alpha(0.5),
            mid: mid.with_alpha(0.85),
            shadow: shadow.with_alpha(0.9),
            shadow_soft: shadow.with_alpha(0.5),
            glow: glow.with_alpha(0.35),
        }
    }

    /// All tones in declaration order.
    pub fn tones(&self) -> [Rgba; 6] {
        [
            self.highlight,
            self.highlight_soft,
            self.mid,
            self.shadow,
            self.shadow_soft,
            self.glow,
        ]
    }
}
