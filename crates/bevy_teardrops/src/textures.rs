use bevy::{
    prelude::*,
    render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages},
};
use std::collections::HashMap;

use crate::palette::{Palette, Rgb, Rgba};

const BODY_WIDTH: u32 = 32;
const BODY_HEIGHT: u32 = 44;
const DOT_SIZE: u32 = 32;

// light source of the body gradient, as a fraction of the droplet box
const LIGHT_SOURCE: Vec2 = Vec2::new(0.30, 0.25);

// droplet body textures

/// Shaded droplet bodies baked once per base color.
#[derive(Resource, Default)]
pub struct DropletTextureCache {
    cache: HashMap<Rgb, Handle<Image>>,
}

impl DropletTextureCache {
    /// Returns the body texture for `base`, baking it on first use.
    pub fn get_or_create(&mut self, base: Rgb, images: &mut Assets<Image>) -> Handle<Image> {
        if let Some(handle) = self.cache.get(&base) {
            return handle.clone();
        }
        let image = bake_droplet_body(&Palette::from_base(base));
        let handle = images.add(image);
        self.cache.insert(base, handle.clone());
        handle
    }

    /// Returns the body texture for `base` if it was already baked.
    pub fn get(&self, base: Rgb) -> Option<Handle<Image>> {
        self.cache.get(&base).cloned()
    }

    /// Number of baked bodies.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` when nothing has been baked yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

fn bake_droplet_body(palette: &Palette) -> Image {
    let width = BODY_WIDTH as f32;
    let height = BODY_HEIGHT as f32;
    let light = LIGHT_SOURCE * Vec2::new(width, height);
    let reach = [
        Vec2::ZERO,
        Vec2::new(width, 0.0),
        Vec2::new(0.0, height),
        Vec2::new(width, height),
    ]
    .iter()
    .map(|corner| corner.distance(light))
    .fold(0.0, f32::max);

    let stops = [
        (0.0, palette.glow),
        (0.35, palette.highlight),
        (0.65, palette.mid),
        (1.0, palette.shadow),
    ];

    let mut data = Vec::with_capacity((BODY_WIDTH * BODY_HEIGHT * 4) as usize);
    for y in 0..BODY_HEIGHT {
        for x in 0..BODY_WIDTH {
            let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let coverage = teardrop_coverage(pixel, width, height);
            let color = sample_stops(&stops, pixel.distance(light) / reach);
            data.push((color[0] * 255.0).round() as u8);
            data.push((color[1] * 255.0).round() as u8);
            data.push((color[2] * 255.0).round() as u8);
            data.push((color[3] * coverage * 255.0).round().clamp(0.0, 255.0) as u8);
        }
    }

    create_2d_texture(BODY_WIDTH, BODY_HEIGHT, data)
}

// coverage of a pointed-top, round-bottom drop filling a `width` x `height` box (y down)
fn teardrop_coverage(pixel: Vec2, width: f32, height: f32) -> f32 {
    let radius = width / 2.0;
    let center = Vec2::new(radius, height - radius);

    let outside = if pixel.y >= center.y {
        pixel.distance(center) - radius
    } else {
        let taper = (pixel.y / center.y).clamp(0.0, 1.0).powf(0.75);
        (pixel.x - center.x).abs() - radius * taper
    };
    (0.5 - outside).clamp(0.0, 1.0)
}

fn sample_stops(stops: &[(f32, Rgba)], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    let as_floats = |tone: Rgba| {
        [
            f32::from(tone.rgb.r) / 255.0,
            f32::from(tone.rgb.g) / 255.0,
            f32::from(tone.rgb.b) / 255.0,
            tone.alpha,
        ]
    };

    let Some(right_idx) = stops.iter().position(|(position, _)| *position >= t) else {
        return stops.last().map(|(_, tone)| as_floats(*tone)).unwrap_or([1.0; 4]);
    };
    if right_idx == 0 {
        return as_floats(stops[0].1);
    }

    let (left_pos, left) = stops[right_idx - 1];
    let (right_pos, right) = stops[right_idx];
    let local_t = (t - left_pos) / (right_pos - left_pos);
    let (a, b) = (as_floats(left), as_floats(right));
    [
        a[0] + (b[0] - a[0]) * local_t,
        a[1] + (b[1] - a[1]) * local_t,
        a[2] + (b[2] - a[2]) * local_t,
        a[3] + (b[3] - a[3]) * local_t,
    ]
}

// soft dot texture

/// White radial falloff tinted by sprite color for the highlight, glint, tail and shadow layers.
#[derive(Resource, Clone)]
pub struct SoftDotTexture {
    /// Handle to the baked image.
    pub handle: Handle<Image>,
}

pub(crate) fn create_soft_dot_texture(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let half = DOT_SIZE as f32 / 2.0;
    let mut data = Vec::with_capacity((DOT_SIZE * DOT_SIZE * 4) as usize);
    for y in 0..DOT_SIZE {
        for x in 0..DOT_SIZE {
            let offset = Vec2::new(x as f32 + 0.5 - half, y as f32 + 0.5 - half) / half;
            let falloff = (1.0 - offset.length()).clamp(0.0, 1.0);
            let alpha = falloff * falloff * (3.0 - 2.0 * falloff);
            data.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
        }
    }

    let handle = images.add(create_2d_texture(DOT_SIZE, DOT_SIZE, data));
    commands.insert_resource(SoftDotTexture { handle });
}

// shared utilities

fn create_2d_texture(width: u32, height: u32, data: Vec<u8>) -> Image {
    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::COPY_SRC;
    image
}
