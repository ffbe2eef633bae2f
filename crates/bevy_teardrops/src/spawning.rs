use bevy::{
    math::curve::{Curve, EaseFunction, EasingCurve},
    prelude::*,
};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    asset::TearEffectAsset,
    geometry::{local_to_surface, planar, surface_to_world, transformed_bounds},
    motion::{DropletPose, TearParticle, TearStep},
    palette::{Palette, Rgb, Rgba},
    runtime::{
        DropletLayer, DropletVisual, GlyphState, TearEffect, TearGlyph, TearRng, TearShower,
        TearTarget, TriggerTearEffect,
    },
    sampler::spawn_band,
    spawner::{ImpactTarget, ShowerLayout, plan_shower},
    textures::{DropletTextureCache, SoftDotTexture},
};

const DROPLET_Z: f32 = 10.0;

pub(crate) fn on_trigger_tear_effect(
    trigger: On<TriggerTearEffect>,
    mut commands: Commands,
    time: Res<Time>,
    effects: Res<Assets<TearEffectAsset>>,
    mut textures: ResMut<DropletTextureCache>,
    mut images: ResMut<Assets<Image>>,
    mut rng: ResMut<TearRng>,
    mut glyphs: Query<(
        &TearGlyph,
        &mut GlyphState,
        &Transform,
        &GlobalTransform,
        Option<&TearEffect>,
    )>,
    targets: Query<(&TearTarget, &GlobalTransform)>,
    visibilities: Query<&Visibility>,
    parents: Query<&ChildOf>,
) {
    let glyph_entity = trigger.entity;
    let Ok((glyph, mut state, transform, global, effect)) =
        glyphs.get_mut(glyph_entity)
    else {
        return;
    };

    if state.is_rotating() {
        debug!("{glyph_entity}: tear trigger ignored, glyph is still rotating");
        return;
    }

    let settings = match effect {
        Some(TearEffect(handle)) => match effects.get(handle) {
            Some(asset) => asset.clone(),
            None => {
                warn!("{glyph_entity}: tear effect asset not loaded, using built-in parameters");
                TearEffectAsset::default()
            }
        },
        None => TearEffectAsset::default(),
    };

    let now = time.elapsed_secs();
    let rotation_delta = settings.rotation.resolve_delta(trigger.rotation_delta);
    let rotation_duration = settings.rotation.resolve_duration(trigger.rotation_duration);

    *state = GlyphState::Rotating {
        from: transform.rotation,
        delta: if settings.rotation.spawn_only {
            0.0
        } else {
            rotation_delta
        },
        started_at: now,
        duration: rotation_duration,
    };

    let glyph_transform = local_to_surface(planar(global.affine()), glyph.size);
    let bounds = transformed_bounds(glyph_transform, glyph.size);
    let hidden = is_hidden(glyph_entity, &visibilities, &parents);
    let band = spawn_band(
        &glyph.outline,
        (!hidden).then_some(glyph_transform),
        bounds,
        settings.emission.samples_per_contour as usize,
        settings.emission.spawn_band_fraction,
    );

    let center = bounds.center();
    let target = targets
        .iter()
        .map(|(target, global)| {
            let target_bounds =
                transformed_bounds(local_to_surface(planar(global.affine()), target.size), target.size);
            ImpactTarget::circle_in(target_bounds)
        })
        .min_by(|a, b| distance_to(a, center).total_cmp(&distance_to(b, center)))
        .unwrap_or_default();

    let mut shower_rng = match settings.fixed_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rng.0),
    };

    let layout = ShowerLayout {
        band: &band.points,
        bounds,
        target,
        rotation_delta,
        rotation_duration,
    };
    let schedule = plan_shower(&layout, &settings, &mut shower_rng);

    debug!(
        "{glyph_entity}: {} tears scheduled ({} band points{})",
        schedule.len(),
        band.points.len(),
        if band.synthetic { ", synthetic" } else { "" }
    );

    let body_texture = textures.get_or_create(trigger.base_color, &mut images);
    commands.spawn((
        Name::new("Tear Shower"),
        TearShower::new(
            glyph_entity,
            now,
            schedule,
            trigger.base_color,
            target,
            body_texture,
            settings,
            shower_rng,
        ),
    ));
}

pub(crate) fn advance_glyph_rotation(
    time: Res<Time>,
    mut glyphs: Query<(Entity, &mut GlyphState, &mut Transform)>,
) {
    let now = time.elapsed_secs();
    let easing = EasingCurve::new(0.0, 1.0, EaseFunction::CubicInOut);

    for (entity, mut state, mut transform) in &mut glyphs {
        let GlyphState::Rotating {
            from,
            delta,
            started_at,
            duration,
        } = *state
        else {
            continue;
        };

        let progress = ((now - started_at) / duration).clamp(0.0, 1.0);
        if delta != 0.0 {
            let turned = delta * easing.sample_clamped(progress);
            transform.rotation = Quat::from_rotation_z(-turned.to_radians()) * from;
        }

        if progress >= 1.0 {
            *state = GlyphState::Idle;
            trace!("{entity}: glyph rotation settled");
        }
    }
}

pub(crate) fn advance_tear_showers(
    mut commands: Commands,
    time: Res<Time>,
    dot: Option<Res<SoftDotTexture>>,
    mut showers: Query<(Entity, &mut TearShower)>,
    mut visuals: Query<(&mut DropletVisual, &mut Transform)>,
) {
    let now = time.elapsed_secs();
    let dot_texture = dot.map(|dot| dot.handle.clone()).unwrap_or_default();

    for (shower_entity, mut shower) in &mut showers {
        shower.birth_due(now);

        let palette = shower.palette;
        let body_texture = shower.body_texture.clone();
        let mut finished = Vec::new();

        let (settings, slots) = shower.live_mut();
        for (index, slot) in slots {
            let pose = match slot.particle.advance(now, settings) {
                TearStep::Moved(pose) => pose,
                TearStep::Impacted(pose) => {
                    trace!("{shower_entity}: tear {index} impacted at {}", pose.position);
                    pose
                }
                TearStep::Finished => {
                    finished.push(index);
                    continue;
                }
            };

            match slot.visual {
                Some(visual) => {
                    if let Ok((mut droplet, mut transform)) = visuals.get_mut(visual) {
                        droplet.opacity = pose.opacity;
                        *transform = droplet_transform(&pose);
                    }
                }
                None => {
                    slot.visual = Some(spawn_droplet(
                        &mut commands,
                        shower_entity,
                        &slot.particle,
                        &pose,
                        &palette,
                        &body_texture,
                        &dot_texture,
                    ));
                }
            }
        }

        for index in finished {
            if let Some(visual) = shower.dispose(index) {
                commands.entity(visual).try_despawn();
            }
            trace!("{shower_entity}: tear {index} disposed");
        }

        if shower.is_finished() {
            debug!(
                "{shower_entity}: tear shower finished after {} tears",
                shower.born_count()
            );
            commands.entity(shower_entity).despawn();
        }
    }
}

pub(crate) fn sync_droplet_layers(
    visuals: Query<&DropletVisual>,
    mut layers: Query<(&DropletLayer, &mut Sprite)>,
) {
    for (layer, mut sprite) in &mut layers {
        let Ok(droplet) = visuals.get(layer.root) else {
            continue;
        };
        let alpha = (layer.base_alpha * droplet.opacity).clamp(0.0, 1.0);
        if sprite.color.alpha() != alpha {
            sprite.color.set_alpha(alpha);
        }
    }
}

fn spawn_droplet(
    commands: &mut Commands,
    shower: Entity,
    particle: &TearParticle,
    pose: &DropletPose,
    palette: &Palette,
    body_texture: &Handle<Image>,
    dot_texture: &Handle<Image>,
) -> Entity {
    let width = particle.size;
    let height = particle.height;
    let root = commands
        .spawn((
            Name::new("Tear"),
            DropletVisual {
                shower,
                opacity: pose.opacity,
            },
            droplet_transform(pose),
        ))
        .id();

    let glow_tail = Rgba {
        alpha: palette.glow.alpha * 0.45,
        ..palette.glow
    };
    let white_flare = Rgba {
        rgb: Rgb::WHITE,
        alpha: 0.9,
    };

    // (texture, tone, size, offset with z as draw order)
    let layers = [
        (
            dot_texture,
            palette.shadow_soft,
            Vec2::new(width * 1.1, width * 0.45),
            Vec3::new(width * 0.1, -height * 0.55, -0.3),
        ),
        (
            dot_texture,
            glow_tail,
            Vec2::new(width * 0.3, height),
            Vec3::new(0.0, -width * 0.7, -0.2),
        ),
        (
            body_texture,
            Rgba {
                rgb: Rgb::WHITE,
                alpha: 1.0,
            },
            Vec2::new(width, height),
            Vec3::ZERO,
        ),
        (
            dot_texture,
            palette.highlight_soft,
            Vec2::new(width * 0.3, width * 0.22),
            Vec3::new(width * 0.15, -height * 0.22, 0.1),
        ),
        (
            dot_texture,
            white_flare,
            Vec2::splat(width * 0.28),
            Vec3::new(-width * 0.2, height * 0.2, 0.2),
        ),
    ];

    commands.entity(root).with_children(|parent| {
        for (texture, tone, size, offset) in layers {
            let base_alpha = tone.alpha;
            parent.spawn((
                DropletLayer { root, base_alpha },
                Sprite {
                    image: texture.clone(),
                    color: Color::from(tone).with_alpha(base_alpha * pose.opacity),
                    custom_size: Some(size),
                    ..default()
                },
                Transform::from_translation(offset),
            ));
        }
    });

    root
}

fn droplet_transform(pose: &DropletPose) -> Transform {
    Transform {
        translation: surface_to_world(pose.position).extend(DROPLET_Z),
        rotation: Quat::from_rotation_z(-pose.rotation.to_radians()),
        scale: pose.scale.extend(1.0),
    }
}

// the nearest `Visibility` that is not `Inherited`, walking up through parents, decides
fn is_hidden(entity: Entity, visibilities: &Query<&Visibility>, parents: &Query<&ChildOf>) -> bool {
    let mut current = entity;
    loop {
        match visibilities.get(current) {
            Ok(Visibility::Hidden) => return true,
            Ok(Visibility::Visible) => return false,
            _ => {}
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.parent(),
            Err(_) => return false,
        }
    }
}

fn distance_to(target: &ImpactTarget, point: Vec2) -> f32 {
    match target {
        ImpactTarget::Circle { center, .. } => center.distance(point),
        ImpactTarget::Ground => f32::INFINITY,
    }
}
