use bevy::prelude::*;
use bevy::window::WindowResolution;

use bevy_teardrops::geometry::{local_to_surface, planar, surface_to_world};
use bevy_teardrops::prelude::*;

const HEART: &str = "M50 88 C20 66 4 48 4 30 C4 14 16 4 30 4 C40 4 47 10 50 18 \
                     C53 10 60 4 70 4 C84 4 96 14 96 30 C96 48 80 66 50 88 Z";
const GLYPH_SIZE: Vec2 = Vec2::splat(100.0);
const TARGET_SIZE: Vec2 = Vec2::splat(180.0);
const COLORS: [&str; 4] = ["#4a90e2", "#e24a6f", "#50c878", "#f5a623"];

#[derive(Resource, Default)]
struct ColorCycle(usize);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Teardrops".into(),
                resolution: WindowResolution::new(960, 720),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(TeardropsPlugin)
        .init_resource::<ColorCycle>()
        .add_systems(Startup, setup)
        .add_systems(Update, (trigger_on_key, draw_outlines))
        .run();
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn(Camera2d);

    let outline = match GlyphOutline::from_svg_path(HEART) {
        Ok(outline) => outline,
        Err(err) => {
            error!("could not read glyph outline: {err}");
            GlyphOutline::default()
        }
    };

    commands.spawn((
        Name::new("Glyph"),
        TearGlyph::new(outline, GLYPH_SIZE),
        TearEffect(asset_server.load("effects/tears.tears.ron")),
        Transform::from_xyz(0.0, 150.0, 0.0),
    ));

    commands.spawn((
        Name::new("Face"),
        TearTarget { size: TARGET_SIZE },
        Transform::from_xyz(0.0, -140.0, 0.0),
    ));

    commands.spawn((
        Text::new("Space: cry    R: cry the other way"),
        Node {
            position_type: PositionType::Absolute,
            left: px(12),
            bottom: px(12),
            ..default()
        },
    ));
}

fn trigger_on_key(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    mut cycle: ResMut<ColorCycle>,
    glyphs: Query<(Entity, &GlyphState), With<TearGlyph>>,
) {
    let reverse = keys.just_pressed(KeyCode::KeyR);
    if !keys.just_pressed(KeyCode::Space) && !reverse {
        return;
    }

    let hex = COLORS[cycle.0 % COLORS.len()];
    let base_color = match Rgb::from_hex(hex) {
        Ok(color) => color,
        Err(err) => {
            warn!("{hex}: {err}");
            return;
        }
    };

    for (glyph, state) in &glyphs {
        if state.is_rotating() {
            continue;
        }
        let mut trigger = TriggerTearEffect::new(glyph, base_color);
        if reverse {
            trigger = trigger.with_rotation(-90.0, 0.6);
        }
        commands.trigger(trigger);
        cycle.0 += 1;
    }
}

fn draw_outlines(
    mut gizmos: Gizmos,
    glyphs: Query<(&TearGlyph, &GlobalTransform)>,
    targets: Query<(&TearTarget, &GlobalTransform)>,
) {
    for (glyph, global) in &glyphs {
        let transform = local_to_surface(planar(global.affine()), glyph.size);
        for contour in &glyph.outline.contours {
            let points = contour
                .flatten()
                .into_iter()
                .map(|point| surface_to_world(transform.transform_point2(point)));
            gizmos.linestrip_2d(points, Color::srgb(0.9, 0.9, 0.95));
        }
    }

    for (target, global) in &targets {
        let radius = target.size.min_element() / 2.0 * global.scale().x;
        gizmos.circle_2d(global.translation().truncate(), radius, Color::srgb(0.8, 0.7, 0.6));
    }
}
