use bevy::math::{Affine2, Rect, Vec2};
use bevy_teardrops::geometry::{Contour, GlyphOutline, local_to_surface};
use bevy_teardrops::sampler::*;

fn square_outline() -> GlyphOutline {
    let contour = Contour::polygon(&[
        Vec2::ZERO,
        Vec2::new(100.0, 0.0),
        Vec2::splat(100.0),
        Vec2::new(0.0, 100.0),
    ])
    .unwrap();
    GlyphOutline::new(vec![contour])
}

fn glyph_bounds() -> Rect {
    Rect::new(450.0, 450.0, 550.0, 550.0)
}

#[test]
fn samples_are_sorted_top_first() {
    let samples = sample_outline(&square_outline(), Some(Affine2::IDENTITY), 12);

    assert_eq!(samples.len(), 12);
    assert!(samples.windows(2).all(|pair| pair[0].y <= pair[1].y));
}

#[test]
fn every_contour_is_sampled() {
    let mut outline = square_outline();
    outline.contours.push(outline.contours[0].clone());

    let samples = sample_outline(&outline, Some(Affine2::IDENTITY), 5);
    assert_eq!(samples.len(), 10);
}

#[test]
fn top_band_keeps_ceil_of_fraction() {
    let sorted: Vec<Vec2> = (0..10).map(|i| Vec2::new(0.0, i as f32)).collect();

    assert_eq!(top_band(&sorted, 0.3).len(), 3);
    assert_eq!(top_band(&sorted, 0.25).len(), 3);
    assert_eq!(top_band(&sorted[..1], 0.3).len(), 1);
    assert!(top_band(&[], 0.3).is_empty());
}

#[test]
fn band_of_a_square_is_its_top_edge() {
    let band = spawn_band(
        &square_outline(),
        Some(Affine2::IDENTITY),
        Rect::new(0.0, 0.0, 100.0, 100.0),
        12,
        0.3,
    );

    assert!(!band.synthetic);
    assert_eq!(band.points.len(), 4);
    assert!(band.points.iter().all(|point| point.y.abs() < 1e-3));
}

#[test]
fn samples_are_mapped_to_surface_space() {
    let transform = local_to_surface(
        Affine2::from_translation(Vec2::new(500.0, -500.0)),
        Vec2::splat(100.0),
    );
    let samples = sample_outline(&square_outline(), Some(transform), 12);

    assert!(samples.iter().all(|point| glyph_bounds().inflate(1e-3).contains(*point)));
    assert!((samples[0].y - 450.0).abs() < 1e-3);
}

#[test]
fn empty_outline_falls_back_to_synthetic_band() {
    let band = spawn_band(
        &GlyphOutline::default(),
        Some(Affine2::IDENTITY),
        glyph_bounds(),
        12,
        0.3,
    );

    assert!(band.synthetic);
    assert_eq!(band.points.len(), 7);
}

#[test]
fn missing_transform_falls_back_to_synthetic_band() {
    assert!(sample_outline(&square_outline(), None, 12).is_empty());

    let band = spawn_band(&square_outline(), None, glyph_bounds(), 12, 0.3);
    assert!(band.synthetic);
    assert!(!band.points.is_empty());
}

#[test]
fn collapsed_transform_yields_no_samples() {
    let flat = Affine2::from_scale(Vec2::new(1.0, 0.0));
    assert!(sample_outline(&square_outline(), Some(flat), 12).is_empty());
}

#[test]
fn fallback_band_straddles_the_center_near_the_top() {
    let points = fallback_band(glyph_bounds());

    let expected_x = [464.0, 476.0, 488.0, 500.0, 512.0, 524.0, 536.0];
    let expected_y = [471.0, 469.0, 467.0, 465.0, 467.0, 469.0, 471.0];
    for ((point, x), y) in points.iter().zip(expected_x).zip(expected_y) {
        assert!((point.x - x).abs() < 1e-3, "x {} != {x}", point.x);
        assert!((point.y - y).abs() < 1e-3, "y {} != {y}", point.y);
    }
}

#[test]
fn fallback_band_for_an_empty_rect_is_still_seven_points() {
    let points = fallback_band(Rect::from_corners(Vec2::splat(10.0), Vec2::splat(10.0)));
    assert_eq!(points.len(), 7);
    assert!(points.iter().all(|point| point.is_finite()));
}
