use bevy::prelude::*;
use bevy_teardrops::palette::*;

const BASE: Rgb = Rgb::new(0x4a, 0x90, 0xe2);

#[test]
fn palette_is_deterministic() {
    assert_eq!(Palette::from_base(BASE), Palette::from_base(BASE));
}

#[test]
fn palette_tones_for_known_base() {
    let palette = Palette::from_base(BASE);

    assert_eq!(palette.highlight.rgb, Rgb::new(174, 205, 242));
    assert_eq!(palette.mid.rgb, Rgb::new(119, 172, 233));
    assert_eq!(palette.shadow.rgb, Rgb::new(48, 94, 147));
    assert_eq!(palette.glow.rgb, Rgb::new(201, 222, 246));

    assert_eq!(palette.highlight.alpha, 0.95);
    assert_eq!(palette.mid.alpha, 0.85);
    assert_eq!(palette.shadow.alpha, 0.9);
    assert_eq!(palette.glow.alpha, 0.35);
}

#[test]
fn soft_tones_share_rgb_at_half_opacity() {
    let palette = Palette::from_base(BASE);

    assert_eq!(palette.highlight_soft.rgb, palette.highlight.rgb);
    assert_eq!(palette.shadow_soft.rgb, palette.shadow.rgb);
    assert_eq!(palette.highlight_soft.alpha, 0.5);
    assert_eq!(palette.shadow_soft.alpha, 0.5);
}

#[test]
fn tones_display_as_css_rgba() {
    let palette = Palette::from_base(BASE);
    assert_eq!(palette.highlight.to_string(), "rgba(174, 205, 242, 0.95)");
    assert_eq!(palette.shadow_soft.to_string(), "rgba(48, 94, 147, 0.5)");
}

#[test]
fn every_alpha_stays_in_unit_range() {
    for base in [Rgb::BLACK, Rgb::WHITE, BASE, Rgb::new(255, 0, 128)] {
        for tone in Palette::from_base(base).tones() {
            assert!((0.0..=1.0).contains(&tone.alpha), "{tone}");
        }
    }
}

#[test]
fn mix_endpoints() {
    assert_eq!(BASE.mix(Rgb::WHITE, 0.0), BASE);
    assert_eq!(BASE.mix(Rgb::WHITE, 1.0), Rgb::WHITE);
    assert_eq!(BASE.mix(Rgb::BLACK, 1.0), Rgb::BLACK);
}

#[test]
fn mix_clamps_out_of_range_ratios() {
    assert_eq!(Rgb::new(200, 10, 128).mix(Rgb::WHITE, 2.0), Rgb::new(255, 255, 255));
    assert_eq!(Rgb::new(200, 10, 128).mix(Rgb::WHITE, -1.0), Rgb::new(145, 0, 1));
    assert_eq!(Rgb::BLACK.mix(Rgb::WHITE, -1.0), Rgb::BLACK);
}

#[test]
fn hex_forms() {
    assert_eq!(Rgb::from_hex("#4a90e2").unwrap(), BASE);
    assert_eq!(Rgb::from_hex("4a90e2").unwrap(), BASE);
    assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::WHITE);
}

#[test]
fn invalid_hex_is_rejected() {
    assert!(Rgb::from_hex("#zz0000").is_err());
    assert!(Rgb::from_hex("#12345").is_err());
}

#[test]
fn converts_into_bevy_color() {
    assert_eq!(Color::from(BASE), Color::srgb_u8(0x4a, 0x90, 0xe2));

    let tone = BASE.with_alpha(0.5);
    let color = Color::from(tone).to_srgba();
    assert!((color.alpha - 128.0 / 255.0).abs() < 1e-6);
}

#[test]
fn with_alpha_clamps() {
    assert_eq!(BASE.with_alpha(2.0).alpha, 1.0);
    assert_eq!(BASE.with_alpha(-1.0).alpha, 0.0);
}
