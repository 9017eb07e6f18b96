use super::*;

const DARK: Rgba8 = Rgba8::opaque(12, 12, 12);
const LIGHT: Rgba8 = Rgba8::opaque(225, 225, 225);

fn thresholds(black: u8, white: u8) -> Thresholds {
    Thresholds {
        black,
        white,
        polarity_floor: 0,
        ..Thresholds::default()
    }
}

fn gradient() -> RgbaImage {
    RgbaImage::from_fn(64, 64, |x, y| {
        let v = ((x * 4) % 256) as u8;
        let a = ((y * 4) % 256) as u8;
        Rgba([v, v.wrapping_add(3), v.saturating_sub(2), a])
    })
}

#[test]
fn output_is_tone_or_untouched() {
    for (black, white) in [(25, 25), (14, 100), (100, 14)] {
        let t = thresholds(black, white);
        let src = gradient();
        let mut out = src.clone();
        remap_tones(&mut out, (DARK, LIGHT), &t);

        let allowed = [
            DARK.to_image(),
            LIGHT.to_image(),
            DARK.with_alpha(0).to_image(),
            LIGHT.with_alpha(0).to_image(),
        ];
        let hi = 255 - white;
        for (o, s) in out.pixels().zip(src.pixels()) {
            let near_black = s[0] <= black && s[1] <= black && s[2] <= black;
            let near_white = s[0] >= hi && s[1] >= hi && s[2] >= hi;
            if near_black || near_white {
                assert!(allowed.contains(o), "{s:?} -> {o:?} was not remapped");
            } else {
                assert_eq!(o, s);
            }
        }
    }
}

#[test]
fn faint_fringes_become_transparent_tones() {
    let t = thresholds(25, 25);
    let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 10]));
    img.put_pixel(1, 0, Rgba([255, 255, 255, 10]));
    remap_tones(&mut img, (DARK, LIGHT), &t);
    assert_eq!(*img.get_pixel(0, 0), DARK.with_alpha(0).to_image());
    assert_eq!(*img.get_pixel(1, 0), LIGHT.with_alpha(0).to_image());
}

#[test]
fn mid_tones_pass_through() {
    let t = thresholds(25, 25);
    let px = Rgba([120, 30, 200, 255]);
    let mut img = RgbaImage::from_pixel(1, 1, px);
    remap_tones(&mut img, (DARK, LIGHT), &t);
    assert_eq!(*img.get_pixel(0, 0), px);
}

#[test]
fn polarity_counts_black_and_white() {
    let t = thresholds(25, 25);
    let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
    assert_eq!(dominant_polarity(&img, &t), Some(Polarity::Black));
    for x in 0..10 {
        for y in 0..6 {
            img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }
    assert_eq!(dominant_polarity(&img, &t), Some(Polarity::White));
}

#[test]
fn polarity_floor_keeps_small_images_as_is() {
    let t = Thresholds::default();
    let mut img = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
    assert_eq!(dominant_polarity(&img, &t), None);
    assert!(!correct_polarity(&mut img, PaletteMode::Dark, &t));
    assert_eq!(*img.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
}

#[test]
fn mismatched_polarity_is_inverted() {
    let t = thresholds(25, 25);
    let mut img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
    img.put_pixel(0, 0, Rgba([5, 5, 5, 200]));
    assert!(correct_polarity(&mut img, PaletteMode::Dark, &t));
    assert_eq!(*img.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
    assert_eq!(*img.get_pixel(0, 0), Rgba([255, 255, 255, 200]));

    let mut again = img.clone();
    assert!(!correct_polarity(&mut again, PaletteMode::Dark, &t));
    assert_eq!(again, img);
}

#[test]
fn invert_leaves_colours_alone() {
    let mut img = RgbaImage::from_pixel(1, 1, Rgba([200, 40, 40, 255]));
    invert_black_white(&mut img, 100);
    assert_eq!(*img.get_pixel(0, 0), Rgba([200, 40, 40, 255]));
}
