use image::Rgba;

use super::*;
use crate::{
    foundation::core::{PixelRect, Rgba8},
    palette::{Category, PaletteMode, PaletteSet},
};

fn palette(mode: PaletteMode) -> ResolvedPalette {
    PaletteSet::default().resolve(mode, Category::Anima)
}

fn glyph_on_black(w: u32, h: u32, rect: PixelRect) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let inside = x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom();
        if inside {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

#[test]
fn dark_mode_art_is_cropped_and_toned() {
    let t = Thresholds::default();
    let prep = ArtPreparer::new(&t, 0.0);
    let src = glyph_on_black(100, 100, PixelRect::new(40, 40, 20, 20));
    let art = prep
        .prepare(&src, PixelSize::new(24, 24), &palette(PaletteMode::Dark))
        .unwrap();
    assert!(art.crop.is_square());
    assert_eq!(art.layer.dimensions(), (24, 24));
    let center = *art.layer.get_pixel(12, 12);
    assert_eq!(center, Rgba8::opaque(225, 225, 225).to_image());
}

#[test]
fn frames_share_the_first_crop() {
    let t = Thresholds::default();
    let prep = ArtPreparer::new(&t, 0.1);
    let frames = vec![
        glyph_on_black(80, 80, PixelRect::new(10, 10, 30, 30)),
        glyph_on_black(80, 80, PixelRect::new(50, 50, 10, 10)),
        glyph_on_black(80, 80, PixelRect::new(0, 0, 80, 80)),
    ];
    let out = prep
        .prepare_frames(&frames, PixelSize::new(40, 40), &palette(PaletteMode::Dark))
        .unwrap();
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|a| a.crop == out[0].crop));
    assert!(out.iter().all(|a| a.offset == out[0].offset));
}

#[test]
fn no_frames_is_empty() {
    let t = Thresholds::default();
    let prep = ArtPreparer::new(&t, 0.1);
    let out = prep
        .prepare_frames(&[], PixelSize::new(40, 40), &palette(PaletteMode::Light))
        .unwrap();
    assert!(out.is_empty());
}
