use image::{Rgba, RgbaImage};

use crate::{
    config::Thresholds,
    foundation::core::Rgba8,
    palette::{PaletteMode, Polarity},
};

/// Counts strictly black and pure white opaque pixels.
///
/// Returns `None` when the combined count is at or under the floor; such
/// images are left with whatever polarity they have.
pub fn dominant_polarity(img: &RgbaImage, t: &Thresholds) -> Option<Polarity> {
    let mut black = 0u64;
    let mut white = 0u64;
    for p in img.pixels() {
        if p[3] != 255 {
            continue;
        }
        if p[0] <= t.polarity_black && p[1] <= t.polarity_black && p[2] <= t.polarity_black {
            black += 1;
        } else if p[0] == 255 && p[1] == 255 && p[2] == 255 {
            white += 1;
        }
    }
    if black + white <= t.polarity_floor {
        return None;
    }
    Some(if black > white {
        Polarity::Black
    } else {
        Polarity::White
    })
}

/// Swaps near-black and near-white pixels, keeping alpha.
pub fn invert_black_white(img: &mut RgbaImage, cutoff: u8) {
    let hi = 255 - cutoff;
    for p in img.pixels_mut() {
        let [r, g, b, a] = p.0;
        if r <= cutoff && g <= cutoff && b <= cutoff {
            *p = Rgba([255, 255, 255, a]);
        } else if r >= hi && g >= hi && b >= hi {
            *p = Rgba([0, 0, 0, a]);
        }
    }
}

/// Inverts `img` when its dominant population disagrees with `mode`.
/// Returns whether an inversion happened.
pub fn correct_polarity(img: &mut RgbaImage, mode: PaletteMode, t: &Thresholds) -> bool {
    match dominant_polarity(img, t) {
        Some(p) if p != mode.required_polarity() => {
            tracing::debug!(found = ?p, ?mode, "inverting art polarity");
            invert_black_white(img, t.invert);
            true
        }
        _ => false,
    }
}

/// Snaps near-black pixels to `dark` and near-white pixels to `light`.
///
/// Pixels with alpha under the coverage threshold snap to the fully
/// transparent variant of the same tone. Everything else passes through.
pub fn remap_tones(img: &mut RgbaImage, (dark, light): (Rgba8, Rgba8), t: &Thresholds) {
    let hi = 255 - t.white;
    for p in img.pixels_mut() {
        let [r, g, b, a] = p.0;
        let near_black = r <= t.black && g <= t.black && b <= t.black;
        let near_white = r >= hi && g >= hi && b >= hi;
        let target = if near_white {
            light
        } else if near_black {
            dark
        } else {
            continue;
        };
        let alpha = if a >= t.coverage { target.a } else { 0 };
        *p = target.with_alpha(alpha).to_image();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/art/normalize.rs"]
mod tests;
