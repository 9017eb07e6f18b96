use image::{RgbaImage, imageops::FilterType};

use crate::{
    art::mask::Mask,
    foundation::{
        core::{PixelRect, PixelSize},
        error::{AzothError, AzothResult},
    },
    palette::PaletteMode,
};

/// Padding added around the foreground box, as a fraction of its larger side.
const BOX_PADDING: f64 = 0.1;

/// Where and how art should land inside its target box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtractParams {
    pub target: PixelSize,
    /// Fraction of the target width kept clear on every side.
    pub padding_ratio: f64,
    pub mode: PaletteMode,
}

/// A processed art layer ready to paste.
#[derive(Clone, Debug)]
pub struct ExtractedArt {
    pub layer: RgbaImage,
    /// Region of the source that was kept; replay it for sibling frames.
    /// Square unless the source was too small to hold the padded foreground.
    pub crop: PixelRect,
    /// Offset of `layer` inside the target box.
    pub offset: (u32, u32),
}

/// Foreground pixels: any coverage in dark mode, anything but pure white in light mode.
pub fn foreground_mask(img: &RgbaImage, mode: PaletteMode) -> Mask {
    match mode {
        PaletteMode::Dark => Mask::from_image(img, |p| p[3] > 0),
        PaletteMode::Light => Mask::from_image(img, |p| p[0] < 255 || p[1] < 255 || p[2] < 255),
    }
}

/// Largest centered square of `source`.
pub fn center_square(source: PixelSize) -> PixelRect {
    let side = source.width.min(source.height);
    PixelRect::new(
        (source.width - side) / 2,
        (source.height - side) / 2,
        side,
        side,
    )
}

/// Pads `fg` by 10% of its larger side, then squares it up inside `source`.
///
/// A side clamped by an edge is re-expanded from the opposite edge. When the
/// source is too small along one axis that axis spans the whole source and the
/// crop stays non-square; [`extract_with_crop`] pads it back to a square.
pub fn square_crop(fg: PixelRect, source: PixelSize) -> PixelRect {
    let pad = (f64::from(fg.width.max(fg.height)) * BOX_PADDING) as u32;
    let x0 = fg.x.saturating_sub(pad);
    let y0 = fg.y.saturating_sub(pad);
    let x1 = (fg.right() + pad).min(source.width);
    let y1 = (fg.bottom() + pad).min(source.height);

    let size = (x1 - x0).max(y1 - y0);
    let half = size / 2;

    let span = |lo: u32, hi: u32, limit: u32| -> (u32, u32) {
        let center = (lo + hi) / 2;
        let start = center.saturating_sub(half);
        let end = (start + size).min(limit);
        let start = if end - start < size {
            end.saturating_sub(size)
        } else {
            start
        };
        (start, end)
    };
    let (sx0, sx1) = span(x0, x1, source.width);
    let (sy0, sy1) = span(y0, y1, source.height);
    PixelRect::new(sx0, sy0, sx1 - sx0, sy1 - sy0)
}

/// Aspect-preserving size of `src` inside `target` minus padding on every side.
pub fn fit_size(src: PixelSize, target: PixelSize, padding_ratio: f64) -> PixelSize {
    let pad = (f64::from(target.width) * padding_ratio).round() as u32;
    let inner_w = target.width.saturating_sub(2 * pad).max(1);
    let inner_h = target.height.saturating_sub(2 * pad).max(1);
    let aspect = f64::from(src.width.max(1)) / f64::from(src.height.max(1));
    let (w, h) = if f64::from(inner_w) / f64::from(inner_h) > aspect {
        ((f64::from(inner_h) * aspect).round(), f64::from(inner_h))
    } else {
        (f64::from(inner_w), (f64::from(inner_w) / aspect).round())
    };
    PixelSize::new((w as u32).clamp(1, inner_w), (h as u32).clamp(1, inner_h))
}

/// Crops `img` to `crop` and fits it into the target box.
pub fn extract_with_crop(
    img: &RgbaImage,
    crop: PixelRect,
    params: &ExtractParams,
) -> AzothResult<ExtractedArt> {
    if params.target.is_empty() {
        return Err(AzothError::validation("art target box must be non-empty"));
    }
    if !crop_fits(crop, img) {
        return Err(AzothError::validation("crop rectangle lies outside the source"));
    }
    let cropped = image::imageops::crop_imm(img, crop.x, crop.y, crop.width, crop.height).to_image();
    let squared = pad_to_square(cropped);
    let side = PixelSize::new(squared.width(), squared.height());
    let fitted = fit_size(side, params.target, params.padding_ratio);
    let layer = if fitted == side {
        squared
    } else {
        image::imageops::resize(&squared, fitted.width, fitted.height, FilterType::Lanczos3)
    };
    let offset = (
        (params.target.width - fitted.width) / 2,
        (params.target.height - fitted.height) / 2,
    );
    Ok(ExtractedArt {
        layer,
        crop,
        offset,
    })
}

/// Finds the foreground, crops a padded square around it and fits it into the target box.
pub fn extract(img: &RgbaImage, params: &ExtractParams) -> AzothResult<ExtractedArt> {
    let source = PixelSize::new(img.width(), img.height());
    if source.is_empty() {
        return Err(AzothError::validation("art source is empty"));
    }
    let crop = match foreground_mask(img, params.mode).bounds() {
        Some(fg) => square_crop(fg, source),
        None => {
            tracing::debug!("no foreground pixels, using center square");
            center_square(source)
        }
    };
    tracing::debug!(?crop, target = ?params.target, "art crop");
    extract_with_crop(img, crop, params)
}

/// Centres `img` on a transparent square canvas.
fn pad_to_square(img: RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == h {
        return img;
    }
    let side = w.max(h);
    let mut out = RgbaImage::new(side, side);
    image::imageops::replace(&mut out, &img, i64::from((side - w) / 2), i64::from((side - h) / 2));
    out
}

fn crop_fits(crop: PixelRect, img: &RgbaImage) -> bool {
    crop.width > 0
        && crop.height > 0
        && crop.right() <= img.width()
        && crop.bottom() <= img.height()
}

#[cfg(test)]
#[path = "../../tests/unit/art/extract.rs"]
mod tests;
