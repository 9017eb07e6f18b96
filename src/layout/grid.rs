use image::{RgbaImage, imageops::FilterType};

use crate::{
    art::extract::fit_size,
    foundation::{
        core::PixelSize,
        error::{AzothError, AzothResult},
    },
    layout::cache::RenderCache,
    model::{CardRecord, Renderable},
    render::compositor::CardCompositor,
};

/// Grid composite parameters, in output pixels before any downscale.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Width over height the whole grid should approach.
    pub target_aspect: f64,
    /// Gap between neighbouring cards.
    pub spacing: u32,
    /// Margin around the grid.
    pub padding: u32,
    /// Wider grids are scaled down to exactly this width.
    pub max_width: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            target_aspect: 16.0 / 9.0,
            spacing: 20,
            padding: 50,
            max_width: 1920,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridChoice {
    pub cols: u32,
    pub rows: u32,
    /// `cols·card_width / rows·card_height`.
    pub aspect: f64,
}

/// Column count whose aggregate aspect is closest to `target`. Ties keep
/// the fewer columns. `None` for an empty grid.
pub fn choose_grid(n: usize, cell: PixelSize, target: f64) -> Option<GridChoice> {
    let n = u32::try_from(n).ok().filter(|&n| n > 0)?;
    let cell_aspect = f64::from(cell.width.max(1)) / f64::from(cell.height.max(1));
    let mut best: Option<GridChoice> = None;
    for cols in 1..=n {
        let rows = n.div_ceil(cols);
        let aspect = f64::from(cols) * cell_aspect / f64::from(rows);
        let better = best.is_none_or(|b| (aspect - target).abs() < (b.aspect - target).abs());
        if better {
            best = Some(GridChoice { cols, rows, aspect });
        }
    }
    best
}

/// Tiles `cards` in reading order. Every cell takes the first card's size;
/// other sizes are fitted and centred inside their cell.
pub fn compose_grid(cards: &[RgbaImage], spec: &GridSpec) -> AzothResult<RgbaImage> {
    let first = cards
        .first()
        .ok_or_else(|| AzothError::validation("grid needs at least one card"))?;
    let cell = PixelSize::new(first.width(), first.height());
    let choice = choose_grid(cards.len(), cell, spec.target_aspect)
        .ok_or_else(|| AzothError::validation("grid needs at least one card"))?;

    let (cw, ch) = (f64::from(cell.width), f64::from(cell.height));
    let (spacing, padding) = (f64::from(spec.spacing), f64::from(spec.padding));
    let total_w = f64::from(choice.cols) * cw + f64::from(choice.cols - 1) * spacing + 2.0 * padding;
    let total_h = f64::from(choice.rows) * ch + f64::from(choice.rows - 1) * spacing + 2.0 * padding;
    let (scale, out_w) = if total_w > f64::from(spec.max_width) {
        (f64::from(spec.max_width) / total_w, spec.max_width)
    } else {
        (1.0, total_w as u32)
    };
    let out_h = (total_h * scale).round().max(1.0) as u32;
    let scaled_cell = PixelSize::new(
        (cw * scale).round().max(1.0) as u32,
        (ch * scale).round().max(1.0) as u32,
    );
    tracing::debug!(
        cols = choice.cols,
        rows = choice.rows,
        aspect = choice.aspect,
        width = out_w,
        height = out_h,
        "chose grid"
    );

    let mut canvas = RgbaImage::new(out_w, out_h);
    for (i, card) in cards.iter().enumerate() {
        let (row, col) = (i as u32 / choice.cols, i as u32 % choice.cols);
        let x = (padding + f64::from(col) * (cw + spacing)) * scale;
        let y = (padding + f64::from(row) * (ch + spacing)) * scale;
        let fitted = fit_size(
            PixelSize::new(card.width(), card.height()),
            scaled_cell,
            0.0,
        );
        let dx = i64::from((scaled_cell.width - fitted.width) / 2);
        let dy = i64::from((scaled_cell.height - fitted.height) / 2);
        let resized = if (card.width(), card.height()) == (fitted.width, fitted.height) {
            card.clone()
        } else {
            image::imageops::resize(card, fitted.width, fitted.height, FilterType::Lanczos3)
        };
        image::imageops::overlay(
            &mut canvas,
            &resized,
            x.round() as i64 + dx,
            y.round() as i64 + dy,
        );
    }
    Ok(canvas)
}

/// A tiled deck plus the records that could not be included.
#[derive(Clone, Debug)]
pub struct GridLayout {
    pub image: RgbaImage,
    /// Indices into the input records, in input order.
    pub skipped: Vec<usize>,
}

/// Loads or renders every record, then tiles the images. Cards that fail
/// to load are left out, logged and listed in [`GridLayout::skipped`].
#[tracing::instrument(skip_all, fields(cards = records.len()))]
pub fn render_grid(
    compositor: &CardCompositor,
    cache: &RenderCache,
    records: &[CardRecord],
    spec: &GridSpec,
) -> AzothResult<GridLayout> {
    let refs: Vec<&CardRecord> = records.iter().collect();
    let mut images = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    for (i, (res, record)) in cache
        .load_or_render(compositor, &refs)
        .into_iter()
        .zip(records)
        .enumerate()
    {
        match res {
            Ok(img) => images.push(img),
            Err(e) => {
                tracing::warn!(card = %record.name(), error = %e, "skipping card");
                skipped.push(i);
            }
        }
    }
    if images.is_empty() {
        return Err(AzothError::validation("no card images could be loaded"));
    }
    let image = compose_grid(&images, spec)?;
    Ok(GridLayout { image, skipped })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
