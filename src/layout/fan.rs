use image::{RgbaImage, imageops::FilterType};

use crate::{
    foundation::{
        core::{Affine, PixelSize, Point, Rect},
        error::{AzothError, AzothResult},
        rng::Rng64,
    },
    layout::cache::RenderCache,
    model::CardRecord,
    render::{compositor::CardCompositor, cpu, surface::Surface},
};

/// Fan ("hand") composite parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FanSpec {
    /// Angle between the outermost cards, in degrees.
    pub spread_deg: f64,
    pub hand_size: usize,
    /// Arc radius per card, in card widths.
    pub radius_factor: f64,
    /// Margin around the fan before scaling.
    pub padding: f64,
    /// Exact width of the output.
    pub out_width: u32,
}

impl Default for FanSpec {
    fn default() -> Self {
        Self {
            spread_deg: 30.0,
            hand_size: 6,
            radius_factor: 6.0 / 5.0,
            padding: 350.0,
            out_width: 1920,
        }
    }
}

/// One card position on the arc, in unscaled pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanSlot {
    pub center: Point,
    /// Counter-clockwise tilt in radians. Slot 0 sits right-most, tilted clockwise.
    pub angle: f64,
}

impl FanSlot {
    /// Maps card-local pixels to fan space.
    pub fn transform(&self, card: PixelSize) -> Affine {
        Affine::translate(self.center.to_vec2())
            * Affine::rotate(-self.angle)
            * Affine::translate((-f64::from(card.width) / 2.0, -f64::from(card.height) / 2.0))
    }
}

#[derive(Clone, Debug)]
pub struct FanLayout {
    pub image: RgbaImage,
    /// Pool indices of the drawn cards, in slot order.
    pub chosen: Vec<usize>,
}

/// Evenly spaced slots on a circular arc. A single card stands upright.
pub fn fan_slots(n: usize, card: PixelSize, spec: &FanSpec) -> Vec<FanSlot> {
    let (cw, ch) = (f64::from(card.width), f64::from(card.height));
    let radius = cw * spec.radius_factor * n as f64;
    let (start, step) = if n > 1 {
        (-spec.spread_deg / 2.0, spec.spread_deg / (n - 1) as f64)
    } else {
        (0.0, 0.0)
    };
    (0..n)
        .map(|i| {
            let angle = (start + i as f64 * step).to_radians();
            FanSlot {
                center: Point::new(
                    -angle.sin() * radius + cw / 2.0,
                    -angle.cos() * radius + ch / 2.0,
                ),
                angle,
            }
        })
        .collect()
}

/// Union of the rotated card outlines, each card at its own size.
pub fn fan_bounds(slots: &[FanSlot], cards: &[PixelSize]) -> Option<Rect> {
    slots
        .iter()
        .zip(cards)
        .map(|(s, &card)| {
            let local = Rect::new(0.0, 0.0, f64::from(card.width), f64::from(card.height));
            s.transform(card).transform_rect_bbox(local)
        })
        .reduce(|a, b| a.union(b))
}

/// Fans `cards` out along the arc, later cards on top, scaled to `spec.out_width`.
/// The arc is sized from the first card; the canvas covers every card.
pub fn compose_fan(cards: &[RgbaImage], spec: &FanSpec) -> AzothResult<RgbaImage> {
    let first = cards
        .first()
        .ok_or_else(|| AzothError::validation("fan needs at least one card"))?;
    let card = PixelSize::new(first.width(), first.height());
    let sizes: Vec<PixelSize> = cards
        .iter()
        .map(|c| PixelSize::new(c.width(), c.height()))
        .collect();
    let slots = fan_slots(cards.len(), card, spec);
    let bounds = fan_bounds(&slots, &sizes)
        .ok_or_else(|| AzothError::validation("fan needs at least one card"))?;

    let full_w = bounds.width() + 2.0 * spec.padding;
    let full_h = bounds.height() + 2.0 * spec.padding;
    let scale = f64::from(spec.out_width) / full_w;
    let out = PixelSize::new(spec.out_width, (full_h * scale).round().max(1.0) as u32);
    tracing::debug!(
        cards = cards.len(),
        scale,
        width = out.width,
        height = out.height,
        "fan canvas"
    );

    let to_canvas = Affine::scale(scale)
        * Affine::translate((spec.padding - bounds.x0, spec.padding - bounds.y0));
    let mut ctx = cpu::context(out)?;
    for ((slot, img), &own) in slots.iter().zip(cards).zip(&sizes) {
        let small_w = (f64::from(own.width) * scale).round().max(1.0) as u32;
        let small_h = (f64::from(own.height) * scale).round().max(1.0) as u32;
        let small = image::imageops::resize(img, small_w, small_h, FilterType::Lanczos3);
        let unscale = Affine::scale_non_uniform(
            f64::from(own.width) / f64::from(small_w),
            f64::from(own.height) / f64::from(small_h),
        );
        cpu::draw_image(&mut ctx, &small, to_canvas * slot.transform(own) * unscale)?;
    }
    let pixmap = cpu::finish(&mut ctx, out)?;
    let mut surface = Surface::new(out);
    surface.composite_pixmap(&pixmap)?;
    surface.to_rgba_image()
}

/// Draws `spec.hand_size` distinct cards from `pool` and fans them out.
#[tracing::instrument(skip_all, fields(pool = pool.len(), hand = spec.hand_size))]
pub fn render_fan(
    compositor: &CardCompositor,
    cache: &RenderCache,
    pool: &[CardRecord],
    spec: &FanSpec,
    rng: &mut Rng64,
) -> AzothResult<FanLayout> {
    if pool.is_empty() || spec.hand_size == 0 {
        return Err(AzothError::validation("fan needs a non-empty pool and hand"));
    }
    let chosen = rng.sample_distinct(pool.len(), spec.hand_size);
    let hand: Vec<&CardRecord> = chosen.iter().map(|&i| &pool[i]).collect();
    let images = cache
        .load_or_render(compositor, &hand)
        .into_iter()
        .collect::<AzothResult<Vec<_>>>()?;
    let image = compose_fan(&images, spec)?;
    Ok(FanLayout { image, chosen })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fan.rs"]
mod tests;
