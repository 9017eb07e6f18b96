//! Card furniture shared by every layout: background, border, badge and side labels.

use image::{RgbaImage, imageops::FilterType};

use crate::{
    art::{extract::fit_size, mask::Mask},
    config::{REFERENCE_WIDTH, RenderConfig},
    foundation::{
        core::{Affine, PixelSize, Point, Rect},
        error::AzothResult,
    },
    palette::ResolvedPalette,
    render::cpu,
    text::{
        engine::{FontTextEngine, TextAlign, TextStyle, Weight},
        measure::TextMeasure,
    },
};

/// Pixel geometry of one canvas, scaled from the 2448px reference layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardGeometry {
    pub size: PixelSize,
    /// Short side over the reference width.
    pub scale: f64,
    pub margin: f64,
    pub border: f64,
    pub px_per_mm: f64,
}

impl CardGeometry {
    pub fn new(cfg: &RenderConfig, size: PixelSize) -> Self {
        let short = f64::from(size.width.min(size.height));
        Self {
            size,
            scale: short / REFERENCE_WIDTH,
            margin: cfg.margin_px(),
            border: cfg.border_px(),
            px_per_mm: cfg.px_per_mm(),
        }
    }

    pub fn width(&self) -> f64 {
        f64::from(self.size.width)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.size.height)
    }

    pub fn short_side(&self) -> f64 {
        self.width().min(self.height())
    }

    pub fn long_side(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Reference-layout pixels at this canvas size.
    pub fn px(&self, reference: f64) -> f64 {
        reference * self.scale
    }

    pub fn corner_radius(&self) -> f64 {
        (self.short_side() * 0.05).round()
    }

    /// Outer edge of the border stroke.
    pub fn card_rect(&self) -> Rect {
        Rect::new(
            self.margin,
            self.margin,
            self.width() - self.margin,
            self.height() - self.margin,
        )
    }

    /// Inset keeping art clear of the border.
    pub fn image_margin(&self) -> f64 {
        self.margin + 2.0 * (self.px_per_mm * 0.5).round()
    }

    /// Usable text width inside `fraction` of the canvas width.
    pub fn text_width(&self, fraction: f64) -> f64 {
        (self.width() * fraction - 2.0 * self.margin - 4.0 * self.border - 6.0 * self.px_per_mm)
            .max(1.0)
    }

    pub fn badge_radius(&self) -> f64 {
        (self.short_side() * 0.064).round()
    }

    /// Badge straddles the top border stroke.
    pub fn badge_center(&self) -> Point {
        Point::new(self.width() / 2.0, self.margin + self.border / 2.0)
    }
}

/// Region the background tone fills.
pub(crate) fn background_mask(geo: &CardGeometry, transparent_outside: bool) -> AzothResult<Mask> {
    if !transparent_outside {
        return Ok(Mask::filled(geo.size));
    }
    let inset = (geo.border / 2.0).floor();
    Mask::rounded_rect(geo.size, geo.card_rect().inset(-inset), geo.corner_radius())
}

/// Border stroke drawn inside the card rectangle.
pub(crate) fn border_ring(geo: &CardGeometry) -> AzothResult<Mask> {
    let outer = Mask::rounded_rect(geo.size, geo.card_rect(), geo.corner_radius())?;
    let inner = Mask::rounded_rect(
        geo.size,
        geo.card_rect().inset(-geo.border),
        (geo.corner_radius() - geo.border).max(0.0),
    )?;
    outer.multiply(&inner.invert())
}

/// Lanczos resize of `img` to fit a `side`-pixel square.
pub(crate) fn fit_icon(img: &RgbaImage, side: f64) -> RgbaImage {
    let side = side.round().max(1.0) as u32;
    let fitted = fit_size(
        PixelSize::new(img.width(), img.height()),
        PixelSize::new(side, side),
        0.0,
    );
    if fitted == PixelSize::new(img.width(), img.height()) {
        return img.clone();
    }
    image::imageops::resize(img, fitted.width, fitted.height, FilterType::Lanczos3)
}

/// Icon (or accent disc) with the numeric value centred on top.
pub(crate) fn draw_badge(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut FontTextEngine,
    geo: &CardGeometry,
    icon: Option<&RgbaImage>,
    value: i32,
    palette: &ResolvedPalette,
) -> AzothResult<()> {
    let center = geo.badge_center();
    let radius = geo.badge_radius();
    match icon {
        Some(img) => {
            let icon = fit_icon(img, radius * 2.5);
            let origin = (
                (center.x - f64::from(icon.width()) / 2.0).round(),
                (center.y - f64::from(icon.height()) / 2.0).round(),
            );
            cpu::draw_image(ctx, &icon, Affine::translate(origin))?;
        }
        None => {
            tracing::warn!("badge icon missing, drawing accent disc");
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(palette.accent.to_cpu_color());
            ctx.fill_path(&cpu::circle_path(center, radius));
        }
    }

    let size = (geo.short_side() / 16.0).round() as f32;
    let cap = f64::from(engine.cap_height(size)?);
    let style = TextStyle::new(size, palette.tones.badge_text)
        .align(TextAlign::Center)
        .weight(Weight::Semibold);
    engine.draw_line(
        ctx,
        &value.to_string(),
        &style,
        Affine::translate((center.x, center.y + cap / 2.0)),
    )?;
    Ok(())
}

/// Rotated label: a small icon followed by text, reading bottom-to-top.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SideLabel<'a> {
    pub icon: Option<&'a RgbaImage>,
    pub text: &'a str,
    pub style: TextStyle,
    /// Screen column the rotated baseline runs along.
    pub baseline_x: f64,
    /// Where the label starts; it grows upward from here.
    pub bottom_y: f64,
    pub spacing: f64,
}

pub(crate) fn draw_side_label(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut FontTextEngine,
    label: &SideLabel<'_>,
) -> AzothResult<()> {
    let frame = Affine::translate((label.baseline_x, label.bottom_y))
        * Affine::rotate(-std::f64::consts::FRAC_PI_2);
    let cap = f64::from(engine.cap_height(label.style.size)?);
    let mut cursor = 0.0;
    if let Some(img) = label.icon {
        let icon = fit_icon(img, cap * 1.4);
        // centre the icon on the cap band
        let lift = (f64::from(icon.height()) + cap) / 2.0;
        cpu::draw_image(ctx, &icon, frame * Affine::translate((0.0, -lift)))?;
        cursor = f64::from(icon.width()) + label.spacing;
    }
    let style = label.style.align(TextAlign::Left);
    engine.draw_line(ctx, label.text, &style, frame * Affine::translate((cursor, 0.0)))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/decor.rs"]
mod tests;
