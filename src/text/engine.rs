//! Parley shaping plus `vello_cpu` glyph filling, with faux-bold passes.

use std::{borrow::Cow, collections::HashMap};

use smallvec::SmallVec;

use crate::{
    assets::fonts::FontAsset,
    foundation::{
        core::{Affine, PixelSize, Rgba8},
        error::{AzothError, AzothResult},
    },
    render::cpu,
    text::{
        layout::ParagraphFit,
        measure::{LineMetrics, REFERENCE_CAPS, TextMeasure, check_size},
    },
};

/// Horizontal anchor of a line relative to its x coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn shift(self, width: f64) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => -width / 2.0,
            Self::Right => -width,
        }
    }
}

/// Faux-bold strength. Heavier weights redraw the text at more offsets
/// before the final centred pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Weight {
    #[default]
    Regular,
    /// ±1 horizontal and vertical.
    Semibold,
    /// Adds the four diagonals.
    Bold,
    /// Adds ±2 horizontal and vertical.
    Heavy,
}

const AXIAL: [(f64, f64); 4] = [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)];
const DIAGONAL: [(f64, f64); 4] = [(1.0, 1.0), (-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0)];
const WIDE: [(f64, f64); 4] = [(2.0, 0.0), (-2.0, 0.0), (0.0, 2.0), (0.0, -2.0)];

impl Weight {
    /// Draw offsets in pixels, centre last. The unit grows with size
    /// (1% of the font size, at least one pixel).
    pub fn offsets(self, size: f32) -> SmallVec<[(f64, f64); 13]> {
        let unit = (f64::from(size) * 0.01).round().max(1.0);
        let rings: &[[(f64, f64); 4]] = match self {
            Self::Regular => &[],
            Self::Semibold => &[AXIAL],
            Self::Bold => &[AXIAL, DIAGONAL],
            Self::Heavy => &[AXIAL, DIAGONAL, WIDE],
        };
        let mut out: SmallVec<[(f64, f64); 13]> = rings
            .iter()
            .flatten()
            .map(|&(dx, dy)| (dx * unit, dy * unit))
            .collect();
        out.push((0.0, 0.0));
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Rgba8,
    pub align: TextAlign,
    pub weight: Weight,
}

impl TextStyle {
    pub fn new(size: f32, color: Rgba8) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Left,
            weight: Weight::Regular,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    pub fn sized(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

/// Shapes text with one registered font and fills it into `vello_cpu` contexts.
///
/// Not shared between threads; each render worker builds its own.
pub struct FontTextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
    font: vello_cpu::peniko::FontData,
    caps: HashMap<u32, f32>,
}

impl FontTextEngine {
    pub fn new(font: &FontAsset) -> AzothResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            AzothError::validation(format!(
                "no font families in '{}'",
                font.path.display()
            ))
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| AzothError::validation("registered font family has no name"))?
            .to_string();
        tracing::debug!(%family, path = %font.path.display(), "registered font");

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font: font.cpu_font(),
            caps: HashMap::new(),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn layout(&mut self, text: &str, size: f32) -> AzothResult<parley::Layout<()>> {
        check_size(size)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    fn line_width(layout: &parley::Layout<()>) -> f32 {
        layout
            .lines()
            .map(|l| l.metrics().advance)
            .fold(0.0, f32::max)
    }

    fn fill_layout(&self, ctx: &mut vello_cpu::RenderContext, layout: &parley::Layout<()>) {
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Draws one line. `frame` maps the anchor point on the baseline to the
    /// origin; alignment shifts along the frame's x axis. Returns the advance.
    pub fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        style: &TextStyle,
        frame: Affine,
    ) -> AzothResult<f32> {
        if text.trim().is_empty() {
            return Ok(0.0);
        }
        let layout = self.layout(text, style.size)?;
        let Some(first) = layout.lines().next() else {
            return Ok(0.0);
        };
        let baseline = f64::from(first.metrics().baseline);
        let width = Self::line_width(&layout);
        let origin =
            frame * Affine::translate((style.align.shift(f64::from(width)), -baseline));

        ctx.set_paint(style.color.to_cpu_color());
        for (dx, dy) in style.weight.offsets(style.size) {
            ctx.set_transform(cpu::affine_to_cpu(origin * Affine::translate((dx, dy))));
            self.fill_layout(ctx, &layout);
        }
        Ok(width)
    }

    /// Draws a fitted paragraph with its block centred vertically on `center_y`.
    /// Each line is aligned against `x` per `style.align`.
    pub fn draw_paragraph(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        fit: &ParagraphFit,
        style: &TextStyle,
        x: f64,
        center_y: f64,
    ) -> AzothResult<()> {
        let style = style.sized(fit.size);
        let ascent = f64::from(self.metrics(fit.size)?.ascent);
        let pitch = f64::from(fit.pitch());
        let top = center_y - f64::from(fit.height()) / 2.0;
        for (i, line) in fit.lines.iter().enumerate() {
            let baseline = top + i as f64 * pitch + ascent;
            self.draw_line(ctx, line, &style, Affine::translate((x, baseline)))?;
        }
        Ok(())
    }

    /// Measures the cap height by rasterizing the reference string and
    /// finding its topmost covered row.
    fn raster_cap_height(&mut self, size: f32) -> AzothResult<f32> {
        let layout = self.layout(REFERENCE_CAPS, size)?;
        let Some(first) = layout.lines().next() else {
            return Err(AzothError::validation("reference string produced no lines"));
        };
        let m = first.metrics();
        let pad = 2.0;
        let w = (Self::line_width(&layout) + 2.0 * pad).ceil().max(1.0) as u32;
        let h = (m.ascent + m.descent + m.leading + 2.0 * pad).ceil().max(1.0) as u32;
        let size_px = PixelSize::new(w, h);

        let mut ctx = cpu::context(size_px)?;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(pad),
            f64::from(pad),
        )));
        self.fill_layout(&mut ctx, &layout);
        let pixmap = cpu::finish(&mut ctx, size_px)?;

        let row_bytes = w as usize * 4;
        let top = pixmap
            .data_as_u8_slice()
            .chunks_exact(row_bytes)
            .position(|row| row.chunks_exact(4).any(|px| px[3] > 0));
        let baseline_y = pad + m.baseline;
        Ok(match top {
            Some(row) => (baseline_y - row as f32).max(0.0),
            None => m.ascent,
        })
    }
}

impl TextMeasure for FontTextEngine {
    fn advance(&mut self, text: &str, size: f32) -> AzothResult<f32> {
        if text.is_empty() {
            check_size(size)?;
            return Ok(0.0);
        }
        let layout = self.layout(text, size)?;
        Ok(Self::line_width(&layout))
    }

    fn metrics(&mut self, size: f32) -> AzothResult<LineMetrics> {
        let layout = self.layout(REFERENCE_CAPS, size)?;
        layout
            .lines()
            .next()
            .map(|l| {
                let m = l.metrics();
                LineMetrics {
                    ascent: m.ascent,
                    descent: m.descent,
                    leading: m.leading,
                }
            })
            .ok_or_else(|| AzothError::validation("reference string produced no lines"))
    }

    fn cap_height(&mut self, size: f32) -> AzothResult<f32> {
        if let Some(&h) = self.caps.get(&size.to_bits()) {
            return Ok(h);
        }
        let h = self.raster_cap_height(size)?;
        self.caps.insert(size.to_bits(), h);
        Ok(h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
