//! Single-card rendering: background, art, border, badge, title and body.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use image::RgbaImage;
use rayon::prelude::*;

use crate::{
    art::prepare::ArtPreparer,
    assets::{
        decode::{ArtFrames, load_art},
        fonts::FontAsset,
        icons::IconSet,
    },
    config::RenderConfig,
    foundation::{
        core::{Affine, PixelSize, Rect},
        error::{AzothError, AzothResult},
        rng::Rng64,
    },
    model::{CardRecord, CardShape, FaceLayout, Renderable},
    palette::{Category, ResolvedPalette},
    render::{
        cpu,
        decor::{self, CardGeometry, SideLabel},
        output,
        surface::Surface,
    },
    text::{
        engine::{FontTextEngine, TextAlign, TextStyle, Weight},
        layout::{fit_paragraph, fit_title},
        measure::TextMeasure,
    },
    texture::{
        basis::BasisRegistry,
        synth::{GeneratedTextureParams, TextureSynthesizer},
    },
};

/// Text that did not fit even at its floor size. Never an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LayoutReport {
    pub title_overflow: bool,
    pub body_overflow: bool,
}

impl LayoutReport {
    pub fn any(&self) -> bool {
        self.title_overflow || self.body_overflow
    }

    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            title_overflow: self.title_overflow || other.title_overflow,
            body_overflow: self.body_overflow || other.body_overflow,
        }
    }
}

/// Where a render takes its art from.
#[derive(Clone, Debug, Default)]
pub enum ArtInput {
    /// Paths named in the record. Missing files render without art.
    #[default]
    FromRecord,
    /// Already decoded art, used for every side.
    Frames(Arc<ArtFrames>),
    /// Procedural texture from the registry, seeded per render.
    Synthesized { basis: Option<String>, seed: u64 },
    None,
}

/// In-memory render result.
#[derive(Clone, Debug)]
pub struct CardRaster {
    /// One frame for stills, one per source frame for animated art.
    pub frames: Vec<RgbaImage>,
    pub delays_ms: Vec<u32>,
    pub report: LayoutReport,
    pub texture: Option<GeneratedTextureParams>,
}

impl CardRaster {
    pub fn first(&self) -> Option<&RgbaImage> {
        self.frames.first()
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }
}

/// Files written for one card.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderedCard {
    /// `<out>/<slug>.png`, the first frame.
    pub path: PathBuf,
    /// `<out>/<slug>.gif` when the art was animated.
    pub animation: Option<PathBuf>,
    pub size: PixelSize,
    pub report: LayoutReport,
    pub texture: Option<GeneratedTextureParams>,
}

/// Art resolved for one side of a card.
pub(crate) struct SideArt {
    pub frames: Option<ArtFrames>,
    pub texture: Option<GeneratedTextureParams>,
}

impl SideArt {
    fn none() -> Self {
        Self {
            frames: None,
            texture: None,
        }
    }
}

/// Renders cards with one font, icon set and optional basis registry.
///
/// Shareable across threads; every render builds its own text engine and scratch buffers.
pub struct CardCompositor {
    pub(crate) config: RenderConfig,
    pub(crate) font: FontAsset,
    pub(crate) icons: IconSet,
    pub(crate) registry: Option<Arc<BasisRegistry>>,
}

impl CardCompositor {
    pub fn new(config: RenderConfig, font: FontAsset, icons: IconSet) -> Self {
        Self {
            config,
            font,
            icons,
            registry: None,
        }
    }

    /// Loads the configured font and icons. A missing font is fatal.
    pub fn from_config(config: RenderConfig) -> AzothResult<Self> {
        config.validate()?;
        let font = FontAsset::load(&config.font)?;
        let icons = IconSet::load_dir(&config.icons_dir)?;
        if icons.is_empty() {
            tracing::warn!(dir = %config.icons_dir.display(), "no badge icons found");
        }
        Ok(Self::new(config, font, icons))
    }

    pub fn with_registry(mut self, registry: Arc<BasisRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders `record` with its own art to `<out_dir>/<slug>.png`.
    pub fn render(&self, record: &CardRecord, out_dir: &Path) -> AzothResult<RenderedCard> {
        self.render_with_art(record, &ArtInput::FromRecord, out_dir)
    }

    #[tracing::instrument(skip(self, record, art), fields(card = %record.name()))]
    pub fn render_with_art(
        &self,
        record: &CardRecord,
        art: &ArtInput,
        out_dir: &Path,
    ) -> AzothResult<RenderedCard> {
        let raster = self.render_raster(record, art)?;
        let written = output::write_card(out_dir, &record.slug(), &raster)?;
        tracing::info!(path = %written.path.display(), "rendered card");
        Ok(written)
    }

    /// Renders many records concurrently. Results keep input order.
    pub fn render_batch(
        &self,
        records: &[CardRecord],
        out_dir: &Path,
    ) -> Vec<AzothResult<RenderedCard>> {
        records
            .par_iter()
            .map(|record| self.render(record, out_dir))
            .collect()
    }

    /// Renders without touching the output directory.
    pub fn render_raster(&self, record: &CardRecord, art: &ArtInput) -> AzothResult<CardRaster> {
        record.validate()?;
        let mut rng = match art {
            ArtInput::Synthesized { seed, .. } => Some(Rng64::new(*seed)),
            _ => None,
        };
        match record.shape() {
            CardShape::Single(card) => {
                let side = self.resolve_art(card.art(), card.category(), art, rng.as_mut())?;
                self.render_face(card, side)
            }
            CardShape::TwoSided(ritual) => {
                let challenge = self.resolve_art(
                    ritual.challenge.art.as_deref(),
                    ritual.category,
                    art,
                    rng.as_mut(),
                )?;
                let reward = self.resolve_art(
                    ritual.reward.art.as_deref(),
                    ritual.category,
                    art,
                    rng.as_mut(),
                )?;
                self.render_ritual(ritual, challenge, reward)
            }
        }
    }

    pub(crate) fn resolve_art(
        &self,
        path: Option<&Path>,
        category: Category,
        input: &ArtInput,
        rng: Option<&mut Rng64>,
    ) -> AzothResult<SideArt> {
        match input {
            ArtInput::None => Ok(SideArt::none()),
            ArtInput::Frames(frames) => Ok(SideArt {
                frames: Some(frames.as_ref().clone()),
                texture: None,
            }),
            ArtInput::FromRecord => {
                let Some(path) = path else {
                    return Ok(SideArt::none());
                };
                match load_art(path) {
                    Ok(frames) => Ok(SideArt {
                        frames: Some(frames),
                        texture: None,
                    }),
                    Err(e) if e.is_asset_not_found() => {
                        tracing::warn!(error = %e, "rendering without art");
                        Ok(SideArt::none())
                    }
                    Err(e) => Err(e),
                }
            }
            ArtInput::Synthesized { basis, .. } => {
                let registry = self
                    .registry
                    .as_deref()
                    .ok_or_else(|| AzothError::validation("no basis registry configured"))?;
                let rng = rng.ok_or_else(|| AzothError::validation("synthesis needs a seed"))?;
                let tex = TextureSynthesizer::new(registry, &self.config.palettes)
                    .with_retries(self.config.synth_retries)
                    .synthesize(basis.as_deref(), category, rng)?;
                Ok(SideArt {
                    frames: Some(ArtFrames::still(tex.image)),
                    texture: Some(tex.params),
                })
            }
        }
    }

    pub(crate) fn preparer(&self) -> ArtPreparer<'_> {
        ArtPreparer::new(&self.config.thresholds, self.config.padding_ratio)
    }

    pub(crate) fn text_engine(&self) -> AzothResult<FontTextEngine> {
        FontTextEngine::new(&self.font)
    }

    fn render_face(&self, card: &dyn Renderable, art: SideArt) -> AzothResult<CardRaster> {
        let size = self.config.canvas_size();
        let geo = CardGeometry::new(&self.config, size);
        let palette = self.config.palettes.resolve(card.palette(), card.category());
        let layout = card.face_layout();
        let boxes = FaceBoxes::new(&geo, layout);

        let prepared = match &art.frames {
            Some(frames) => {
                self.preparer()
                    .prepare_frames(&frames.frames, boxes.art_size(), &palette)?
            }
            None => Vec::new(),
        };

        let mut engine = self.text_engine()?;
        let mut ctx = cpu::context(size)?;
        let (report, body_lines) = self.draw_face_text(&mut ctx, &mut engine, card, &palette, &geo, &boxes)?;
        if let (Some(label), Some(first)) = (card.side_label(), prepared.first()) {
            self.draw_fate_label(&mut ctx, &mut engine, &geo, &palette, label, &first.layer)?;
        }
        let overlay = cpu::finish(&mut ctx, size)?;

        let mut base = Surface::new(size);
        base.fill_through_mask(
            &decor::background_mask(&geo, self.config.transparent_outside_border)?,
            palette.tones.background,
        )?;
        let ring = match layout {
            FaceLayout::Standard => Some(decor::border_ring(&geo)?),
            FaceLayout::Fate => None,
        };

        let lift = match layout {
            FaceLayout::Standard => geo.px((body_lines as f64 * 20.0).min(100.0)),
            FaceLayout::Fate => 0.0,
        };
        let art_origin = boxes.art_origin(lift);

        let compose = |layer: Option<(&RgbaImage, (u32, u32))>| -> AzothResult<RgbaImage> {
            let mut s = base.clone();
            if let Some((img, offset)) = layer {
                s.draw_image(
                    img,
                    art_origin.0 + i64::from(offset.0),
                    art_origin.1 + i64::from(offset.1),
                );
            }
            if let Some(ring) = &ring {
                s.fill_through_mask(ring, palette.accent)?;
            }
            s.composite_pixmap(&overlay)?;
            s.to_rgba_image()
        };

        let frames = if prepared.is_empty() {
            vec![compose(None)?]
        } else {
            prepared
                .iter()
                .map(|a| compose(Some((&a.layer, a.offset))))
                .collect::<AzothResult<Vec<_>>>()?
        };

        Ok(CardRaster {
            delays_ms: art
                .frames
                .as_ref()
                .filter(|f| f.is_animated())
                .map(|f| f.delays_ms.clone())
                .unwrap_or_default(),
            frames,
            report,
            texture: art.texture,
        })
    }

    /// Badge, title and body. Returns the overflow report and body line count.
    fn draw_face_text(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        engine: &mut FontTextEngine,
        card: &dyn Renderable,
        palette: &ResolvedPalette,
        geo: &CardGeometry,
        boxes: &FaceBoxes,
    ) -> AzothResult<(LayoutReport, usize)> {
        if let Some(value) = card.badge_value() {
            let icon = self.icons.get(card.badge_icon());
            decor::draw_badge(ctx, engine, geo, icon, value, palette)?;
        }

        let text_width = geo.text_width(1.0);
        let fg = palette.tones.foreground;
        let title_base = (geo.short_side() / 15.0).round() as f32;
        let title = fit_title(engine, card.title(), title_base, text_width as f32)?;
        let cap = f64::from(engine.cap_height(title.size)?);
        let title_style = TextStyle::new(title.size, fg)
            .align(TextAlign::Center)
            .weight(Weight::Semibold);
        engine.draw_line(
            ctx,
            card.title(),
            &title_style,
            Affine::translate((geo.width() / 2.0, boxes.title_top + cap)),
        )?;

        let mut report = LayoutReport {
            title_overflow: title.overflow,
            body_overflow: false,
        };
        let mut body_lines = 0;
        if !card.body_text().trim().is_empty() {
            let start = ((geo.short_side() / 16.0).round() * 0.9).round() as f32;
            let body = fit_paragraph(
                engine,
                card.body_text(),
                start,
                self.config.min_body_font_px,
                text_width as f32,
                (geo.height() * 0.3) as f32,
            )?;
            tracing::debug!(size = body.size, lines = body.lines.len(), "fitted body");
            let style = TextStyle::new(body.size, fg).align(TextAlign::Center);
            engine.draw_paragraph(ctx, &body, &style, geo.width() / 2.0, boxes.body_center)?;
            report.body_overflow = body.overflow;
            body_lines = body.lines.len();
        }
        Ok((report, body_lines))
    }

    /// Art thumbnail and name along the right edge, inside the card.
    fn draw_fate_label(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        engine: &mut FontTextEngine,
        geo: &CardGeometry,
        palette: &ResolvedPalette,
        text: &str,
        icon: &RgbaImage,
    ) -> AzothResult<()> {
        let size = ((geo.short_side() / 16.0).round() * 0.7).round() as f32;
        let cap = f64::from(engine.cap_height(size)?);
        let label = SideLabel {
            icon: Some(icon),
            text,
            style: TextStyle::new(size, palette.tones.foreground).weight(Weight::Semibold),
            baseline_x: geo.width() - geo.image_margin() - geo.px(20.0) - cap * 0.3,
            bottom_y: geo.height() * 0.69,
            spacing: geo.px(50.0),
        };
        decor::draw_side_label(ctx, engine, &label)
    }
}

/// Vertical anchors of a single-sided face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FaceBoxes {
    /// Art box before the lift is applied.
    pub art: Rect,
    /// Top of the title's capital letters.
    pub title_top: f64,
    pub body_center: f64,
}

impl FaceBoxes {
    pub fn new(geo: &CardGeometry, layout: FaceLayout) -> Self {
        let im = geo.image_margin();
        let (w, h) = (geo.width(), geo.height());
        match layout {
            FaceLayout::Standard => {
                let box_h = (h - 2.0 * im - geo.px(1000.0)).max(1.0);
                let top = h / 2.0 - box_h / 2.0;
                Self {
                    art: Rect::new(im, top, w - im, top + box_h),
                    title_top: geo.margin + geo.badge_radius() * 1.8,
                    body_center: h * 0.80,
                }
            }
            FaceLayout::Fate => {
                let box_h = h * 0.46;
                let top = h * 0.40 - box_h / 2.0;
                Self {
                    art: Rect::new(im, top, w - im, top + box_h),
                    title_top: h * 0.70,
                    body_center: h * 0.85,
                }
            }
        }
    }

    pub fn art_size(&self) -> PixelSize {
        PixelSize::new(
            self.art.width().round().max(1.0) as u32,
            self.art.height().round().max(1.0) as u32,
        )
    }

    /// Top-left of the art box after moving it up by `lift`.
    pub fn art_origin(&self, lift: f64) -> (i64, i64) {
        (self.art.x0.round() as i64, (self.art.y0 - lift).round() as i64)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
