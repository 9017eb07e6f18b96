//! Two-sided ritual cards: dark challenge half, light reward half, shared badge.

use image::RgbaImage;

use crate::{
    art::{extract::ExtractedArt, mask::Mask, prepare::ArtPreparer},
    foundation::{
        core::{Affine, PixelSize},
        error::AzothResult,
    },
    model::{BadgeIcon, RitualCard, RitualSide},
    palette::{PaletteMode, ResolvedPalette},
    render::{
        compositor::{CardCompositor, CardRaster, LayoutReport, SideArt},
        cpu,
        decor::{self, CardGeometry, SideLabel},
        surface::Surface,
    },
    text::{
        engine::{FontTextEngine, TextAlign, TextStyle, Weight},
        layout::{fit_paragraph, fit_title},
        measure::TextMeasure,
    },
};

const HEADINGS: [&str; 2] = ["Ritual", "Reward"];

/// Reference-layout anchors of the landscape canvas.
const ART_SIDE: f64 = 950.0;
const CHALLENGE_ART_GAP: f64 = 165.0;
const REWARD_ART_GAP: f64 = 155.0;
const TEXT_OFFSET: f64 = 200.0;
const HEADING_OFFSET: f64 = 475.0 * 1.35;
const LABEL_GAP: f64 = 20.0;

/// One half of the landscape canvas.
struct Half<'a> {
    side: &'a RitualSide,
    heading: &'static str,
    palette: ResolvedPalette,
    /// -1 for the challenge half, +1 for the reward half.
    dir: f64,
    art: Option<ExtractedArt>,
}

impl Half<'_> {
    fn align(&self) -> TextAlign {
        if self.dir < 0.0 {
            TextAlign::Right
        } else {
            TextAlign::Left
        }
    }
}

impl CardCompositor {
    pub(crate) fn render_ritual(
        &self,
        ritual: &RitualCard,
        challenge: SideArt,
        reward: SideArt,
    ) -> AzothResult<CardRaster> {
        let size = self.config.canvas_size().transposed();
        let geo = CardGeometry::new(&self.config, size);
        let palettes = &self.config.palettes;
        let dark = palettes.resolve(PaletteMode::Dark, ritual.category);
        let light = palettes.resolve(PaletteMode::Light, ritual.category);

        let art_side = geo.px(ART_SIDE).round().max(1.0) as u32;
        let target = PixelSize::new(art_side, art_side);
        let preparer = ArtPreparer::new(&self.config.thresholds, 0.0);
        let prepare = |art: &SideArt, palette: &ResolvedPalette| -> AzothResult<Option<ExtractedArt>> {
            match art.frames.as_ref().and_then(|f| f.first()) {
                Some(first) => {
                    if art.frames.as_ref().is_some_and(|f| f.is_animated()) {
                        tracing::debug!("ritual art is animated, using the first frame");
                    }
                    preparer.prepare(first, target, palette).map(Some)
                }
                None => Ok(None),
            }
        };

        let halves = [
            Half {
                side: &ritual.challenge,
                heading: HEADINGS[0],
                palette: dark,
                dir: -1.0,
                art: prepare(&challenge, &dark)?,
            },
            Half {
                side: &ritual.reward,
                heading: HEADINGS[1],
                palette: light,
                dir: 1.0,
                art: prepare(&reward, &light)?,
            },
        ];

        let bg = decor::background_mask(&geo, self.config.transparent_outside_border)?;
        let seam = bg
            .bounds()
            .map(|b| b.x + b.width / 2)
            .unwrap_or(size.width / 2);
        let left = Mask::split_left(size, seam);

        let mut surface = Surface::new(size);
        surface.fill_through_mask(&bg.multiply(&left)?, dark.tones.background)?;
        surface.fill_through_mask(&bg.multiply(&left.invert())?, light.tones.background)?;

        let seam_x = f64::from(seam);
        let art_top = geo.height() * 0.43 - f64::from(art_side) / 2.0;
        for half in &halves {
            let Some(art) = &half.art else {
                continue;
            };
            let box_x = if half.dir < 0.0 {
                seam_x - geo.px(CHALLENGE_ART_GAP) - f64::from(art_side)
            } else {
                seam_x + geo.px(REWARD_ART_GAP)
            };
            surface.draw_image(
                &art.layer,
                box_x.round() as i64 + i64::from(art.offset.0),
                art_top.round() as i64 + i64::from(art.offset.1),
            );
        }
        surface.fill_through_mask(&decor::border_ring(&geo)?, dark.accent)?;

        let mut engine = self.text_engine()?;
        let mut ctx = cpu::context(size)?;
        let mut report = LayoutReport::default();
        for half in &halves {
            report = report.merge(self.draw_half(&mut ctx, &mut engine, &geo, half)?);
        }
        self.draw_seam_labels(&mut ctx, &mut engine, &geo, seam_x, &halves)?;
        if let Some(value) = ritual.foresight {
            let icon = self.icons.get(BadgeIcon::View);
            decor::draw_badge(&mut ctx, &mut engine, &geo, icon, value, &dark)?;
        }
        surface.composite_pixmap(&cpu::finish(&mut ctx, size)?)?;

        Ok(CardRaster {
            frames: vec![surface.to_rgba_image()?],
            delays_ms: Vec::new(),
            report,
            texture: challenge.texture.or(reward.texture),
        })
    }

    /// Heading, title and body of one half.
    fn draw_half(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        engine: &mut FontTextEngine,
        geo: &CardGeometry,
        half: &Half<'_>,
    ) -> AzothResult<LayoutReport> {
        let fg = half.palette.tones.foreground;
        let center = geo.width() / 2.0;
        let box_width = geo.text_width(1.0 / 1.8) as f32;
        let base = (geo.long_side() / 25.0).round() as f32;

        let heading = TextStyle::new(base, fg)
            .align(TextAlign::Center)
            .weight(Weight::Semibold);
        engine.draw_line(
            ctx,
            half.heading,
            &heading,
            Affine::translate((
                center + half.dir * geo.px(HEADING_OFFSET),
                geo.height() * 0.20,
            )),
        )?;

        let anchor_x = center + half.dir * geo.px(TEXT_OFFSET);
        let title = fit_title(engine, &half.side.name, (base * 1.15).floor(), box_width)?;
        let style = TextStyle::new(title.size, fg)
            .align(half.align())
            .weight(Weight::Semibold);
        engine.draw_line(
            ctx,
            &half.side.name,
            &style,
            Affine::translate((anchor_x, geo.height() * 0.69)),
        )?;

        let mut report = LayoutReport {
            title_overflow: title.overflow,
            body_overflow: false,
        };
        if !half.side.text.trim().is_empty() {
            let start = (((geo.short_side() / 16.0).round() * 0.9).round() / 1.5).floor() as f32;
            let body = fit_paragraph(
                engine,
                &half.side.text,
                start,
                self.config.min_body_font_px,
                box_width,
                (geo.height() * 0.3) as f32,
            )?;
            let style = TextStyle::new(body.size, fg).align(half.align());
            engine.draw_paragraph(ctx, &body, &style, anchor_x, geo.height() * 0.78)?;
            report.body_overflow = body.overflow;
        }
        Ok(report)
    }

    /// Art thumbnail and side name running up either side of the seam.
    fn draw_seam_labels(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        engine: &mut FontTextEngine,
        geo: &CardGeometry,
        seam_x: f64,
        halves: &[Half<'_>],
    ) -> AzothResult<()> {
        let size = ((geo.short_side() / 16.0).round() * 0.7).round() as f32;
        let metrics = engine.metrics(size)?;
        let cap = f64::from(engine.cap_height(size)?);
        let gap = geo.px(LABEL_GAP);
        for half in halves {
            // rotated glyphs extend toward -x from the baseline
            let baseline_x = if half.dir < 0.0 {
                seam_x - gap - f64::from(metrics.descent)
            } else {
                seam_x + gap + cap
            };
            let icon: Option<&RgbaImage> = half.art.as_ref().map(|a| &a.layer);
            let text = half.side.label();
            let label = SideLabel {
                icon,
                text: &text,
                style: TextStyle::new(size, half.palette.tones.foreground).weight(Weight::Semibold),
                baseline_x,
                bottom_y: geo.height() * 0.60,
                spacing: geo.px(30.0),
            };
            decor::draw_side_label(ctx, engine, &label)?;
        }
        Ok(())
    }
}
