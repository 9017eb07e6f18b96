use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::core::PixelSize,
    foundation::error::{AzothError, AzothResult},
    palette::PaletteSet,
};

const MM_PER_INCH: f64 = 25.4;
const MIN_PPI: f64 = 300.0;
const MAX_PPI: f64 = 900.0;

/// Canvas width every proportional constant was tuned at.
pub const REFERENCE_WIDTH: f64 = 2448.0;

/// Tunable pixel-classification thresholds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Channels at or below this are near-black when remapping.
    pub black: u8,
    /// Channels at or above `255 - white` are near-white when remapping.
    pub white: u8,
    /// Alpha at or above this counts as opaque.
    pub coverage: u8,
    /// Channels at or below this count as black for polarity detection.
    pub polarity_black: u8,
    /// Below this many black+white pixels an image keeps its polarity.
    pub polarity_floor: u64,
    /// Channel cutoff used by the full invert.
    pub invert: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            black: 25,
            white: 25,
            coverage: 25,
            polarity_black: 14,
            polarity_floor: 10_000,
            invert: 100,
        }
    }
}

/// Per-render configuration. Every field has a default, so JSON files may be partial.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Physical card size in millimetres, width then height.
    pub card_mm: [f64; 2],
    /// Bleed margin added on every side, in millimetres.
    pub bleed_mm: f64,
    /// Print resolution; clamped to 300..=900.
    pub ppi: f64,
    /// Fixed portrait canvas; when unset the size is derived from `card_mm`, `bleed_mm` and `ppi`.
    pub size_override: Option<PixelSize>,
    /// Border stroke width at the 2448px reference width.
    pub border_width: u32,
    /// Background fills only the bordered region instead of the whole bleed.
    pub transparent_outside_border: bool,
    pub palettes: PaletteSet,
    pub thresholds: Thresholds,
    /// Fraction of the art box width kept clear on each side.
    pub padding_ratio: f64,
    pub min_body_font_px: f32,
    /// Redraws allowed when a synthesized field cancels out.
    pub synth_retries: u32,
    /// Font file used for every text element.
    pub font: PathBuf,
    /// Directory holding `<Category>.png` and `view.png`.
    pub icons_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            card_mm: [60.5, 85.9],
            bleed_mm: 8.5,
            ppi: 900.0,
            size_override: Some(PixelSize::new(2448, 3330)),
            border_width: 40,
            transparent_outside_border: true,
            palettes: PaletteSet::default(),
            thresholds: Thresholds::default(),
            padding_ratio: 0.1,
            min_body_font_px: 12.0,
            synth_retries: 8,
            font: PathBuf::from("assets/fonts/card.ttf"),
            icons_dir: PathBuf::from("assets/icons"),
        }
    }
}

impl RenderConfig {
    pub fn from_json_file(path: &Path) -> AzothResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Copy with a fixed portrait canvas size.
    pub fn with_canvas(mut self, size: PixelSize) -> Self {
        self.size_override = Some(size);
        self
    }

    pub fn validate(&self) -> AzothResult<()> {
        let [w, h] = self.card_mm;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(AzothError::validation("card_mm must be finite and > 0"));
        }
        if !self.bleed_mm.is_finite() || self.bleed_mm < 0.0 {
            return Err(AzothError::validation("bleed_mm must be finite and >= 0"));
        }
        if !self.ppi.is_finite() {
            return Err(AzothError::validation("ppi must be finite"));
        }
        if self.size_override.is_some_and(|s| s.is_empty()) {
            return Err(AzothError::validation("size_override must be non-empty"));
        }
        if !(0.0..0.5).contains(&self.padding_ratio) {
            return Err(AzothError::validation("padding_ratio must be in [0, 0.5)"));
        }
        if !self.min_body_font_px.is_finite() || self.min_body_font_px <= 0.0 {
            return Err(AzothError::validation("min_body_font_px must be > 0"));
        }
        let size = self.canvas_size();
        if size.width > u32::from(u16::MAX) || size.height > u32::from(u16::MAX) {
            return Err(AzothError::validation("canvas exceeds 65535px"));
        }
        let short = f64::from(size.width.min(size.height));
        if 2.0 * (self.margin_px() + self.border_px()) >= short {
            return Err(AzothError::validation(
                "bleed_mm and border_width leave no room inside the border",
            ));
        }
        Ok(())
    }

    pub fn clamped_ppi(&self) -> f64 {
        self.ppi.clamp(MIN_PPI, MAX_PPI)
    }

    fn total_mm(&self) -> (f64, f64) {
        let [w, h] = self.card_mm;
        (w + 2.0 * self.bleed_mm, h + 2.0 * self.bleed_mm)
    }

    /// Portrait canvas size for single-sided cards.
    pub fn canvas_size(&self) -> PixelSize {
        if let Some(size) = self.size_override {
            return size;
        }
        let (w_mm, h_mm) = self.total_mm();
        let ppmm = self.clamped_ppi() / MM_PER_INCH;
        PixelSize::new(
            (w_mm * ppmm).round().max(1.0) as u32,
            (h_mm * ppmm).round().max(1.0) as u32,
        )
    }

    /// Pixels per millimetre at the actual canvas size.
    pub fn px_per_mm(&self) -> f64 {
        f64::from(self.canvas_size().width) / self.total_mm().0
    }

    /// Bleed margin in pixels.
    pub fn margin_px(&self) -> f64 {
        (self.px_per_mm() * self.bleed_mm).round()
    }

    /// Ratio of the canvas width to the reference width.
    pub fn scale(&self) -> f64 {
        f64::from(self.canvas_size().width) / REFERENCE_WIDTH
    }

    pub fn border_px(&self) -> f64 {
        (f64::from(self.border_width) * self.scale()).round().max(1.0)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
