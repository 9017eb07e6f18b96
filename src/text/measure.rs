use crate::foundation::error::{AzothError, AzothResult};

/// Capital letters without descenders; their box bottom is the baseline.
pub const REFERENCE_CAPS: &str = "ABCDEFHIJKLMNOPRSTUVWXYZ";

/// Vertical metrics of one line at a given size, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl LineMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// Measures rendered text. Implemented by the font engine and by
/// [`FixedAdvance`] for font-free layout.
pub trait TextMeasure {
    /// Advance width of `text` laid out on one line.
    fn advance(&mut self, text: &str, size: f32) -> AzothResult<f32>;

    fn metrics(&mut self, size: f32) -> AzothResult<LineMetrics>;

    /// Height of [`REFERENCE_CAPS`] above its baseline.
    fn cap_height(&mut self, size: f32) -> AzothResult<f32>;
}

pub(crate) fn check_size(size: f32) -> AzothResult<()> {
    if !size.is_finite() || size <= 0.0 {
        return Err(AzothError::validation("text size must be finite and > 0"));
    }
    Ok(())
}

/// Monospace stand-in: every char advances `size * ratio`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub ratio: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { ratio: 0.5 }
    }
}

impl TextMeasure for FixedAdvance {
    fn advance(&mut self, text: &str, size: f32) -> AzothResult<f32> {
        check_size(size)?;
        Ok(text.chars().count() as f32 * size * self.ratio)
    }

    fn metrics(&mut self, size: f32) -> AzothResult<LineMetrics> {
        check_size(size)?;
        Ok(LineMetrics {
            ascent: size * 0.8,
            descent: size * 0.2,
            leading: 0.0,
        })
    }

    fn cap_height(&mut self, size: f32) -> AzothResult<f32> {
        check_size(size)?;
        Ok(size * 0.7)
    }
}
