//! Greedy wrapping and shrink-to-fit sizing for paragraphs and titles.

use crate::{
    foundation::error::{AzothError, AzothResult},
    text::measure::TextMeasure,
};

/// Extra gap below every line, as a fraction of the line height.
pub const LINE_SPACING: f32 = 0.2;

/// Sizes are tried in steps of this many pixels.
const SIZE_STEP: f32 = 1.0;

/// Greedy word wrap. Words are never split; one wider than `max_width`
/// sits alone on its own line. Explicit newlines always break.
pub fn wrap(
    m: &mut dyn TextMeasure,
    text: &str,
    size: f32,
    max_width: f32,
) -> AzothResult<Vec<String>> {
    let mut lines = Vec::new();
    for para in text.lines() {
        let mut current = String::new();
        for word in para.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if m.advance(&candidate, size)? <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    Ok(lines)
}

/// Wrapped paragraph at its chosen size.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphFit {
    pub size: f32,
    pub lines: Vec<String>,
    pub line_height: f32,
    pub spacing: f32,
    /// Did not fit even at the floor size.
    pub overflow: bool,
}

impl ParagraphFit {
    /// Distance between consecutive baselines.
    pub fn pitch(&self) -> f32 {
        self.line_height + self.spacing
    }

    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.pitch()
    }
}

fn check_box(max_width: f32, max_height: f32) -> AzothResult<()> {
    if !(max_width.is_finite() && max_height.is_finite() && max_width > 0.0 && max_height >= 0.0)
    {
        return Err(AzothError::validation("text box must be finite and non-empty"));
    }
    Ok(())
}

fn paragraph_at(
    m: &mut dyn TextMeasure,
    text: &str,
    size: f32,
    max_width: f32,
) -> AzothResult<ParagraphFit> {
    let lines = wrap(m, text, size, max_width)?;
    let metrics = m.metrics(size)?;
    let line_height = metrics.ascent + metrics.descent;
    Ok(ParagraphFit {
        size,
        lines,
        line_height,
        spacing: line_height * LINE_SPACING,
        overflow: false,
    })
}

/// Shrinks from `start` one pixel at a time until the wrapped block fits
/// `max_height`. Stops at `floor` and reports overflow instead of failing.
pub fn fit_paragraph(
    m: &mut dyn TextMeasure,
    text: &str,
    start: f32,
    floor: f32,
    max_width: f32,
    max_height: f32,
) -> AzothResult<ParagraphFit> {
    check_box(max_width, max_height)?;
    let mut size = start.max(floor);
    while size > floor {
        let fit = paragraph_at(m, text, size, max_width)?;
        if fit.height() <= max_height {
            return Ok(fit);
        }
        size -= SIZE_STEP;
    }
    let mut fit = paragraph_at(m, text, floor, max_width)?;
    fit.overflow = fit.height() > max_height;
    if fit.overflow {
        tracing::warn!(
            size = floor,
            height = fit.height(),
            max_height,
            "paragraph overflows at floor size"
        );
    }
    Ok(fit)
}

/// Single-line title at its chosen size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TitleFit {
    pub size: f32,
    pub width: f32,
    pub overflow: bool,
}

/// Shrinks from `base` until the title fits `max_width`, flooring at half of `base`.
pub fn fit_title(
    m: &mut dyn TextMeasure,
    text: &str,
    base: f32,
    max_width: f32,
) -> AzothResult<TitleFit> {
    check_box(max_width, 0.0)?;
    let floor = (base / 2.0).round().max(1.0);
    let mut size = base.max(floor);
    loop {
        let width = m.advance(text, size)?;
        if width <= max_width {
            return Ok(TitleFit {
                size,
                width,
                overflow: false,
            });
        }
        if size - SIZE_STEP < floor {
            tracing::warn!(title = text, size, width, max_width, "title overflows at floor size");
            return Ok(TitleFit {
                size,
                width,
                overflow: true,
            });
        }
        size -= SIZE_STEP;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
