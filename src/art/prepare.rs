use image::RgbaImage;

use crate::{
    art::{
        extract::{ExtractParams, ExtractedArt, extract, extract_with_crop},
        normalize::{correct_polarity, remap_tones},
    },
    config::Thresholds,
    foundation::{core::PixelSize, error::AzothResult},
    palette::ResolvedPalette,
};

/// Polarity fix, foreground extraction and tone remapping, in that order.
#[derive(Clone, Copy, Debug)]
pub struct ArtPreparer<'a> {
    pub thresholds: &'a Thresholds,
    pub padding_ratio: f64,
}

impl<'a> ArtPreparer<'a> {
    pub fn new(thresholds: &'a Thresholds, padding_ratio: f64) -> Self {
        Self {
            thresholds,
            padding_ratio,
        }
    }

    fn params(&self, target: PixelSize, palette: &ResolvedPalette) -> ExtractParams {
        ExtractParams {
            target,
            padding_ratio: self.padding_ratio,
            mode: palette.mode,
        }
    }

    fn finish(&self, mut art: ExtractedArt, palette: &ResolvedPalette) -> ExtractedArt {
        remap_tones(&mut art.layer, palette.ink_tones(), self.thresholds);
        art
    }

    pub fn prepare(
        &self,
        source: &RgbaImage,
        target: PixelSize,
        palette: &ResolvedPalette,
    ) -> AzothResult<ExtractedArt> {
        let mut img = source.clone();
        correct_polarity(&mut img, palette.mode, self.thresholds);
        let art = extract(&img, &self.params(target, palette))?;
        Ok(self.finish(art, palette))
    }

    /// Prepares every frame with the crop found on the first one.
    pub fn prepare_frames(
        &self,
        frames: &[RgbaImage],
        target: PixelSize,
        palette: &ResolvedPalette,
    ) -> AzothResult<Vec<ExtractedArt>> {
        let Some((first, rest)) = frames.split_first() else {
            return Ok(Vec::new());
        };
        let lead = self.prepare(first, target, palette)?;
        let params = self.params(target, palette);
        let mut out = Vec::with_capacity(frames.len());
        let crop = lead.crop;
        out.push(lead);
        for frame in rest {
            let mut img = frame.clone();
            correct_polarity(&mut img, palette.mode, self.thresholds);
            let art = extract_with_crop(&img, crop, &params)?;
            out.push(self.finish(art, palette));
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/art/prepare.rs"]
mod tests;
