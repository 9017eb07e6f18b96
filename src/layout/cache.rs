use std::path::{Path, PathBuf};

use image::RgbaImage;
use rayon::prelude::*;

use crate::{
    assets::decode::decode_image,
    foundation::error::{AzothError, AzothResult},
    model::{CardRecord, Renderable},
    render::{
        compositor::{ArtInput, CardCompositor},
        output,
    },
};

/// Rendered cards on disk, keyed by name slug.
///
/// Advisory only: an existing `<slug>.png` is reused as-is, even when the
/// record changed after it was written. Delete the file to force a re-render.
#[derive(Clone, Debug)]
pub struct RenderCache {
    dir: PathBuf,
}

impl RenderCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, record: &CardRecord) -> PathBuf {
        output::card_path(&self.dir, &record.slug(), "png")
    }

    /// Cached image for `record`, if one was written before.
    pub fn lookup(&self, record: &CardRecord) -> AzothResult<Option<RgbaImage>> {
        let path = self.path_for(record);
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = std::fs::read(&path)?;
        Ok(Some(decode_image(&bytes)?))
    }

    fn load_or_render_one(
        &self,
        compositor: &CardCompositor,
        record: &CardRecord,
    ) -> AzothResult<RgbaImage> {
        if let Some(img) = self.lookup(record)? {
            tracing::debug!(card = %record.name(), "cache hit");
            return Ok(img);
        }
        tracing::debug!(card = %record.name(), "cache miss, rendering");
        let raster = compositor.render_raster(record, &ArtInput::FromRecord)?;
        output::write_card(&self.dir, &record.slug(), &raster)?;
        raster
            .frames
            .into_iter()
            .next()
            .ok_or_else(|| AzothError::validation("render produced no frames"))
    }

    /// Images for `records` in order, rendering misses concurrently.
    pub fn load_or_render(
        &self,
        compositor: &CardCompositor,
        records: &[&CardRecord],
    ) -> Vec<AzothResult<RgbaImage>> {
        records
            .par_iter()
            .map(|record| self.load_or_render_one(compositor, record))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/cache.rs"]
mod tests;
