//! Writing rendered cards to the output directory.

use std::path::{Path, PathBuf};

use crate::{
    assets::decode::{encode_gif, encode_png, write_bytes},
    foundation::{
        core::PixelSize,
        error::{AzothError, AzothResult},
    },
    render::compositor::{CardRaster, RenderedCard},
};

/// `<out_dir>/<slug>.<ext>`.
pub fn card_path(out_dir: &Path, slug: &str, ext: &str) -> PathBuf {
    out_dir.join(format!("{slug}.{ext}"))
}

/// Writes the first frame as PNG and, for animated rasters, every frame as a looping GIF.
pub fn write_card(out_dir: &Path, slug: &str, raster: &CardRaster) -> AzothResult<RenderedCard> {
    let first = raster
        .first()
        .ok_or_else(|| AzothError::validation("render produced no frames"))?;
    std::fs::create_dir_all(out_dir)?;

    let path = write_bytes(&card_path(out_dir, slug, "png"), &encode_png(first)?)?;
    let animation = if raster.is_animated() {
        let gif = encode_gif(&raster.frames, &raster.delays_ms)?;
        let gif_path = write_bytes(&card_path(out_dir, slug, "gif"), &gif)?;
        tracing::debug!(frames = raster.frames.len(), path = %gif_path.display(), "wrote animation");
        Some(gif_path)
    } else {
        None
    };

    Ok(RenderedCard {
        path,
        animation,
        size: PixelSize::new(first.width(), first.height()),
        report: raster.report,
        texture: raster.texture.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/output.rs"]
mod tests;
