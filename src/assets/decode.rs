use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::{
    AnimationDecoder, Delay, Frame, ImageFormat, RgbaImage,
    codecs::gif::{GifDecoder, GifEncoder, Repeat},
};

use crate::foundation::error::{AssetKind, AzothError, AzothResult};

/// Decoded artwork: one frame for stills, several for animated GIFs.
#[derive(Clone, Debug)]
pub struct ArtFrames {
    pub frames: Vec<RgbaImage>,
    /// Per-frame delay in milliseconds; empty for stills.
    pub delays_ms: Vec<u32>,
}

impl ArtFrames {
    pub fn still(img: RgbaImage) -> Self {
        Self {
            frames: vec![img],
            delays_ms: Vec::new(),
        }
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn first(&self) -> Option<&RgbaImage> {
        self.frames.first()
    }
}

pub fn decode_image(bytes: &[u8]) -> AzothResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Decodes art bytes, expanding GIFs into their full frame list.
pub fn decode_art(bytes: &[u8]) -> AzothResult<ArtFrames> {
    if image::guess_format(bytes).ok() != Some(ImageFormat::Gif) {
        return Ok(ArtFrames::still(decode_image(bytes)?));
    }
    let decoder = GifDecoder::new(Cursor::new(bytes)).context("open gif decoder")?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .context("decode gif frames")?;
    if frames.is_empty() {
        return Err(AzothError::validation("gif has no frames"));
    }
    let delays_ms = frames
        .iter()
        .map(|f| {
            let (num, den) = f.delay().numer_denom_ms();
            num / den.max(1)
        })
        .collect();
    let mut frames: Vec<RgbaImage> = frames.into_iter().map(Frame::into_buffer).collect();
    if frames.len() == 1
        && let Some(img) = frames.pop()
    {
        return Ok(ArtFrames::still(img));
    }
    tracing::debug!(frames = frames.len(), "decoded animated art");
    Ok(ArtFrames { frames, delays_ms })
}

/// Reads art from disk; a missing file is [`AzothError::AssetNotFound`].
pub fn load_art(path: &Path) -> AzothResult<ArtFrames> {
    if !path.is_file() {
        return Err(AzothError::asset_not_found(AssetKind::Art, path));
    }
    let bytes = std::fs::read(path)?;
    decode_art(&bytes).map_err(|e| match e {
        AzothError::Other(inner) => {
            AzothError::Other(inner.context(format!("decode art '{}'", path.display())))
        }
        other => other,
    })
}

pub fn encode_png(img: &RgbaImage) -> AzothResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Encodes a looping GIF. Delays are clamped to at least one centisecond.
pub fn encode_gif(frames: &[RgbaImage], delays_ms: &[u32]) -> AzothResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buf);
        encoder.set_repeat(Repeat::Infinite)?;
        for (i, img) in frames.iter().enumerate() {
            let ms = delays_ms.get(i).copied().unwrap_or(100).max(10);
            let delay = Delay::from_numer_denom_ms(ms, 1);
            encoder.encode_frame(Frame::from_parts(img.clone(), 0, 0, delay))?;
        }
    }
    Ok(buf)
}

/// Writes encoded bytes; I/O failures pass through as [`AzothError::Io`].
pub fn write_bytes(path: &Path, bytes: &[u8]) -> AzothResult<PathBuf> {
    std::fs::write(path, bytes)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
