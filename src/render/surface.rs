use image::RgbaImage;

use crate::{
    art::mask::Mask,
    foundation::{
        core::{PixelSize, Rgba8},
        error::{AzothError, AzothResult},
        math::{PremulRgba8, over, scale_alpha, unpremultiply_rgba8_in_place},
    },
};

/// Premultiplied RGBA8 canvas that layers are composited onto, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    size: PixelSize,
    data: Vec<u8>,
}

fn px(chunk: &[u8]) -> PremulRgba8 {
    [chunk[0], chunk[1], chunk[2], chunk[3]]
}

impl Surface {
    /// Fully transparent canvas.
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            data: vec![0; size.width as usize * size.height as usize * 4],
        }
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let i = (y as usize * self.size.width as usize + x as usize) * 4;
        px(&self.data[i..i + 4])
    }

    /// Paints `color` wherever `mask` has coverage.
    pub fn fill_through_mask(&mut self, mask: &Mask, color: Rgba8) -> AzothResult<()> {
        if mask.size() != self.size {
            return Err(AzothError::validation("mask and surface sizes differ"));
        }
        for (d, &cov) in self.data.chunks_exact_mut(4).zip(mask.data()) {
            if cov == 0 {
                continue;
            }
            let src = color.with_alpha(scale_alpha(color.a, cov)).to_premul();
            d.copy_from_slice(&over(px(d), src));
        }
        Ok(())
    }

    /// Composites a straight-alpha image with its top-left at `(x, y)`, clipped.
    pub fn draw_image(&mut self, img: &RgbaImage, x: i64, y: i64) {
        let (sw, sh) = (i64::from(self.size.width), i64::from(self.size.height));
        for (ix, iy, p) in img.enumerate_pixels() {
            let (dx, dy) = (x + i64::from(ix), y + i64::from(iy));
            if p[3] == 0 || dx < 0 || dy < 0 || dx >= sw || dy >= sh {
                continue;
            }
            let i = ((dy * sw + dx) * 4) as usize;
            let src = Rgba8::new(p[0], p[1], p[2], p[3]).to_premul();
            let out = over(px(&self.data[i..i + 4]), src);
            self.data[i..i + 4].copy_from_slice(&out);
        }
    }

    /// Composites a premultiplied `vello_cpu` pixmap of the same size.
    pub fn composite_pixmap(&mut self, pixmap: &vello_cpu::Pixmap) -> AzothResult<()> {
        let src = pixmap.data_as_u8_slice();
        if src.len() != self.data.len() {
            return Err(AzothError::validation("pixmap and surface sizes differ"));
        }
        for (d, s) in self.data.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            if s[3] == 0 {
                continue;
            }
            d.copy_from_slice(&over(px(d), px(s)));
        }
        Ok(())
    }

    /// Straight-alpha copy for encoding.
    pub fn to_rgba_image(&self) -> AzothResult<RgbaImage> {
        let mut bytes = self.data.clone();
        unpremultiply_rgba8_in_place(&mut bytes);
        RgbaImage::from_raw(self.size.width, self.size.height, bytes)
            .ok_or_else(|| AzothError::validation("surface buffer does not match its size"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
