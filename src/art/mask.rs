use image::{Rgba, RgbaImage};

use crate::{
    foundation::{
        core::{PixelRect, PixelSize, Point, Rect},
        error::{AzothError, AzothResult},
        math::scale_alpha,
    },
    render::cpu,
};

/// Single-channel coverage bitmap (0 = outside, 255 = fully inside).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    size: PixelSize,
    data: Vec<u8>,
}

impl Mask {
    pub fn empty(size: PixelSize) -> Self {
        Self {
            size,
            data: vec![0; size.width as usize * size.height as usize],
        }
    }

    pub fn filled(size: PixelSize) -> Self {
        Self {
            size,
            data: vec![255; size.width as usize * size.height as usize],
        }
    }

    pub fn from_coverage(size: PixelSize, data: Vec<u8>) -> AzothResult<Self> {
        if data.len() != size.width as usize * size.height as usize {
            return Err(AzothError::validation("mask coverage length mismatch"));
        }
        Ok(Self { size, data })
    }

    /// Binary mask of pixels matching `pred`.
    pub fn from_image(img: &RgbaImage, pred: impl Fn(&Rgba<u8>) -> bool) -> Self {
        let size = PixelSize::new(img.width(), img.height());
        let data = img.pixels().map(|p| if pred(p) { 255 } else { 0 }).collect();
        Self { size, data }
    }

    /// Hard-edged rectangle, clipped to the mask bounds.
    pub fn rect(size: PixelSize, rect: PixelRect) -> Self {
        let mut m = Self::empty(size);
        let x1 = rect.right().min(size.width);
        let y1 = rect.bottom().min(size.height);
        for y in rect.y.min(y1)..y1 {
            let row = y as usize * size.width as usize;
            m.data[row + rect.x.min(x1) as usize..row + x1 as usize].fill(255);
        }
        m
    }

    /// Columns left of `x` are inside.
    pub fn split_left(size: PixelSize, x: u32) -> Self {
        Self::rect(size, PixelRect::new(0, 0, x.min(size.width), size.height))
    }

    /// Anti-aliased rounded rectangle.
    pub fn rounded_rect(size: PixelSize, rect: Rect, radius: f64) -> AzothResult<Self> {
        Self::rasterize(size, &cpu::rounded_rect_path(rect, radius))
    }

    /// Anti-aliased disc.
    pub fn circle(size: PixelSize, center: Point, radius: f64) -> AzothResult<Self> {
        Self::rasterize(size, &cpu::circle_path(center, radius))
    }

    fn rasterize(size: PixelSize, path: &vello_cpu::kurbo::BezPath) -> AzothResult<Self> {
        let mut ctx = cpu::context(size)?;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        ctx.fill_path(path);
        let pixmap = cpu::finish(&mut ctx, size)?;
        let data = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();
        Ok(Self { size, data })
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.size.width as usize + x as usize]
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.get(x, y) > 0
    }

    /// Number of pixels with any coverage.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|c| **c > 0).count()
    }

    pub fn invert(&self) -> Self {
        Self {
            size: self.size,
            data: self.data.iter().map(|c| 255 - c).collect(),
        }
    }

    /// Per-pixel product (intersection for binary masks).
    pub fn multiply(&self, other: &Mask) -> AzothResult<Self> {
        if self.size != other.size {
            return Err(AzothError::validation("mask sizes differ"));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| scale_alpha(*a, *b))
            .collect();
        Ok(Self {
            size: self.size,
            data,
        })
    }

    /// Tight bounding box of covered pixels, or `None` when nothing is covered.
    pub fn bounds(&self) -> Option<PixelRect> {
        let w = self.size.width as usize;
        let mut x0 = usize::MAX;
        let mut y0 = usize::MAX;
        let mut x1 = 0usize;
        let mut y1 = 0usize;
        for (y, row) in self.data.chunks_exact(w.max(1)).enumerate() {
            let Some(first) = row.iter().position(|c| *c > 0) else {
                continue;
            };
            let last = row.iter().rposition(|c| *c > 0).unwrap_or(first);
            x0 = x0.min(first);
            x1 = x1.max(last + 1);
            y0 = y0.min(y);
            y1 = y + 1;
        }
        (x0 != usize::MAX).then(|| {
            PixelRect::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/art/mask.rs"]
mod tests;
