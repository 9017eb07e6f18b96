//! Thin helpers over `vello_cpu` shared by masks, text and compositing.

use std::sync::Arc;

use image::RgbaImage;
use kurbo::Shape as _;

use crate::foundation::{
    core::{Affine, BezPath, PixelSize, Point, Rect},
    error::{AzothError, AzothResult},
    math::premultiply_rgba8_in_place,
};

const PATH_TOLERANCE: f64 = 0.1;

pub(crate) fn dims_u16(size: PixelSize) -> AzothResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| AzothError::validation("raster width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| AzothError::validation("raster height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(AzothError::validation("raster must be non-empty"));
    }
    Ok((w, h))
}

pub(crate) fn context(size: PixelSize) -> AzothResult<vello_cpu::RenderContext> {
    let (w, h) = dims_u16(size)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(ctx)
}

/// Flushes `ctx` into a fresh premultiplied pixmap.
pub(crate) fn finish(
    ctx: &mut vello_cpu::RenderContext,
    size: PixelSize,
) -> AzothResult<vello_cpu::Pixmap> {
    let (w, h) = dims_u16(size)?;
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn rounded_rect_path(rect: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    let r = radius.max(0.0).min(rect.width().min(rect.height()) / 2.0);
    let rr = kurbo::RoundedRect::from_rect(rect, r);
    bezpath_to_cpu(&rr.to_path(PATH_TOLERANCE))
}

pub(crate) fn circle_path(center: Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    bezpath_to_cpu(&kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE))
}

fn pixmap_from_premul(rgba8_premul: &[u8], size: PixelSize) -> AzothResult<vello_cpu::Pixmap> {
    let (w, h) = dims_u16(size)?;
    if rgba8_premul.len() != size.width as usize * size.height as usize * 4 {
        return Err(AzothError::validation("premultiplied byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(size.width as usize * size.height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Image paint for a straight-alpha raster.
pub(crate) fn image_paint(img: &RgbaImage) -> AzothResult<vello_cpu::Image> {
    let size = PixelSize::new(img.width(), img.height());
    let mut bytes = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut bytes);
    let pixmap = pixmap_from_premul(&bytes, size)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Draws `img` with its top-left corner at the origin of `transform`.
pub(crate) fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    img: &RgbaImage,
    transform: Affine,
) -> AzothResult<()> {
    let paint = image_paint(img)?;
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(img.width()),
        f64::from(img.height()),
    ));
    Ok(())
}
