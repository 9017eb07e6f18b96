use std::sync::Arc;

use image::RgbaImage;

use crate::{
    foundation::{
        core::Rgba8,
        error::{AzothError, AzothResult},
        rng::Rng64,
    },
    palette::{Category, PaletteSet},
    texture::basis::{BasisRegistry, BasisSet},
};

/// Blank margin around the mesh extent, in grid cells.
pub const GRID_PADDING: usize = 50;
/// Field values with `|v|` at or below this are pattern cells.
pub const PATTERN_EPSILON: f64 = 0.15;

const MIN_MODES: usize = 2;
const MAX_MODES: usize = 4;

/// Everything needed to reproduce a synthesized texture from its basis set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeneratedTextureParams {
    pub basis_id: String,
    pub category: Category,
    pub mode_indices: Vec<usize>,
    pub amplitudes: Vec<f64>,
    pub symmetric: bool,
}

#[derive(Clone, Debug)]
pub struct SynthesizedTexture {
    pub image: RgbaImage,
    pub params: GeneratedTextureParams,
}

/// Scalar field sampled on a regular grid; `None` marks cells outside the mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    pub width: usize,
    pub height: usize,
    pub values: Vec<Option<f64>>,
}

impl ScalarField {
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        self.values[y * self.width + x]
    }

    /// Left half mirrored onto the right; the result has even width.
    pub fn mirrored(&self) -> Self {
        let half = self.width / 2;
        let width = half * 2;
        let mut values = Vec::with_capacity(width * self.height);
        for y in 0..self.height {
            let row = &self.values[y * self.width..y * self.width + half];
            values.extend_from_slice(row);
            values.extend(row.iter().rev());
        }
        Self {
            width,
            height: self.height,
            values,
        }
    }
}

/// Draws `k ∈ [2, 4]` distinct modes from the lower half of the spectrum and
/// one amplitude in `[-1, 1)` per mode.
pub fn draw_modes(set: &BasisSet, rng: &mut Rng64) -> (Vec<usize>, Vec<f64>) {
    let pool = set.selectable_modes();
    let k = rng.range_inclusive(MIN_MODES, MAX_MODES).min(pool);
    let indices = rng.sample_distinct(pool, k);
    let amplitudes = indices.iter().map(|_| rng.uniform(-1.0, 1.0)).collect();
    (indices, amplitudes)
}

/// Weighted sum of the chosen modes, normalized to a peak magnitude of 1.
pub fn combine_modes(set: &BasisSet, indices: &[usize], amplitudes: &[f64]) -> AzothResult<Vec<f64>> {
    if indices.len() != amplitudes.len() {
        return Err(AzothError::validation(
            "mode indices and amplitudes differ in length",
        ));
    }
    let mut combined = vec![0.0f64; set.vertices.len()];
    for (&idx, &amp) in indices.iter().zip(amplitudes) {
        let mode = set.eigenfunctions.get(idx).ok_or_else(|| {
            AzothError::validation(format!("mode {idx} out of range for '{}'", set.id))
        })?;
        for (c, v) in combined.iter_mut().zip(mode) {
            *c += amp * v;
        }
    }

    let peak = combined.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if peak == 0.0 || !peak.is_finite() {
        return Err(AzothError::degenerate(format!(
            "modes {indices:?} of '{}' combine to a zero field",
            set.id
        )));
    }
    for c in &mut combined {
        *c /= peak;
    }
    Ok(combined)
}

/// Piecewise-linear interpolation of per-vertex values onto a pixel grid
/// covering the mesh extent plus [`GRID_PADDING`] on each side.
pub fn interpolate(set: &BasisSet, values: &[f64]) -> ScalarField {
    let (min_x, min_y, max_x, max_y) = set.bounds();
    let pad = GRID_PADDING as f64;
    let width = (max_x - min_x).max(0.0) as usize + 2 * GRID_PADDING;
    let height = (max_y - min_y).max(0.0) as usize + 2 * GRID_PADDING;

    let (x0, y0) = (min_x - pad, min_y - pad);
    let step = |lo: f64, hi: f64, n: usize| {
        if n > 1 { (hi - lo) / (n - 1) as f64 } else { 1.0 }
    };
    let dx = step(x0, max_x + pad, width);
    let dy = step(y0, max_y + pad, height);

    let mut field = vec![None; width * height];
    for tri in &set.triangles {
        let [a, b, c] = tri.map(|i| set.vertices[i as usize]);
        let [va, vb, vc] = tri.map(|i| values[i as usize]);

        let det = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
        if det.abs() < f64::EPSILON {
            continue;
        }

        let tx0 = a[0].min(b[0]).min(c[0]);
        let tx1 = a[0].max(b[0]).max(c[0]);
        let ty0 = a[1].min(b[1]).min(c[1]);
        let ty1 = a[1].max(b[1]).max(c[1]);
        let col0 = ((tx0 - x0) / dx).ceil().max(0.0) as usize;
        let col1 = (((tx1 - x0) / dx).floor() as usize).min(width - 1);
        let row0 = ((ty0 - y0) / dy).ceil().max(0.0) as usize;
        let row1 = (((ty1 - y0) / dy).floor() as usize).min(height - 1);

        const TOL: f64 = -1e-9;
        for row in row0..=row1 {
            let py = y0 + row as f64 * dy;
            for col in col0..=col1 {
                let px = x0 + col as f64 * dx;
                let l1 = ((b[1] - c[1]) * (px - c[0]) + (c[0] - b[0]) * (py - c[1])) / det;
                let l2 = ((c[1] - a[1]) * (px - c[0]) + (a[0] - c[0]) * (py - c[1])) / det;
                let l3 = 1.0 - l1 - l2;
                if l1 >= TOL && l2 >= TOL && l3 >= TOL {
                    field[row * width + col] = Some(l1 * va + l2 * vb + l3 * vc);
                }
            }
        }
    }

    ScalarField {
        width,
        height,
        values: field,
    }
}

/// Pattern cells take the dark background tone, the rest the category accent,
/// cells outside the domain stay transparent.
pub fn colorize(field: &ScalarField, pattern: Rgba8, accent: Rgba8) -> RgbaImage {
    RgbaImage::from_fn(field.width as u32, field.height as u32, |x, y| {
        match field.get(x as usize, y as usize) {
            None => Rgba8::TRANSPARENT.to_image(),
            Some(v) if v.abs() <= PATTERN_EPSILON => pattern.to_image(),
            Some(_) => accent.to_image(),
        }
    })
}

/// Rebuilds the raster a set of params describes.
pub fn render_params(
    set: &BasisSet,
    params: &GeneratedTextureParams,
    palettes: &PaletteSet,
) -> AzothResult<RgbaImage> {
    let combined = combine_modes(set, &params.mode_indices, &params.amplitudes)?;
    let field = interpolate(set, &combined).mirrored();
    Ok(colorize(
        &field,
        palettes.dark.background,
        palettes.accent(params.category),
    ))
}

/// Spectral texture generator backed by an injected basis registry.
pub struct TextureSynthesizer<'a> {
    registry: &'a BasisRegistry,
    palettes: &'a PaletteSet,
    retries: u32,
}

impl<'a> TextureSynthesizer<'a> {
    pub fn new(registry: &'a BasisRegistry, palettes: &'a PaletteSet) -> Self {
        Self {
            registry,
            palettes,
            retries: 8,
        }
    }

    /// Extra draws allowed after a degenerate one.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    fn resolve(&self, basis: Option<&str>, rng: &mut Rng64) -> AzothResult<Arc<BasisSet>> {
        match basis {
            Some(id) => self.registry.get(id),
            None => self.registry.choose(rng),
        }
    }

    /// One draw; fails with `GenerationDegenerate` when the modes cancel out.
    pub fn synthesize_once(
        &self,
        basis: Option<&str>,
        category: Category,
        rng: &mut Rng64,
    ) -> AzothResult<SynthesizedTexture> {
        let set = self.resolve(basis, rng)?;
        self.draw_from(&set, category, rng)
    }

    fn draw_from(
        &self,
        set: &BasisSet,
        category: Category,
        rng: &mut Rng64,
    ) -> AzothResult<SynthesizedTexture> {
        let (mode_indices, amplitudes) = draw_modes(set, rng);
        let params = GeneratedTextureParams {
            basis_id: set.id.clone(),
            category,
            mode_indices,
            amplitudes,
            symmetric: true,
        };
        let image = render_params(set, &params, self.palettes)?;
        Ok(SynthesizedTexture { image, params })
    }

    /// Synthesizes a texture, redrawing up to the retry limit on degenerate draws.
    #[tracing::instrument(skip(self, rng))]
    pub fn synthesize(
        &self,
        basis: Option<&str>,
        category: Category,
        rng: &mut Rng64,
    ) -> AzothResult<SynthesizedTexture> {
        let set = self.resolve(basis, rng)?;
        let mut last = None;
        for attempt in 0..=self.retries {
            match self.draw_from(&set, category, rng) {
                Ok(tex) => {
                    tracing::debug!(
                        basis = %tex.params.basis_id,
                        modes = ?tex.params.mode_indices,
                        width = tex.image.width(),
                        height = tex.image.height(),
                        "synthesized texture"
                    );
                    return Ok(tex);
                }
                Err(AzothError::GenerationDegenerate(msg)) => {
                    tracing::warn!(attempt, %msg, "degenerate draw, retrying");
                    last = Some(msg);
                }
                Err(e) => return Err(e),
            }
        }
        Err(AzothError::degenerate(format!(
            "gave up after {} draws: {}",
            self.retries + 1,
            last.unwrap_or_default()
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/synth.rs"]
mod tests;
