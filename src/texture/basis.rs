use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::foundation::{
    error::{AssetKind, AzothError, AzothResult},
    rng::Rng64,
};

/// File suffix for basis sets stored on disk.
pub const BASIS_FILE_SUFFIX: &str = ".basis.json";

/// Precomputed eigen-solution of a Laplacian on a triangulated 2D domain.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BasisSet {
    pub id: String,
    /// Ascending eigenvalues, one per mode.
    pub eigenvalues: Vec<f64>,
    /// Mode-major coefficients: `eigenfunctions[mode][vertex]`.
    pub eigenfunctions: Vec<Vec<f64>>,
    pub vertices: Vec<[f64; 2]>,
    pub triangles: Vec<[u32; 3]>,
}

impl BasisSet {
    pub fn from_json_file(path: &Path) -> AzothResult<Self> {
        if !path.is_file() {
            return Err(AzothError::asset_not_found(AssetKind::BasisSet, path));
        }
        let bytes =
            std::fs::read(path).with_context(|| format!("read basis set '{}'", path.display()))?;
        let set: Self = serde_json::from_slice(&bytes)?;
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> AzothResult<()> {
        if self.id.trim().is_empty() {
            return Err(AzothError::validation("basis set id must be non-empty"));
        }
        if self.eigenvalues.len() != self.eigenfunctions.len() {
            return Err(AzothError::validation(format!(
                "basis '{}': {} eigenvalues but {} eigenfunctions",
                self.id,
                self.eigenvalues.len(),
                self.eigenfunctions.len()
            )));
        }
        if self.selectable_modes() < 2 {
            return Err(AzothError::validation(format!(
                "basis '{}' needs at least 4 modes",
                self.id
            )));
        }
        if self.triangles.is_empty() {
            return Err(AzothError::validation(format!(
                "basis '{}' has no triangles",
                self.id
            )));
        }
        let n = self.vertices.len();
        if let Some(m) = self.eigenfunctions.iter().position(|f| f.len() != n) {
            return Err(AzothError::validation(format!(
                "basis '{}': mode {m} has wrong vertex count",
                self.id
            )));
        }
        if self
            .triangles
            .iter()
            .flatten()
            .any(|&i| i as usize >= n)
        {
            return Err(AzothError::validation(format!(
                "basis '{}': triangle index out of range",
                self.id
            )));
        }
        if self.vertices.iter().flatten().any(|v| !v.is_finite()) {
            return Err(AzothError::validation(format!(
                "basis '{}': non-finite vertex",
                self.id
            )));
        }
        Ok(())
    }

    pub fn mode_count(&self) -> usize {
        self.eigenvalues.len()
    }

    /// Modes eligible for synthesis; the noisy upper half is never used.
    pub fn selectable_modes(&self) -> usize {
        self.eigenvalues.len() / 2
    }

    /// `(min_x, min_y, max_x, max_y)` over all vertices.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.vertices.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), [x, y]| (x0.min(*x), y0.min(*y), x1.max(*x), y1.max(*y)),
        )
    }

    /// Analytic Dirichlet modes of a `width`×`height` rectangle on an `nx`×`ny` grid.
    ///
    /// Mode `(m, n)` is `sin(mπx/w)·sin(nπy/h)` with eigenvalue `π²((m/w)² + (n/h)²)`;
    /// the lowest `modes` are kept.
    pub fn rectangle(
        id: impl Into<String>,
        width: f64,
        height: f64,
        nx: u32,
        ny: u32,
        modes: usize,
    ) -> AzothResult<Self> {
        if !(width > 0.0 && height > 0.0) || nx == 0 || ny == 0 {
            return Err(AzothError::validation(
                "rectangle basis needs positive extent and grid",
            ));
        }

        let mut vertices = Vec::with_capacity(((nx + 1) * (ny + 1)) as usize);
        for j in 0..=ny {
            for i in 0..=nx {
                vertices.push([
                    width * f64::from(i) / f64::from(nx),
                    height * f64::from(j) / f64::from(ny),
                ]);
            }
        }

        let stride = nx + 1;
        let mut triangles = Vec::with_capacity((2 * nx * ny) as usize);
        for j in 0..ny {
            for i in 0..nx {
                let a = j * stride + i;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                triangles.push([a, b, d]);
                triangles.push([a, d, c]);
            }
        }

        let side = (modes as f64).sqrt().ceil() as u32 + 1;
        let pi2 = std::f64::consts::PI * std::f64::consts::PI;
        let mut pairs: Vec<(f64, u32, u32)> = (1..=side)
            .flat_map(|m| (1..=side).map(move |n| (m, n)))
            .map(|(m, n)| {
                let (mf, nf) = (f64::from(m), f64::from(n));
                (pi2 * ((mf / width).powi(2) + (nf / height).powi(2)), m, n)
            })
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        pairs.truncate(modes);

        let eigenfunctions = pairs
            .iter()
            .map(|&(_, m, n)| {
                vertices
                    .iter()
                    .map(|[x, y]| {
                        (f64::from(m) * std::f64::consts::PI * x / width).sin()
                            * (f64::from(n) * std::f64::consts::PI * y / height).sin()
                    })
                    .collect()
            })
            .collect();

        let set = Self {
            id: id.into(),
            eigenvalues: pairs.iter().map(|p| p.0).collect(),
            eigenfunctions,
            vertices,
            triangles,
        };
        set.validate()?;
        Ok(set)
    }
}

/// Read-only collection of basis sets, keyed by id.
///
/// Constructed once and passed into every synthesis call; sets are shared
/// behind `Arc` so worker threads can use them concurrently.
#[derive(Clone, Debug, Default)]
pub struct BasisRegistry {
    sets: BTreeMap<String, Arc<BasisSet>>,
    root: Option<PathBuf>,
}

impl BasisRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `<id>.basis.json` in `dir`.
    pub fn load_dir(dir: &Path) -> AzothResult<Self> {
        if !dir.is_dir() {
            return Err(AzothError::asset_not_found(AssetKind::BasisSet, dir));
        }
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_basis = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(BASIS_FILE_SUFFIX));
            if is_basis {
                paths.push(path);
            }
        }
        paths.sort();

        let mut reg = Self {
            sets: BTreeMap::new(),
            root: Some(dir.to_path_buf()),
        };
        for path in paths {
            let set = BasisSet::from_json_file(&path)?;
            tracing::debug!(id = %set.id, modes = set.mode_count(), "loaded basis set");
            reg.insert(set)?;
        }
        Ok(reg)
    }

    pub fn insert(&mut self, set: BasisSet) -> AzothResult<()> {
        set.validate()?;
        self.sets.insert(set.id.clone(), Arc::new(set));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.sets.keys().map(String::as_str)
    }

    pub fn get(&self, id: &str) -> AzothResult<Arc<BasisSet>> {
        self.sets.get(id).cloned().ok_or_else(|| {
            let path = match &self.root {
                Some(root) => root.join(format!("{id}{BASIS_FILE_SUFFIX}")),
                None => PathBuf::from(id),
            };
            AzothError::asset_not_found(AssetKind::BasisSet, path)
        })
    }

    /// Uniform pick in id order.
    pub fn choose(&self, rng: &mut Rng64) -> AzothResult<Arc<BasisSet>> {
        if self.sets.is_empty() {
            let path = self.root.clone().unwrap_or_default();
            return Err(AzothError::asset_not_found(AssetKind::BasisSet, path));
        }
        let idx = rng.below(self.sets.len());
        self.sets
            .values()
            .nth(idx)
            .cloned()
            .ok_or_else(|| AzothError::validation("basis registry index out of range"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/texture/basis.rs"]
mod tests;
