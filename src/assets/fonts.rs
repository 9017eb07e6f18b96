use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::error::{AssetKind, AzothError, AzothResult};

/// Raw font file bytes, shared read-only between renders.
#[derive(Clone, Debug)]
pub struct FontAsset {
    pub path: PathBuf,
    pub bytes: Arc<[u8]>,
}

impl FontAsset {
    /// Reads a font file. A missing font is fatal for every render.
    pub fn load(path: &Path) -> AzothResult<Self> {
        if !path.is_file() {
            return Err(AzothError::asset_not_found(AssetKind::Font, path));
        }
        let bytes = std::fs::read(path)?;
        Self::from_bytes(path, bytes)
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> AzothResult<Self> {
        if bytes.is_empty() {
            return Err(AzothError::validation("font file is empty"));
        }
        Ok(Self {
            path: path.into(),
            bytes: bytes.into(),
        })
    }

    pub(crate) fn cpu_font(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(self.bytes.to_vec()), 0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
