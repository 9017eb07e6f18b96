use std::path::PathBuf;

/// Convenience result type used across the renderer.
pub type AzothResult<T> = Result<T, AzothError>;

/// Which kind of external asset could not be found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    /// Source artwork for a card.
    Art,
    /// Font file used for every text element.
    Font,
    /// Badge or side-label icon.
    Icon,
    /// Precomputed spectral basis set.
    BasisSet,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Art => "art",
            Self::Font => "font",
            Self::Icon => "icon",
            Self::BasisSet => "basis set",
        };
        f.write_str(s)
    }
}

/// Top-level error taxonomy used by render APIs.
///
/// Text that does not fit even at the floor size is not an error; see
/// [`crate::LayoutReport`].
#[derive(thiserror::Error, Debug)]
pub enum AzothError {
    /// A required file is missing.
    #[error("{kind} not found: {}", path.display())]
    AssetNotFound {
        /// Asset category.
        kind: AssetKind,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Texture synthesis produced an all-zero field.
    #[error("degenerate generation: {0}")]
    GenerationDegenerate(String),

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing records and configs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem failure, passed through untouched.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Image decode or encode failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Catch-all for contextualized internal failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AzothError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::GenerationDegenerate(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn asset_not_found(kind: AssetKind, path: impl Into<PathBuf>) -> Self {
        Self::AssetNotFound {
            kind,
            path: path.into(),
        }
    }

    /// True when the error means "this asset is absent", as opposed to unreadable.
    pub fn is_asset_not_found(&self) -> bool {
        matches!(self, Self::AssetNotFound { .. })
    }
}

impl From<serde_json::Error> for AzothError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
