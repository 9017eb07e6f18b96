use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use image::RgbaImage;

use crate::{
    assets::decode::decode_image,
    foundation::error::{AssetKind, AzothError, AzothResult},
    model::BadgeIcon,
    palette::Category,
};

const VIEW_ICON: &str = "view";

fn icon_stem(icon: BadgeIcon) -> &'static str {
    match icon {
        BadgeIcon::Category(c) => c.icon_stem(),
        BadgeIcon::View => VIEW_ICON,
    }
}

/// Badge icons keyed by file stem. Absent files are remembered as absent.
#[derive(Clone, Debug, Default)]
pub struct IconSet {
    dir: PathBuf,
    icons: BTreeMap<&'static str, RgbaImage>,
}

impl IconSet {
    /// Loads every category icon plus `view.png` that exists under `dir`.
    pub fn load_dir(dir: &Path) -> AzothResult<Self> {
        let mut set = Self {
            dir: dir.to_path_buf(),
            icons: BTreeMap::new(),
        };
        let stems = Category::ALL
            .iter()
            .map(|c| c.icon_stem())
            .chain(std::iter::once(VIEW_ICON));
        for stem in stems {
            match set.read(stem) {
                Ok(img) => {
                    set.icons.insert(stem, img);
                }
                Err(e) if e.is_asset_not_found() => {
                    tracing::debug!(icon = stem, "icon file absent");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(set)
    }

    /// Set with no icons; every badge uses the accent-disc fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn path_for(&self, icon: BadgeIcon) -> PathBuf {
        self.dir.join(format!("{}.png", icon_stem(icon)))
    }

    fn read(&self, stem: &str) -> AzothResult<RgbaImage> {
        let path = self.dir.join(format!("{stem}.png"));
        if !path.is_file() {
            return Err(AzothError::asset_not_found(AssetKind::Icon, path));
        }
        decode_image(&std::fs::read(&path)?)
    }

    pub fn insert(&mut self, icon: BadgeIcon, img: RgbaImage) {
        self.icons.insert(icon_stem(icon), img);
    }

    pub fn get(&self, icon: BadgeIcon) -> Option<&RgbaImage> {
        self.icons.get(icon_stem(icon))
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/icons.rs"]
mod tests;
