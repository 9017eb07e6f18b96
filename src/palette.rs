use std::collections::BTreeMap;

use crate::foundation::core::Rgba8;

/// Background/foreground pairing a card is rendered with.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    /// Dark background, light text.
    #[default]
    Dark,
    /// Light background, dark text.
    Light,
}

/// Which opaque-pixel population dominates a source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    Black,
    White,
}

impl PaletteMode {
    /// Polarity art must have before it is remapped onto this palette.
    pub fn required_polarity(self) -> Polarity {
        match self {
            Self::Dark => Polarity::Black,
            Self::Light => Polarity::White,
        }
    }
}

/// Card category; selects accent colour and badge icon.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Blood,
    Sol,
    Anima,
    Dark,
    Light,
    All,
    #[default]
    None,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Blood,
        Self::Sol,
        Self::Anima,
        Self::Dark,
        Self::Light,
        Self::All,
        Self::None,
    ];

    /// Stem of the badge icon file, e.g. `Anima` for `Anima.png`.
    pub fn icon_stem(self) -> &'static str {
        match self {
            Self::Blood => "Blood",
            Self::Sol => "Sol",
            Self::Anima => "Anima",
            Self::Dark => "Dark",
            Self::Light => "Light",
            Self::All => "All",
            Self::None => "None",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blood => "blood",
            Self::Sol => "sol",
            Self::Anima => "anima",
            Self::Dark => "dark",
            Self::Light => "light",
            Self::All => "all",
            Self::None => "none",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = crate::foundation::error::AzothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| Self::Err::validation(format!("unknown category '{s}'")))
    }
}

/// Tones for one palette mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    pub background: Rgba8,
    pub foreground: Rgba8,
    /// Badge numerals drawn over the icon.
    pub badge_text: Rgba8,
}

impl Palette {
    pub const DARK: Self = Self {
        background: Rgba8::opaque(12, 12, 12),
        foreground: Rgba8::opaque(225, 225, 225),
        badge_text: Rgba8::opaque(12, 12, 12),
    };

    pub const LIGHT: Self = Self {
        background: Rgba8::opaque(225, 225, 225),
        foreground: Rgba8::opaque(12, 12, 12),
        badge_text: Rgba8::opaque(12, 12, 12),
    };
}

/// Dark/light tone pairs plus per-category accents.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PaletteSet {
    pub dark: Palette,
    pub light: Palette,
    pub accents: BTreeMap<Category, Rgba8>,
}

impl Default for PaletteSet {
    fn default() -> Self {
        let accents = BTreeMap::from([
            (Category::Blood, Rgba8::opaque(255, 0, 0)),
            (Category::Sol, Rgba8::opaque(249, 164, 16)),
            (Category::Anima, Rgba8::opaque(135, 105, 233)),
            (Category::Dark, Rgba8::opaque(0, 0, 0)),
            (Category::Light, Rgba8::opaque(255, 255, 255)),
            (Category::All, Rgba8::opaque(255, 255, 255)),
            (Category::None, Rgba8::opaque(225, 225, 225)),
        ]);
        Self {
            dark: Palette::DARK,
            light: Palette::LIGHT,
            accents,
        }
    }
}

impl PaletteSet {
    pub fn palette(&self, mode: PaletteMode) -> &Palette {
        match mode {
            PaletteMode::Dark => &self.dark,
            PaletteMode::Light => &self.light,
        }
    }

    /// Accent for `category`; unknown entries fall back to the neutral accent.
    pub fn accent(&self, category: Category) -> Rgba8 {
        self.accents
            .get(&category)
            .or_else(|| self.accents.get(&Category::None))
            .copied()
            .unwrap_or(Rgba8::opaque(225, 225, 225))
    }

    pub fn resolve(&self, mode: PaletteMode, category: Category) -> ResolvedPalette {
        ResolvedPalette {
            mode,
            tones: *self.palette(mode),
            accent: self.accent(category),
        }
    }
}

/// Everything a single render needs to know about colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPalette {
    pub mode: PaletteMode,
    pub tones: Palette,
    pub accent: Rgba8,
}

impl ResolvedPalette {
    /// `(dark, light)` tones that near-black and near-white art pixels snap to.
    pub fn ink_tones(&self) -> (Rgba8, Rgba8) {
        match self.mode {
            PaletteMode::Dark => (self.tones.background, self.tones.foreground),
            PaletteMode::Light => (self.tones.foreground, self.tones.background),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;
