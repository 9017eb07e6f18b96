//! Card records as they arrive from the record source.
//!
//! Each variant knows how to describe itself to the compositor through
//! [`Renderable`]; two-sided rituals additionally expose both sides via
//! [`CardRecord::shape`].

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    foundation::core::slug,
    foundation::error::{AzothError, AzothResult},
    palette::{Category, PaletteMode},
};

/// Standard card: valence badge, category icon, accent border.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub valence: Option<i32>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub palette: PaletteMode,
    #[serde(default)]
    pub art: Option<PathBuf>,
}

/// Consumable, event or aspect: foresight badge, title low on the card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FateCard {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub foresight: Option<i32>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub palette: PaletteMode,
    #[serde(default)]
    pub art: Option<PathBuf>,
}

/// One half of a ritual.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RitualSide {
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub art: Option<PathBuf>,
    /// Challenge rating, e.g. `"hard"`; shown beside the name on the seam label.
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl RitualSide {
    /// Seam label text: the name, followed by the difficulty when set.
    pub fn label(&self) -> Cow<'_, str> {
        match self.difficulty.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Cow::Owned(format!("{} ({d})", self.name)),
            _ => Cow::Borrowed(&self.name),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ActiveSide {
    #[default]
    Challenge,
    Reward,
}

/// Two-sided card: challenge on the dark half, reward on the light half.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RitualCard {
    pub challenge: RitualSide,
    pub reward: RitualSide,
    #[serde(default)]
    pub foresight: Option<i32>,
    #[serde(default)]
    pub category: Category,
    /// Side whose name becomes the output filename.
    #[serde(default)]
    pub active: ActiveSide,
}

impl RitualCard {
    pub fn active_side(&self) -> &RitualSide {
        match self.active {
            ActiveSide::Challenge => &self.challenge,
            ActiveSide::Reward => &self.reward,
        }
    }
}

/// Tagged union of every card shape the renderer accepts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CardRecord {
    Card(CardFace),
    Ritual(RitualCard),
    Consumable(FateCard),
    Event(FateCard),
    Aspect(FateCard),
}

/// Icon drawn inside the badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeIcon {
    Category(Category),
    /// Shared eye glyph for foresight badges.
    View,
}

/// Vertical arrangement of the single-sided layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceLayout {
    /// Title under the badge, body in the lower third, accent border.
    Standard,
    /// Title and body pushed down to leave room for art.
    Fate,
}

/// Common capability every card variant exposes to the compositor.
pub trait Renderable {
    /// Name used for the output slug.
    fn name(&self) -> &str;
    fn palette(&self) -> PaletteMode;
    fn category(&self) -> Category;
    fn badge_value(&self) -> Option<i32>;
    fn badge_icon(&self) -> BadgeIcon;
    fn title(&self) -> &str;
    fn body_text(&self) -> &str;
    fn art(&self) -> Option<&Path>;
    fn face_layout(&self) -> FaceLayout;

    /// Rotated label along the right edge, if any.
    fn side_label(&self) -> Option<&str> {
        None
    }

    fn slug(&self) -> String {
        slug(self.name())
    }
}

impl Renderable for CardFace {
    fn name(&self) -> &str {
        &self.name
    }
    fn palette(&self) -> PaletteMode {
        self.palette
    }
    fn category(&self) -> Category {
        self.category
    }
    fn badge_value(&self) -> Option<i32> {
        self.valence
    }
    fn badge_icon(&self) -> BadgeIcon {
        BadgeIcon::Category(self.category)
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn body_text(&self) -> &str {
        &self.text
    }
    fn art(&self) -> Option<&Path> {
        self.art.as_deref()
    }
    fn face_layout(&self) -> FaceLayout {
        FaceLayout::Standard
    }
}

impl Renderable for FateCard {
    fn name(&self) -> &str {
        &self.name
    }
    fn palette(&self) -> PaletteMode {
        self.palette
    }
    fn category(&self) -> Category {
        self.category
    }
    fn badge_value(&self) -> Option<i32> {
        self.foresight
    }
    fn badge_icon(&self) -> BadgeIcon {
        BadgeIcon::View
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn body_text(&self) -> &str {
        &self.text
    }
    fn art(&self) -> Option<&Path> {
        self.art.as_deref()
    }
    fn face_layout(&self) -> FaceLayout {
        FaceLayout::Fate
    }
}

impl Renderable for RitualCard {
    fn name(&self) -> &str {
        &self.active_side().name
    }
    fn palette(&self) -> PaletteMode {
        PaletteMode::Dark
    }
    fn category(&self) -> Category {
        self.category
    }
    fn badge_value(&self) -> Option<i32> {
        self.foresight
    }
    fn badge_icon(&self) -> BadgeIcon {
        BadgeIcon::View
    }
    fn title(&self) -> &str {
        &self.active_side().name
    }
    fn body_text(&self) -> &str {
        &self.active_side().text
    }
    fn art(&self) -> Option<&Path> {
        self.active_side().art.as_deref()
    }
    fn face_layout(&self) -> FaceLayout {
        FaceLayout::Standard
    }
}

/// Exactly one shape is populated per render.
pub enum CardShape<'a> {
    Single(&'a dyn Renderable),
    TwoSided(&'a RitualCard),
}

impl CardRecord {
    pub fn shape(&self) -> CardShape<'_> {
        match self {
            Self::Ritual(r) => CardShape::TwoSided(r),
            _ => CardShape::Single(self),
        }
    }

    fn inner(&self) -> &dyn Renderable {
        match self {
            Self::Card(c) => c,
            Self::Ritual(r) => r,
            Self::Consumable(f) | Self::Event(f) | Self::Aspect(f) => f,
        }
    }

    pub fn validate(&self) -> AzothResult<()> {
        let names: Vec<&str> = match self {
            Self::Card(c) => vec![c.name.as_str()],
            Self::Ritual(r) => vec![r.challenge.name.as_str(), r.reward.name.as_str()],
            Self::Consumable(f) | Self::Event(f) | Self::Aspect(f) => vec![f.name.as_str()],
        };
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(AzothError::validation("card name must be non-empty"));
        }
        Ok(())
    }

    pub fn from_json_file(path: &Path) -> AzothResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read card '{}'", path.display()))?;
        let record: Self = serde_json::from_slice(&bytes)?;
        record.validate()?;
        Ok(record)
    }
}

impl Renderable for CardRecord {
    fn name(&self) -> &str {
        self.inner().name()
    }
    fn palette(&self) -> PaletteMode {
        self.inner().palette()
    }
    fn category(&self) -> Category {
        self.inner().category()
    }
    fn badge_value(&self) -> Option<i32> {
        self.inner().badge_value()
    }
    fn badge_icon(&self) -> BadgeIcon {
        self.inner().badge_icon()
    }
    fn title(&self) -> &str {
        self.inner().title()
    }
    fn body_text(&self) -> &str {
        self.inner().body_text()
    }
    fn art(&self) -> Option<&Path> {
        self.inner().art()
    }
    fn face_layout(&self) -> FaceLayout {
        self.inner().face_layout()
    }
    fn side_label(&self) -> Option<&str> {
        match self {
            Self::Consumable(f) => Some(f.name.as_str()),
            _ => None,
        }
    }
}

/// Loads a JSON array of records.
pub fn load_deck(path: &Path) -> AzothResult<Vec<CardRecord>> {
    let bytes = std::fs::read(path).with_context(|| format!("read deck '{}'", path.display()))?;
    let deck: Vec<CardRecord> = serde_json::from_slice(&bytes)?;
    for record in &deck {
        record.validate()?;
    }
    Ok(deck)
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
