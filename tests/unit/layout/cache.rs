use image::Rgba;

use super::*;
use crate::{
    assets::{fonts::FontAsset, icons::IconSet},
    config::RenderConfig,
    model::FateCard,
    palette::{Category, PaletteMode},
};

fn event(name: &str) -> CardRecord {
    CardRecord::Event(FateCard {
        name: name.into(),
        category: Category::Light,
        foresight: None,
        text: String::new(),
        palette: PaletteMode::Light,
        art: None,
    })
}

fn compositor() -> CardCompositor {
    let font = FontAsset::from_bytes("unused.ttf", vec![1; 8]).unwrap();
    CardCompositor::new(RenderConfig::default(), font, IconSet::empty())
}

#[test]
fn paths_are_keyed_by_slug() {
    let cache = RenderCache::new("cards");
    assert_eq!(
        cache.path_for(&event("Veil of Dusk")),
        Path::new("cards").join("veil_of_dusk.png")
    );
}

#[test]
fn lookup_misses_then_hits() {
    let dir = tempfile::tempdir().unwrap();
    let cache = RenderCache::new(dir.path());
    let record = event("Omen");
    assert!(cache.lookup(&record).unwrap().is_none());

    let img = RgbaImage::from_pixel(5, 7, Rgba([1, 2, 3, 255]));
    img.save(cache.path_for(&record)).unwrap();
    assert_eq!(cache.lookup(&record).unwrap(), Some(img));
}

#[test]
fn stale_entries_are_reused() {
    let dir = tempfile::tempdir().unwrap();
    let cache = RenderCache::new(dir.path());
    let record = event("Old News");
    let stale = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
    stale.save(cache.path_for(&record)).unwrap();

    // a hit never touches the compositor, whose font is unusable here
    let got = cache.load_or_render(&compositor(), &[&record]);
    assert_eq!(got.len(), 1);
    assert_eq!(got.into_iter().next().unwrap().unwrap(), stale);
}

#[test]
fn misses_surface_render_errors_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let cache = RenderCache::new(dir.path());
    let hit = event("Hit");
    RgbaImage::from_pixel(2, 2, Rgba([5, 5, 5, 255]))
        .save(cache.path_for(&hit))
        .unwrap();
    let miss = event("Miss");

    let got = cache.load_or_render(&compositor(), &[&hit, &miss]);
    assert!(got[0].is_ok());
    assert!(got[1].is_err());
    assert!(!cache.path_for(&miss).exists());
}
