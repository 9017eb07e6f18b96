use image::Rgba;

use super::*;
use crate::{model::CardFace, palette::PaletteMode, texture::basis::BasisSet};

fn compositor() -> CardCompositor {
    let font = FontAsset::from_bytes("unused.ttf", vec![0; 16]).unwrap();
    CardCompositor::new(RenderConfig::default(), font, IconSet::empty())
}

fn reference_geo() -> CardGeometry {
    let cfg = RenderConfig::default();
    CardGeometry::new(&cfg, cfg.canvas_size())
}

#[test]
fn standard_boxes_at_reference_size() {
    let boxes = FaceBoxes::new(&reference_geo(), FaceLayout::Standard);
    assert_eq!(boxes.art, Rect::new(300.0, 800.0, 2148.0, 2530.0));
    assert_eq!(boxes.art_size(), PixelSize::new(1848, 1730));
    assert!((boxes.title_top - 550.6).abs() < 1e-9);
    assert_eq!(boxes.body_center, 2664.0);
    assert_eq!(boxes.art_origin(0.0), (300, 800));
    assert_eq!(boxes.art_origin(100.0), (300, 700));
}

#[test]
fn fate_boxes_push_text_down() {
    let geo = reference_geo();
    let standard = FaceBoxes::new(&geo, FaceLayout::Standard);
    let fate = FaceBoxes::new(&geo, FaceLayout::Fate);
    assert_eq!(fate.art_size(), PixelSize::new(1848, 1532));
    assert!(fate.title_top > standard.title_top);
    assert!(fate.body_center > standard.body_center);
    assert!((fate.title_top - 2331.0).abs() < 1e-9);
    assert!(fate.art.y1 < fate.title_top);
}

#[test]
fn layout_report_merges_flags() {
    let a = LayoutReport {
        title_overflow: true,
        body_overflow: false,
    };
    let b = LayoutReport {
        title_overflow: false,
        body_overflow: true,
    };
    assert!(!LayoutReport::default().any());
    let merged = a.merge(b);
    assert!(merged.title_overflow && merged.body_overflow);
    assert_eq!(a.merge(LayoutReport::default()), a);
}

#[test]
fn missing_art_resolves_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let c = compositor();
    let path = dir.path().join("ghost.png");
    let side = c
        .resolve_art(Some(&path), Category::Anima, &ArtInput::FromRecord, None)
        .unwrap();
    assert!(side.frames.is_none());
    let side = c
        .resolve_art(None, Category::Anima, &ArtInput::FromRecord, None)
        .unwrap();
    assert!(side.frames.is_none());
}

#[test]
fn undecodable_art_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png").unwrap();
    let err = compositor()
        .resolve_art(Some(&path), Category::Sol, &ArtInput::FromRecord, None)
        .err()
        .unwrap();
    assert!(!err.is_asset_not_found());
}

#[test]
fn explicit_frames_override_record_art() {
    let frames = Arc::new(ArtFrames::still(RgbaImage::from_pixel(
        3,
        3,
        Rgba([0, 0, 0, 255]),
    )));
    let side = compositor()
        .resolve_art(
            Some(Path::new("ignored.png")),
            Category::Blood,
            &ArtInput::Frames(frames),
            None,
        )
        .unwrap();
    assert_eq!(side.frames.unwrap().frames.len(), 1);
    assert!(side.texture.is_none());
}

#[test]
fn synthesis_without_registry_is_rejected() {
    let mut rng = Rng64::new(7);
    let input = ArtInput::Synthesized {
        basis: None,
        seed: 7,
    };
    let err = compositor()
        .resolve_art(None, Category::Sol, &input, Some(&mut rng))
        .err()
        .unwrap();
    assert!(matches!(err, AzothError::Validation(_)));
}

#[test]
fn synthesis_records_its_parameters() {
    let mut reg = BasisRegistry::new();
    reg.insert(BasisSet::rectangle("plate", 60.0, 40.0, 12, 8, 10).unwrap())
        .unwrap();
    let c = compositor().with_registry(Arc::new(reg));
    let input = ArtInput::Synthesized {
        basis: Some("plate".into()),
        seed: 11,
    };
    let draw = |seed| {
        let mut rng = Rng64::new(seed);
        c.resolve_art(None, Category::Anima, &input, Some(&mut rng))
            .unwrap()
    };
    let a = draw(11);
    let b = draw(11);
    let params = a.texture.unwrap();
    assert_eq!(params.basis_id, "plate");
    assert_eq!(params.category, Category::Anima);
    assert_eq!(Some(params), b.texture);
    assert!(a.frames.unwrap().first().is_some());
}

#[test]
fn blank_names_fail_before_rendering() {
    let record = CardRecord::Card(CardFace {
        name: "  ".into(),
        category: Category::Sol,
        valence: Some(1),
        text: String::new(),
        palette: PaletteMode::Dark,
        art: None,
    });
    let dir = tempfile::tempdir().unwrap();
    let err = compositor().render(&record, dir.path()).unwrap_err();
    assert!(matches!(err, AzothError::Validation(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
