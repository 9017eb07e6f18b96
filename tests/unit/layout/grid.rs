use image::Rgba;

use super::*;

const CARD: PixelSize = PixelSize::new(2448, 3330);

#[test]
fn twelve_cards_pick_the_closest_covering_grid() {
    let best = choose_grid(12, CARD, 16.0 / 9.0).unwrap();
    assert_eq!((best.cols, best.rows), (6, 2));

    let diff = (best.aspect - 16.0 / 9.0).abs();
    let cell = 2448.0 / 3330.0;
    for cols in 1..=12u32 {
        let rows = 12u32.div_ceil(cols);
        assert!(cols * rows >= 12);
        let aspect = f64::from(cols) * cell / f64::from(rows);
        assert!(diff <= (aspect - 16.0 / 9.0).abs() + 1e-12, "cols={cols}");
    }
}

#[test]
fn single_card_and_empty_grid() {
    let one = choose_grid(1, CARD, 16.0 / 9.0).unwrap();
    assert_eq!((one.cols, one.rows), (1, 1));
    assert!(choose_grid(0, CARD, 16.0 / 9.0).is_none());
}

#[test]
fn small_grid_keeps_native_size() {
    let cards: Vec<RgbaImage> = (0..3)
        .map(|i| RgbaImage::from_pixel(30, 40, Rgba([i * 80, 0, 0, 255])))
        .collect();
    let spec = GridSpec::default();
    let out = compose_grid(&cards, &spec).unwrap();
    // 3 cards at 0.75 aspect: 3x1 gives 2.25, closer to 16:9 than 2x2
    assert_eq!(out.dimensions(), (3 * 30 + 2 * 20 + 100, 40 + 100));
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(*out.get_pixel(50 + 30 + 20 + 5, 60), Rgba([80, 0, 0, 255]));
    assert_eq!(*out.get_pixel(50 + 2 * 50 + 5, 60), Rgba([160, 0, 0, 255]));
}

#[test]
fn wide_grid_is_scaled_to_exactly_max_width() {
    let cards = vec![RgbaImage::from_pixel(600, 800, Rgba([9, 9, 9, 255])); 12];
    let out = compose_grid(&cards, &GridSpec::default()).unwrap();
    assert_eq!(out.width(), 1920);
    let full_w: f64 = 6.0 * 600.0 + 5.0 * 20.0 + 100.0;
    let full_h: f64 = 2.0 * 800.0 + 20.0 + 100.0;
    assert_eq!(out.height(), (full_h * 1920.0 / full_w).round() as u32);
}

#[test]
fn empty_grid_is_rejected() {
    assert!(matches!(
        compose_grid(&[], &GridSpec::default()),
        Err(AzothError::Validation(_))
    ));
}

#[test]
fn grid_spec_fills_defaults_from_partial_json() {
    let spec: GridSpec = serde_json::from_str(r#"{"spacing": 4}"#).unwrap();
    assert_eq!(spec.spacing, 4);
    assert_eq!(spec.max_width, 1920);
    assert_eq!(spec.padding, 50);
}
