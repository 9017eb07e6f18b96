use super::*;

#[test]
fn slug_lowercases_and_underscores() {
    assert_eq!(slug("Catalyst of Anima"), "catalyst_of_anima");
    assert_eq!(slug("  Sol  "), "sol");
    assert_eq!(slug("ALREADY_slugged"), "already_slugged");
}

#[test]
fn rgba_serializes_as_array() {
    let c = Rgba8::opaque(135, 105, 233);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "[135,105,233,255]");
    let back: Rgba8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}

#[test]
fn premul_scales_channels_by_alpha() {
    assert_eq!(Rgba8::new(200, 100, 0, 255).to_premul(), [200, 100, 0, 255]);
    assert_eq!(Rgba8::new(200, 100, 50, 0).to_premul(), [0, 0, 0, 0]);
    assert_eq!(Rgba8::new(255, 255, 255, 128).to_premul(), [128, 128, 128, 128]);
}

#[test]
fn pixel_rect_edges_and_square() {
    let r = PixelRect::new(10, 20, 30, 30);
    assert_eq!(r.right(), 40);
    assert_eq!(r.bottom(), 50);
    assert!(r.is_square());
    assert_eq!(r.to_rect(), Rect::new(10.0, 20.0, 40.0, 50.0));
    assert_eq!(PixelRect::full(PixelSize::new(4, 5)), PixelRect::new(0, 0, 4, 5));
}

#[test]
fn transposed_swaps_dimensions() {
    assert_eq!(PixelSize::new(2448, 3330).transposed(), PixelSize::new(3330, 2448));
}
