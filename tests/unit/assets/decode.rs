use image::Rgba;

use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(px))
}

#[test]
fn png_decodes_to_straight_rgba() {
    let src = solid(3, 2, [100, 50, 200, 128]);
    let bytes = encode_png(&src).unwrap();
    let out = decode_art(&bytes).unwrap();
    assert!(!out.is_animated());
    assert_eq!(out.first().unwrap(), &src);
    assert!(out.delays_ms.is_empty());
}

#[test]
fn gif_expands_into_frames() {
    let frames = vec![
        solid(8, 8, [255, 0, 0, 255]),
        solid(8, 8, [0, 255, 0, 255]),
        solid(8, 8, [0, 0, 255, 255]),
    ];
    let bytes = encode_gif(&frames, &[50, 50, 200]).unwrap();
    let out = decode_art(&bytes).unwrap();
    assert!(out.is_animated());
    assert_eq!(out.frames.len(), 3);
    assert!(out.frames.iter().all(|f| f.dimensions() == (8, 8)));
    assert_eq!(out.delays_ms, vec![50, 50, 200]);
}

#[test]
fn single_frame_gif_is_a_still() {
    let bytes = encode_gif(&[solid(4, 4, [9, 9, 9, 255])], &[]).unwrap();
    let out = decode_art(&bytes).unwrap();
    assert!(!out.is_animated());
    assert_eq!(out.frames.len(), 1);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_art(b"not an image").is_err());
}

#[test]
fn missing_art_is_asset_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_art(&dir.path().join("nope.png")).unwrap_err();
    assert!(err.is_asset_not_found());
    assert!(err.to_string().starts_with("art not found"));
}

#[test]
fn write_into_missing_dir_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_bytes(&dir.path().join("a/b/c.png"), b"x").unwrap_err();
    assert!(matches!(err, AzothError::Io(_)));
}
