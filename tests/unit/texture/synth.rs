use super::*;

fn registry() -> BasisRegistry {
    let mut reg = BasisRegistry::new();
    reg.insert(BasisSet::rectangle("plate", 60.0, 40.0, 12, 8, 10).unwrap())
        .unwrap();
    reg
}

fn zeroed(mut set: BasisSet) -> BasisSet {
    for f in &mut set.eigenfunctions {
        f.iter_mut().for_each(|v| *v = 0.0);
    }
    set
}

#[test]
fn draw_modes_stays_in_lower_half() {
    let set = BasisSet::rectangle("plate", 60.0, 40.0, 12, 8, 10).unwrap();
    let mut rng = Rng64::new(3);
    for _ in 0..200 {
        let (idx, amp) = draw_modes(&set, &mut rng);
        assert!((2..=4).contains(&idx.len()));
        assert_eq!(idx.len(), amp.len());
        assert!(idx.iter().all(|&i| i < 5));
        let mut uniq = idx.clone();
        uniq.sort_unstable();
        uniq.dedup();
        assert_eq!(uniq.len(), idx.len());
        assert!(amp.iter().all(|a| (-1.0..1.0).contains(a)));
    }
}

#[test]
fn combine_normalizes_to_unit_peak() {
    let set = BasisSet::rectangle("plate", 60.0, 40.0, 12, 8, 10).unwrap();
    let v = combine_modes(&set, &[0, 2], &[0.5, -0.25]).unwrap();
    let peak = v.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    assert!((peak - 1.0).abs() < 1e-12);
}

#[test]
fn zero_coefficients_are_degenerate() {
    let set = zeroed(BasisSet::rectangle("flat", 60.0, 40.0, 12, 8, 10).unwrap());
    let err = combine_modes(&set, &[0, 1], &[1.0, 1.0]).unwrap_err();
    assert!(matches!(err, AzothError::GenerationDegenerate(_)));

    let mut reg = BasisRegistry::new();
    reg.insert(set).unwrap();
    let palettes = PaletteSet::default();
    let synth = TextureSynthesizer::new(&reg, &palettes).with_retries(3);
    let mut rng = Rng64::new(1);
    let once = synth.synthesize_once(Some("flat"), Category::Sol, &mut rng);
    assert!(matches!(once, Err(AzothError::GenerationDegenerate(_))));
    let retried = synth.synthesize(Some("flat"), Category::Sol, &mut rng);
    let Err(AzothError::GenerationDegenerate(msg)) = retried else {
        panic!("expected GenerationDegenerate after retries");
    };
    assert!(msg.contains("4 draws"));
}

#[test]
fn interpolation_marks_outside_cells_undefined() {
    let set = BasisSet::rectangle("plate", 60.0, 40.0, 12, 8, 10).unwrap();
    let values = vec![1.0; set.vertices.len()];
    let field = interpolate(&set, &values);
    assert_eq!(field.width, 60 + 2 * GRID_PADDING);
    assert_eq!(field.height, 40 + 2 * GRID_PADDING);
    assert_eq!(field.get(0, 0), None);
    let mid = field.get(field.width / 2, field.height / 2).unwrap();
    assert!((mid - 1.0).abs() < 1e-9);
}

#[test]
fn interpolation_is_linear_inside_triangles() {
    let set = BasisSet::rectangle("plate", 60.0, 40.0, 12, 8, 10).unwrap();
    let values: Vec<f64> = set.vertices.iter().map(|[x, _]| *x / 60.0).collect();
    let field = interpolate(&set, &values);
    let (cx, cy) = (field.width / 2, field.height / 2);
    let v = field.get(cx, cy).unwrap();
    let (min_x, _, max_x, _) = set.bounds();
    let dx = (max_x - min_x + 2.0 * GRID_PADDING as f64) / (field.width - 1) as f64;
    let x = min_x - GRID_PADDING as f64 + cx as f64 * dx;
    assert!((v - x / 60.0).abs() < 1e-9);
}

#[test]
fn synthesized_texture_is_mirror_symmetric() {
    let reg = registry();
    let palettes = PaletteSet::default();
    let synth = TextureSynthesizer::new(&reg, &palettes);
    let mut rng = Rng64::new(77);
    let tex = synth.synthesize(None, Category::Anima, &mut rng).unwrap();
    let (w, h) = tex.image.dimensions();
    assert_eq!(w % 2, 0);
    for y in 0..h {
        for x in 0..w {
            assert_eq!(tex.image.get_pixel(x, y), tex.image.get_pixel(w - 1 - x, y));
        }
    }
    assert!(tex.params.symmetric);
    assert_eq!(tex.params.basis_id, "plate");
}

#[test]
fn same_seed_same_raster() {
    let reg = registry();
    let palettes = PaletteSet::default();
    let synth = TextureSynthesizer::new(&reg, &palettes);
    let a = synth
        .synthesize(Some("plate"), Category::Blood, &mut Rng64::new(9))
        .unwrap();
    let b = synth
        .synthesize(Some("plate"), Category::Blood, &mut Rng64::new(9))
        .unwrap();
    assert_eq!(a.params, b.params);
    assert_eq!(a.image.as_raw(), b.image.as_raw());
}

#[test]
fn colors_are_pattern_accent_or_transparent() {
    let reg = registry();
    let palettes = PaletteSet::default();
    let synth = TextureSynthesizer::new(&reg, &palettes);
    let tex = synth
        .synthesize(None, Category::Anima, &mut Rng64::new(21))
        .unwrap();
    let accent = palettes.accent(Category::Anima).to_image();
    let pattern = palettes.dark.background.to_image();
    let clear = Rgba8::TRANSPARENT.to_image();
    let mut saw_accent = false;
    for px in tex.image.pixels() {
        assert!(*px == accent || *px == pattern || *px == clear);
        saw_accent |= *px == accent;
    }
    assert!(saw_accent);
}

#[test]
fn params_reproduce_the_raster() {
    let reg = registry();
    let palettes = PaletteSet::default();
    let synth = TextureSynthesizer::new(&reg, &palettes);
    let tex = synth
        .synthesize(None, Category::Sol, &mut Rng64::new(5))
        .unwrap();
    let set = reg.get(&tex.params.basis_id).unwrap();
    let again = render_params(&set, &tex.params, &palettes).unwrap();
    assert_eq!(again.as_raw(), tex.image.as_raw());
}

#[test]
fn unknown_basis_is_asset_not_found() {
    let reg = registry();
    let palettes = PaletteSet::default();
    let synth = TextureSynthesizer::new(&reg, &palettes);
    let err = synth
        .synthesize(Some("dome"), Category::Sol, &mut Rng64::new(5))
        .unwrap_err();
    assert!(err.is_asset_not_found());
}
