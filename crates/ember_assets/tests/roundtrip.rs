use std::path::PathBuf;

use ember_assets::{TextureIo, TextureIoError, load_mipmaps, mip_level_path, save_mipmaps};
use ember_core::glam::Vec4;
use ember_core::{Rgba8, Texture, TextureStorage};
use rstest::rstest;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ember_assets_{}_{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn rgba_pattern(width: usize, height: usize) -> Texture<Rgba8> {
    let texels = (0..width * height)
        .map(|i| {
            Rgba8::new(
                (i * 37 % 256) as u8,
                (i * 11 % 256) as u8,
                (255 - i % 256) as u8,
                (128 + i % 128) as u8,
            )
        })
        .collect();
    Texture::from_storage(TextureStorage::from_texels(width, height, texels))
}

fn float_pattern(width: usize, height: usize) -> Texture<Vec4> {
    let texels = (0..width * height)
        .map(|i| Vec4::new(i as f32 * 0.37, -1.5 + i as f32, 1e-3 * i as f32, 12.25))
        .collect();
    Texture::from_storage(TextureStorage::from_texels(width, height, texels))
}

// ── single images ─────────────────────────────────────────────────────────

#[test]
fn png_round_trip_is_exact() {
    let path = scratch_dir("png").join("pattern.png");
    let texture = rgba_pattern(5, 3);
    texture.save(&path).unwrap();

    let loaded = Texture::<Rgba8>::load(&path).unwrap();
    assert_eq!(loaded.size(), texture.size());
    assert_eq!(loaded.texels(), texture.texels());
}

#[test]
fn png_file_stores_top_row_first() {
    let path = scratch_dir("orientation").join("rows.png");
    let mut texture = Texture::new(2, 2, Rgba8::BLACK);
    *texture.at_mut(0, 1) = Rgba8::WHITE;
    texture.save(&path).unwrap();

    let file = image::open(&path).unwrap().to_rgba8();
    assert_eq!(file.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(file.get_pixel(0, 1).0, [0, 0, 0, 255]);
}

#[test]
fn exr_round_trip_is_exact() {
    let path = scratch_dir("exr").join("radiance.exr");
    let texture = float_pattern(4, 3);
    texture.save(&path).unwrap();

    let loaded = Texture::<Vec4>::load(&path).unwrap();
    assert_eq!(loaded.size(), texture.size());
    assert_eq!(loaded.texels(), texture.texels());
}

#[test]
fn hdr_round_trip_within_rgbe_precision() {
    let path = scratch_dir("hdr").join("sky.hdr");
    let texels = (0..6).map(|i| Vec4::new(0.25 + i as f32, 3.5 * i as f32, 0.125, 1.0)).collect();
    let texture = Texture::from_storage(TextureStorage::from_texels(3, 2, texels));
    texture.save(&path).unwrap();

    let loaded = Texture::<Vec4>::load(&path).unwrap();
    assert_eq!(loaded.size(), texture.size());
    for (got, want) in loaded.texels().iter().zip(texture.texels()) {
        let tolerance = want.truncate().max_element() / 128.0;
        assert!((*got - *want).abs().max_element() <= tolerance, "{got} vs {want}");
    }
}

#[test]
fn depth_saves_as_grayscale() {
    let path = scratch_dir("depth").join("depth.png");
    let depths = vec![0.0f32, 0.5, 1.0, f32::MAX];
    let texture = Texture::from_storage(TextureStorage::from_texels(2, 2, depths));
    texture.save(&path).unwrap();

    let loaded = Texture::<f32>::load(&path).unwrap();
    let expected = [0.0, 128.0 / 255.0, 1.0, 1.0];
    for (got, want) in loaded.texels().iter().zip(expected) {
        assert!((got - want).abs() < 1e-6, "{got} vs {want}");
    }
}

#[rstest]
#[case::png("radiance.png")]
#[case::no_extension("radiance")]
fn float_textures_need_a_float_format(#[case] name: &str) {
    let path = scratch_dir("unsupported").join(name);
    let err = float_pattern(2, 2).save(&path).unwrap_err();
    assert!(matches!(err, TextureIoError::UnsupportedFormat(_)), "{err}");
}

#[test]
fn failed_reload_keeps_texture() {
    let mut texture = rgba_pattern(2, 2);
    let before = texture.clone();

    let err = texture.reload(scratch_dir("missing").join("nope.png")).unwrap_err();
    assert!(matches!(err, TextureIoError::Image(_)), "{err}");
    assert_eq!(texture, before);
}

#[test]
fn reload_replaces_contents_and_drops_mips() {
    let path = scratch_dir("reload").join("small.png");
    rgba_pattern(3, 1).save(&path).unwrap();

    let mut texture = rgba_pattern(8, 8);
    texture.generate_mipmaps();
    texture.reload(&path).unwrap();

    assert_eq!((texture.width(), texture.height()), (3, 1));
    assert_eq!(texture.mip_count(), 1);
}

// ── mip chains ────────────────────────────────────────────────────────────

#[test]
fn rgba_mip_chain_round_trip() {
    let dir = scratch_dir("mips_rgba");
    let mut texture = rgba_pattern(8, 4);
    texture.generate_mipmaps();

    save_mipmaps(&texture, &dir, "albedo.png").unwrap();
    assert!(mip_level_path(&dir, "albedo.png", 3).is_file());

    let loaded: Texture<Rgba8> = load_mipmaps(&dir, "albedo.png").unwrap();
    assert_eq!(loaded, texture);
}

#[test]
fn float_mip_chain_round_trip() {
    let dir = scratch_dir("mips_exr");
    let mut texture = float_pattern(4, 4);
    texture.generate_mipmaps();

    save_mipmaps(&texture, &dir, "probe.exr").unwrap();
    let loaded: Texture<Vec4> = load_mipmaps(&dir, "probe.exr").unwrap();

    assert_eq!(loaded.mip_count(), 3);
    assert_eq!(loaded, texture);
}

#[test]
fn missing_level_is_reported() {
    let dir = scratch_dir("mips_missing");
    let mut texture = rgba_pattern(4, 4);
    texture.generate_mipmaps();
    save_mipmaps(&texture, &dir, "tiles.png").unwrap();
    std::fs::remove_file(mip_level_path(&dir, "tiles.png", 2)).unwrap();

    let err = load_mipmaps::<Rgba8>(&dir, "tiles.png").unwrap_err();
    assert!(matches!(err, TextureIoError::MissingLevel { level: 2, .. }), "{err}");
}

#[test]
fn wrong_level_size_is_reported() {
    let dir = scratch_dir("mips_mismatch");
    let mut texture = rgba_pattern(4, 4);
    texture.generate_mipmaps();
    save_mipmaps(&texture, &dir, "tiles.png").unwrap();
    rgba_pattern(3, 2).save(mip_level_path(&dir, "tiles.png", 1)).unwrap();

    let err = load_mipmaps::<Rgba8>(&dir, "tiles.png").unwrap_err();
    assert!(
        matches!(
            err,
            TextureIoError::DimensionMismatch {
                level: 1,
                expected: (2, 2),
                actual: (3, 2)
            }
        ),
        "{err}"
    );
}
