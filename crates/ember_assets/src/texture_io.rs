//! Load and save textures through the `image` and `exr` codecs.
//!
//! Textures keep row 0 at the bottom while image files store the top row
//! first, so rows are flipped in both directions.

use std::path::Path;

use ember_core::{Rgba8, Texel, Texture, TextureStorage};
use exr::prelude::{read_first_rgba_layer_from_file, write_rgba_file};
use glam::Vec4;
use image::{DynamicImage, GrayImage, Luma, Rgb32FImage, RgbaImage};

use crate::error::TextureIoError;

pub trait TextureIo: Sized {
    /// Decodes the file at `path` into a new texture with a single level.
    fn load(path: impl AsRef<Path>) -> Result<Self, TextureIoError>;

    /// Encodes level 0; the codec is picked from the file extension.
    fn save(&self, path: impl AsRef<Path>) -> Result<(), TextureIoError>;

    /// Replaces `self` with the file's contents. On error `self` is left untouched.
    fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), TextureIoError> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(texture) => {
                *self = texture;
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e}", path.display());
                Err(e)
            }
        }
    }
}

impl TextureIo for Texture<Rgba8> {
    fn load(path: impl AsRef<Path>) -> Result<Self, TextureIoError> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let (width, height) = (img.width() as usize, img.height() as usize);
        let texels = img.pixels().map(|p| Rgba8::from(p.0)).collect();

        log::debug!("Loaded {width}x{height} RGBA8 texture from {}", path.display());
        Ok(from_top_down(width, height, texels))
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<(), TextureIoError> {
        let path = path.as_ref();
        let (width, height) = (self.width() as u32, self.height() as u32);
        let img = RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba(self.at(x as usize, flip(y, height)).to_array())
        });
        img.save(path)?;

        log::debug!("Saved {width}x{height} RGBA8 texture to {}", path.display());
        Ok(())
    }
}

impl TextureIo for Texture<Vec4> {
    fn load(path: impl AsRef<Path>) -> Result<Self, TextureIoError> {
        let path = path.as_ref();
        let (width, height, texels) = if has_extension(path, "exr") {
            read_exr(path)?
        } else {
            let img = image::open(path)?.to_rgba32f();
            let (width, height) = (img.width() as usize, img.height() as usize);
            let texels = img.pixels().map(|p| Vec4::from_array(p.0)).collect();
            (width, height, texels)
        };

        log::debug!("Loaded {width}x{height} float texture from {}", path.display());
        Ok(from_top_down(width, height, texels))
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<(), TextureIoError> {
        let path = path.as_ref();
        let (width, height) = (self.width(), self.height());

        if has_extension(path, "exr") {
            write_rgba_file(path, width, height, |x, y| {
                let t = self.at(x, height - 1 - y);
                (t.x, t.y, t.z, t.w)
            })?;
        } else if has_extension(path, "hdr") {
            let img = Rgb32FImage::from_fn(width as u32, height as u32, |x, y| {
                image::Rgb(self.at(x as usize, flip(y, height as u32)).truncate().to_array())
            });
            DynamicImage::ImageRgb32F(img).save(path)?;
        } else {
            return Err(TextureIoError::UnsupportedFormat(path.to_path_buf()));
        }

        log::debug!("Saved {width}x{height} float texture to {}", path.display());
        Ok(())
    }
}

/// Depth buffers: grayscale images, depth clamped to `[0, 1]`.
impl TextureIo for Texture<f32> {
    fn load(path: impl AsRef<Path>) -> Result<Self, TextureIoError> {
        let path = path.as_ref();
        let img = image::open(path)?.to_luma32f();
        let (width, height) = (img.width() as usize, img.height() as usize);
        let texels = img.pixels().map(|p| p.0[0]).collect();

        log::debug!("Loaded {width}x{height} depth texture from {}", path.display());
        Ok(from_top_down(width, height, texels))
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<(), TextureIoError> {
        let path = path.as_ref();
        let (width, height) = (self.width() as u32, self.height() as u32);
        let img = GrayImage::from_fn(width, height, |x, y| {
            let depth = self.at(x as usize, flip(y, height));
            Luma([(depth.clamp(0.0, 1.0) * 255.0).round() as u8])
        });
        img.save(path)?;

        log::debug!("Saved {width}x{height} depth texture to {}", path.display());
        Ok(())
    }
}

struct ExrPixels {
    width: usize,
    texels: Vec<Vec4>,
}

fn read_exr(path: &Path) -> Result<(usize, usize, Vec<Vec4>), TextureIoError> {
    let image = read_first_rgba_layer_from_file(
        path,
        |resolution, _| ExrPixels {
            width: resolution.width(),
            texels: vec![Vec4::ZERO; resolution.width() * resolution.height()],
        },
        |pixels, position, (r, g, b, a): (f32, f32, f32, f32)| {
            pixels.texels[position.y() * pixels.width + position.x()] = Vec4::new(r, g, b, a);
        },
    )?;

    let pixels = image.layer_data.channel_data.pixels;
    let height = pixels.texels.len().checked_div(pixels.width).unwrap_or(0);
    Ok((pixels.width, height, pixels.texels))
}

/// Builds a texture from rows stored top row first.
fn from_top_down<T: Texel>(width: usize, height: usize, texels: Vec<T>) -> Texture<T> {
    let texels = if width == 0 {
        texels
    } else {
        texels.chunks_exact(width).rev().flatten().copied().collect()
    };
    Texture::from_storage(TextureStorage::from_texels(width, height, texels))
}

#[inline]
fn flip(y: u32, height: u32) -> usize {
    (height - 1 - y) as usize
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_down_rows_are_reversed() {
        let t = from_top_down(2, 2, vec![1.0f32, 2.0, 3.0, 4.0]);
        assert_eq!(t.texels(), &[3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_extension(Path::new("probe.EXR"), "exr"));
        assert!(!has_extension(Path::new("probe.exr.png"), "exr"));
        assert!(!has_extension(Path::new("probe"), "exr"));
    }
}
