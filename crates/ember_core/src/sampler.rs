//! Filtered texture lookups.

use glam::{UVec2, Vec2};

use crate::texel::Texel;
use crate::texture::{Texture, TextureStorage};

/// Texture coordinate addressing outside `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Wrap {
    Repeat,
    #[default]
    ClampEdge,
}

/// Texel filter, optionally combined with a mip filter.
///
/// The first word names the filter inside a level, the second how levels are
/// chosen: `LinearMipmapNearest` is bilinear within the nearest level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MipMode {
    Base,
    Nearest,
    Linear,
}

impl Filter {
    /// Whether texels inside a level are blended bilinearly.
    pub fn is_bilinear(self) -> bool {
        matches!(
            self,
            Filter::Linear | Filter::LinearMipmapNearest | Filter::LinearMipmapLinear
        )
    }

    /// Whether the filter reads levels other than 0.
    pub fn uses_mipmaps(self) -> bool {
        self.mip_mode() != MipMode::Base
    }

    fn mip_mode(self) -> MipMode {
        match self {
            Filter::Nearest | Filter::Linear => MipMode::Base,
            Filter::NearestMipmapNearest | Filter::LinearMipmapNearest => MipMode::Nearest,
            Filter::NearestMipmapLinear | Filter::LinearMipmapLinear => MipMode::Linear,
        }
    }
}

/// A filtering and wrapping policy viewing a texture.
///
/// Samplers are cheap to copy; several may view one texture with different
/// policies. Sampling an unbound sampler panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler<'a, T: Texel> {
    texture: Option<&'a Texture<T>>,
    pub filter: Filter,
    pub wrap: Wrap,
}

impl<'a, T: Texel> Sampler<'a, T> {
    pub fn new(texture: &'a Texture<T>) -> Self {
        Self {
            texture: Some(texture),
            filter: Filter::default(),
            wrap: Wrap::default(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn bind(&mut self, texture: &'a Texture<T>) {
        self.texture = Some(texture);
    }

    pub fn is_bound(&self) -> bool {
        self.texture.is_some()
    }

    pub fn texture(&self) -> Option<&'a Texture<T>> {
        self.texture
    }

    /// Size of level 0 in texels.
    pub fn size(&self) -> UVec2 {
        self.bound().size()
    }

    /// Size of one level-0 texel in texture coordinates.
    pub fn inv_size(&self) -> Vec2 {
        Vec2::ONE / self.size().as_vec2()
    }

    /// Level-0 lookup.
    pub fn sample(&self, uv: Vec2) -> T::Value {
        self.sample_level(self.bound().base(), uv)
    }

    /// Lookup at mip level `lod`, clamped to the available chain.
    ///
    /// Plain `Nearest`/`Linear` filters ignore `lod` and read level 0.
    pub fn sample_lod(&self, uv: Vec2, lod: f32) -> T::Value {
        let texture = self.bound();
        let max_level = (texture.mip_count() - 1) as f32;
        let lod = if lod.is_nan() { 0.0 } else { lod.clamp(0.0, max_level) };

        match self.filter.mip_mode() {
            MipMode::Base => self.sample_level(texture.base(), uv),
            MipMode::Nearest => self.sample_level(texture.level(lod.round() as usize), uv),
            MipMode::Linear => {
                let lo = lod.floor();
                let t = lod - lo;
                let near = self.sample_level(texture.level(lo as usize), uv);
                if t == 0.0 {
                    return near;
                }
                let far = self.sample_level(texture.level(lod.ceil() as usize), uv);
                near * (1.0 - t) + far * t
            }
        }
    }

    fn bound(&self) -> &'a Texture<T> {
        match self.texture {
            Some(texture) => texture,
            None => panic!("sampling through an unbound sampler"),
        }
    }

    fn sample_level(&self, level: &TextureStorage<T>, uv: Vec2) -> T::Value {
        let (width, height) = (level.width(), level.height());
        assert!(width > 0 && height > 0, "sampling an empty texture");

        let uv = match self.wrap {
            Wrap::Repeat => uv - uv.floor(),
            Wrap::ClampEdge => uv.clamp(Vec2::ZERO, Vec2::ONE),
        };
        let coord = uv * Vec2::new(width as f32, height as f32);

        if !self.filter.is_bilinear() {
            let x = self.resolve(coord.x.floor() as i64, width);
            let y = self.resolve(coord.y.floor() as i64, height);
            return level.at(x, y).to_value();
        }

        // texel centers sit at half-integer coordinates
        let coord = coord - 0.5;
        let base = coord.floor();
        let f = coord - base;
        let (x0, y0) = (base.x as i64, base.y as i64);

        let x_lo = self.resolve(x0, width);
        let x_hi = self.resolve(x0 + 1, width);
        let y_lo = self.resolve(y0, height);
        let y_hi = self.resolve(y0 + 1, height);

        let texel = |x, y| level.at(x, y).to_value();
        let bottom = texel(x_lo, y_lo) * (1.0 - f.x) + texel(x_hi, y_lo) * f.x;
        let top = texel(x_lo, y_hi) * (1.0 - f.x) + texel(x_hi, y_hi) * f.x;
        bottom * (1.0 - f.y) + top * f.y
    }

    #[inline]
    fn resolve(&self, index: i64, len: usize) -> usize {
        let len = len as i64;
        match self.wrap {
            Wrap::Repeat => index.rem_euclid(len) as usize,
            Wrap::ClampEdge => index.clamp(0, len - 1) as usize,
        }
    }
}
