use std::fmt::Debug;
use std::ops::{Add, Mul};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Element type of a texture.
///
/// Filtering and mip generation work on [`Texel::Value`], a floating point
/// form of the texel; results are narrowed back with [`Texel::from_value`].
pub trait Texel: Copy + Default + Debug + 'static {
    type Value: Copy + Default + Debug + Add<Output = Self::Value> + Mul<f32, Output = Self::Value>;

    fn to_value(self) -> Self::Value;
    fn from_value(value: Self::Value) -> Self;
}

/// 8-bit RGBA color, the presentable color format.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Normalized color in `[0, 1]`.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r as f32, self.g as f32, self.b as f32, self.a as f32) / 255.0
    }

    /// Clamps to `[0, 1]` and rounds to the nearest 8-bit step.
    pub fn from_vec4(color: Vec4) -> Self {
        // NaN channels become 0
        let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
        Self::new(c.x as u8, c.y as u8, c.z as u8, c.w as u8)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl Texel for Rgba8 {
    type Value = Vec4;

    fn to_value(self) -> Vec4 {
        self.to_vec4()
    }

    fn from_value(value: Vec4) -> Self {
        Self::from_vec4(value)
    }
}

macro_rules! float_texel {
    ($($ty:ty),*) => {
        $(
            impl Texel for $ty {
                type Value = $ty;

                #[inline]
                fn to_value(self) -> $ty {
                    self
                }

                #[inline]
                fn from_value(value: $ty) -> Self {
                    value
                }
            }
        )*
    };
}

float_texel!(f32, Vec2, Vec3, Vec4);
