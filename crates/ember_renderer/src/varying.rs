use std::ops::{Add, Mul};

use glam::Vec4;

/// A value that can be blended by the rasterizer.
pub trait Interpolate: Copy {
    /// `Σ values[i] * weights[i]`; `N` must be at least 1.
    fn weighted<const N: usize>(values: [Self; N], weights: [f32; N]) -> Self;
}

impl<T> Interpolate for T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    #[inline]
    fn weighted<const N: usize>(values: [Self; N], weights: [f32; N]) -> Self {
        let mut sum = values[0] * weights[0];
        for (value, weight) in values.into_iter().zip(weights).skip(1) {
            sum = sum + value * weight;
        }
        sum
    }
}

/// Per-vertex output of a vertex shader, blended into per-pixel input of a
/// fragment shader.
///
/// Only the fields `interpolate` writes are blended. Every fragment starts as
/// a clone of the first vertex of its primitive, so other fields carry that
/// vertex's value. The position is owned by the renderer: after the vertex
/// stage it holds the clip-space position, in a fragment it holds the window
/// coordinate `(x + 0.5, y + 0.5, depth, 1 / w)`.
///
/// Use [`varying!`](crate::varying!) to implement this for a plain struct.
pub trait Varying: Clone {
    fn position(&self) -> Vec4;
    fn position_mut(&mut self) -> &mut Vec4;

    /// Writes the weighted sum of every interpolated field of `sources` into `self`.
    fn interpolate<const N: usize>(&mut self, sources: [&Self; N], weights: [f32; N]);
}

/// Implements [`Varying`] for a struct with a `Vec4` position field and a
/// non-empty list of interpolated fields.
///
/// ```
/// use ember_renderer::glam::{Vec2, Vec3, Vec4};
///
/// #[derive(Clone)]
/// struct Out {
///     position: Vec4,
///     uv: Vec2,
///     normal: Vec3,
///     material: u32,
/// }
///
/// ember_renderer::varying!(Out { position: position, uv, normal });
/// ```
///
/// A varying with nothing to interpolate is rejected:
///
/// ```compile_fail
/// use ember_renderer::glam::Vec4;
///
/// #[derive(Clone)]
/// struct Bare {
///     position: Vec4,
/// }
///
/// ember_renderer::varying!(Bare { position: position });
/// ```
#[macro_export]
macro_rules! varying {
    ($ty:ty { position: $position:ident $(, $field:ident)+ $(,)? }) => {
        impl $crate::Varying for $ty {
            #[inline]
            fn position(&self) -> $crate::glam::Vec4 {
                self.$position
            }

            #[inline]
            fn position_mut(&mut self) -> &mut $crate::glam::Vec4 {
                &mut self.$position
            }

            #[inline]
            fn interpolate<const N: usize>(&mut self, sources: [&Self; N], weights: [f32; N]) {
                $(
                    self.$field = $crate::Interpolate::weighted(sources.map(|s| s.$field), weights);
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[derive(Clone, Debug)]
    struct Sample {
        position: Vec4,
        color: Vec3,
        uv: Vec2,
        id: u32,
    }

    crate::varying!(Sample { position: position, color, uv });

    fn sample(color: Vec3, uv: Vec2, id: u32) -> Sample {
        Sample {
            position: Vec4::W,
            color,
            uv,
            id,
        }
    }

    #[test]
    fn weighted_sum_of_scalars_and_vectors() {
        assert_eq!(f32::weighted([1.0, 3.0], [0.25, 0.75]), 2.5);
        assert_eq!(
            Vec3::weighted([Vec3::X, Vec3::Y, Vec3::Z], [0.2, 0.3, 0.5]),
            Vec3::new(0.2, 0.3, 0.5)
        );
    }

    #[test]
    fn declared_fields_are_blended() {
        let a = sample(Vec3::X, Vec2::ZERO, 1);
        let b = sample(Vec3::Y, Vec2::ONE, 2);
        let c = sample(Vec3::Z, Vec2::X, 3);

        let mut out = a.clone();
        out.interpolate([&a, &b, &c], [0.5, 0.25, 0.25]);

        assert!(out.color.abs_diff_eq(Vec3::new(0.5, 0.25, 0.25), 1e-6));
        assert!(out.uv.abs_diff_eq(Vec2::new(0.5, 0.25), 1e-6));
    }

    #[test]
    fn undeclared_fields_keep_provoking_value() {
        let a = sample(Vec3::ZERO, Vec2::ZERO, 7);
        let b = sample(Vec3::ONE, Vec2::ONE, 9);

        let mut out = a.clone();
        out.interpolate([&a, &b], [0.1, 0.9]);

        assert_eq!(out.id, 7);
        assert_eq!(out.position(), Vec4::W);
    }
}
