use glam::Vec4;

use crate::framebuffer::{DefaultTargets, Pixel, TargetSet};
use crate::varying::Varying;

type VertexShader<V, Var, U> = Box<dyn Fn(&U, &V) -> Var>;
type FragmentShader<Var, U, T> = Box<dyn for<'a> Fn(&U, &Var, Pixel<'a, T>)>;

/// A vertex shader, a fragment shader and the uniforms both read.
///
/// - `V`: vertex record read from a buffer
/// - `Var`: varying record produced per vertex and interpolated per pixel
/// - `U`: uniforms, read-only during a draw
/// - `T`: render target tuple the fragment shader writes
pub struct Program<V, Var, U, T: TargetSet = DefaultTargets> {
    vertex: VertexShader<V, Var, U>,
    fragment: FragmentShader<Var, U, T>,
    uniforms: U,
}

impl<V, Var, U, T> Program<V, Var, U, T>
where
    Var: Varying,
    T: TargetSet,
{
    /// Program whose fragment shader writes targets through a [`Pixel`].
    pub fn new<VS, FS>(uniforms: U, vertex: VS, fragment: FS) -> Self
    where
        VS: Fn(&U, &V) -> Var + 'static,
        FS: for<'a> Fn(&U, &Var, Pixel<'a, T>) + 'static,
    {
        Self {
            vertex: Box::new(vertex),
            fragment: Box::new(fragment),
            uniforms,
        }
    }

    /// Program whose fragment shader returns one color for the `Rgba8` target.
    pub fn with_color_output<VS, FS>(uniforms: U, vertex: VS, fragment: FS) -> Self
    where
        VS: Fn(&U, &V) -> Var + 'static,
        FS: Fn(&U, &Var) -> Vec4 + 'static,
    {
        const { assert!(T::HAS_COLOR, "framebuffer has no Rgba8 target") };
        Self::new(uniforms, vertex, move |uniforms: &U, varying: &Var, pixel: Pixel<'_, T>| {
            pixel.write_color(fragment(uniforms, varying))
        })
    }

    #[inline]
    pub fn uniforms(&self) -> &U {
        &self.uniforms
    }

    #[inline]
    pub fn uniforms_mut(&mut self) -> &mut U {
        &mut self.uniforms
    }

    #[inline]
    pub(crate) fn shade_vertex(&self, vertex: &V) -> Var {
        (self.vertex)(&self.uniforms, vertex)
    }

    #[inline]
    pub(crate) fn shade_fragment(&self, varying: &Var, pixel: Pixel<'_, T>) {
        (self.fragment)(&self.uniforms, varying, pixel)
    }
}
