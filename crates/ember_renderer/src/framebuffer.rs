//! Render target tuples.
//!
//! A framebuffer owns one [`Texture`] per element of a tuple of texel types,
//! e.g. `(Rgba8, Depth)` or `(Vec4, Vec3, Rgba8, Depth)`. The first [`Depth`]
//! element is the depth buffer and the first [`Rgba8`] element the color
//! buffer; all other elements are written only by fragment shaders.

use std::fmt::Debug;

use ember_core::{Rgba8, Texel, Texture};
use glam::{UVec2, Vec2, Vec3, Vec4};

/// Depth texel; cleared to `f32::MAX`, smaller is closer.
pub type Depth = f32;

pub type DefaultTargets = (Rgba8, Depth);
pub type DefaultFramebuffer = Framebuffer<DefaultTargets>;

/// A texel type usable as a framebuffer attachment.
pub trait RenderTarget: Texel {
    const IS_DEPTH: bool = false;
    const IS_COLOR: bool = false;

    /// Value written by [`Framebuffer::clear`].
    fn cleared() -> Self {
        Self::default()
    }

    /// Value written by [`Framebuffer::clear_color`]; `None` leaves the target untouched.
    fn clear_value(_color: Vec4) -> Option<Self> {
        None
    }

    fn as_depth(_texture: &Texture<Self>) -> Option<&Texture<Depth>> {
        None
    }

    fn as_depth_mut(_texture: &mut Texture<Self>) -> Option<&mut Texture<Depth>> {
        None
    }

    fn as_color(_texture: &Texture<Self>) -> Option<&Texture<Rgba8>> {
        None
    }

    fn as_color_mut(_texture: &mut Texture<Self>) -> Option<&mut Texture<Rgba8>> {
        None
    }
}

impl RenderTarget for Rgba8 {
    const IS_COLOR: bool = true;

    fn clear_value(color: Vec4) -> Option<Self> {
        Some(Rgba8::from_vec4(color))
    }

    fn as_color(texture: &Texture<Self>) -> Option<&Texture<Rgba8>> {
        Some(texture)
    }

    fn as_color_mut(texture: &mut Texture<Self>) -> Option<&mut Texture<Rgba8>> {
        Some(texture)
    }
}

impl RenderTarget for Depth {
    const IS_DEPTH: bool = true;

    fn cleared() -> Self {
        f32::MAX
    }

    fn clear_value(_color: Vec4) -> Option<Self> {
        Some(f32::MAX)
    }

    fn as_depth(texture: &Texture<Self>) -> Option<&Texture<Depth>> {
        Some(texture)
    }

    fn as_depth_mut(texture: &mut Texture<Self>) -> Option<&mut Texture<Depth>> {
        Some(texture)
    }
}

impl RenderTarget for Vec4 {
    fn clear_value(color: Vec4) -> Option<Self> {
        Some(color)
    }
}

impl RenderTarget for Vec3 {}

impl RenderTarget for Vec2 {}

/// A tuple of [`RenderTarget`]s, implemented for arities 1 through 6.
pub trait TargetSet: Debug + 'static {
    type Textures: Clone + Debug + 'static;

    /// One `&mut` texel per target, at a single pixel.
    type Fragment<'a>
    where
        Self: 'a;

    const HAS_DEPTH: bool;
    const HAS_COLOR: bool;

    fn allocate(width: usize, height: usize) -> Self::Textures;
    fn clear(textures: &mut Self::Textures);
    fn clear_color(textures: &mut Self::Textures, color: Vec4);
    fn fragment(textures: &mut Self::Textures, x: usize, y: usize) -> Self::Fragment<'_>;

    fn depth(textures: &Self::Textures) -> Option<&Texture<Depth>>;
    fn depth_mut(textures: &mut Self::Textures) -> Option<&mut Texture<Depth>>;
    fn color(textures: &Self::Textures) -> Option<&Texture<Rgba8>>;
    fn color_mut(textures: &mut Self::Textures) -> Option<&mut Texture<Rgba8>>;
}

/// Typed access to element `I` of a target tuple.
pub trait TargetAt<const I: usize>: TargetSet {
    type Target: RenderTarget;

    fn target(textures: &Self::Textures) -> &Texture<Self::Target>;
    fn target_mut(textures: &mut Self::Textures) -> &mut Texture<Self::Target>;
}

macro_rules! target_set {
    ($($T:ident $t:ident $idx:tt),+) => {
        impl<$($T: RenderTarget),+> TargetSet for ($($T,)+) {
            type Textures = ($(Texture<$T>,)+);
            type Fragment<'a> = ($(&'a mut $T,)+) where Self: 'a;

            const HAS_DEPTH: bool = false $(|| $T::IS_DEPTH)+;
            const HAS_COLOR: bool = false $(|| $T::IS_COLOR)+;

            fn allocate(width: usize, height: usize) -> Self::Textures {
                ($(Texture::new(width, height, $T::default()),)+)
            }

            fn clear(textures: &mut Self::Textures) {
                $( textures.$idx.fill($T::cleared()); )+
            }

            fn clear_color(textures: &mut Self::Textures, color: Vec4) {
                $(
                    if let Some(value) = $T::clear_value(color) {
                        textures.$idx.fill(value);
                    }
                )+
            }

            fn fragment(textures: &mut Self::Textures, x: usize, y: usize) -> Self::Fragment<'_> {
                let ($($t,)+) = textures;
                ($($t.at_mut(x, y),)+)
            }

            fn depth(textures: &Self::Textures) -> Option<&Texture<Depth>> {
                let ($($t,)+) = textures;
                $( if $T::IS_DEPTH { return $T::as_depth($t); } )+
                None
            }

            fn depth_mut(textures: &mut Self::Textures) -> Option<&mut Texture<Depth>> {
                let ($($t,)+) = textures;
                $( if $T::IS_DEPTH { return $T::as_depth_mut($t); } )+
                None
            }

            fn color(textures: &Self::Textures) -> Option<&Texture<Rgba8>> {
                let ($($t,)+) = textures;
                $( if $T::IS_COLOR { return $T::as_color($t); } )+
                None
            }

            fn color_mut(textures: &mut Self::Textures) -> Option<&mut Texture<Rgba8>> {
                let ($($t,)+) = textures;
                $( if $T::IS_COLOR { return $T::as_color_mut($t); } )+
                None
            }
        }

        target_at!([$($T),+] $($T $idx),+);
    };
}

// The full generic list travels as one token tree so each element impl can
// repeat it.
macro_rules! target_at {
    (@one [$($A:ident),+] $T:ident $idx:tt) => {
        impl<$($A: RenderTarget),+> TargetAt<$idx> for ($($A,)+) {
            type Target = $T;

            #[inline]
            fn target(textures: &Self::Textures) -> &Texture<$T> {
                &textures.$idx
            }

            #[inline]
            fn target_mut(textures: &mut Self::Textures) -> &mut Texture<$T> {
                &mut textures.$idx
            }
        }
    };
    ($all:tt $T:ident $idx:tt $(, $rest:ident $rest_idx:tt)*) => {
        target_at!(@one $all $T $idx);
        target_at!($all $($rest $rest_idx),*);
    };
    ($all:tt) => {};
}

target_set!(A a 0);
target_set!(A a 0, B b 1);
target_set!(A a 0, B b 1, C c 2);
target_set!(A a 0, B b 1, C c 2, D d 3);
target_set!(A a 0, B b 1, C c 2, D d 3, E e 4);
target_set!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5);

/// A fixed set of same-sized render targets.
#[derive(Debug, Clone)]
pub struct Framebuffer<T: TargetSet = DefaultTargets> {
    width: usize,
    height: usize,
    textures: T::Textures,
}

impl<T: TargetSet> Framebuffer<T> {
    /// Allocates every target filled with its default texel.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            textures: T::allocate(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width as u32, self.height as u32)
    }

    /// Reallocates every target; previous contents are lost.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    /// Resets color-like targets to `color` and depth to the far value.
    pub fn clear_color(&mut self, color: Vec4) {
        T::clear_color(&mut self.textures, color);
    }

    /// Resets every target: depth to the far value, everything else to zero.
    pub fn clear(&mut self) {
        T::clear(&mut self.textures);
    }

    pub fn target<const I: usize>(&self) -> &Texture<<T as TargetAt<I>>::Target>
    where
        T: TargetAt<I>,
    {
        <T as TargetAt<I>>::target(&self.textures)
    }

    pub fn target_mut<const I: usize>(&mut self) -> &mut Texture<<T as TargetAt<I>>::Target>
    where
        T: TargetAt<I>,
    {
        <T as TargetAt<I>>::target_mut(&mut self.textures)
    }

    pub fn color(&self) -> &Texture<Rgba8> {
        const { assert!(T::HAS_COLOR, "framebuffer has no Rgba8 target") };
        match T::color(&self.textures) {
            Some(texture) => texture,
            None => unreachable!(),
        }
    }

    pub fn color_mut(&mut self) -> &mut Texture<Rgba8> {
        const { assert!(T::HAS_COLOR, "framebuffer has no Rgba8 target") };
        match T::color_mut(&mut self.textures) {
            Some(texture) => texture,
            None => unreachable!(),
        }
    }

    pub fn depth(&self) -> &Texture<Depth> {
        const { assert!(T::HAS_DEPTH, "framebuffer has no depth target") };
        match T::depth(&self.textures) {
            Some(texture) => texture,
            None => unreachable!(),
        }
    }

    pub fn depth_mut(&mut self) -> &mut Texture<Depth> {
        const { assert!(T::HAS_DEPTH, "framebuffer has no depth target") };
        match T::depth_mut(&mut self.textures) {
            Some(texture) => texture,
            None => unreachable!(),
        }
    }

    /// Every target's texel at `(x, y)`.
    pub fn pixel(&mut self, x: usize, y: usize) -> T::Fragment<'_> {
        T::fragment(&mut self.textures, x, y)
    }

    #[inline]
    pub fn textures(&self) -> &T::Textures {
        &self.textures
    }

    #[inline]
    pub fn textures_mut(&mut self) -> &mut T::Textures {
        &mut self.textures
    }
}

/// Write access to every target at one pixel, handed to fragment shaders.
pub struct Pixel<'a, T: TargetSet> {
    textures: &'a mut T::Textures,
    x: usize,
    y: usize,
}

impl<'a, T: TargetSet> Pixel<'a, T> {
    pub(crate) fn new(textures: &'a mut T::Textures, x: usize, y: usize) -> Self {
        Self { textures, x, y }
    }

    /// Window coordinate of the pixel, row 0 at the bottom.
    #[inline]
    pub fn coord(&self) -> UVec2 {
        UVec2::new(self.x as u32, self.y as u32)
    }

    /// Depth already stored for this fragment, if the tuple has a depth target.
    pub fn depth(&self) -> Option<Depth> {
        T::depth(&*self.textures).map(|depth| depth.at(self.x, self.y))
    }

    /// One `&mut` texel per target.
    pub fn targets(self) -> T::Fragment<'a> {
        T::fragment(self.textures, self.x, self.y)
    }

    /// Stores a color clamped to `[0, 1]` into the color target.
    pub fn write_color(self, color: Vec4) {
        const { assert!(T::HAS_COLOR, "framebuffer has no Rgba8 target") };
        if let Some(texture) = T::color_mut(self.textures) {
            *texture.at_mut(self.x, self.y) = Rgba8::from_vec4(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type GBuffer = (Vec4, Vec3, Rgba8, Depth);

    #[test]
    fn capabilities_follow_the_tuple() {
        assert!(<(Rgba8, Depth)>::HAS_COLOR && <(Rgba8, Depth)>::HAS_DEPTH);
        assert!(!<(Depth,)>::HAS_COLOR && <(Depth,)>::HAS_DEPTH);
        assert!(<(Rgba8,)>::HAS_COLOR && !<(Rgba8,)>::HAS_DEPTH);
        assert!(!<(Vec4, Vec3)>::HAS_COLOR);
    }

    #[test]
    fn new_framebuffer_holds_defaults() {
        let fb = Framebuffer::<GBuffer>::new(3, 2);
        assert_eq!(fb.size(), UVec2::new(3, 2));
        assert!(fb.target::<0>().texels().iter().all(|&t| t == Vec4::ZERO));
        assert!(fb.depth().texels().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn clear_color_touches_color_like_targets() {
        let mut fb = Framebuffer::<GBuffer>::new(2, 2);
        *fb.target_mut::<1>().at_mut(0, 0) = Vec3::ONE;
        fb.clear_color(Vec4::new(1.0, 0.0, 0.0, 1.0));

        assert_eq!(fb.target::<0>().at(1, 1), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(fb.target::<1>().at(0, 0), Vec3::ONE);
        assert_eq!(fb.color().at(0, 1), Rgba8::new(255, 0, 0, 255));
        assert_eq!(fb.depth().at(1, 0), f32::MAX);
    }

    #[test]
    fn clear_resets_everything() {
        let mut fb = Framebuffer::<GBuffer>::new(2, 2);
        fb.clear_color(Vec4::ONE);
        *fb.target_mut::<1>().at_mut(1, 1) = Vec3::ONE;
        fb.clear();

        assert_eq!(fb.target::<0>().at(0, 0), Vec4::ZERO);
        assert_eq!(fb.target::<1>().at(1, 1), Vec3::ZERO);
        assert_eq!(fb.color().at(0, 0), Rgba8::default());
        assert_eq!(fb.depth().at(0, 0), f32::MAX);
    }

    #[test]
    fn first_depth_target_wins() {
        let mut fb = Framebuffer::<(Depth, Depth)>::new(1, 1);
        *fb.target_mut::<1>().at_mut(0, 0) = 0.5;
        *fb.depth_mut().at_mut(0, 0) = 0.25;
        assert_eq!(fb.target::<0>().at(0, 0), 0.25);
        assert_eq!(fb.target::<1>().at(0, 0), 0.5);
    }

    #[test]
    fn pixel_tuple_writes_every_target() {
        let mut fb = Framebuffer::<GBuffer>::new(4, 4);
        {
            let (position, normal, diffuse, depth) = fb.pixel(2, 3);
            *position = Vec4::ONE;
            *normal = Vec3::Z;
            *diffuse = Rgba8::WHITE;
            *depth = 0.5;
        }
        assert_eq!(fb.target::<0>().at(2, 3), Vec4::ONE);
        assert_eq!(fb.target::<1>().at(2, 3), Vec3::Z);
        assert_eq!(fb.color().at(2, 3), Rgba8::WHITE);
        assert_eq!(fb.depth().at(2, 3), 0.5);
    }

    #[test]
    fn pixel_sink_writes_clamped_color() {
        let mut fb = DefaultFramebuffer::new(2, 2);
        let pixel = Pixel::<DefaultTargets>::new(fb.textures_mut(), 1, 0);
        assert_eq!(pixel.coord(), UVec2::new(1, 0));
        assert_eq!(pixel.depth(), Some(0.0));
        pixel.write_color(Vec4::new(2.0, 0.5, -1.0, 1.0));
        assert_eq!(fb.color().at(1, 0), Rgba8::new(255, 128, 0, 255));
    }

    #[test]
    fn resize_reallocates() {
        let mut fb = DefaultFramebuffer::new(2, 2);
        fb.resize(5, 3);
        assert_eq!((fb.width(), fb.height()), (5, 3));
        assert_eq!(fb.color().texels().len(), 15);
    }
}
