use ember_core::Rect;
use glam::Vec4;

use crate::buffer::Geometry;
use crate::framebuffer::{DefaultFramebuffer, DefaultTargets, Framebuffer, TargetSet};
use crate::program::Program;
use crate::raster;
use crate::varying::Varying;

/// Winding of front-facing triangles in window coordinates (y up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FrontFace {
    #[default]
    Ccw,
    Cw,
}

/// Per-draw raster state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Window rectangle NDC `[-1, 1]` maps onto; pixels outside are never touched.
    pub viewport: Rect,
    /// Discard back-facing triangles.
    pub culling: bool,
    pub front_face: FrontFace,
    /// Draw triangles as their three edges.
    pub wireframe: bool,
}

impl RenderOptions {
    pub fn for_size(width: usize, height: usize) -> Self {
        Self {
            viewport: Rect::from_size(width, height),
            culling: true,
            front_face: FrontFace::Ccw,
            wireframe: false,
        }
    }
}

/// Counters gathered during one draw call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub primitives: usize,
    pub culled: usize,
    pub degenerate: usize,
    /// Fragments discarded for depth outside `[0, 1]`.
    pub clipped: usize,
    pub depth_rejected: usize,
    pub fragments_shaded: usize,
}

impl std::ops::AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.primitives += rhs.primitives;
        self.culled += rhs.culled;
        self.degenerate += rhs.degenerate;
        self.clipped += rhs.clipped;
        self.depth_rejected += rhs.depth_rejected;
        self.fragments_shaded += rhs.fragments_shaded;
    }
}

/// Owns a default framebuffer and the options draws use unless told otherwise.
pub struct Renderer {
    framebuffer: DefaultFramebuffer,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        let mut framebuffer = DefaultFramebuffer::new(width, height);
        framebuffer.clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
        log::info!("Created renderer with a {width}x{height} framebuffer");

        Self {
            framebuffer,
            options: RenderOptions::for_size(width, height),
        }
    }

    /// Reallocates the framebuffer and resets the viewport to cover it.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.framebuffer.resize(width, height);
        self.framebuffer.clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
        self.options.viewport = Rect::from_size(width, height);
        log::info!("Resized renderer to {width}x{height}");
    }

    #[inline]
    pub fn framebuffer(&self) -> &DefaultFramebuffer {
        &self.framebuffer
    }

    #[inline]
    pub fn framebuffer_mut(&mut self) -> &mut DefaultFramebuffer {
        &mut self.framebuffer
    }

    #[inline]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    #[inline]
    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    /// Draws into the renderer's own framebuffer.
    pub fn draw<V, Var, U, G>(
        &mut self,
        program: &Program<V, Var, U, DefaultTargets>,
        geometry: &G,
    ) -> DrawStats
    where
        Var: Varying,
        G: Geometry<V> + ?Sized,
    {
        raster::draw(program, geometry, &mut self.framebuffer, &self.options)
    }

    /// Draws into `framebuffer` with the renderer's options.
    pub fn draw_to<V, Var, U, T, G>(
        &self,
        program: &Program<V, Var, U, T>,
        geometry: &G,
        framebuffer: &mut Framebuffer<T>,
    ) -> DrawStats
    where
        Var: Varying,
        T: TargetSet,
        G: Geometry<V> + ?Sized,
    {
        raster::draw(program, geometry, framebuffer, &self.options)
    }

    /// Draws into `framebuffer` with one-off options.
    pub fn draw_with<V, Var, U, T, G>(
        &self,
        program: &Program<V, Var, U, T>,
        geometry: &G,
        framebuffer: &mut Framebuffer<T>,
        options: &RenderOptions,
    ) -> DrawStats
    where
        Var: Varying,
        T: TargetSet,
        G: Geometry<V> + ?Sized,
    {
        raster::draw(program, geometry, framebuffer, options)
    }
}
