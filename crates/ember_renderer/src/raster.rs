//! Primitive assembly, rasterization and per-fragment work of a draw call.

use ember_core::math::{barycentric, segment_weights, signed_area};
use ember_core::{IRect, Rect};
use glam::{IVec2, Vec2, Vec3Swizzles, Vec4, Vec4Swizzles};

use crate::buffer::{Geometry, Primitive};
use crate::framebuffer::{Framebuffer, Pixel, TargetSet};
use crate::program::Program;
use crate::renderer::{DrawStats, FrontFace, RenderOptions};
use crate::varying::Varying;

pub(crate) fn draw<V, Var, U, T, G>(
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
    let vertices = geometry.vertices();
    let primitive = geometry.primitive();
    let primitive_count = geometry.primitive_count();
    let element_count = primitive_count * primitive.vertices_per_primitive();

    for i in 0..element_count {
        let index = geometry.element(i);
        assert!(
            index < vertices.len(),
            "element {i} references vertex {index}, but the buffer holds {}",
            vertices.len()
        );
    }

    let viewport = options.viewport;
    let bounds = IRect {
        min: viewport.min.floor().as_ivec2(),
        max: viewport.max.ceil().as_ivec2(),
    }
    .intersect(IRect::from_size(framebuffer.size()));

    let mut varyings: Vec<Var> =
        vertices.iter().map(|vertex| program.shade_vertex(vertex)).collect();
    for varying in &mut varyings {
        to_window(varying.position_mut(), viewport);
    }

    let mut raster = Raster {
        program,
        textures: framebuffer.textures_mut(),
        bounds,
        options,
        stats: DrawStats::default(),
    };

    for i in 0..primitive_count {
        raster.stats.primitives += 1;
        match primitive {
            Primitive::Triangles => {
                let [a, b, c] = [0, 1, 2].map(|k| &varyings[geometry.element(3 * i + k)]);
                if options.wireframe {
                    raster.line(a, b);
                    raster.line(b, c);
                    raster.line(c, a);
                } else {
                    raster.triangle(a, b, c);
                }
            }
            Primitive::Lines => {
                let [a, b] = [0, 1].map(|k| &varyings[geometry.element(2 * i + k)]);
                raster.line(a, b);
            }
        }
    }

    let stats = raster.stats;
    log::debug!(
        "draw: {} primitives ({} culled, {} degenerate), {} fragments shaded, \
         {} depth rejected, {} clipped",
        stats.primitives,
        stats.culled,
        stats.degenerate,
        stats.fragments_shaded,
        stats.depth_rejected,
        stats.clipped
    );
    stats
}

/// Clip space -> window space: `(x_win, y_win, z_ndc, 1 / w)`.
fn to_window(position: &mut Vec4, viewport: Rect) {
    let inv_w = 1.0 / position.w;
    let ndc = position.xyz() * inv_w;
    let window = viewport.from_ndc(ndc.xy());
    *position = Vec4::new(window.x, window.y, ndc.z, inv_w);
}

fn is_back_facing(area: f32, front_face: FrontFace) -> bool {
    match front_face {
        FrontFace::Ccw => area < 0.0,
        FrontFace::Cw => area > 0.0,
    }
}

struct Raster<'a, V, Var, U, T: TargetSet> {
    program: &'a Program<V, Var, U, T>,
    textures: &'a mut T::Textures,
    bounds: IRect,
    options: &'a RenderOptions,
    stats: DrawStats,
}

impl<V, Var, U, T> Raster<'_, V, Var, U, T>
where
    Var: Varying,
    T: TargetSet,
{
    fn triangle(&mut self, a: &Var, b: &Var, c: &Var) {
        let (p0, p1, p2) = (a.position().xy(), b.position().xy(), c.position().xy());
        let area = signed_area(p0, p1, p2);

        if self.options.culling && is_back_facing(area, self.options.front_face) {
            self.stats.culled += 1;
            log::trace!("culled back-facing triangle {p0} {p1} {p2}");
            return;
        }
        if area == 0.0 || !area.is_finite() {
            self.stats.degenerate += 1;
            log::trace!("skipped degenerate triangle {p0} {p1} {p2}");
            return;
        }

        let rect = Rect::from_points(&[p0, p1, p2])
            .covering_pixels()
            .intersect(self.bounds);

        for y in rect.min.y..rect.max.y {
            for x in rect.min.x..rect.max.x {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let weights = barycentric(p0, p1, p2, center);
                if weights.is_nan() || weights.min_element() < 0.0 {
                    continue;
                }
                self.fragment(x as usize, y as usize, [a, b, c], weights.to_array());
            }
        }
    }

    /// Bresenham walk between the clamped endpoints, both included.
    fn line(&mut self, a: &Var, b: &Var) {
        if self.bounds.is_empty() {
            return;
        }

        let (pa, pb) = (a.position().xy(), b.position().xy());
        let start = self.bounds.clamp_point(pa.floor().as_ivec2());
        let end = self.bounds.clamp_point(pb.floor().as_ivec2());

        let delta = end - start;
        let step = IVec2::new(delta.x.signum(), delta.y.signum());
        let dx = delta.x.abs();
        let dy = -delta.y.abs();
        let mut err = dx + dy;
        let mut p = start;

        loop {
            let weights = segment_weights(pa, pb, p.as_vec2() + 0.5);
            self.fragment(p.x as usize, p.y as usize, [a, b], weights.to_array());

            if p == end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                p.x += step.x;
            }
            if e2 <= dx {
                err += dx;
                p.y += step.y;
            }
        }
    }

    /// Depth test and perspective-correct shading of one pixel.
    fn fragment<const N: usize>(
        &mut self,
        x: usize,
        y: usize,
        sources: [&Var; N],
        weights: [f32; N],
    ) {
        let positions = sources.map(|source| source.position());

        let mut inv_w = 0.0;
        let mut z = 0.0;
        for (position, weight) in positions.iter().zip(weights) {
            inv_w += position.w * weight;
            z += position.z * weight;
        }

        let depth = z * 0.5 + 0.5;
        if !(0.0..=1.0).contains(&depth) {
            self.stats.clipped += 1;
            return;
        }

        if let Some(target) = T::depth_mut(self.textures) {
            let stored = target.at_mut(x, y);
            if depth > *stored {
                self.stats.depth_rejected += 1;
                return;
            }
            *stored = depth;
        }

        let mut corrected = weights;
        for (weight, position) in corrected.iter_mut().zip(&positions) {
            *weight *= position.w / inv_w;
        }

        let mut varying = sources[0].clone();
        varying.interpolate(sources, corrected);
        *varying.position_mut() = Vec4::new(x as f32 + 0.5, y as f32 + 0.5, depth, inv_w);

        self.program.shade_fragment(&varying, Pixel::new(self.textures, x, y));
        self.stats.fragments_shaded += 1;
    }
}
