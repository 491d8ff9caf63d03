//! Raster geometry helpers on top of `glam`.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{IVec2, UVec2, Vec2, Vec3};

/// Axis-aligned rectangle in pixels, half-open: `[min, max)`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    /// Rectangle covering a `width` x `height` target.
    #[inline]
    pub fn from_size(width: usize, height: usize) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Smallest rectangle enclosing every point.
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut rect = Self {
            min: Vec2::splat(f32::MAX),
            max: Vec2::splat(f32::MIN),
        };
        for &p in points {
            rect.min = rect.min.min(p);
            rect.max = rect.max.max(p);
        }
        rect
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }

    /// Clamps `p` onto the closed rectangle `[min, max]`.
    #[inline]
    pub fn clamp_point(self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max.max(self.min))
    }

    /// Maps a point from normalized device coordinates (`[-1, 1]`) into the rectangle.
    #[inline]
    pub fn from_ndc(self, ndc: Vec2) -> Vec2 {
        self.min + (ndc * 0.5 + 0.5) * self.size()
    }

    /// Inverse of [`Rect::from_ndc`].
    #[inline]
    pub fn to_ndc(self, p: Vec2) -> Vec2 {
        (p - self.min) / self.size() * 2.0 - 1.0
    }

    /// Pixel rectangle touched by this one: `floor(min)..floor(max) + 1`.
    /// Coordinates beyond the `i32` range saturate.
    #[inline]
    pub fn covering_pixels(self) -> IRect {
        let min = self.min.floor();
        let max = self.max.floor();
        IRect {
            min: IVec2::new(min.x as i32, min.y as i32),
            max: IVec2::new((max.x as i32).saturating_add(1), (max.y as i32).saturating_add(1)),
        }
    }
}

/// Integer pixel rectangle, half-open: `[min, max)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IRect {
    pub min: IVec2,
    pub max: IVec2,
}

impl IRect {
    #[inline]
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min: IVec2::new(min_x, min_y),
            max: IVec2::new(max_x, max_y),
        }
    }

    #[inline]
    pub fn from_size(size: UVec2) -> Self {
        Self::new(0, 0, size.x as i32, size.y as i32)
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    #[inline]
    pub fn contains(self, p: IVec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }

    /// Overlap of both rectangles; empty rectangles come back with `max <= min`.
    #[inline]
    pub fn intersect(self, other: IRect) -> IRect {
        IRect {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Clamps `p` onto the last valid pixel of the rectangle.
    #[inline]
    pub fn clamp_point(self, p: IVec2) -> IVec2 {
        p.clamp(self.min, (self.max - 1).max(self.min))
    }

    #[inline]
    pub fn as_rect(self) -> Rect {
        Rect {
            min: self.min.as_vec2(),
            max: self.max.as_vec2(),
        }
    }
}

/// Barycentric weights of `p` in triangle `(a, b, c)`, by signed area ratio.
///
/// Degenerate triangles yield NaN or infinite weights.
#[inline]
pub fn barycentric(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Vec3 {
    let area = (b - a).perp_dot(c - a);
    let w_b = (p - a).perp_dot(c - a) / area;
    let w_c = (b - a).perp_dot(p - a) / area;
    Vec3::new(1.0 - w_b - w_c, w_b, w_c)
}

/// Signed doubled area of triangle `(a, b, c)`; positive when counter-clockwise
/// in a y-up frame.
#[inline]
pub fn signed_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

/// Weights `(1 - t, t)` of `p` projected onto segment `a -> b`, with `t`
/// clamped to `[0, 1]`. A zero-length segment gives all weight to `a`.
#[inline]
pub fn segment_weights(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    let t = if len2 > 0.0 {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Vec2::new(1.0 - t, t)
}

/// Lat-long texture coordinate of a unit direction.
#[inline]
pub fn equirectangular_uv(dir: Vec3) -> Vec2 {
    let phi = dir.x.atan2(dir.z);
    let theta = dir.y.clamp(-1.0, 1.0).asin();
    Vec2::new((phi + PI) / TAU, (theta + FRAC_PI_2) / PI)
}

/// Unit direction of a pixel position in a `size` lat-long image.
#[inline]
pub fn equirectangular_dir(pixel: Vec2, size: UVec2) -> Vec3 {
    let phi = pixel.x / size.x as f32 * TAU - PI;
    let theta = pixel.y / size.y as f32 * PI - FRAC_PI_2;
    Vec3::new(theta.cos() * phi.sin(), theta.sin(), theta.cos() * phi.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Rect ──────────────────────────────────────────────────────────────

    #[test]
    fn rect_from_points_encloses_all() {
        let r = Rect::from_points(&[
            Vec2::new(3.0, 1.0),
            Vec2::new(-2.0, 4.0),
            Vec2::new(0.5, -1.0),
        ]);
        assert_eq!(r, Rect::new(-2.0, -1.0, 3.0, 4.0));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::from_size(10, 10);
        assert!(r.contains(Vec2::ZERO));
        assert!(r.contains(Vec2::new(9.5, 9.5)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn rect_ndc_mapping_round_trips() {
        let r = Rect::new(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r.from_ndc(Vec2::splat(-1.0)), r.min);
        assert_eq!(r.from_ndc(Vec2::ONE), r.max);
        let p = Vec2::new(35.0, 40.0);
        assert!(r.from_ndc(r.to_ndc(p)).abs_diff_eq(p, 1e-4));
    }

    #[test]
    fn rect_covering_pixels_floors_both_corners() {
        let r = Rect::new(0.4, 1.6, 3.2, 3.9);
        assert_eq!(r.covering_pixels(), IRect::new(0, 1, 4, 4));
    }

    #[test]
    fn rect_covering_pixels_saturates_far_corners() {
        let r = Rect::new(-4e9, 0.5, 4e9, 3e10);
        let pixels = r.covering_pixels();
        assert_eq!(pixels.min, IVec2::new(i32::MIN, 0));
        assert_eq!(pixels.max, IVec2::splat(i32::MAX));
    }

    // ── IRect ─────────────────────────────────────────────────────────────

    #[test]
    fn irect_intersect_and_clamp() {
        let a = IRect::new(0, 0, 8, 8);
        let b = IRect::new(-4, 2, 4, 20);
        assert_eq!(a.intersect(b), IRect::new(0, 2, 4, 8));
        assert!(IRect::new(0, 0, 2, 2).intersect(IRect::new(3, 3, 5, 5)).is_empty());
        assert_eq!(a.clamp_point(IVec2::new(12, -3)), IVec2::new(7, 0));
    }

    // ── barycentric ───────────────────────────────────────────────────────

    #[test]
    fn barycentric_at_vertices_and_centroid() {
        let (a, b, c) = (Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0));
        assert!(barycentric(a, b, c, a).abs_diff_eq(Vec3::X, 1e-6));
        assert!(barycentric(a, b, c, b).abs_diff_eq(Vec3::Y, 1e-6));
        assert!(barycentric(a, b, c, c).abs_diff_eq(Vec3::Z, 1e-6));

        let centroid = (a + b + c) / 3.0;
        assert!(barycentric(a, b, c, centroid).abs_diff_eq(Vec3::splat(1.0 / 3.0), 1e-6));
    }

    #[test]
    fn barycentric_is_winding_independent() {
        let (a, b, c) = (Vec2::ZERO, Vec2::new(0.0, 4.0), Vec2::new(4.0, 0.0));
        let w = barycentric(a, b, c, Vec2::new(1.0, 1.0));
        assert!(w.min_element() >= 0.0);
        assert!((w.element_sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn barycentric_outside_has_negative_weight() {
        let w = barycentric(Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::new(2.0, 2.0));
        assert!(w.min_element() < 0.0);
    }

    #[test]
    fn barycentric_degenerate_is_not_finite() {
        let w = barycentric(Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0), Vec2::new(0.5, 0.0));
        assert!(!w.is_finite());
    }

    // ── segment_weights ───────────────────────────────────────────────────

    #[test]
    fn segment_weights_follow_projection() {
        let (a, b) = (Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert_eq!(segment_weights(a, b, a), Vec2::new(1.0, 0.0));
        assert_eq!(segment_weights(a, b, b), Vec2::new(0.0, 1.0));
        let weights = segment_weights(a, b, Vec2::new(2.5, 3.0));
        assert!(weights.abs_diff_eq(Vec2::new(0.75, 0.25), 1e-6));
        assert_eq!(segment_weights(a, b, Vec2::new(-5.0, 0.0)), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn segment_weights_degenerate_segment() {
        assert_eq!(segment_weights(Vec2::ONE, Vec2::ONE, Vec2::ZERO), Vec2::new(1.0, 0.0));
    }

    // ── equirectangular ───────────────────────────────────────────────────

    #[test]
    fn equirectangular_round_trip() {
        let size = UVec2::new(64, 32);
        let pixel = Vec2::new(20.5, 9.5);
        let dir = equirectangular_dir(pixel, size);
        assert!((dir.length() - 1.0).abs() < 1e-5);

        let uv = equirectangular_uv(dir);
        assert!((uv * size.as_vec2()).abs_diff_eq(pixel, 1e-3));
    }
}
