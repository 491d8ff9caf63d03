use glam::Mat4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 45.0f32.to_radians(),
            aspect_ratio: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Camera matching a framebuffer's aspect ratio.
    pub fn for_viewport(fov: f32, width: usize, height: usize) -> Self {
        Self {
            fov,
            aspect_ratio: width as f32 / height.max(1) as f32,
            ..Default::default()
        }
    }

    /// View space -> clip space.
    ///
    /// Clip z spans `[-w, w]`, which the rasterizer remaps to a `[0, 1]` depth.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect_ratio, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn near_and_far_planes_map_to_ndc_bounds() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();

        let near = proj * Vec4::new(0.0, 0.0, -camera.near, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -camera.far, 1.0);

        assert!((near.z / near.w + 1.0).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn viewport_aspect() {
        let camera = Camera::for_viewport(1.0, 320, 240);
        assert!((camera.aspect_ratio - 4.0 / 3.0).abs() < 1e-6);
    }
}
