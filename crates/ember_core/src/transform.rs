use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotates around the global Y axis.
    pub fn rotate_y(&mut self, angle_radians: f32) {
        self.rotation = Quat::from_rotation_y(angle_radians) * self.rotation;
    }

    /// Rotates around the local X axis.
    pub fn rotate_local_x(&mut self, angle_radians: f32) {
        self.rotation *= Quat::from_rotation_x(angle_radians);
    }

    /// Points -Z at `target`.
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        // look_at_rh is a view matrix, i.e. the inverse of the object rotation
        let view = Mat4::look_at_rh(self.translation, target, up);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
        self
    }

    /// Model matrix (local -> world).
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// View matrix (world -> camera) when this transform places a camera.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation).inverse()
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}
