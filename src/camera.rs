use glam::{Mat4, Vec3};

/// A simple perspective camera for captured scenes.
///
/// The chain reads the camera once per [`begin_capture_with_camera`] call and
/// snapshots its view and projection matrices for the caller's scene
/// pipelines. The projection is parameterized by the chain's logical aspect
/// ratio, not the allocated texture aspect, so padded power-of-two targets
/// don't distort the scene.
///
/// [`begin_capture_with_camera`]: crate::EffectChain::begin_capture_with_camera
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub fov: f32, // radians
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_2, // 90 degrees
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.forward = (target - self.position).normalize_or_zero();
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Compute the right vector from forward and up.
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }

    /// Recompute up to be orthogonal to forward and right.
    pub fn orthogonal_up(&self) -> Vec3 {
        self.right().cross(self.forward).normalize_or_zero()
    }

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    /// Camera-to-clip transform for the given output aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_is_orthogonal() {
        let cam = Camera::new().at(0.0, 0.0, 5.0).looking_at(Vec3::ZERO);
        assert!(cam.right().dot(cam.forward).abs() < 1e-6);
        assert!(cam.right().dot(cam.orthogonal_up()).abs() < 1e-6);
    }

    #[test]
    fn view_matrix_moves_camera_to_origin() {
        let cam = Camera::new().at(1.0, 2.0, 3.0);
        let eye = cam.view_matrix().transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!(eye.length() < 1e-6);
    }
}
