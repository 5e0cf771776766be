use glam::{Mat4, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(1.0, 1.0, 2.0),
            target: Vec3::ZERO,
        }
    }
}

/// Right-handed perspective camera with Y up, producing WebGL clip space.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    aspect: f32,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            fov_y_degrees: config.fov_y_degrees,
            near: config.near,
            far: config.far,
            position: config.position,
            target: config.target,
            up: Vec3::Y,
            aspect: 1.0,
        };
        camera.set_aspect(aspect);
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Update the aspect ratio. Zero, negative and non-finite ratios (a
    /// minimised window) are ignored.
    pub fn set_aspect(&mut self, aspect: f32) -> bool {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            true
        } else {
            false
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unit vectors `(right, up)` of the camera's screen plane in world space.
    pub fn screen_axes(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        (right, up)
    }
}
