use glam::Vec3;

/// Snap `value` to the nearest multiple of `step` counted from `min`.
///
/// A non-positive `step` leaves the value untouched.
pub fn snap_to_step(value: f32, min: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    min + ((value - min) / step).round() * step
}

/// Spherical coordinates with Y up, angles in radians.
///
/// `theta` is the azimuth measured from +Z toward +X, `phi` the polar angle
/// measured from +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self { radius: 0.0, theta: 0.0, phi: 0.0 };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep `phi` away from the poles so the view direction never aligns with up.
    pub fn make_safe(&mut self) {
        const EPS: f32 = 1.0e-6;
        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);
    }
}
