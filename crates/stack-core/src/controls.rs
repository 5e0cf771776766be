//! Orbit camera controls.
//!
//! Input handlers only accumulate a pending rotation, pan and dolly; nothing
//! moves until [`OrbitControls::update`] runs once per frame. With damping
//! enabled each update applies a fraction of the pending motion and decays
//! the rest, so the camera glides to a stop after the pointer is released.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::math::Spherical;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    /// Share of the pending motion applied per update when damping.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

pub struct OrbitControls {
    pub config: ControlsConfig,
    pub target: Vec3,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    pub fn new(config: ControlsConfig, target: Vec3) -> Self {
        Self {
            config,
            target,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Move the camera toward the target by `factor` (< 1 gets closer).
    pub fn dolly(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    pub fn pan(&mut self, offset: Vec3) {
        self.pan_offset += offset;
    }

    /// Pointer drag of `(dx, dy)` pixels on a viewport `height` pixels tall.
    /// A drag across the full height turns the camera once around the target.
    pub fn handle_rotate_drag(&mut self, dx: f32, dy: f32, height: f32) {
        if height <= 0.0 {
            return;
        }
        let speed = self.config.rotate_speed;
        self.rotate_left(TAU * dx / height * speed);
        self.rotate_up(TAU * dy / height * speed);
    }

    /// Screen-space pan: the point under the pointer stays under the pointer
    /// at the target's depth.
    pub fn handle_pan_drag(&mut self, dx: f32, dy: f32, height: f32, camera: &PerspectiveCamera) {
        if height <= 0.0 {
            return;
        }
        let distance = (camera.position - self.target).length()
            * (camera.fov_y_degrees.to_radians() * 0.5).tan();
        let (right, up) = camera.screen_axes();
        let speed = self.config.pan_speed;
        let left = 2.0 * dx * distance / height * speed;
        let upward = 2.0 * dy * distance / height * speed;
        self.pan(-right * left + up * upward);
    }

    /// Mouse wheel: negative `delta_y` (scrolling up) moves closer.
    pub fn handle_wheel(&mut self, delta_y: f32) {
        let zoom_scale = 0.95_f32.powf(self.config.zoom_speed);
        if delta_y < 0.0 {
            self.dolly(zoom_scale);
        } else if delta_y > 0.0 {
            self.dolly(1.0 / zoom_scale);
        }
    }

    /// Whether rotation or pan is still pending.
    pub fn is_settling(&self) -> bool {
        const EPS: f32 = 1.0e-6;
        self.delta_theta.abs() > EPS || self.delta_phi.abs() > EPS || self.pan_offset.length() > EPS
    }

    /// Apply pending motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        const EPS: f32 = 1.0e-6;
        let c = &self.config;
        let share = if c.enable_damping { c.damping_factor } else { 1.0 };

        let old_position = camera.position;
        let mut spherical = Spherical::from_vec3(camera.position - self.target);

        spherical.theta += self.delta_theta * share;
        spherical.phi += self.delta_phi * share;
        spherical.phi = spherical.phi.clamp(c.min_polar_angle, c.max_polar_angle);
        spherical.make_safe();
        spherical.radius = (spherical.radius * self.scale).clamp(c.min_distance, c.max_distance);

        self.target += self.pan_offset * share;
        camera.target = self.target;
        camera.position = self.target + spherical.to_vec3();

        if c.enable_damping {
            let decay = 1.0 - c.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(old_position) > EPS * EPS
    }
}
