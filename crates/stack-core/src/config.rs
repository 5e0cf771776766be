use crate::camera::CameraConfig;
use crate::controls::ControlsConfig;
use crate::materials::HemisphereLight;

/// Tessellation used whenever a primitive's mesh is (re)built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshResolution {
    pub radial_segments: u32,
    pub sphere_width_segments: u32,
    pub sphere_height_segments: u32,
}

impl Default for MeshResolution {
    fn default() -> Self {
        Self {
            radial_segments: 32,
            sphere_width_segments: 16,
            sphere_height_segments: 16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    /// Y of the ground plane; the bottom of the stack rests here.
    pub ground_y: f32,
    pub ground_size: f32,
    /// Thickness of the small cylinder, which lies on its rim.
    pub small_cylinder_height: f32,
    pub medium_cylinder_height: f32,
    pub resolution: MeshResolution,
    pub light: HemisphereLight,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    /// Upper bound applied to the device pixel ratio when sizing the drawing buffer.
    pub max_pixel_ratio: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground_y: -0.25,
            ground_size: 5.0,
            small_cylinder_height: 0.2,
            medium_cylinder_height: 0.02,
            resolution: MeshResolution::default(),
            light: HemisphereLight::default(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            max_pixel_ratio: 2.0,
        }
    }
}
