use glam::{Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::controls::OrbitControls;
use crate::error::SceneResult;
use crate::resources::GeometryBackend;
use crate::scene::StackedScene;
use crate::viewport::Viewport;

/// Per-frame values the renderer needs besides the draw list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub camera_position: Vec3,
    pub buffer_size: (u32, u32),
    /// Whether the controls moved the camera during this tick.
    pub camera_moved: bool,
}

/// The scene together with the camera looking at it and the surface it is
/// drawn on.
pub struct Stage<B: GeometryBackend> {
    pub scene: StackedScene<B>,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    viewport: Viewport,
}

impl<B: GeometryBackend> Stage<B> {
    pub fn new(config: SceneConfig, backend: B, width: u32, height: u32, device_pixel_ratio: f32) -> SceneResult<Self> {
        let viewport = Viewport::new(width, height, device_pixel_ratio, config.max_pixel_ratio);
        let camera = PerspectiveCamera::new(&config.camera, viewport.aspect());
        let controls = OrbitControls::new(config.controls, config.camera.target);
        let scene = StackedScene::new(config, backend)?;
        Ok(Self {
            scene,
            camera,
            controls,
            viewport,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Track a new surface size: camera aspect and drawing-buffer size follow,
    /// the scene is left alone. Returns the new buffer size.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) -> (u32, u32) {
        if self.viewport.resize(width, height, device_pixel_ratio) {
            self.camera.set_aspect(self.viewport.aspect());
            log::debug!(
                "viewport {}x{} @{:.2}, buffer {:?}",
                width,
                height,
                self.viewport.pixel_ratio(),
                self.viewport.buffer_size()
            );
        }
        self.viewport.buffer_size()
    }

    pub fn orbit_drag(&mut self, dx: f32, dy: f32) {
        let height = self.viewport.height as f32;
        self.controls.handle_rotate_drag(dx, dy, height);
    }

    pub fn pan_drag(&mut self, dx: f32, dy: f32) {
        let height = self.viewport.height as f32;
        self.controls.handle_pan_drag(dx, dy, height, &self.camera);
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.controls.handle_wheel(delta_y);
    }

    /// Advance the controls by one frame and snapshot the camera.
    pub fn tick(&mut self) -> FrameState {
        let camera_moved = self.controls.update(&mut self.camera);
        let view = self.camera.view();
        let projection = self.camera.projection();
        FrameState {
            view,
            projection,
            view_projection: projection * view,
            camera_position: self.camera.position,
            buffer_size: self.viewport.buffer_size(),
            camera_moved,
        }
    }
}
