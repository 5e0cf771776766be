/// Size of the render surface in CSS pixels and the scale of its drawing buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
    pub max_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32, max_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
            max_pixel_ratio,
        }
    }

    /// Width over height; a zero height counts as one pixel.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Device pixel ratio capped at `max_pixel_ratio`, never below 1.
    pub fn pixel_ratio(&self) -> f32 {
        if !self.device_pixel_ratio.is_finite() {
            return 1.0;
        }
        self.device_pixel_ratio.min(self.max_pixel_ratio).max(1.0)
    }

    /// Drawing-buffer size in device pixels.
    pub fn buffer_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            (self.width as f32 * ratio).round() as u32,
            (self.height as f32 * ratio).round() as u32,
        )
    }

    /// Returns whether anything changed.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) -> bool {
        let changed = self.width != width
            || self.height != height
            || self.device_pixel_ratio != device_pixel_ratio;
        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        changed
    }
}
