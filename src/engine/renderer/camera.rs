// Camera and viewport mapping for a y-up 2D world

use glam::Vec2;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// Scroll notches needed to double or halve the zoom
const NOTCHES_PER_DOUBLING: f32 = 4.0;

/// 2D camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space (center of the viewport)
    pub position: Vec2,
    /// Camera zoom level (1.0 = one world unit per pixel, 2.0 = zoomed in 2x)
    pub zoom: f32,
    /// Viewport width
    viewport_width: f32,
    /// Viewport height
    viewport_height: f32,
    /// Pose restored by `reset`
    home: (Vec2, f32),
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec2, zoom: f32, viewport_width: f32, viewport_height: f32) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            position,
            zoom,
            viewport_width,
            viewport_height,
            home: (position, zoom),
        }
    }

    /// Set camera zoom
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Go back to the initial position and zoom
    pub fn reset(&mut self) {
        (self.position, self.zoom) = self.home;
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Zoom by scroll notches, keeping the world point under `screen_pos` fixed
    pub fn zoom_at(&mut self, screen_pos: Vec2, notches: f32) {
        if notches == 0.0 {
            return;
        }

        let anchor = self.screen_to_world(screen_pos);
        self.set_zoom(self.zoom * 2f32.powf(notches / NOTCHES_PER_DOUBLING));
        let drift = self.screen_to_world(screen_pos) - anchor;
        self.position -= drift;
    }

    /// Drag the view by a screen-space delta so the world follows the cursor
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.position -= Vec2::new(screen_delta.x, -screen_delta.y) / self.zoom;
    }

    /// Convert screen coordinates to world coordinates
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        let normalized_x = (screen_pos.x / self.viewport_width) * 2.0 - 1.0;
        let normalized_y = 1.0 - (screen_pos.y / self.viewport_height) * 2.0;

        let half_width = (self.viewport_width / 2.0) / self.zoom;
        let half_height = (self.viewport_height / 2.0) / self.zoom;

        Vec2::new(
            self.position.x + normalized_x * half_width,
            self.position.y + normalized_y * half_height,
        )
    }

    /// Convert world coordinates to screen coordinates
    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        let half_width = (self.viewport_width / 2.0) / self.zoom;
        let half_height = (self.viewport_height / 2.0) / self.zoom;

        let normalized_x = (world_pos.x - self.position.x) / half_width;
        let normalized_y = (world_pos.y - self.position.y) / half_height;

        Vec2::new(
            (normalized_x + 1.0) * self.viewport_width / 2.0,
            (1.0 - normalized_y) * self.viewport_height / 2.0,
        )
    }
}
