// Per-frame action and pointer state

use super::action::Action;
use glam::Vec2;
use std::collections::HashSet;

/// Input state accumulated over one frame
#[derive(Debug, Default)]
pub struct InputState {
    /// Actions that are currently pressed this frame
    pressed: HashSet<Action>,

    /// Actions that were just pressed this frame (press events)
    just_pressed: HashSet<Action>,

    /// Actions that were just released this frame (release events)
    just_released: HashSet<Action>,

    /// Cursor position in window pixels
    cursor: Vec2,

    /// Cursor movement since the last update
    cursor_delta: Vec2,

    /// Scroll notches since the last update, positive away from the user
    wheel: f32,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn cursor_delta(&self) -> Vec2 {
        self.cursor_delta
    }

    pub fn wheel(&self) -> f32 {
        self.wheel
    }

    /// Register an action press
    pub(crate) fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub(crate) fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    pub(crate) fn move_cursor(&mut self, position: Vec2) {
        self.cursor_delta += position - self.cursor;
        self.cursor = position;
    }

    pub(crate) fn scroll(&mut self, notches: f32) {
        self.wheel += notches;
    }

    /// Update input state for a new frame
    /// Call this once per frame after processing all events
    pub(crate) fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.cursor_delta = Vec2::ZERO;
        self.wheel = 0.0;
    }

    /// Reset all input state, keeping the cursor where it is
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.update();
    }
}
