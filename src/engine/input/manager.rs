// Input manager - translates winit events into sandbox actions

use super::action::{Action, InputSource};
use super::config::InputConfig;
use super::state::InputState;
use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixel scroll distance treated as one wheel notch
const PIXELS_PER_NOTCH: f32 = 40.0;

/// Main input manager
pub struct InputManager {
    config: InputConfig,
    state: InputState,
}

impl InputManager {
    /// Create a new input manager with the given bindings
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            state: InputState::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state, event.repeat);
        }
    }

    /// Process a key transition. Key repeats are ignored.
    pub fn process_key(&mut self, key_code: KeyCode, state: ElementState, repeat: bool) {
        if repeat {
            return;
        }
        self.process_source(InputSource::key(key_code), state);
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.process_source(InputSource::mouse(button), state);
    }

    pub fn process_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.state
            .move_cursor(Vec2::new(position.x as f32, position.y as f32));
    }

    pub fn process_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_NOTCH,
        };
        self.state.scroll(notches);
    }

    fn process_source(&mut self, source: InputSource, state: ElementState) {
        if let Some(action) = self.config.get_action(source) {
            match state {
                ElementState::Pressed => self.state.press(action),
                ElementState::Released => self.state.release(action),
            }
        }
    }

    /// Clear per-frame state
    /// Call this once per frame after the sandbox consumed the input
    pub fn update(&mut self) {
        self.state.update();
    }

    /// Current input state
    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.state.just_pressed(action)
    }

    pub fn just_released(&self, action: Action) -> bool {
        self.state.just_released(action)
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.state.is_pressed(action)
    }

    /// Get the configuration
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Get mutable configuration
    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }

    /// Forget held buttons, e.g. after the window lost focus
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_maps_to_action() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::KeyG, ElementState::Pressed, false);

        assert!(manager.just_pressed(Action::ToggleGravity));
        manager.update();
        assert!(!manager.just_pressed(Action::ToggleGravity));
        assert!(manager.is_pressed(Action::ToggleGravity));
    }

    #[test]
    fn test_key_repeat_ignored() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::KeyP, ElementState::Pressed, false);
        manager.update();
        manager.process_key(KeyCode::KeyP, ElementState::Pressed, true);

        assert!(!manager.just_pressed(Action::Pause));
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::F12, ElementState::Pressed, false);
        assert!(manager.state().is_pressed(Action::Quit) == false);
    }

    #[test]
    fn test_mouse_drag_press_and_release() {
        let mut manager = InputManager::default();
        manager.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(manager.just_pressed(Action::Slice));
        manager.update();

        manager.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(manager.just_released(Action::Slice));
        assert!(!manager.is_pressed(Action::Slice));
    }

    #[test]
    fn test_cursor_and_wheel() {
        let mut manager = InputManager::default();
        manager.process_cursor_moved(PhysicalPosition::new(120.0, 80.0));
        manager.process_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
        manager.process_mouse_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(
            0.0, 80.0,
        )));

        assert_eq!(manager.state().cursor(), Vec2::new(120.0, 80.0));
        assert_eq!(manager.state().wheel(), 3.0);
    }

    #[test]
    fn test_rebinding_changes_mapping() {
        let mut manager = InputManager::default();
        manager
            .config_mut()
            .bind(InputSource::key(KeyCode::Space), Action::Pause);
        manager.process_key(KeyCode::Space, ElementState::Pressed, false);

        assert!(manager.just_pressed(Action::Pause));
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut manager = InputManager::default();
        manager.process_mouse_button(MouseButton::Middle, ElementState::Pressed);
        manager.reset();
        assert!(!manager.is_pressed(Action::Pan));
    }
}
