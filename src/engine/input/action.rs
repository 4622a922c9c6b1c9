// Sandbox action definitions and mappings

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Represents everything the user can ask the sandbox to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Pointer actions
    Slice,     // Left mouse drag
    Spawn,     // Right mouse
    Pan,       // Middle mouse drag
    RemoveBody,

    // Simulation toggles
    Pause,
    ToggleGravity,
    Reset,
    ResetCamera,

    // Meta actions
    DumpMasks,
    Quit,
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button input source
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Default keyboard/mouse bindings
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::mouse(MouseButton::Left), Action::Slice),
        (InputSource::mouse(MouseButton::Right), Action::Spawn),
        (InputSource::mouse(MouseButton::Middle), Action::Pan),
        (InputSource::key(KeyCode::KeyX), Action::RemoveBody),
        (InputSource::key(KeyCode::KeyP), Action::Pause),
        (InputSource::key(KeyCode::KeyG), Action::ToggleGravity),
        (InputSource::key(KeyCode::KeyR), Action::Reset),
        (InputSource::key(KeyCode::KeyC), Action::ResetCamera),
        (InputSource::key(KeyCode::KeyD), Action::DumpMasks),
        (InputSource::key(KeyCode::Escape), Action::Quit),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_source_keyboard_creation() {
        let source = InputSource::key(KeyCode::KeyG);
        assert_eq!(source, InputSource::Keyboard(KeyCode::KeyG));
    }

    #[test]
    fn test_input_source_mouse_creation() {
        let source = InputSource::mouse(MouseButton::Left);
        assert_eq!(source, InputSource::Mouse(MouseButton::Left));
    }

    #[test]
    fn test_pointer_actions_use_mouse() {
        let bindings = default_bindings();
        let find = |action| bindings.iter().find(|(_, a)| *a == action).map(|(s, _)| *s);

        assert_eq!(find(Action::Slice), Some(InputSource::mouse(MouseButton::Left)));
        assert_eq!(find(Action::Spawn), Some(InputSource::mouse(MouseButton::Right)));
        assert_eq!(find(Action::Pan), Some(InputSource::mouse(MouseButton::Middle)));
    }

    #[test]
    fn test_no_duplicate_inputs() {
        let mut seen_sources = std::collections::HashSet::new();
        for (source, _) in default_bindings() {
            assert!(seen_sources.insert(source), "Duplicate input source found");
        }
    }
}
