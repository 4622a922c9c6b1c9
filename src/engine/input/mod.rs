// Input handling system
//
// Keyboard and mouse events from winit are mapped onto sandbox actions through
// a remappable binding table. Pointer position, drag delta and wheel notches
// are tracked alongside the per-frame press/release sets.
//
// ## Architecture
//
// - `action`: Defines sandbox actions and default bindings
// - `state`: Per-frame action and pointer state
// - `config`: Input configuration and remapping
// - `manager`: Translates winit events into actions
//
// ## Usage Example
//
// ```rust
// use engine::input::{InputManager, Action};
//
// let mut input = InputManager::default();
//
// // In your event loop
// input.process_mouse_button(button, state);
//
// // Query input state, then clear the per-frame part
// if input.just_released(Action::Slice) {
//     // finish the cut at input.state().cursor()
// }
// input.update();
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod state;

// Re-export commonly used types
pub use action::Action;
pub use manager::InputManager;
