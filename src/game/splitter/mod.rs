// Glyph splitter sandbox
//
// Glyph-shaped bodies fall around a small walled level and can be cut in two
// by dragging a line through them:
// - `components`: entity components and their teardown
// - `fragment`: polygon to rigid body, plus inherited motion
// - `slicer`: drag gesture, deferred cut queue and cut execution
// - `mask`: body outlines in texture masks, texture hand-over on cuts
// - `glyph`: bitmap font skins
// - `sandbox`: the state driven by the window loop

pub mod components;
pub mod config;
pub mod fragment;
pub mod glyph;
pub mod mask;
pub mod sandbox;
pub mod slicer;

// Re-export commonly used types
pub use config::SandboxConfig;
pub use glyph::GlyphError;
pub use sandbox::{FrameControl, SandboxState};

use crate::engine::renderer::TextureError;

/// Sandbox errors
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Spawn limit of {limit} glyphs reached")]
    CapacityExceeded { limit: usize },

    #[error("Cannot build a body from a {width}x{height} box")]
    InvalidShape { width: f32, height: f32 },

    #[error("Glyph error: {0}")]
    Glyph(#[from] GlyphError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_error_display() {
        let err = SandboxError::CapacityExceeded { limit: 256 };
        assert_eq!(err.to_string(), "Spawn limit of 256 glyphs reached");

        let err = SandboxError::from(GlyphError::Unsupported('#'));
        assert_eq!(err.to_string(), "Glyph error: No glyph for '#'");
    }
}
