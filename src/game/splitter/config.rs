// Sandbox settings: world, materials, level layout and spawn rules

use glam::Vec2;
use std::path::PathBuf;

/// Density of every glyph and fragment (mass per square pixel)
pub const GLYPH_DENSITY: f32 = 1.0 / 10000.0;

/// Gravity used when it is switched on, in pixels per second squared
pub const GRAVITY: Vec2 = Vec2::new(0.0, -9.8 * 20.0);

/// Sandbox configuration
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    // Simulation
    /// Gravity applied while enabled
    pub gravity: Vec2,
    /// Whether gravity starts switched on
    pub gravity_enabled: bool,
    /// Fixed physics step in seconds
    pub timestep: f32,

    // Materials
    /// Mass per unit area of glyphs and fragments
    pub density: f32,
    /// Friction given to newly spawned glyphs
    pub friction: f32,
    /// Friction of floor and walls
    pub level_friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,

    // Glyphs
    /// Side of one font cell, in pixels
    pub glyph_cell: u32,
    /// Live spawned glyphs allowed at once, `None` for no limit
    pub spawn_limit: Option<usize>,

    // Scene
    /// Static segments making up the level
    pub level: Vec<(Vec2, Vec2)>,
    /// Glyphs placed by `init`
    pub initial_glyphs: Vec<(String, Vec2)>,

    // View
    pub camera_position: Vec2,
    pub camera_zoom: f32,

    /// Directory for exported skins and masks
    pub dump_dir: PathBuf,
}

impl SandboxConfig {
    /// No level, no glyphs, gravity off
    pub fn bare() -> Self {
        Self {
            level: Vec::new(),
            initial_glyphs: Vec::new(),
            ..Self::default()
        }
    }

    /// Floor from (100, -1000) to (1820, -1000) with a wall 100 high at each end
    pub fn default_level() -> Vec<(Vec2, Vec2)> {
        let left = Vec2::new(100.0, -1000.0);
        let right = Vec2::new(1820.0, -1000.0);
        let up = Vec2::new(0.0, 100.0);
        vec![(left, right), (left, left + up), (right, right + up)]
    }

    pub fn default_glyphs() -> Vec<(String, Vec2)> {
        vec![
            ("A".to_string(), Vec2::new(200.0, -100.0)),
            ("H".to_string(), Vec2::new(1200.0, 0.0)),
            ("J".to_string(), Vec2::new(200.0, -600.0)),
        ]
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            gravity_enabled: false,
            timestep: 1.0 / 60.0,

            density: GLYPH_DENSITY,
            friction: 0.7,
            level_friction: 1.0,
            // Roughly 10% speed loss per second
            linear_damping: 0.1,
            angular_damping: 0.1,

            glyph_cell: 24,
            spawn_limit: Some(256),

            level: Self::default_level(),
            initial_glyphs: Self::default_glyphs(),

            camera_position: Vec2::new(960.0, -540.0),
            camera_zoom: 0.6,

            dump_dir: PathBuf::from("toasts"),
        }
    }
}
