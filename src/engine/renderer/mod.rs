// Offscreen rendering: camera mapping and CPU render targets
//
// Presenting to the window is left to whatever front end hosts the sandbox.

mod camera;
pub mod texture;

pub use camera::Camera;
pub use texture::{
    Rgba, TextureBackend, TextureError, TextureHandle, TextureStore, TRANSPARENT, WHITE,
};
