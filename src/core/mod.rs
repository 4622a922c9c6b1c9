// Core geometry: polygons, half-plane clipping, mass properties

pub mod clip;
pub mod mass;
pub mod math;
pub mod polygon;

pub use clip::{split, HalfPlane};
pub use mass::MassProperties;
pub use polygon::{Local, Polygon, World};
