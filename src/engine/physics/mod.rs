// Physics system using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::{presets, BodyBuilder, ColliderBuilder2D};
pub use collision::CollisionGroups;
pub use world::{ColliderHandle, PhysicsWorld, RigidBodyHandle};

pub use rapier2d::prelude::{Collider, Isometry, Real};

use glam::Vec2;
use rapier2d::prelude::{Point, Vector};

/// Convert a glam vector into a rapier point
pub fn to_point(v: Vec2) -> Point<Real> {
    Point::new(v.x, v.y)
}

/// Convert a glam vector into a rapier vector
pub fn to_vector(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

pub fn from_point(p: &Point<Real>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

pub fn from_vector(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}
