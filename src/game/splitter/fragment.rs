// Building dynamic bodies from polygons and handing them the motion of the
// body they came from

use glam::Vec2;

use super::components::Body;
use super::config::SandboxConfig;
use crate::core::{Local, MassProperties, Polygon};
use crate::engine::ecs::Entity;
use crate::engine::physics::{
    presets, to_vector, ColliderHandle, Isometry, PhysicsWorld, Real,
};

/// Physical material shared by glyphs and their fragments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl From<&SandboxConfig> for Material {
    fn from(config: &SandboxConfig) -> Self {
        Self {
            density: config.density,
            friction: config.friction,
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
        }
    }
}

/// Motion and surface taken over from a body that is being cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inherited {
    /// Velocity of the source body at the fragment's centroid
    pub linvel: Vec2,
    pub angvel: f32,
    pub friction: f32,
}

/// Create a dynamic body with a single polygon collider and tag it with `entity`.
///
/// `shape` must be expressed relative to its own centroid; the body is placed
/// at `pose`. Nothing is added to the world when the polygon can't form a
/// collider.
pub fn build_fragment(
    physics: &mut PhysicsWorld,
    entity: Entity,
    shape: &Polygon<Local>,
    mass: &MassProperties,
    pose: Isometry<Real>,
    material: &Material,
) -> Option<Body> {
    let collider = presets::glyph_collider(shape.points(), mass, material.friction)?;

    let body = presets::glyph_body(pose, material.linear_damping, material.angular_damping);
    let body = physics.add_rigid_body(body);
    let collider = physics.add_collider(collider, body);
    physics.set_entity_mapping(body, entity);

    Some(Body {
        body,
        collider,
        mass: mass.mass,
        moment: mass.moment,
    })
}

/// Give a freshly built body the velocity and friction of its source
pub fn inherit_motion(physics: &mut PhysicsWorld, body: &Body, inherited: &Inherited) {
    let colliders: Vec<ColliderHandle> = match physics.get_rigid_body_mut(body.body) {
        Some(rigid_body) => {
            rigid_body.set_linvel(to_vector(inherited.linvel), true);
            rigid_body.set_angvel(inherited.angvel, true);
            rigid_body.colliders().to_vec()
        }
        None => return,
    };

    for handle in colliders {
        if let Some(collider) = physics.get_collider_mut(handle) {
            collider.set_friction(inherited.friction);
        }
    }
}
