// Visual masks: drawing a body's outline into its mask and carrying textures
// over to the fragments of a cut

use glam::Vec2;
use log::warn;

use super::components::{Registry, Textured};
use crate::engine::ecs::Entity;
use crate::engine::physics::{from_point, Isometry, PhysicsWorld, Real, RigidBodyHandle};
use crate::engine::renderer::{
    TextureBackend, TextureError, TextureHandle, TRANSPARENT, WHITE,
};

/// Pixel position of a point in the texture frame (y up, origin at the center)
fn to_pixels(point: Vec2, (width, height): (u32, u32)) -> Vec2 {
    Vec2::new(
        point.x + width as f32 / 2.0,
        height as f32 / 2.0 - point.y,
    )
}

/// Clear `mask` and fill it with every polygon collider of `body`.
///
/// `transform` is the pose of the texture center in the body's frame. Pixels
/// covered by the body end up opaque, everything else transparent.
pub fn render_contour<B: TextureBackend + ?Sized>(
    textures: &mut B,
    physics: &PhysicsWorld,
    body: RigidBodyHandle,
    mask: TextureHandle,
    transform: &Isometry<Real>,
) -> Result<(), TextureError> {
    let size = textures
        .size(mask)
        .ok_or(TextureError::UnknownHandle(mask))?;
    textures.clear(mask, TRANSPARENT)?;

    let Some(rigid_body) = physics.get_rigid_body(body) else {
        return Ok(());
    };
    let body_to_texture = transform.inverse();

    for handle in rigid_body.colliders() {
        let Some(collider) = physics.get_collider(*handle) else {
            continue;
        };
        let Some(polygon) = collider.shape().as_convex_polygon() else {
            continue;
        };
        let local = collider
            .position_wrt_parent()
            .copied()
            .unwrap_or_else(Isometry::identity);

        let outline: Vec<Vec2> = polygon
            .points()
            .iter()
            .map(|p| to_pixels(from_point(&(body_to_texture * (local * p))), size))
            .collect();
        textures.fill_convex(mask, &outline, WHITE)?;
    }

    Ok(())
}

/// Give `target` its own copy of the source skin and a mask cut to its body.
///
/// `source_pose` is the world pose the source body had when it was cut. The
/// skin stays where it was in the world: its transform is re-expressed in the
/// target body's frame.
pub fn propagate<B: TextureBackend + ?Sized>(
    registry: &mut Registry,
    textures: &mut B,
    physics: &PhysicsWorld,
    source: &Textured,
    source_pose: &Isometry<Real>,
    target: Entity,
    target_body: RigidBodyHandle,
) -> Result<(), TextureError> {
    let Some(target_pose) = physics.get_rigid_body(target_body).map(|b| *b.position()) else {
        warn!("Fragment {} has no body, skipping its textures", target);
        return Ok(());
    };

    let (width, height) = textures
        .size(source.mask)
        .ok_or(TextureError::UnknownHandle(source.mask))?;
    let skin = textures.duplicate(source.skin)?;
    let mask = match textures.create_target(width, height) {
        Ok(mask) => mask,
        Err(err) => {
            textures.discard(skin);
            return Err(err);
        }
    };

    let textured = Textured {
        skin,
        mask,
        transform: target_pose.inverse() * source_pose * source.transform,
    };

    if let Err(err) = render_contour(textures, physics, target_body, mask, &textured.transform) {
        textured.release(textures);
        return Err(err);
    }
    if let Err(orphan) = registry.emplace(target, textured) {
        orphan.release(textures);
    }

    Ok(())
}
