use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::{from_point, to_point, to_vector};
use crate::core::{Polygon, World};
use crate::engine::ecs::Entity;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector applied while stepping
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for the slice and pick queries
    query_pipeline: QueryPipeline,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Owning entity of each tagged body
    body_to_entity: HashMap<RigidBodyHandle, Entity>,
}

impl PhysicsWorld {
    /// Create a new physics world with no gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec2::ZERO)
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec2) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: to_vector(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            body_to_entity: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep.
    ///
    /// Bodies and colliders can't be added or removed while this runs; any
    /// topology change has to wait until it returns.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        let handle =
            self.collider_set
                .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set);
        self.refresh_queries();
        handle
    }

    /// Rebuild the query pipeline so queries see colliders added or removed
    /// since the last step
    fn refresh_queries(&mut self) {
        self.query_pipeline
            .update(&self.rigid_body_set, &self.collider_set);
    }

    /// Remove a rigid body, all its attached colliders and its entity tag.
    ///
    /// Returns false if the body was already gone.
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.body_to_entity.remove(&handle);
        let removed = self
            .rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true, // remove attached colliders
            )
            .is_some();
        if removed {
            self.refresh_queries();
        }
        removed
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a reference to a collider
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Get a mutable reference to a collider
    pub fn get_collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.collider_set.get_mut(handle)
    }

    /// Tag a body with the entity that owns it
    pub fn set_entity_mapping(&mut self, body_handle: RigidBodyHandle, entity: Entity) {
        self.body_to_entity.insert(body_handle, entity);
    }

    /// Get the entity that owns a body, if it was ever tagged
    pub fn get_entity(&self, body_handle: RigidBodyHandle) -> Option<Entity> {
        self.body_to_entity.get(&body_handle).copied()
    }

    /// Number of live rigid bodies, fixed ones included
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Number of live colliders
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Report every collider in `filter` crossed by the segment `start -> end`.
    ///
    /// The world is borrowed immutably for the whole query, so the callback
    /// can only record what it wants changed.
    pub fn segment_query<F>(&self, start: Vec2, end: Vec2, filter: Group, mut callback: F)
    where
        F: FnMut(ColliderHandle, &Collider, Vec2),
    {
        let dir = end - start;
        if dir.length_squared() <= f32::EPSILON {
            return;
        }

        let ray = Ray::new(to_point(start), to_vector(dir));
        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            1.0,
            true,
            query_filter(filter),
            |handle, hit| {
                if let Some(collider) = self.collider_set.get(handle) {
                    callback(handle, collider, start + dir * hit.time_of_impact);
                }
                true
            },
        );
    }

    /// Signed distance from `point` to a collider's surface, negative inside
    pub fn point_query(&self, handle: ColliderHandle, point: Vec2) -> Option<f32> {
        let collider = self.collider_set.get(handle)?;
        Some(
            collider
                .shape()
                .distance_to_point(collider.position(), &to_point(point), false),
        )
    }

    /// First collider in `filter` containing `point`
    pub fn collider_at(&self, point: Vec2, filter: Group) -> Option<ColliderHandle> {
        let mut found = None;
        self.query_pipeline.intersections_with_point(
            &self.rigid_body_set,
            &self.collider_set,
            &to_point(point),
            query_filter(filter),
            |handle| {
                found = Some(handle);
                false
            },
        );
        found
    }

    /// World-space vertices of a convex polygon collider
    pub fn world_polygon(&self, handle: ColliderHandle) -> Option<Polygon<World>> {
        let collider = self.collider_set.get(handle)?;
        let polygon = collider.shape().as_convex_polygon()?;
        let position = collider.position();
        Some(Polygon::new(
            polygon
                .points()
                .iter()
                .map(|p| from_point(&(position * p)))
                .collect(),
        ))
    }

    /// Set gravity for the physics world
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_vector(gravity);
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

/// Query filter keeping colliders that belong to any group in `filter`
fn query_filter<'a>(filter: Group) -> QueryFilter<'a> {
    QueryFilter::new().groups(InteractionGroups::new(Group::ALL, filter))
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::{BodyBuilder, ColliderBuilder2D};
    use crate::engine::physics::CollisionGroups;
    use approx::assert_relative_eq;

    fn add_square(world: &mut PhysicsWorld, center: Vec2, side: f32) -> (RigidBodyHandle, ColliderHandle) {
        let h = side / 2.0;
        let body = world.add_rigid_body(BodyBuilder::new_dynamic().position(center).build());
        let collider = ColliderBuilder2D::polygon(&[
            Vec2::new(-h, h),
            Vec2::new(-h, -h),
            Vec2::new(h, -h),
            Vec2::new(h, h),
        ])
        .unwrap()
        .collision_groups(CollisionGroups::Grabbable)
        .build();
        let collider = world.add_collider(collider, body);
        (body, collider)
    }

    #[test]
    fn test_world_polygon_is_in_world_space() {
        let mut world = PhysicsWorld::new();
        let (_, collider) = add_square(&mut world, Vec2::new(300.0, -40.0), 10.0);

        let polygon = world.world_polygon(collider).unwrap();
        let centroid = polygon.centroid();
        assert_relative_eq!(centroid.x, 300.0, epsilon = 1e-3);
        assert_relative_eq!(centroid.y, -40.0, epsilon = 1e-3);
        assert_relative_eq!(polygon.signed_area(), 100.0, epsilon = 1e-2);
    }

    #[test]
    fn test_point_query_sign() {
        let mut world = PhysicsWorld::new();
        let (_, collider) = add_square(&mut world, Vec2::ZERO, 100.0);

        assert!(world.point_query(collider, Vec2::ZERO).unwrap() < 0.0);
        assert_relative_eq!(
            world.point_query(collider, Vec2::new(80.0, 0.0)).unwrap(),
            30.0,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_segment_query_respects_filter() {
        let mut world = PhysicsWorld::new();
        add_square(&mut world, Vec2::ZERO, 100.0);

        let mut hits = 0;
        world.segment_query(
            Vec2::new(-200.0, 0.0),
            Vec2::new(200.0, 0.0),
            CollisionGroups::Grabbable.memberships(),
            |_, _, _| hits += 1,
        );
        assert_eq!(hits, 1);

        let mut level_hits = 0;
        world.segment_query(
            Vec2::new(-200.0, 0.0),
            Vec2::new(200.0, 0.0),
            CollisionGroups::Level.memberships(),
            |_, _, _| level_hits += 1,
        );
        assert_eq!(level_hits, 0);
    }

    #[test]
    fn test_segment_query_misses() {
        let mut world = PhysicsWorld::new();
        add_square(&mut world, Vec2::ZERO, 100.0);

        let mut hits = 0;
        world.segment_query(
            Vec2::new(-200.0, 300.0),
            Vec2::new(200.0, 300.0),
            Group::ALL,
            |_, _, _| hits += 1,
        );
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_remove_body_drops_tag_and_colliders() {
        let mut world = PhysicsWorld::new();
        let (body, collider) = add_square(&mut world, Vec2::ZERO, 1.0);
        let mut entities = crate::engine::ecs::Entities::new();
        let entity = entities.create();
        world.set_entity_mapping(body, entity);

        assert_eq!(world.get_entity(body), Some(entity));
        assert!(world.remove_rigid_body(body));
        assert!(world.get_entity(body).is_none());
        assert!(world.get_collider(collider).is_none());
        assert!(!world.remove_rigid_body(body));
    }

    #[test]
    fn test_collider_at() {
        let mut world = PhysicsWorld::new();
        let (_, collider) = add_square(&mut world, Vec2::new(50.0, 50.0), 20.0);

        assert_eq!(
            world.collider_at(Vec2::new(55.0, 45.0), Group::ALL),
            Some(collider)
        );
        assert!(world.collider_at(Vec2::ZERO, Group::ALL).is_none());
    }

    #[test]
    fn test_queries_follow_stepped_bodies() {
        let mut world = PhysicsWorld::with_gravity(Vec2::new(0.0, -196.0));
        let (body, collider) = add_square(&mut world, Vec2::ZERO, 20.0);
        for _ in 0..30 {
            world.step();
        }

        let y = world.get_rigid_body(body).unwrap().translation().y;
        assert!(y < -15.0);
        assert!(world.collider_at(Vec2::ZERO, Group::ALL).is_none());
        assert_eq!(
            world.collider_at(Vec2::new(0.0, y), Group::ALL),
            Some(collider)
        );

        let mut hits = Vec::new();
        world.segment_query(
            Vec2::new(-100.0, y),
            Vec2::new(100.0, y),
            Group::ALL,
            |handle, _, _| hits.push(handle),
        );
        assert_eq!(hits, vec![collider]);
    }

    #[test]
    fn test_removed_body_leaves_queries() {
        let mut world = PhysicsWorld::new();
        let (body, _) = add_square(&mut world, Vec2::ZERO, 20.0);
        world.remove_rigid_body(body);

        assert!(world.collider_at(Vec2::ZERO, Group::ALL).is_none());
    }

    #[test]
    fn test_gravity_roundtrip() {
        let mut world = PhysicsWorld::new();
        assert_eq!(world.gravity(), Vec2::ZERO);
        world.set_gravity(Vec2::new(0.0, -196.0));
        assert_eq!(world.gravity(), Vec2::new(0.0, -196.0));
    }
}
