// Components attached to sandbox entities and the rules for tearing them down

use log::{debug, warn};

use crate::engine::ecs::{Entities, Entity, Storage};
use crate::engine::physics::{ColliderHandle, Isometry, PhysicsWorld, Real, RigidBodyHandle};
use crate::engine::renderer::{TextureBackend, TextureHandle};

/// Physics side of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    /// Mass the body was built with
    pub mass: f32,
    /// Moment of inertia about the centroid
    pub moment: f32,
}

impl Body {
    /// Remove the body and its collider from the world
    pub fn release(self, physics: &mut PhysicsWorld) {
        if !physics.remove_rigid_body(self.body) {
            debug!("Body {:?} was already removed", self.body);
        }
    }
}

/// Visual side of an entity: a skin plus a mask shaped like the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Textured {
    pub skin: TextureHandle,
    pub mask: TextureHandle,
    /// Pose of the texture center in the owning body's frame
    pub transform: Isometry<Real>,
}

impl Textured {
    /// Hand both render targets back to the backend
    pub fn release<B: TextureBackend + ?Sized>(self, textures: &mut B) {
        textures.discard(self.skin);
        textures.discard(self.mask);
    }
}

/// Every component kind an entity can carry, in teardown order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Textured,
    Body,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 2] = [ComponentKind::Textured, ComponentKind::Body];

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Textured => "textured",
            ComponentKind::Body => "body",
        }
    }

    /// Detach this kind from `entity` and free what it owns
    fn teardown<B: TextureBackend + ?Sized>(
        self,
        registry: &mut Registry,
        entity: Entity,
        physics: &mut PhysicsWorld,
        textures: &mut B,
    ) {
        match self {
            ComponentKind::Textured => {
                if let Some(textured) = registry.textured.remove(entity) {
                    textured.release(textures);
                }
            }
            ComponentKind::Body => {
                if let Some(body) = registry.bodies.remove(entity) {
                    body.release(physics);
                }
            }
        }
    }
}

/// Typed access to the storage of one component kind
pub trait Component: Sized + 'static {
    const KIND: ComponentKind;

    fn storage(registry: &Registry) -> &Storage<Self>;
    fn storage_mut(registry: &mut Registry) -> &mut Storage<Self>;
}

impl Component for Body {
    const KIND: ComponentKind = ComponentKind::Body;

    fn storage(registry: &Registry) -> &Storage<Self> {
        &registry.bodies
    }

    fn storage_mut(registry: &mut Registry) -> &mut Storage<Self> {
        &mut registry.bodies
    }
}

impl Component for Textured {
    const KIND: ComponentKind = ComponentKind::Textured;

    fn storage(registry: &Registry) -> &Storage<Self> {
        &registry.textured
    }

    fn storage_mut(registry: &mut Registry) -> &mut Storage<Self> {
        &mut registry.textured
    }
}

/// Entities and their components.
///
/// Destroying an entity runs the teardown of every component it carries, so
/// physics bodies and render targets never outlive their owner.
#[derive(Debug, Default)]
pub struct Registry {
    entities: Entities,
    bodies: Storage<Body>,
    textured: Storage<Textured>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an entity with no components
    pub fn create(&mut self) -> Entity {
        self.entities.create()
    }

    /// Whether `entity` is alive
    pub fn valid(&self, entity: Entity) -> bool {
        self.entities.is_valid(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entities
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    /// Attach a component.
    ///
    /// The component is handed back when the entity is dead or already has
    /// one of that kind, so the caller can release what it owns.
    pub fn emplace<C: Component>(&mut self, entity: Entity, component: C) -> Result<&mut C, C> {
        if !self.valid(entity) {
            warn!(
                "Cannot attach {} to dead entity {}",
                C::KIND.name(),
                entity
            );
            return Err(component);
        }
        C::storage_mut(self).insert(entity, component)
    }

    pub fn try_get<C: Component>(&self, entity: Entity) -> Option<&C> {
        C::storage(self).get(entity)
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        C::storage(self).contains(entity)
    }

    /// Entities carrying a `C`
    pub fn view<C: Component>(&self) -> impl Iterator<Item = (Entity, &C)> + '_ {
        C::storage(self).iter()
    }

    /// Entities carrying both an `A` and a `B`
    pub fn view2<A: Component, B: Component>(
        &self,
    ) -> impl Iterator<Item = (Entity, &A, &B)> + '_ {
        A::storage(self)
            .iter()
            .filter_map(move |(entity, a)| B::storage(self).get(entity).map(|b| (entity, a, b)))
    }

    /// Tear down every component of `entity`, then free it.
    ///
    /// Returns false, doing nothing, if the entity was already dead.
    pub fn destroy<B: TextureBackend + ?Sized>(
        &mut self,
        entity: Entity,
        physics: &mut PhysicsWorld,
        textures: &mut B,
    ) -> bool {
        if !self.valid(entity) {
            return false;
        }

        for kind in ComponentKind::ALL {
            kind.teardown(self, entity, physics, textures);
        }
        self.entities.destroy(entity)
    }

    /// Destroy every live entity, returns how many there were
    pub fn clear<B: TextureBackend + ?Sized>(
        &mut self,
        physics: &mut PhysicsWorld,
        textures: &mut B,
    ) -> usize {
        let live: Vec<Entity> = self.iter().collect();
        for entity in &live {
            self.destroy(*entity, physics, textures);
        }
        live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{BodyBuilder, ColliderBuilder2D};
    use crate::engine::renderer::texture::testing::CountingBackend;

    fn add_body(physics: &mut PhysicsWorld) -> Body {
        let body = physics.add_rigid_body(BodyBuilder::new_dynamic().build());
        let collider = physics.add_collider(ColliderBuilder2D::box_shape(1.0, 1.0).build(), body);
        Body {
            body,
            collider,
            mass: 4.0,
            moment: 1.0,
        }
    }

    fn add_textured(textures: &mut CountingBackend) -> Textured {
        Textured {
            skin: textures.create_target(4, 4).unwrap(),
            mask: textures.create_target(4, 4).unwrap(),
            transform: Isometry::identity(),
        }
    }

    #[test]
    fn test_emplace_and_get() {
        let mut physics = PhysicsWorld::new();
        let mut registry = Registry::new();
        let entity = registry.create();
        let body = add_body(&mut physics);

        assert!(registry.emplace(entity, body).is_ok());
        assert_eq!(registry.try_get::<Body>(entity), Some(&body));
        assert!(registry.try_get::<Textured>(entity).is_none());
        assert!(registry.has::<Body>(entity));
    }

    #[test]
    fn test_emplace_on_dead_entity_hands_back() {
        let mut physics = PhysicsWorld::new();
        let mut textures = CountingBackend::new();
        let mut registry = Registry::new();
        let entity = registry.create();
        registry.destroy(entity, &mut physics, &mut textures);

        let body = add_body(&mut physics);
        assert_eq!(registry.emplace(entity, body), Err(body));
    }

    #[test]
    fn test_emplace_twice_hands_back() {
        let mut physics = PhysicsWorld::new();
        let mut registry = Registry::new();
        let entity = registry.create();
        let first = add_body(&mut physics);
        let second = add_body(&mut physics);

        registry.emplace(entity, first).unwrap();
        assert_eq!(registry.emplace(entity, second), Err(second));
        assert_eq!(registry.try_get::<Body>(entity), Some(&first));
    }

    #[test]
    fn test_destroy_runs_every_teardown_once() {
        let mut physics = PhysicsWorld::new();
        let mut textures = CountingBackend::new();
        let mut registry = Registry::new();

        let entity = registry.create();
        let body = add_body(&mut physics);
        let textured = add_textured(&mut textures);
        registry.emplace(entity, body).unwrap();
        registry.emplace(entity, textured.clone()).unwrap();

        assert!(registry.destroy(entity, &mut physics, &mut textures));
        assert!(!registry.valid(entity));
        assert_eq!(physics.body_count(), 0);
        assert_eq!(textures.release_count(textured.skin), 1);
        assert_eq!(textures.release_count(textured.mask), 1);

        // Second destroy is a no-op
        assert!(!registry.destroy(entity, &mut physics, &mut textures));
        assert_eq!(textures.total_releases(), 2);
    }

    #[test]
    fn test_destroy_tolerates_body_already_gone() {
        let mut physics = PhysicsWorld::new();
        let mut textures = CountingBackend::new();
        let mut registry = Registry::new();

        let entity = registry.create();
        let body = add_body(&mut physics);
        registry.emplace(entity, body).unwrap();
        physics.remove_rigid_body(body.body);

        assert!(registry.destroy(entity, &mut physics, &mut textures));
        assert!(registry.try_get::<Body>(entity).is_none());
    }

    #[test]
    fn test_views() {
        let mut physics = PhysicsWorld::new();
        let mut textures = CountingBackend::new();
        let mut registry = Registry::new();

        let plain = registry.create();
        registry.emplace(plain, add_body(&mut physics)).unwrap();

        let skinned = registry.create();
        registry.emplace(skinned, add_body(&mut physics)).unwrap();
        registry
            .emplace(skinned, add_textured(&mut textures))
            .unwrap();

        assert_eq!(registry.view::<Body>().count(), 2);
        let both: Vec<Entity> = registry
            .view2::<Body, Textured>()
            .map(|(entity, _, _)| entity)
            .collect();
        assert_eq!(both, vec![skinned]);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut physics = PhysicsWorld::new();
        let mut textures = CountingBackend::new();
        let mut registry = Registry::new();

        for _ in 0..3 {
            let entity = registry.create();
            registry.emplace(entity, add_body(&mut physics)).unwrap();
            registry
                .emplace(entity, add_textured(&mut textures))
                .unwrap();
        }

        assert_eq!(registry.clear(&mut physics, &mut textures), 3);
        assert!(registry.is_empty());
        assert_eq!(physics.body_count(), 0);
        assert_eq!(textures.live_count(), 0);
        assert!(textures.double_released().is_empty());
    }
}
