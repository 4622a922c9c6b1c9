// Slicing: turning a mouse drag into deferred cuts and carrying them out
//
// Cuts found while the physics world is being queried can't change it, so
// each hit is recorded as a `CutCommand` and executed once the query (and the
// step it belongs to) is over.

use glam::Vec2;
use log::{debug, info, warn};
use std::mem;

use super::components::{Registry, Textured};
use super::fragment::{build_fragment, inherit_motion, Inherited, Material};
use super::mask::propagate;
use crate::core::{split, HalfPlane, MassProperties};
use crate::engine::ecs::Entity;
use crate::engine::physics::{
    from_vector, to_point, Collider, ColliderHandle, CollisionGroups, Isometry, PhysicsWorld,
};
use crate::engine::renderer::TextureBackend;

/// Segment a cut is made along
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceContext {
    pub a: Vec2,
    pub b: Vec2,
}

/// A cut waiting for the physics world to be unlocked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutCommand {
    pub collider: ColliderHandle,
    pub context: SliceContext,
}

/// Where the slicing gesture is
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SliceState {
    #[default]
    Idle,
    /// Button held, waiting for the end point
    AwaitingRelease { start: Vec2 },
    /// Segment query in flight
    QueryPending(SliceContext),
    /// Cuts queued, waiting to be executed
    CutDeferred { pending: usize },
}

/// What a cut did
#[derive(Debug, Clone, PartialEq)]
pub struct CutOutcome {
    /// Entity that owned the cut body, if it had one
    pub source: Option<Entity>,
    pub fragments: Vec<Entity>,
}

/// Slicing gesture state and the queue of deferred cuts
#[derive(Debug, Default)]
pub struct Slicer {
    state: SliceState,
    queue: Vec<CutCommand>,
}

impl Slicer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SliceState {
        self.state
    }

    /// Cuts waiting to be executed
    pub fn pending(&self) -> &[CutCommand] {
        &self.queue
    }

    /// Button pressed at `start`
    pub fn begin(&mut self, start: Vec2) {
        if let SliceState::AwaitingRelease { start: previous } = self.state {
            debug!("Slice restarted, dropping start point {:?}", previous);
        }
        self.state = SliceState::AwaitingRelease { start };
    }

    /// Abandon the gesture in progress. Queued cuts are kept.
    pub fn cancel(&mut self) {
        if let SliceState::AwaitingRelease { .. } = self.state {
            self.state = self.settled_state();
        }
    }

    /// Button released at `end`: query the segment from the start point.
    ///
    /// Returns the number of cuts queued. Does nothing unless a gesture was
    /// started with `begin`.
    pub fn release(&mut self, end: Vec2, physics: &PhysicsWorld) -> usize {
        match self.state {
            SliceState::AwaitingRelease { start } => self.slice(start, end, physics),
            _ => 0,
        }
    }

    /// Queue a cut for every sliceable collider the segment `a -> b` passes
    /// fully through. Returns the number of cuts queued.
    pub fn slice(&mut self, a: Vec2, b: Vec2, physics: &PhysicsWorld) -> usize {
        let context = SliceContext { a, b };
        self.state = SliceState::QueryPending(context);

        let before = self.queue.len();
        let queue = &mut self.queue;
        physics.segment_query(
            a,
            b,
            CollisionGroups::Grabbable.memberships(),
            |handle, collider, _| {
                if !accepts_cut(physics, handle, collider, &context) {
                    return;
                }
                // One cut per collider, even if several segments hit it
                if queue.iter().any(|command| command.collider == handle) {
                    return;
                }
                queue.push(CutCommand {
                    collider: handle,
                    context,
                });
            },
        );

        let queued = self.queue.len() - before;
        debug!("Slice {:?} -> {:?} queued {} cut(s)", a, b, queued);
        self.state = self.settled_state();
        queued
    }

    /// Hand over every queued cut, leaving the slicer idle
    pub fn take_pending(&mut self) -> Vec<CutCommand> {
        if let SliceState::CutDeferred { .. } = self.state {
            self.state = SliceState::Idle;
        }
        mem::take(&mut self.queue)
    }

    /// Drop the gesture and every queued cut
    pub fn clear(&mut self) {
        self.queue.clear();
        self.state = SliceState::Idle;
    }

    fn settled_state(&self) -> SliceState {
        if self.queue.is_empty() {
            SliceState::Idle
        } else {
            SliceState::CutDeferred {
                pending: self.queue.len(),
            }
        }
    }
}

/// A collider takes a cut when it is a polygon and neither end of the segment
/// lies inside it
fn accepts_cut(
    physics: &PhysicsWorld,
    handle: ColliderHandle,
    collider: &Collider,
    context: &SliceContext,
) -> bool {
    if collider.shape().as_convex_polygon().is_none() {
        return false;
    }

    [context.a, context.b].iter().all(|point| {
        physics
            .point_query(handle, *point)
            .is_some_and(|distance| distance >= 0.0)
    })
}

/// Split the collider named by `command` in two along its segment.
///
/// Each non-degenerate piece becomes a new entity with its own body, the
/// velocity the source had at the piece's centroid, the source's spin and
/// friction, and a copy of the source's textures. The source body and entity
/// are destroyed afterwards. Returns `None`, leaving the world untouched, when
/// the collider is gone or no piece is large enough to keep.
pub fn execute_cut<B: TextureBackend + ?Sized>(
    command: &CutCommand,
    physics: &mut PhysicsWorld,
    registry: &mut Registry,
    textures: &mut B,
    material: &Material,
) -> Option<CutOutcome> {
    let SliceContext { a, b } = command.context;
    let Some(collider) = physics.get_collider(command.collider) else {
        debug!("Collider {:?} vanished before its cut ran", command.collider);
        return None;
    };
    let body_handle = collider.parent()?;
    let friction = collider.friction();
    let polygon = physics.world_polygon(command.collider)?;
    let plane = HalfPlane::through(a, b)?;

    let source_body = physics.get_rigid_body(body_handle)?;
    let source_pose = *source_body.position();
    let angvel = source_body.angvel();

    let pieces: Vec<_> = split(&polygon, plane)
        .into_iter()
        .flatten()
        .filter_map(|piece| {
            let mass = MassProperties::from_polygon(piece.points(), material.density)?;
            let linvel = from_vector(&source_body.velocity_at_point(&to_point(mass.centroid)));
            Some((piece, mass, linvel))
        })
        .collect();

    if pieces.is_empty() {
        debug!("Cut {:?} -> {:?} left no usable piece", a, b);
        return None;
    }

    let source = physics.get_entity(body_handle);
    let source_textured = source
        .and_then(|entity| registry.try_get::<Textured>(entity))
        .cloned();

    let mut fragments = Vec::with_capacity(pieces.len());
    for (piece, mass, linvel) in pieces {
        let entity = registry.create();
        let shape = piece.to_local(mass.centroid);
        let pose = Isometry::translation(mass.centroid.x, mass.centroid.y);

        let Some(body) = build_fragment(physics, entity, &shape, &mass, pose, material) else {
            debug!("Dropping piece of area {} with no usable outline", mass.area);
            registry.destroy(entity, physics, textures);
            continue;
        };
        inherit_motion(
            physics,
            &body,
            &Inherited {
                linvel,
                angvel,
                friction,
            },
        );
        if let Err(orphan) = registry.emplace(entity, body) {
            orphan.release(physics);
            continue;
        }

        if let Some(textured) = &source_textured {
            if let Err(err) =
                propagate(registry, textures, physics, textured, &source_pose, entity, body.body)
            {
                warn!("Fragment {} lost its textures: {}", entity, err);
            }
        }
        fragments.push(entity);
    }

    if fragments.is_empty() {
        return None;
    }

    physics.remove_rigid_body(body_handle);
    match source {
        Some(entity) if registry.valid(entity) => {
            registry.destroy(entity, physics, textures);
        }
        Some(entity) => warn!("Cut body belonged to dead entity {}", entity),
        None => warn!("Cut body {:?} had no owning entity", body_handle),
    }

    info!(
        "Sliced {} into {} fragment(s)",
        source.map_or_else(|| "untagged body".to_string(), |e| e.to_string()),
        fragments.len()
    );

    Some(CutOutcome { source, fragments })
}
