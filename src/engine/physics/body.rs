use super::collision::CollisionGroups;
use super::{to_point, to_vector};
use crate::core::MassProperties as PolygonMass;
use glam::Vec2;
use rapier2d::prelude::*;

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    linvel: Vector<Real>,
    angvel: Real,
    linear_damping: Real,
    angular_damping: Real,
    can_sleep: bool,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            linvel: Vector::zeros(),
            angvel: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            can_sleep: true,
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            can_sleep: false,
            ..Self::new_dynamic()
        }
    }

    /// Set the initial position of the body, without rotation
    pub fn position(mut self, position: Vec2) -> Self {
        self.position = Isometry::translation(position.x, position.y);
        self
    }

    /// Set the initial position and rotation
    pub fn pose(mut self, pose: Isometry<Real>) -> Self {
        self.position = pose;
        self
    }

    /// Set the initial linear velocity
    pub fn linvel(mut self, linvel: Vec2) -> Self {
        self.linvel = to_vector(linvel);
        self
    }

    /// Set the initial angular velocity (radians per second)
    pub fn angvel(mut self, angvel: Real) -> Self {
        self.angvel = angvel;
        self
    }

    /// Air resistance for both motion components
    pub fn damping(mut self, linear: Real, angular: Real) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .linvel(self.linvel)
            .angvel(self.angvel)
            .linear_damping(self.linear_damping)
            .angular_damping(self.angular_damping)
            .can_sleep(self.can_sleep)
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    friction: Real,
    restitution: Real,
    density: Option<Real>,
    mass_properties: Option<MassProperties>,
}

impl ColliderBuilder2D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Default,
            friction: 0.5,
            restitution: 0.0,
            density: Some(1.0),
            mass_properties: None,
        }
    }

    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self::with_shape(SharedShape::cuboid(half_width, half_height))
    }

    /// Create a circle-shaped collider
    pub fn circle(radius: Real) -> Self {
        Self::with_shape(SharedShape::ball(radius))
    }

    /// Create a line segment collider, mostly for level geometry
    pub fn segment(a: Vec2, b: Vec2) -> Self {
        Self::with_shape(SharedShape::segment(to_point(a), to_point(b)))
    }

    /// Create a collider from a counter-clockwise convex vertex loop.
    ///
    /// Repeated or nearly collinear points can make the loop unusable as is; in
    /// that case the convex hull of the points is used instead. Returns `None`
    /// when the points enclose no area.
    pub fn polygon(points: &[Vec2]) -> Option<Self> {
        let points: Vec<_> = points.iter().map(|p| to_point(*p)).collect();

        SharedShape::convex_polyline(points.clone())
            .or_else(|| SharedShape::convex_hull(&points))
            .map(Self::with_shape)
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set density (mass will be calculated from shape volume)
    pub fn density(mut self, density: Real) -> Self {
        self.density = Some(density);
        self.mass_properties = None;
        self
    }

    /// Use precomputed mass, moment and centroid instead of a density.
    ///
    /// `local_centroid` is where the centroid sits in the collider's frame.
    pub fn mass_properties(mut self, props: &PolygonMass, local_centroid: Vec2) -> Self {
        self.mass_properties = Some(MassProperties::new(
            to_point(local_centroid),
            props.mass,
            props.moment,
        ));
        self.density = None;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        let builder = rapier2d::prelude::ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .friction(self.friction)
            .restitution(self.restitution);

        let builder = if let Some(props) = self.mass_properties {
            builder.mass_properties(props)
        } else if let Some(density) = self.density {
            builder.density(density)
        } else {
            builder
        };

        builder.build()
    }
}

/// Common rigid body configurations for sandbox objects
pub mod presets {
    use super::*;

    /// Dynamic body for a glyph or one of its fragments
    pub fn glyph_body(
        pose: Isometry<Real>,
        linear_damping: Real,
        angular_damping: Real,
    ) -> RigidBody {
        BodyBuilder::new_dynamic()
            .pose(pose)
            .damping(linear_damping, angular_damping)
            .build()
    }

    /// Sliceable polygon collider with explicit mass properties.
    ///
    /// `points` are relative to the body origin, which is also the centroid.
    pub fn glyph_collider(points: &[Vec2], props: &PolygonMass, friction: Real) -> Option<Collider> {
        Some(
            ColliderBuilder2D::polygon(points)?
                .collision_groups(CollisionGroups::Grabbable)
                .friction(friction)
                .mass_properties(props, Vec2::ZERO)
                .build(),
        )
    }

    /// Static body holding the level geometry
    pub fn level_body() -> RigidBody {
        BodyBuilder::new_fixed().build()
    }

    /// Floor or wall segment
    pub fn level_segment(a: Vec2, b: Vec2, friction: Real) -> Collider {
        ColliderBuilder2D::segment(a, b)
            .collision_groups(CollisionGroups::Level)
            .friction(friction)
            .build()
    }
}
