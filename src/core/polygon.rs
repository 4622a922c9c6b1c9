// Polygon vertex loops tagged with the frame they live in

use glam::Vec2;
use std::marker::PhantomData;

use super::mass;

/// Marker for world-space coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct World;

/// Marker for body-local coordinates (origin at the body's center of mass)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Local;

/// Ordered, implicitly closed vertex loop.
///
/// The `F` parameter records which frame the points are expressed in, so a
/// world-space loop can't be handed to code expecting body-local vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<F> {
    points: Vec<Vec2>,
    _frame: PhantomData<F>,
}

impl<F> Polygon<F> {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            _frame: PhantomData,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three points encloses no area and can't become a body
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Signed area, positive for counter-clockwise loops
    pub fn signed_area(&self) -> f32 {
        mass::area(&self.points)
    }

    pub fn centroid(&self) -> Vec2 {
        mass::centroid(&self.points)
    }
}

impl Polygon<World> {
    /// Re-express the loop relative to `origin`
    pub fn to_local(&self, origin: Vec2) -> Polygon<Local> {
        Polygon::new(self.points.iter().map(|p| *p - origin).collect())
    }
}

impl Polygon<Local> {
    /// Axis-aligned box centered on the local origin, counter-clockwise
    pub fn rectangle(width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::new(vec![
            Vec2::new(-hw, hh),
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
        ])
    }
}
