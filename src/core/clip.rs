// Convex polygon clipping against a half-plane

use glam::Vec2;

use super::math::lerp;
use super::polygon::{Polygon, World};

/// Region where `dot(p, normal) - distance < 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    pub normal: Vec2,
    pub distance: f32,
}

impl HalfPlane {
    pub fn new(normal: Vec2, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Plane through the segment `a -> b`, normal pointing to its left.
    ///
    /// Returns `None` when the segment has no length.
    pub fn through(a: Vec2, b: Vec2) -> Option<Self> {
        let normal = (b - a).perp().try_normalize()?;
        Some(Self {
            normal,
            distance: a.dot(normal),
        })
    }

    /// The complementary half-plane
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    pub fn signed_distance(&self, point: Vec2) -> f32 {
        point.dot(self.normal) - self.distance
    }
}

/// Keep the part of a convex polygon that lies inside `plane`.
///
/// Vertices are kept when strictly inside; every edge that crosses the
/// boundary contributes its crossing point. Winding follows the input. The
/// result may have fewer than 3 points when the polygon lies (almost) entirely
/// outside, callers must check `is_degenerate` before building anything from it.
pub fn clip(polygon: &Polygon<World>, plane: HalfPlane) -> Polygon<World> {
    let points = polygon.points();
    let count = points.len();
    let mut clipped = Vec::with_capacity(count + 1);

    if count == 0 {
        return Polygon::new(clipped);
    }

    let mut j = count - 1;
    for i in 0..count {
        let a = points[j];
        let a_dist = plane.signed_distance(a);
        if a_dist < 0.0 {
            clipped.push(a);
        }

        let b = points[i];
        let b_dist = plane.signed_distance(b);
        if a_dist * b_dist < 0.0 {
            let denom = a_dist.abs() + b_dist.abs();
            if denom > 0.0 {
                clipped.push(lerp(a, b, a_dist.abs() / denom));
            }
        }
        j = i;
    }

    Polygon::new(clipped)
}

/// Cut a convex polygon along the boundary of `plane`.
///
/// Returns the inside piece first, then the outside piece. Pieces with fewer
/// than three points are dropped.
pub fn split(polygon: &Polygon<World>, plane: HalfPlane) -> [Option<Polygon<World>>; 2] {
    [plane, plane.flipped()].map(|half| {
        let piece = clip(polygon, half);
        (!piece.is_degenerate()).then_some(piece)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(side: f32) -> Polygon<World> {
        let h = side / 2.0;
        Polygon::new(vec![
            Vec2::new(-h, h),
            Vec2::new(-h, -h),
            Vec2::new(h, -h),
            Vec2::new(h, h),
        ])
    }

    fn hexagon(radius: f32, center: Vec2) -> Polygon<World> {
        Polygon::new(
            (0..6)
                .map(|i| {
                    let angle = i as f32 * std::f32::consts::TAU / 6.0;
                    center + Vec2::new(angle.cos(), angle.sin()) * radius
                })
                .collect(),
        )
    }

    #[test]
    fn test_half_plane_through_segment() {
        let plane = HalfPlane::through(Vec2::new(-200.0, 0.0), Vec2::new(200.0, 0.0)).unwrap();
        assert_relative_eq!(plane.normal.x, 0.0);
        assert_relative_eq!(plane.normal.y, 1.0);
        assert_relative_eq!(plane.distance, 0.0);
        assert!(plane.signed_distance(Vec2::new(0.0, -5.0)) < 0.0);
    }

    #[test]
    fn test_half_plane_zero_length_segment() {
        assert!(HalfPlane::through(Vec2::ONE, Vec2::ONE).is_none());
    }

    #[test]
    fn test_clip_square_in_half() {
        let plane = HalfPlane::new(Vec2::Y, 0.0);
        let lower = clip(&square(100.0), plane);

        assert_eq!(lower.len(), 4);
        assert_relative_eq!(lower.signed_area(), 5000.0, epsilon = 1e-2);
        assert!(lower.points().iter().all(|p| p.y <= 0.0));
    }

    #[test]
    fn test_clip_preserves_winding() {
        let plane = HalfPlane::new(Vec2::new(1.0, 1.0).normalize(), 10.0);
        let piece = clip(&hexagon(50.0, Vec2::ZERO), plane);
        assert!(!piece.is_degenerate());
        assert!(piece.signed_area() > 0.0);
    }

    #[test]
    fn test_clip_areas_add_up() {
        let polygon = hexagon(80.0, Vec2::new(30.0, -20.0));
        let total = polygon.signed_area();

        for (normal, distance) in [
            (Vec2::X, 30.0),
            (Vec2::new(0.3, -0.7).normalize(), 5.0),
            (Vec2::new(-1.0, 2.0).normalize(), -12.5),
        ] {
            let [inside, outside] = split(&polygon, HalfPlane::new(normal, distance));
            let inside = inside.expect("line crosses the interior");
            let outside = outside.expect("line crosses the interior");
            assert_relative_eq!(
                inside.signed_area() + outside.signed_area(),
                total,
                max_relative = 1e-4
            );
        }
    }

    #[test]
    fn test_clip_everything_outside() {
        let plane = HalfPlane::new(Vec2::Y, -500.0);
        let piece = clip(&square(100.0), plane);
        assert!(piece.is_empty());

        let [inside, outside] = split(&square(100.0), plane);
        assert!(inside.is_none());
        assert_relative_eq!(outside.unwrap().signed_area(), 10000.0, epsilon = 1e-2);
    }

    #[test]
    fn test_clip_through_vertices() {
        // Vertices exactly on the line are neither kept nor interpolated
        let plane = HalfPlane::new(Vec2::new(1.0, 1.0).normalize(), 0.0);
        let piece = clip(&square(2.0), plane);
        assert_eq!(piece.points(), &[Vec2::new(-1.0, -1.0)]);

        let [a, b] = split(&square(2.0), plane);
        assert!(a.is_none());
        assert!(b.is_none());
    }

    #[test]
    fn test_clip_corner_sliver_kept() {
        // Keeps the region x + y > 1.9
        let plane = HalfPlane::new(Vec2::new(-1.0, -1.0).normalize(), -1.9 / 2f32.sqrt());
        let [corner, rest] = split(&square(2.0), plane);
        let corner = corner.unwrap();
        assert_eq!(corner.len(), 3);
        assert_relative_eq!(corner.signed_area(), 0.005, epsilon = 1e-4);
        assert_eq!(rest.unwrap().len(), 5);
    }

    #[test]
    fn test_clip_empty_polygon() {
        let empty: Polygon<World> = Polygon::new(Vec::new());
        assert!(clip(&empty, HalfPlane::new(Vec2::X, 0.0)).is_empty());
    }
}
