// Area, centroid and moment of inertia for convex polygons

use glam::Vec2;

use super::math::is_finite;

/// Signed area of a vertex loop, positive when counter-clockwise
pub fn area(points: &[Vec2]) -> f32 {
    edges(points).map(|(v1, v2)| v1.perp_dot(v2)).sum::<f32>() / 2.0
}

/// Area-weighted center of a vertex loop
pub fn centroid(points: &[Vec2]) -> Vec2 {
    let mut sum = 0.0;
    let mut vsum = Vec2::ZERO;

    for (v1, v2) in edges(points) {
        let cross = v1.perp_dot(v2);
        sum += cross;
        vsum += (v1 + v2) * cross;
    }

    vsum / (3.0 * sum)
}

/// Moment of inertia of a solid polygon about the origin, after shifting every
/// vertex by `offset`
pub fn moment(mass: f32, points: &[Vec2], offset: Vec2) -> f32 {
    let mut sum1 = 0.0;
    let mut sum2 = 0.0;

    for (v1, v2) in edges(points) {
        let (v1, v2) = (v1 + offset, v2 + offset);
        let a = v2.perp_dot(v1);
        let b = v1.dot(v1) + v1.dot(v2) + v2.dot(v2);
        sum1 += a * b;
        sum2 += a;
    }

    (mass * sum1) / (6.0 * sum2)
}

fn edges(points: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let count = points.len();
    (0..count).map(move |i| (points[i], points[(i + 1) % count]))
}

/// Everything a rigid body needs from its polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Unsigned area
    pub area: f32,
    pub mass: f32,
    /// Moment of inertia about the centroid
    pub moment: f32,
    pub centroid: Vec2,
}

impl MassProperties {
    /// Derive mass properties with `mass = area * density`.
    ///
    /// Returns `None` for loops that enclose no area, so a NaN or infinite
    /// moment never reaches a body.
    pub fn from_polygon(points: &[Vec2], density: f32) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }

        let area = area(points).abs();
        let centroid = centroid(points);
        let mass = area * density;
        let moment = moment(mass, points, -centroid);

        let valid = area > f32::EPSILON
            && is_finite(centroid)
            && mass.is_finite()
            && mass > 0.0
            && moment.is_finite()
            && moment > 0.0;

        valid.then_some(Self {
            area,
            mass,
            moment,
            centroid,
        })
    }
}
