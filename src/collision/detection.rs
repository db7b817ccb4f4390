use tracing::trace;

use crate::collision::info::Contact;
use crate::common::EngineLimits;
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;
use crate::shapes::{Collider, Wall};

/// Tunables of the detection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Fixed AABB inflation for the broad phase.
    pub bounding_box_margin: f64,
    /// Vertex-to-edge distance below which two polygons are in contact.
    pub proximity_threshold: f64,
}

impl DetectionParams {
    pub fn new(limits: &EngineLimits) -> Self {
        DetectionParams {
            bounding_box_margin: limits.bounding_box_margin,
            proximity_threshold: limits.proximity_threshold,
        }
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self::new(&EngineLimits::default())
    }
}

/// Finds the closest point on the segment `a`-`b` to `point`.
/// Returns the point and its distance. A zero-length segment collapses to `a`.
pub fn closest_point_on_segment(segment_a: Vec2, segment_b: Vec2, point: Vec2) -> (Vec2, f64) {
    let segment_vec = segment_b - segment_a;
    let length_sq = segment_vec.magnitude_squared();
    if length_sq == 0.0 {
        return (segment_a, (point - segment_a).magnitude());
    }

    let t = ((point - segment_a).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
    let closest_point = segment_a + segment_vec * t;
    (closest_point, point.distance(closest_point))
}

/// Broad phase: AABB overlap with a margin that grows with the faster body's
/// speed, so fast movers are not culled before the narrow phase sees them.
pub fn check_bounding_box_collision(a: &RigidBody, b: &RigidBody, margin: f64) -> bool {
    let max_speed = a.velocity.magnitude().max(b.velocity.magnitude());
    let dynamic_margin = margin + max_speed * 0.1;
    a.bounding_box().overlaps_with_margin(&b.bounding_box(), dynamic_margin)
}

/// Tests every vertex of `corners` against every edge of `edges_of`, keeping
/// the globally closest feature below `threshold` in `best`.
fn sweep_vertices_against_edges(
    corners: &[Vec2],
    edges_of: &[Vec2],
    threshold: f64,
    flip_normal: bool,
    best: &mut Option<Contact>,
) {
    let n = edges_of.len();
    for &corner in corners {
        for i in 0..n {
            let start = edges_of[i];
            let end = edges_of[(i + 1) % n];
            let (closest, distance) = closest_point_on_segment(start, end, corner);
            if distance >= threshold {
                continue;
            }

            let mut normal = (end - start).perpendicular().normalize();
            if normal.dot(corner - closest) < 0.0 {
                normal = -normal;
            }
            if flip_normal {
                normal = -normal;
            }

            let closer = best.map_or(true, |b| distance < b.penetration);
            if closer {
                *best = Some(Contact {
                    point: closest,
                    normal,
                    penetration: distance,
                });
            }
        }
    }
}

/// Closest-feature contact between two convex polygons.
///
/// Both vertex sets are swept against the other polygon's edges. The
/// returned normal points from `polygon2` toward `polygon1`; the contact
/// point is the closest point on the edge that was approached.
pub fn check_polygon_collision(polygon1: &[Vec2], polygon2: &[Vec2], threshold: f64) -> Option<Contact> {
    let mut best = None;
    sweep_vertices_against_edges(polygon1, polygon2, threshold, false, &mut best);
    sweep_vertices_against_edges(polygon2, polygon1, threshold, true, &mut best);
    best
}

/// Full body-body test: broad phase, then the polygon narrow phase.
/// The normal points from `b` toward `a`.
pub fn check_collision(a: &RigidBody, b: &RigidBody, params: &DetectionParams) -> Option<Contact> {
    if !check_bounding_box_collision(a, b, params.bounding_box_margin) {
        return None;
    }

    // Swept from b's perspective, then flipped back to a's.
    let contact = check_polygon_collision(&b.vertices(), &a.vertices(), params.proximity_threshold)?;
    trace!(
        body_a = %a.id(),
        body_b = %b.id(),
        distance = contact.penetration,
        "body contact"
    );
    Some(Contact {
        normal: -contact.normal,
        ..contact
    })
}

/// Vertex-in-slab test against a wall. The deepest embedded vertex wins; its
/// normal points from the wall's centreline toward that vertex.
pub fn check_wall_collision(body: &RigidBody, wall: &Wall) -> Option<Contact> {
    let wall_normal = wall.normal();
    let wall_dir = (wall.end - wall.start).normalize();
    let wall_length = wall.length();
    if wall_length == 0.0 {
        return None;
    }
    let half_thickness = wall.half_thickness();

    let mut deepest: Option<Contact> = None;
    for corner in body.vertices() {
        let rel = corner - wall.start;
        let proj = rel.dot(wall_dir);
        if proj < 0.0 || proj > wall_length {
            continue;
        }

        let dist = rel.dot(wall_normal).abs();
        if dist >= half_thickness {
            continue;
        }

        let penetration = half_thickness - dist;
        if deepest.map_or(true, |d| penetration > d.penetration) {
            let to_corner = corner - (wall.start + wall_dir * proj);
            let normal = if to_corner.dot(wall_normal) > 0.0 {
                wall_normal
            } else {
                -wall_normal
            };
            deepest = Some(Contact {
                point: corner,
                normal,
                penetration,
            });
        }
    }

    deepest.filter(|c| c.penetration > 0.0)
}
