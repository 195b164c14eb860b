//! Room footprint polygons
//!
//! Footprints are ordered XZ vertex lists. Edge `i` runs from vertex `i` to
//! vertex `(i + 1) % n`. Both windings are accepted; inward normals follow
//! from the sign of the shoelace area.

use crate::foundation::math::{constants::EPSILON, Vec2};

/// Clamp stops once the point is within this distance of the margin
pub const CLAMP_TOLERANCE: f32 = 1.0e-4;

/// Project-and-push passes made by [`clamp_to_polygon`]
pub const MAX_CLAMP_PASSES: usize = 4;

/// Halvings toward the anchor once projection stalls
const CLAMP_BISECT_STEPS: usize = 32;

/// Samples per axis when searching for the deepest interior point
const ANCHOR_GRID: usize = 16;
const ANCHOR_REFINEMENTS: usize = 3;

/// Nearest boundary edge to a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    /// Edge index
    pub index: usize,
    /// Closest point on that edge
    pub point: Vec2,
    /// Distance from the query point to `point`
    pub distance: f32,
}

/// Ray-casting parity test
///
/// Points exactly on the boundary may land on either side.
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Arithmetic mean of the vertices
pub fn polygon_centroid(vertices: &[Vec2]) -> Vec2 {
    if vertices.is_empty() {
        return Vec2::zeros();
    }
    let sum = vertices.iter().fold(Vec2::zeros(), |acc, v| acc + v);
    sum / vertices.len() as f32
}

/// Shoelace signed area; positive for counter-clockwise in (x, z)
pub fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area * 0.5
}

/// Closest point on segment `a..b`; degenerate segments return `a`
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let length_sq = ab.norm_squared();
    if length_sq <= EPSILON * EPSILON {
        return a;
    }
    let t = ((point - a).dot(&ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Nearest edge to `point`; ties go to the lower index
pub fn closest_edge(point: Vec2, vertices: &[Vec2]) -> Option<EdgeHit> {
    let n = vertices.len();
    if n < 2 {
        return None;
    }

    let mut best: Option<EdgeHit> = None;
    for index in 0..n {
        let closest = closest_point_on_segment(point, vertices[index], vertices[(index + 1) % n]);
        let distance = (point - closest).norm();
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(EdgeHit {
                index,
                point: closest,
                distance,
            });
        }
    }
    best
}

/// Distance to the boundary, positive inside and negative outside
pub fn signed_distance_to_polygon(point: Vec2, vertices: &[Vec2]) -> f32 {
    let Some(edge) = closest_edge(point, vertices) else {
        return f32::NEG_INFINITY;
    };
    if point_in_polygon(point, vertices) {
        edge.distance
    } else {
        -edge.distance
    }
}

/// Unit normal of edge `index` pointing into the polygon
pub fn inward_normal(vertices: &[Vec2], index: usize) -> Vec2 {
    let n = vertices.len();
    if n < 2 {
        return Vec2::zeros();
    }
    let a = vertices[index % n];
    let b = vertices[(index + 1) % n];
    let dir = b - a;
    let length = dir.norm();
    if length <= EPSILON {
        return Vec2::zeros();
    }
    let left = Vec2::new(-dir.y, dir.x) / length;
    if signed_area(vertices) >= 0.0 { left } else { -left }
}

/// Keep `point` at least `margin` inside the polygon
///
/// Points already inside with the margin come back unchanged. Others are
/// projected onto the nearest edge and pushed inward along its normal by
/// `margin`; the step repeats so a corner ends up clear of both edges. In
/// corners too acute for that to settle, the point is bisected toward an
/// interior anchor instead. A polygon too narrow for the full margin gets
/// as deep as its deepest sampled point.
///
/// Running the clamp on its own output returns that output unchanged.
pub fn clamp_to_polygon(point: Vec2, margin: f32, vertices: &[Vec2]) -> Vec2 {
    if vertices.len() < 3 {
        return point;
    }
    let margin = margin.max(0.0);
    if signed_distance_to_polygon(point, vertices) >= margin - CLAMP_TOLERANCE {
        return point;
    }

    let (anchor, depth) = margin_anchor(vertices, margin);
    let target = margin.min(depth) - CLAMP_TOLERANCE;
    let accepts = |p: Vec2| signed_distance_to_polygon(p, vertices) >= target;
    if accepts(point) {
        return point;
    }

    let mut current = point;
    for _ in 0..MAX_CLAMP_PASSES {
        let Some(edge) = closest_edge(current, vertices) else {
            return anchor;
        };
        current = edge.point + inward_normal(vertices, edge.index) * margin;
        if accepts(current) {
            return current;
        }
    }

    let (mut outside, mut inside) = (current, anchor);
    for _ in 0..CLAMP_BISECT_STEPS {
        let mid = (outside + inside) * 0.5;
        if accepts(mid) {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    inside
}

/// Interior point the clamp can always fall back on, with its depth
///
/// The centroid when it clears `margin`; otherwise the deepest point of a
/// grid over the bounds, refined around the best sample.
fn margin_anchor(vertices: &[Vec2], margin: f32) -> (Vec2, f32) {
    let centroid = polygon_centroid(vertices);
    let mut best = (centroid, signed_distance_to_polygon(centroid, vertices));
    if best.1 >= margin {
        return best;
    }

    let Some(&first) = vertices.first() else {
        return best;
    };
    let (mut lo, mut hi) = vertices
        .iter()
        .fold((first, first), |(lo, hi), v| (lo.inf(v), hi.sup(v)));
    for _ in 0..ANCHOR_REFINEMENTS {
        let cell = (hi - lo) / ANCHOR_GRID as f32;
        for i in 0..=ANCHOR_GRID {
            for j in 0..=ANCHOR_GRID {
                let sample = lo + Vec2::new(cell.x * i as f32, cell.y * j as f32);
                let depth = signed_distance_to_polygon(sample, vertices);
                if depth > best.1 {
                    best = (sample, depth);
                }
            }
        }
        if best.1 >= margin {
            break;
        }
        lo = best.0 - cell;
        hi = best.0 + cell;
    }
    best
}

/// A validated room footprint with its cached centroid
#[derive(Debug, Clone, PartialEq)]
pub struct RoomPolygon {
    vertices: Vec<Vec2>,
    centroid: Vec2,
    area: f32,
}

impl RoomPolygon {
    /// Build a footprint; `None` when there are fewer than three vertices or
    /// the area is degenerate
    pub fn new(vertices: Vec<Vec2>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let area = signed_area(&vertices);
        if area.abs() <= EPSILON {
            return None;
        }
        Some(Self {
            centroid: polygon_centroid(&vertices),
            area,
            vertices,
        })
    }

    /// Rectangle centered on the origin
    ///
    /// Edges come out in the order north, east, south, west.
    pub fn rectangle(width: f32, depth: f32) -> Self {
        let (hw, hd) = (width.abs() * 0.5, depth.abs() * 0.5);
        let vertices = vec![
            Vec2::new(-hw, -hd),
            Vec2::new(hw, -hd),
            Vec2::new(hw, hd),
            Vec2::new(-hw, hd),
        ];
        Self {
            centroid: Vec2::zeros(),
            area: signed_area(&vertices),
            vertices,
        }
    }

    /// Replace the vertices, recomputing the centroid
    ///
    /// Invalid input leaves the polygon untouched and returns `false`.
    pub fn set_vertices(&mut self, vertices: Vec<Vec2>) -> bool {
        match Self::new(vertices) {
            Some(polygon) => {
                *self = polygon;
                true
            }
            None => false,
        }
    }

    /// Ordered vertices
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Mean of the vertices
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Unsigned area
    pub fn area(&self) -> f32 {
        self.area.abs()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    /// Endpoints of edge `index`
    pub fn edge(&self, index: usize) -> (Vec2, Vec2) {
        let n = self.vertices.len();
        (self.vertices[index % n], self.vertices[(index + 1) % n])
    }

    /// Inward unit normal of edge `index`
    pub fn inward_normal(&self, index: usize) -> Vec2 {
        inward_normal(&self.vertices, index)
    }

    /// Min and max corners of the footprint
    pub fn bounds(&self) -> (Vec2, Vec2) {
        self.vertices.iter().fold(
            (Vec2::repeat(f32::INFINITY), Vec2::repeat(f32::NEG_INFINITY)),
            |(lo, hi), v| (lo.inf(v), hi.sup(v)),
        )
    }

    /// See [`point_in_polygon`]
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.vertices)
    }

    /// See [`signed_distance_to_polygon`]
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        signed_distance_to_polygon(point, &self.vertices)
    }

    /// See [`closest_edge`]
    pub fn closest_edge(&self, point: Vec2) -> Option<EdgeHit> {
        closest_edge(point, &self.vertices)
    }

    /// Clamp an XZ position into the room, keeping `margin` from the walls
    pub fn clamp_to_room(&self, x: f32, z: f32, margin: f32) -> (f32, f32) {
        let clamped = clamp_to_polygon(Vec2::new(x, z), margin, &self.vertices);
        (clamped.x, clamped.y)
    }
}
