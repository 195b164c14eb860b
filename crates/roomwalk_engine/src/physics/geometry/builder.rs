//! Room shell synthesis
//!
//! Turns a [`RoomDescription`] and its footprint into static boxes and
//! doorway portals. Every footprint edge becomes a wall `wall_thickness`
//! thick on the outside of the interior face, split around doorway gaps.
//! Axis-aligned edges get one box per solid span; angled edges are chained
//! from short boxes since colliders are axis-aligned.

use crate::core::config::RoomBuildConfig;
use crate::foundation::math::{constants::EPSILON, from_xz, Vec2};
use crate::physics::collision::AABB;

use super::polygon::RoomPolygon;
use super::portal::DoorwayPortal;
use super::room::{DoorwayPlacement, DoorwaySite, RoomDescription, WallSide};

/// Endpoint match tolerance when a doorway names its edge by endpoints
const ENDPOINT_TOLERANCE: f32 = 1.0e-3;

/// Shortest box an angled wall is chained from
const MIN_WALL_RESOLUTION: f32 = 0.01;

/// Most boxes a single solid span of an angled wall becomes
const MAX_WALL_PIECES: usize = 4096;

/// A static box produced for the room shell
#[derive(Debug, Clone, PartialEq)]
pub struct ShellCollider {
    /// Collider id (`floor`, `wall-2-0`, `jamb-0-start`, ...)
    pub id: String,
    /// World bounds
    pub bounds: AABB,
}

/// Output of [`build_shell`]
#[derive(Debug, Clone, Default)]
pub struct ShellGeometry {
    /// Static colliders
    pub colliders: Vec<ShellCollider>,
    /// One portal per doorway that could be placed
    pub portals: Vec<DoorwayPortal>,
}

impl ShellGeometry {
    fn push(&mut self, id: String, bounds: AABB) {
        self.colliders.push(ShellCollider { id, bounds });
    }
}

/// Opening along an edge, in meters from the edge start
#[derive(Debug, Clone, Copy)]
struct Gap {
    doorway: usize,
    start: f32,
    end: f32,
    height: f32,
}

/// Local frame of one footprint edge
#[derive(Debug, Clone, Copy)]
struct EdgeFrame {
    origin: Vec2,
    dir: Vec2,
    outward: Vec2,
    length: f32,
}

impl EdgeFrame {
    fn new(footprint: &RoomPolygon, index: usize) -> Option<Self> {
        let (a, b) = footprint.edge(index);
        let length = (b - a).norm();
        if length <= EPSILON {
            return None;
        }
        Some(Self {
            origin: a,
            dir: (b - a) / length,
            outward: -footprint.inward_normal(index),
            length,
        })
    }

    fn is_axis_aligned(&self) -> bool {
        self.dir.x.abs() <= EPSILON || self.dir.y.abs() <= EPSILON
    }

    fn point(&self, along: f32, across: f32) -> Vec2 {
        self.origin + self.dir * along + self.outward * across
    }

    /// Box covering `[t0, t1]` along the edge, `[across0, across1]` outward
    /// from the interior face and `[y0, y1]` vertically
    fn slab(&self, t0: f32, t1: f32, across0: f32, across1: f32, y0: f32, y1: f32) -> AABB {
        let corners = [
            self.point(t0, across0),
            self.point(t1, across0),
            self.point(t0, across1),
            self.point(t1, across1),
        ];
        let (lo, hi) = corners.iter().fold(
            (Vec2::repeat(f32::INFINITY), Vec2::repeat(f32::NEG_INFINITY)),
            |(lo, hi), c| (lo.inf(c), hi.sup(c)),
        );
        AABB::new(from_xz(lo, y0), from_xz(hi, y1))
    }
}

/// Synthesize the shell colliders and portals for a room
pub fn build_shell(
    room: &RoomDescription,
    footprint: &RoomPolygon,
    config: &RoomBuildConfig,
) -> ShellGeometry {
    let mut shell = ShellGeometry::default();
    let height = room.height.max(0.0);
    let wall = config.wall_thickness;
    let slab = config.floor_thickness;
    let frame = room.frame_thickness.unwrap_or(config.frame_thickness).max(0.0);
    let resolution = config.angled_wall_resolution.max(MIN_WALL_RESOLUTION);

    let (lo, hi) = footprint.bounds();
    let pad = Vec2::repeat(wall);
    shell.push("floor".to_string(), AABB::new(from_xz(lo - pad, -slab), from_xz(hi + pad, 0.0)));
    shell.push(
        "ceiling".to_string(),
        AABB::new(from_xz(lo - pad, height), from_xz(hi + pad, height + slab)),
    );

    let mut gaps: Vec<Vec<Gap>> = vec![Vec::new(); footprint.edge_count()];
    for (index, doorway) in room.doorways.iter().enumerate() {
        let Some((edge_index, position)) = resolve_site(doorway, footprint) else {
            log::warn!("Doorway {index} ({:?}) does not match any footprint edge, skipped", doorway.site);
            continue;
        };
        let Some(edge) = EdgeFrame::new(footprint, edge_index) else {
            log::warn!("Doorway {index} sits on zero-length edge {edge_index}, skipped");
            continue;
        };

        let width = doorway.width.min(edge.length - 2.0 * frame);
        let door_height = doorway.height.min(height);
        if width <= EPSILON || door_height <= EPSILON {
            log::warn!("Doorway {index} does not fit on edge {edge_index}, skipped");
            continue;
        }

        let half = width * 0.5;
        // A doorway narrowed to the full edge leaves lo and hi an ulp apart
        let lo = frame + half;
        let hi = (edge.length - frame - half).max(lo);
        let center_t = (position.clamp(0.0, 1.0) * edge.length).clamp(lo, hi);
        let gap = Gap {
            doorway: index,
            start: center_t - half,
            end: center_t + half,
            height: door_height,
        };
        gaps[edge_index].push(gap);

        let half_depth = config.trigger_depth.min(width) * 0.5;
        let side = match doorway.site {
            DoorwaySite::Wall(side) if doorway.endpoints.is_none() => side,
            _ => WallSide::from_normal(edge.outward),
        };
        shell.portals.push(DoorwayPortal {
            index,
            site: doorway.site,
            edge_index,
            side,
            width,
            height: door_height,
            position: center_t / edge.length,
            center: from_xz(edge.point(center_t, 0.0), 0.0),
            outward_normal: from_xz(edge.outward, 0.0),
            frame_bounds: edge.slab(
                gap.start - frame,
                gap.end + frame,
                -frame,
                wall,
                0.0,
                (door_height + frame).min(height),
            ),
            trigger_bounds: edge.slab(gap.start, gap.end, -half_depth, half_depth, 0.0, door_height),
        });
    }

    for (edge_index, edge_gaps) in gaps.iter_mut().enumerate() {
        let Some(edge) = EdgeFrame::new(footprint, edge_index) else {
            log::warn!("Skipping zero-length footprint edge {edge_index}");
            continue;
        };
        edge_gaps.sort_by(|a, b| a.start.total_cmp(&b.start));

        // Solid spans run past both vertices so neighbouring walls close the corner.
        let mut spans = Vec::new();
        let mut cursor = -wall;
        for gap in edge_gaps.iter() {
            if gap.start > cursor {
                spans.push((cursor, gap.start));
            }
            cursor = cursor.max(gap.end);
        }
        if cursor < edge.length + wall {
            spans.push((cursor, edge.length + wall));
        }

        let mut segment = 0;
        for (t0, t1) in spans {
            let pieces = if edge.is_axis_aligned() {
                1
            } else {
                let pieces = ((t1 - t0) / resolution).ceil().max(1.0) as usize;
                pieces.min(MAX_WALL_PIECES)
            };
            let step = (t1 - t0) / pieces as f32;
            for piece in 0..pieces {
                let a = t0 + step * piece as f32;
                shell.push(
                    format!("wall-{edge_index}-{segment}"),
                    edge.slab(a, a + step, 0.0, wall, -slab, height + slab),
                );
                segment += 1;
            }
        }

        for gap in edge_gaps.iter() {
            let doorway = gap.doorway;
            if gap.height < height - EPSILON {
                shell.push(
                    format!("lintel-{doorway}"),
                    edge.slab(gap.start, gap.end, 0.0, wall, gap.height, height + slab),
                );
            }
            if frame > EPSILON {
                shell.push(
                    format!("jamb-{doorway}-start"),
                    edge.slab(gap.start - frame, gap.start, -frame, 0.0, 0.0, gap.height),
                );
                shell.push(
                    format!("jamb-{doorway}-end"),
                    edge.slab(gap.end, gap.end + frame, -frame, 0.0, 0.0, gap.height),
                );
            }
        }
    }

    shell
}

/// Edge index and normalized position along it for a doorway
fn resolve_site(doorway: &DoorwayPlacement, footprint: &RoomPolygon) -> Option<(usize, f32)> {
    let position = doorway.position;

    if let Some([start, end]) = doorway.endpoints {
        let close = |p: Vec2, q: Vec2| (p - q).norm() <= ENDPOINT_TOLERANCE;
        return (0..footprint.edge_count()).find_map(|index| {
            let (a, b) = footprint.edge(index);
            if close(a, start) && close(b, end) {
                Some((index, position))
            } else if close(a, end) && close(b, start) {
                Some((index, 1.0 - position))
            } else {
                None
            }
        });
    }

    match doorway.site {
        DoorwaySite::Edge(index) => (index < footprint.edge_count()).then_some((index, position)),
        DoorwaySite::Wall(side) => {
            let normal = side.outward_normal();
            let wanted = Vec2::new(normal.x, normal.z);
            let mut best: Option<(usize, f32, f32)> = None;
            for index in 0..footprint.edge_count() {
                let (a, b) = footprint.edge(index);
                let length = (b - a).norm();
                if length <= EPSILON {
                    continue;
                }
                let facing = (-footprint.inward_normal(index)).dot(&wanted);
                let better = match best {
                    None => true,
                    Some((_, best_facing, best_length)) => {
                        facing > best_facing + 1.0e-4
                            || ((facing - best_facing).abs() <= 1.0e-4 && length > best_length)
                    }
                };
                if better {
                    best = Some((index, facing, length));
                }
            }
            best.filter(|(_, facing, _)| *facing > 0.0)
                .map(|(index, _, _)| (index, position))
        }
    }
}
