//! Room descriptions handed to the registry by the room generator
//!
//! Rooms sit on the floor plane `y = 0`, centered on the XZ origin, with
//! `width` along X and `depth` along Z. North is `-Z`.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::{Vec2, Vec3};

/// One of the four walls of a rectangular room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    /// `-Z` wall
    North,
    /// `+Z` wall
    South,
    /// `+X` wall
    East,
    /// `-X` wall
    West,
}

impl WallSide {
    /// All sides in edge order of a synthesized rectangle
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Unit normal pointing out of the room through this wall
    pub fn outward_normal(self) -> Vec3 {
        match self {
            Self::North => Vec3::new(0.0, 0.0, -1.0),
            Self::South => Vec3::new(0.0, 0.0, 1.0),
            Self::East => Vec3::new(1.0, 0.0, 0.0),
            Self::West => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// The wall a doorway through this one opens onto in the next room
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Closest cardinal side for an outward footprint normal
    pub fn from_normal(normal: Vec2) -> Self {
        if normal.x.abs() > normal.y.abs() {
            if normal.x > 0.0 { Self::East } else { Self::West }
        } else if normal.y > 0.0 {
            Self::South
        } else {
            Self::North
        }
    }
}

/// Where a doorway is cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorwaySite {
    /// A cardinal wall; on polygon rooms this picks the edge facing that way
    Wall(WallSide),
    /// A footprint edge by index (edge `i` runs from vertex `i` to `i + 1`)
    Edge(usize),
}

/// Logical placement of one doorway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorwayPlacement {
    /// Wall or edge the doorway is cut into
    pub site: DoorwaySite,
    /// Opening width in meters
    pub width: f32,
    /// Opening height in meters
    pub height: f32,
    /// Normalized position of the opening center along the wall (0..1)
    #[serde(default = "DoorwayPlacement::default_position")]
    pub position: f32,
    /// Explicit edge endpoints, used to locate the edge when given
    #[serde(default)]
    pub endpoints: Option<[Vec2; 2]>,
}

impl DoorwayPlacement {
    fn default_position() -> f32 {
        0.5
    }

    /// Centered doorway on a cardinal wall
    pub fn on_wall(side: WallSide, width: f32, height: f32) -> Self {
        Self {
            site: DoorwaySite::Wall(side),
            width,
            height,
            position: 0.5,
            endpoints: None,
        }
    }

    /// Centered doorway on a footprint edge
    pub fn on_edge(index: usize, width: f32, height: f32) -> Self {
        Self {
            site: DoorwaySite::Edge(index),
            width,
            height,
            position: 0.5,
            endpoints: None,
        }
    }

    /// Move the opening along its wall
    pub fn with_position(mut self, position: f32) -> Self {
        self.position = position;
        self
    }

    /// Locate the edge by its endpoints rather than its index
    pub fn with_endpoints(mut self, start: Vec2, end: Vec2) -> Self {
        self.endpoints = Some([start, end]);
        self
    }
}

/// Everything the registry needs to rebuild itself for one room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDescription {
    /// Extent along X
    pub width: f32,
    /// Floor-to-ceiling height
    pub height: f32,
    /// Extent along Z
    pub depth: f32,
    /// Optional XZ footprint replacing the width/depth rectangle
    pub polygon: Option<Vec<Vec2>>,
    /// Doorways to cut
    pub doorways: Vec<DoorwayPlacement>,
    /// Jamb width override for this room
    pub frame_thickness: Option<f32>,
}

impl Default for RoomDescription {
    fn default() -> Self {
        Self::rectangular(10.0, 3.0, 10.0)
    }
}

impl RoomDescription {
    /// Plain rectangular room without doorways
    pub fn rectangular(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
            polygon: None,
            doorways: Vec::new(),
            frame_thickness: None,
        }
    }

    /// Room with a polygon footprint; width/depth follow the polygon's extent
    pub fn polygonal(vertices: Vec<Vec2>, height: f32) -> Self {
        let (min, max) = vertices.iter().fold(
            (Vec2::repeat(f32::INFINITY), Vec2::repeat(f32::NEG_INFINITY)),
            |(lo, hi), v| (lo.inf(v), hi.sup(v)),
        );
        let (width, depth) = if vertices.is_empty() {
            (0.0, 0.0)
        } else {
            (max.x - min.x, max.y - min.y)
        };
        Self {
            width,
            height,
            depth,
            polygon: Some(vertices),
            doorways: Vec::new(),
            frame_thickness: None,
        }
    }

    /// Add a doorway
    pub fn with_doorway(mut self, doorway: DoorwayPlacement) -> Self {
        self.doorways.push(doorway);
        self
    }

    /// Override the jamb width
    pub fn with_frame_thickness(mut self, thickness: f32) -> Self {
        self.frame_thickness = Some(thickness);
        self
    }
}

impl Config for RoomDescription {}
