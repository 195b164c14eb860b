//! Collision layer system for filtering collision detection
//!
//! The set of layers is closed: every collider in a room belongs to exactly
//! one [`ColliderLayer`]. Casts select the layers they consider through a
//! [`LayerMask`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Layer tag carried by every collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderLayer {
    /// Room shell: walls, floor, ceiling, lintels, doorway jambs
    Static,
    /// Breathing walls whose bounds move every frame
    Dynamic,
    /// Furniture placed by room dressing
    Furniture,
    /// Art objects placed by room dressing
    Art,
    /// Passthrough volumes (never block movement)
    Trigger,
}

impl ColliderLayer {
    /// All layers, in snapshot order
    pub const ALL: [Self; 5] = [
        Self::Static,
        Self::Dynamic,
        Self::Furniture,
        Self::Art,
        Self::Trigger,
    ];

    /// Mask bit for this layer
    pub const fn mask(self) -> LayerMask {
        match self {
            Self::Static => LayerMask::STATIC,
            Self::Dynamic => LayerMask::DYNAMIC,
            Self::Furniture => LayerMask::FURNITURE,
            Self::Art => LayerMask::ART,
            Self::Trigger => LayerMask::TRIGGER,
        }
    }

    /// Whether colliders on this layer stop movement
    pub const fn is_blocking(self) -> bool {
        !matches!(self, Self::Trigger)
    }

    /// Short lowercase name for logs and debug keys
    pub const fn name(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Furniture => "furniture",
            Self::Art => "art",
            Self::Trigger => "trigger",
        }
    }
}

bitflags! {
    /// Set of layers a query considers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerMask: u8 {
        /// Room shell
        const STATIC = 1 << 0;
        /// Breathing walls
        const DYNAMIC = 1 << 1;
        /// Furniture
        const FURNITURE = 1 << 2;
        /// Art objects
        const ART = 1 << 3;
        /// Passthrough triggers
        const TRIGGER = 1 << 4;

        /// Everything that blocks movement
        const SOLID = Self::STATIC.bits()
            | Self::DYNAMIC.bits()
            | Self::FURNITURE.bits()
            | Self::ART.bits();
    }
}

impl LayerMask {
    /// Check whether `layer` passes this mask
    pub fn includes(self, layer: ColliderLayer) -> bool {
        self.contains(layer.mask())
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::SOLID
    }
}
