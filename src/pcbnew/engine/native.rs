//! Native item types held by the engine.
//!
//! All geometry is stored in internal units. Constructors accept
//! millimetres and convert once.

use serde::{Deserialize, Serialize};

use super::{ItemId, LayerId};
use crate::pcbnew::units::{from_mm, Point, Vector2};

/// A placed footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeModule {
    /// Item identifier.
    pub id: ItemId,
    /// Reference designator (e.g., "R1").
    pub reference: String,
    /// Value field (e.g., "10k").
    #[serde(default)]
    pub value: String,
    /// Anchor position.
    pub position: Vector2,
    /// Orientation in degrees, counter-clockwise.
    #[serde(default)]
    pub orientation: f64,
    /// Side the module is placed on (`F.Cu` or `B.Cu`).
    pub layer: LayerId,
}

impl NativeModule {
    /// Creates a module at `position` (mm) on `layer`.
    #[must_use]
    pub fn new(reference: impl Into<String>, position: Point, layer: LayerId) -> Self {
        Self {
            id: ItemId::new(),
            reference: reference.into(),
            value: String::new(),
            position: position.to_native(),
            orientation: 0.0,
            layer,
        }
    }

    /// Sets the value field.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the orientation in degrees.
    #[must_use]
    pub fn with_orientation(mut self, degrees: f64) -> Self {
        self.orientation = degrees;
        self
    }
}

/// A copper track segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeTrack {
    /// Item identifier.
    pub id: ItemId,
    /// Start point.
    pub start: Vector2,
    /// End point.
    pub end: Vector2,
    /// Track width.
    pub width: i64,
    /// Copper layer.
    pub layer: LayerId,
}

impl NativeTrack {
    /// Creates a segment from millimetre geometry.
    #[must_use]
    pub fn new(start: Point, end: Point, width: f64, layer: LayerId) -> Self {
        Self {
            id: ItemId::new(),
            start: start.to_native(),
            end: end.to_native(),
            width: from_mm(width),
            layer,
        }
    }
}

/// A via connecting two copper layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeVia {
    /// Item identifier.
    pub id: ItemId,
    /// Centre position.
    pub position: Vector2,
    /// Pad diameter.
    pub size: i64,
    /// Drill diameter.
    pub drill: i64,
    /// Connected layer pair.
    pub layers: (LayerId, LayerId),
}

impl NativeVia {
    /// Creates a via from millimetre geometry.
    #[must_use]
    pub fn new(position: Point, layers: (LayerId, LayerId), size: f64, drill: f64) -> Self {
        Self {
            id: ItemId::new(),
            position: position.to_native(),
            size: from_mm(size),
            drill: from_mm(drill),
            layers,
        }
    }
}

/// Shape of a graphic drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawingShape {
    /// Straight line.
    Segment {
        /// Start point.
        start: Vector2,
        /// End point.
        end: Vector2,
    },
    /// Full circle.
    Circle {
        /// Centre point.
        center: Vector2,
        /// Radius.
        radius: i64,
    },
    /// Circular arc, angles in degrees.
    Arc {
        /// Centre point.
        center: Vector2,
        /// Radius.
        radius: i64,
        /// Start angle in degrees.
        start_angle: f64,
        /// Stop angle in degrees.
        stop_angle: f64,
    },
}

/// A graphic drawing on a non-copper (or copper) layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeDrawing {
    /// Item identifier.
    pub id: ItemId,
    /// Geometry.
    pub shape: DrawingShape,
    /// Layer the drawing is on.
    pub layer: LayerId,
    /// Line width.
    pub width: i64,
}

impl NativeDrawing {
    /// Creates a line segment.
    #[must_use]
    pub fn segment(start: Point, end: Point, layer: LayerId, width: f64) -> Self {
        Self::with_shape(
            DrawingShape::Segment {
                start: start.to_native(),
                end: end.to_native(),
            },
            layer,
            width,
        )
    }

    /// Creates a circle.
    #[must_use]
    pub fn circle(center: Point, radius: f64, layer: LayerId, width: f64) -> Self {
        Self::with_shape(
            DrawingShape::Circle {
                center: center.to_native(),
                radius: from_mm(radius),
            },
            layer,
            width,
        )
    }

    /// Creates an arc between two angles (degrees).
    #[must_use]
    pub fn arc(
        center: Point,
        radius: f64,
        start_angle: f64,
        stop_angle: f64,
        layer: LayerId,
        width: f64,
    ) -> Self {
        Self::with_shape(
            DrawingShape::Arc {
                center: center.to_native(),
                radius: from_mm(radius),
                start_angle,
                stop_angle,
            },
            layer,
            width,
        )
    }

    fn with_shape(shape: DrawingShape, layer: LayerId, width: f64) -> Self {
        Self {
            id: ItemId::new(),
            shape,
            layer,
            width: from_mm(width),
        }
    }
}

/// Any item the engine can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NativeItem {
    /// A placed footprint.
    Module(NativeModule),
    /// A track segment.
    Track(NativeTrack),
    /// A via.
    Via(NativeVia),
    /// A graphic drawing.
    Drawing(NativeDrawing),
}

impl NativeItem {
    /// Returns the item's identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        match self {
            Self::Module(m) => m.id,
            Self::Track(t) => t.id,
            Self::Via(v) => v.id,
            Self::Drawing(d) => d.id,
        }
    }

    /// Short kind name, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Module(_) => "module",
            Self::Track(_) => "track",
            Self::Via(_) => "via",
            Self::Drawing(_) => "drawing",
        }
    }

    /// Returns true for items that live in the track list.
    #[must_use]
    pub const fn is_track_item(&self) -> bool {
        matches!(self, Self::Track(_) | Self::Via(_))
    }
}

/// A native item type that can be placed on a board and recovered from
/// the engine's generic item.
pub trait Placeable: Into<NativeItem> {
    /// Borrows `Self` out of a placed item, if the kind matches.
    fn from_native(item: &NativeItem) -> Option<&Self>;
}

macro_rules! placeable {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for NativeItem {
            fn from(item: $ty) -> Self {
                Self::$variant(item)
            }
        }

        impl Placeable for $ty {
            fn from_native(item: &NativeItem) -> Option<&Self> {
                match item {
                    NativeItem::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

placeable!(NativeModule, Module);
placeable!(NativeTrack, Track);
placeable!(NativeVia, Via);
placeable!(NativeDrawing, Drawing);
