//! Borrowed views over native board items.
//!
//! Each wrapper holds a shared reference to the engine's item and converts
//! geometry to millimetres on access. A wrapper cannot outlive the board it
//! was taken from.

use serde::Serialize;

use super::engine::{
    DrawingShape, ItemId, LayerId, NativeDrawing, NativeModule, NativeTrack, NativeVia,
};
use super::units::{to_mm, Point};

/// A placed footprint.
#[derive(Debug, Clone, Copy)]
pub struct Module<'a> {
    native: &'a NativeModule,
}

impl<'a> Module<'a> {
    /// Wraps a native module.
    #[must_use]
    pub const fn wrap(native: &'a NativeModule) -> Self {
        Self { native }
    }

    /// The wrapped native module.
    #[must_use]
    pub const fn native(&self) -> &'a NativeModule {
        self.native
    }

    /// Item identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.native.id
    }

    /// Reference designator.
    #[must_use]
    pub fn reference(&self) -> &'a str {
        &self.native.reference
    }

    /// Value field.
    #[must_use]
    pub fn value(&self) -> &'a str {
        &self.native.value
    }

    /// Anchor position in mm.
    #[must_use]
    pub fn position(&self) -> Point {
        self.native.position.into()
    }

    /// Orientation in degrees.
    #[must_use]
    pub const fn orientation(&self) -> f64 {
        self.native.orientation
    }

    /// Side layer.
    #[must_use]
    pub const fn layer(&self) -> LayerId {
        self.native.layer
    }

    /// Returns true if the module sits on the back side.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.native.layer == LayerId::B_CU
    }
}

/// A copper track segment.
#[derive(Debug, Clone, Copy)]
pub struct Track<'a> {
    native: &'a NativeTrack,
}

impl<'a> Track<'a> {
    /// Wraps a native track.
    #[must_use]
    pub const fn wrap(native: &'a NativeTrack) -> Self {
        Self { native }
    }

    /// The wrapped native track.
    #[must_use]
    pub const fn native(&self) -> &'a NativeTrack {
        self.native
    }

    /// Item identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.native.id
    }

    /// Start point in mm.
    #[must_use]
    pub fn start(&self) -> Point {
        self.native.start.into()
    }

    /// End point in mm.
    #[must_use]
    pub fn end(&self) -> Point {
        self.native.end.into()
    }

    /// Width in mm.
    #[must_use]
    pub fn width(&self) -> f64 {
        to_mm(self.native.width)
    }

    /// Copper layer.
    #[must_use]
    pub const fn layer(&self) -> LayerId {
        self.native.layer
    }
}

/// A via.
#[derive(Debug, Clone, Copy)]
pub struct Via<'a> {
    native: &'a NativeVia,
}

impl<'a> Via<'a> {
    /// Wraps a native via.
    #[must_use]
    pub const fn wrap(native: &'a NativeVia) -> Self {
        Self { native }
    }

    /// The wrapped native via.
    #[must_use]
    pub const fn native(&self) -> &'a NativeVia {
        self.native
    }

    /// Item identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.native.id
    }

    /// Centre position in mm.
    #[must_use]
    pub fn position(&self) -> Point {
        self.native.position.into()
    }

    /// Pad diameter in mm.
    #[must_use]
    pub fn size(&self) -> f64 {
        to_mm(self.native.size)
    }

    /// Drill diameter in mm.
    #[must_use]
    pub fn drill(&self) -> f64 {
        to_mm(self.native.drill)
    }

    /// Connected layer pair.
    #[must_use]
    pub const fn layer_pair(&self) -> (LayerId, LayerId) {
        self.native.layers
    }
}

/// Drawing geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Straight line.
    Segment {
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
    },
    /// Full circle.
    Circle {
        /// Centre point.
        center: Point,
        /// Radius in mm.
        radius: f64,
    },
    /// Arc, angles in degrees.
    Arc {
        /// Centre point.
        center: Point,
        /// Radius in mm.
        radius: f64,
        /// Start angle in degrees.
        start_angle: f64,
        /// Stop angle in degrees.
        stop_angle: f64,
    },
}

impl From<DrawingShape> for Shape {
    fn from(shape: DrawingShape) -> Self {
        match shape {
            DrawingShape::Segment { start, end } => Self::Segment {
                start: start.into(),
                end: end.into(),
            },
            DrawingShape::Circle { center, radius } => Self::Circle {
                center: center.into(),
                radius: to_mm(radius),
            },
            DrawingShape::Arc {
                center,
                radius,
                start_angle,
                stop_angle,
            } => Self::Arc {
                center: center.into(),
                radius: to_mm(radius),
                start_angle,
                stop_angle,
            },
        }
    }
}

/// A graphic drawing.
#[derive(Debug, Clone, Copy)]
pub struct Drawing<'a> {
    native: &'a NativeDrawing,
}

impl<'a> Drawing<'a> {
    /// Wraps a native drawing.
    #[must_use]
    pub const fn wrap(native: &'a NativeDrawing) -> Self {
        Self { native }
    }

    /// The wrapped native drawing.
    #[must_use]
    pub const fn native(&self) -> &'a NativeDrawing {
        self.native
    }

    /// Item identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.native.id
    }

    /// Geometry in mm.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.native.shape.into()
    }

    /// Layer.
    #[must_use]
    pub const fn layer(&self) -> LayerId {
        self.native.layer
    }

    /// Line width in mm.
    #[must_use]
    pub fn width(&self) -> f64 {
        to_mm(self.native.width)
    }
}
