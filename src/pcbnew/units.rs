//! Unit conversion between engine internal units and millimetres.
//!
//! The engine stores every coordinate and size as an integer count of
//! internal units (IU). One IU is one nanometre, so a millimetre is
//! [`DEFAULT_UNIT_IUS`] internal units.
//!
//! The public wrapper API speaks millimetres ([`Point`], `f64` sizes); the
//! native item types speak IU ([`Vector2`], `i64` sizes).

use serde::{Deserialize, Serialize};

/// Internal units per millimetre.
pub const DEFAULT_UNIT_IUS: f64 = 1_000_000.0;

/// Millimetres per mil (thousandth of an inch).
const MM_PER_MIL: f64 = 0.0254;

/// Millimetres per inch.
const MM_PER_INCH: f64 = 25.4;

/// Converts internal units to millimetres.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Board coordinates stay far below 2^53 nm
pub fn to_mm(iu: i64) -> f64 {
    iu as f64 / DEFAULT_UNIT_IUS
}

/// Converts millimetres to internal units, rounding to the nearest unit.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Rounded before the cast
pub fn from_mm(mm: f64) -> i64 {
    (mm * DEFAULT_UNIT_IUS).round() as i64
}

/// Largest coordinate or size magnitude a board item may have, in IU.
///
/// Matches the 32-bit coordinate space of pcbnew (about 2.1 m).
pub const MAX_IU: i64 = 2_147_483_647;

/// Converts millimetres to internal units.
///
/// Returns `None` for NaN, infinities and values beyond [`MAX_IU`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn checked_from_mm(mm: f64) -> Option<i64> {
    if !mm.is_finite() {
        return None;
    }
    let iu = (mm * DEFAULT_UNIT_IUS).round();
    if iu.abs() > MAX_IU as f64 {
        return None;
    }
    Some(iu as i64)
}

/// Converts mils to internal units.
#[must_use]
pub fn from_mils(mils: f64) -> i64 {
    from_mm(mils * MM_PER_MIL)
}

/// Converts internal units to mils.
#[must_use]
pub fn to_mils(iu: i64) -> f64 {
    to_mm(iu) / MM_PER_MIL
}

/// Converts inches to internal units.
#[must_use]
pub fn from_inches(inches: f64) -> i64 {
    from_mm(inches * MM_PER_INCH)
}

/// Converts internal units to inches.
#[must_use]
pub fn to_inches(iu: i64) -> f64 {
    to_mm(iu) / MM_PER_INCH
}

/// A position in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X position in mm.
    pub x: f64,
    /// Y position in mm.
    pub y: f64,
}

impl Point {
    /// Creates a point from millimetre coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Converts the point to engine internal units.
    #[must_use]
    pub fn to_native(self) -> Vector2 {
        Vector2 {
            x: from_mm(self.x),
            y: from_mm(self.y),
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Vector2> for Point {
    fn from(v: Vector2) -> Self {
        Self {
            x: to_mm(v.x),
            y: to_mm(v.y),
        }
    }
}

/// A position in engine internal units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// X position in IU.
    pub x: i64,
    /// Y position in IU.
    pub y: i64,
}

impl Vector2 {
    /// Creates a vector from internal-unit coordinates.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}
