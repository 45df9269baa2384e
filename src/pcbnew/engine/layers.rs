//! Layer identifiers and the standard layer table.
//!
//! Numbering follows the classic pcbnew stack:
//!
//! | Id | Name |
//! |----|------|
//! | 0 | `F.Cu` |
//! | 1..=30 | `In1.Cu` .. `In30.Cu` |
//! | 31 | `B.Cu` |
//! | 32..=49 | technical, user and fabrication layers |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Engine-native layer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub i32);

impl LayerId {
    /// Front copper.
    pub const F_CU: Self = Self(0);
    /// Back copper.
    pub const B_CU: Self = Self(31);

    /// Returns true for copper layers (front, inner and back).
    #[must_use]
    pub const fn is_copper(self) -> bool {
        self.0 >= Self::F_CU.0 && self.0 <= Self::B_CU.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Number of inner copper layers.
const INNER_COPPER_COUNT: i32 = 30;

/// Non-inner layers by id.
const NAMED_LAYERS: [(i32, &str); 20] = [
    (0, "F.Cu"),
    (31, "B.Cu"),
    (32, "B.Adhes"),
    (33, "F.Adhes"),
    (34, "B.Paste"),
    (35, "F.Paste"),
    (36, "B.SilkS"),
    (37, "F.SilkS"),
    (38, "B.Mask"),
    (39, "F.Mask"),
    (40, "Dwgs.User"),
    (41, "Cmts.User"),
    (42, "Eco1.User"),
    (43, "Eco2.User"),
    (44, "Edge.Cuts"),
    (45, "Margin"),
    (46, "B.CrtYd"),
    (47, "F.CrtYd"),
    (48, "B.Fab"),
    (49, "F.Fab"),
];

/// Inner copper layer names, `In1.Cu` through `In30.Cu`.
const INNER_LAYER_NAMES: [&str; 30] = [
    "In1.Cu", "In2.Cu", "In3.Cu", "In4.Cu", "In5.Cu", "In6.Cu", "In7.Cu", "In8.Cu", "In9.Cu",
    "In10.Cu", "In11.Cu", "In12.Cu", "In13.Cu", "In14.Cu", "In15.Cu", "In16.Cu", "In17.Cu",
    "In18.Cu", "In19.Cu", "In20.Cu", "In21.Cu", "In22.Cu", "In23.Cu", "In24.Cu", "In25.Cu",
    "In26.Cu", "In27.Cu", "In28.Cu", "In29.Cu", "In30.Cu",
];

/// Resolves a standard layer name.
#[must_use]
pub fn parse(name: &str) -> Option<LayerId> {
    if let Some(&(id, _)) = NAMED_LAYERS.iter().find(|(_, n)| *n == name) {
        return Some(LayerId(id));
    }

    let index = name.strip_prefix("In")?.strip_suffix(".Cu")?;
    match index.parse::<i32>() {
        Ok(n) if (1..=INNER_COPPER_COUNT).contains(&n) && !index.starts_with('0') => {
            Some(LayerId(n))
        }
        _ => None,
    }
}

/// Returns the standard name of a layer.
#[must_use]
pub fn name(id: LayerId) -> Option<&'static str> {
    if (1..=INNER_COPPER_COUNT).contains(&id.0) {
        let index = usize::try_from(id.0 - 1).ok()?;
        return INNER_LAYER_NAMES.get(index).copied();
    }
    NAMED_LAYERS
        .iter()
        .find(|(n, _)| *n == id.0)
        .map(|&(_, name)| name)
}
