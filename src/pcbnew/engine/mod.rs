//! Native engine seam.
//!
//! The board wrappers never own geometry or persistence. They talk to a
//! native board through [`NativeBoard`] and obtain boards from a
//! [`NativeEngine`], which callers pass in explicitly:
//!
//! ```text
//! NativeEngine ── new_board / load_board / editor_board ──► NativeBoard
//!                                                             │
//!                            Board<N> ◄── wrap ───────────────┘
//!                              ├── modules()  → ModuleList → Module<'_>
//!                              ├── tracks() / vias()       → Track<'_> / Via<'_>
//!                              └── drawings()              → Drawing<'_>
//! ```
//!
//! [`MemoryEngine`] is the in-process implementation used by the CLI and tests.

pub mod layers;
mod memory;
pub mod native;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use layers::LayerId;
pub use memory::{MemoryBoard, MemoryEngine, SNAPSHOT_VERSION};
pub use native::{
    DrawingShape, NativeDrawing, NativeItem, NativeModule, NativeTrack, NativeVia, Placeable,
};

use crate::pcbnew::error::EngineResult;

/// Engine-assigned identity of a board item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Current design settings, in engine internal units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSettings {
    /// Track width used for new tracks.
    pub current_track_width: i64,
    /// Via pad diameter used for new vias.
    pub current_via_size: i64,
    /// Via drill used for new vias. Zero or negative means "not set".
    pub current_via_drill: i64,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            current_track_width: 250_000,
            current_via_size: 800_000,
            current_via_drill: 400_000,
        }
    }
}

/// A board held by the native engine.
///
/// Iterators yield items in the engine's placement order.
pub trait NativeBoard {
    /// Places an item on the board and returns the placed item.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the item (duplicate reference,
    /// unknown layer, invalid geometry).
    fn add(&mut self, item: NativeItem) -> EngineResult<&NativeItem>;

    /// Looks up any item by identifier.
    fn item(&self, id: ItemId) -> Option<&NativeItem>;

    /// Finds the module carrying `reference`.
    fn find_module_by_reference(&self, reference: &str) -> Option<&NativeModule>;

    /// Iterates over all modules.
    fn modules(&self) -> Box<dyn Iterator<Item = &NativeModule> + '_>;

    /// Number of modules on the board.
    fn module_count(&self) -> usize;

    /// Iterates over the track list: segments and vias, interleaved.
    fn tracks(&self) -> Box<dyn Iterator<Item = &NativeItem> + '_>;

    /// Iterates over graphic drawings.
    fn drawings(&self) -> Box<dyn Iterator<Item = &NativeDrawing> + '_>;

    /// Current design settings.
    fn design_settings(&self) -> &DesignSettings;

    /// Resolves a layer name.
    fn layer_id(&self, name: &str) -> Option<LayerId>;

    /// Returns the name of a layer.
    fn layer_name(&self, id: LayerId) -> Option<&str>;

    /// File the board was loaded from or last saved to.
    fn file_name(&self) -> Option<&Path>;

    /// Sets the board's file name without saving.
    fn set_file_name(&mut self, path: PathBuf);

    /// Saves the board to `path` and adopts it as the board's file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be serialised or written.
    fn save(&mut self, path: &Path) -> EngineResult<()>;
}

/// Entry point into the native engine.
pub trait NativeEngine {
    /// Board type produced by this engine.
    type Board: NativeBoard;

    /// Creates an empty board.
    fn new_board(&self) -> Self::Board;

    /// Loads a board from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load_board(&self, path: &Path) -> EngineResult<Self::Board>;

    /// Takes the board open in the editor session.
    ///
    /// # Errors
    ///
    /// Returns an error if no board is open.
    fn editor_board(&mut self) -> EngineResult<Self::Board>;
}
