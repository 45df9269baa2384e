//! In-process engine.
//!
//! [`MemoryBoard`] keeps items in an insertion-ordered map, so every
//! iterator reports placement order. Boards persist as a versioned JSON
//! snapshot:
//!
//! ```text
//! {
//!   "version": 1,
//!   "design_settings": { "current_track_width": 250000, ... },
//!   "items": [ { "kind": "module", ... }, { "kind": "via", ... }, ... ]
//! }
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::layers::{self, LayerId};
use super::native::{DrawingShape, NativeDrawing, NativeItem, NativeModule};
use super::{DesignSettings, ItemId, NativeBoard, NativeEngine};
use crate::pcbnew::error::{EngineError, EngineResult};
use crate::pcbnew::units::{Vector2, MAX_IU};

/// Snapshot format version written by [`MemoryBoard::save`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot as written to disk.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    design_settings: &'a DesignSettings,
    items: Vec<&'a NativeItem>,
}

/// Snapshot as read from disk.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Snapshot {
    version: u32,
    #[serde(default)]
    design_settings: DesignSettings,
    #[serde(default)]
    items: Vec<NativeItem>,
}

/// A board held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBoard {
    items: IndexMap<ItemId, NativeItem>,
    design_settings: DesignSettings,
    file_name: Option<PathBuf>,
}

impl MemoryBoard {
    /// Creates an empty board with default design settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty board with the given design settings.
    #[must_use]
    pub fn with_design_settings(design_settings: DesignSettings) -> Self {
        Self {
            design_settings,
            ..Self::default()
        }
    }

    /// Replaces the current design settings.
    pub fn set_design_settings(&mut self, design_settings: DesignSettings) {
        self.design_settings = design_settings;
    }

    /// Total number of items of any kind.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Reads a board from a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid snapshot,
    /// or contains items the board would reject.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| EngineError::file_read(path, e))?;
        let snapshot: Snapshot =
            serde_json::from_str(&contents).map_err(|e| EngineError::parse(path, e))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(EngineError::UnsupportedVersion {
                version: snapshot.version,
            });
        }

        let mut board = Self::with_design_settings(snapshot.design_settings);
        for item in snapshot.items {
            board.add(item)?;
        }
        board.file_name = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            items = board.items.len(),
            modules = board.module_count(),
            "Read board"
        );

        Ok(board)
    }

    /// Checks an item before it is placed.
    fn check(&self, item: &NativeItem) -> EngineResult<()> {
        let id = item.id();
        if self.items.contains_key(&id) {
            return Err(EngineError::DuplicateItem { id });
        }

        match item {
            NativeItem::Module(module) => {
                if module.reference.is_empty() {
                    return Err(EngineError::invalid_geometry(
                        "module reference must not be empty",
                    ));
                }
                if self.find_module_by_reference(&module.reference).is_some() {
                    return Err(EngineError::duplicate_reference(&module.reference));
                }
                check_coord("module position", module.position)?;
                check_finite("module orientation", module.orientation)?;
                check_side(module.layer)
            }
            NativeItem::Track(track) => {
                check_coord("track start", track.start)?;
                check_coord("track end", track.end)?;
                check_positive("track width", track.width)?;
                check_copper(track.layer)
            }
            NativeItem::Via(via) => {
                check_coord("via position", via.position)?;
                check_positive("via size", via.size)?;
                check_positive("via drill", via.drill)?;
                if via.drill >= via.size {
                    return Err(EngineError::invalid_geometry(format!(
                        "via drill {} must be smaller than via size {}",
                        via.drill, via.size
                    )));
                }
                check_copper(via.layers.0)?;
                check_copper(via.layers.1)?;
                if via.layers.0 == via.layers.1 {
                    return Err(EngineError::invalid_geometry(
                        "via must connect two different layers",
                    ));
                }
                Ok(())
            }
            NativeItem::Drawing(drawing) => check_drawing(drawing),
        }
    }
}

fn check_in_range(what: &str, value: i64) -> EngineResult<()> {
    if (-MAX_IU..=MAX_IU).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::invalid_geometry(format!(
            "{what} {value} is outside the board coordinate range"
        )))
    }
}

fn check_coord(what: &str, point: Vector2) -> EngineResult<()> {
    check_in_range(what, point.x)?;
    check_in_range(what, point.y)
}

fn check_finite(what: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid_geometry(format!(
            "{what} {value} is not finite"
        )))
    }
}

fn check_positive(what: &str, value: i64) -> EngineResult<()> {
    check_in_range(what, value)?;
    if value > 0 {
        Ok(())
    } else {
        Err(EngineError::invalid_geometry(format!(
            "{what} must be positive, got {value}"
        )))
    }
}

fn check_defined(layer: LayerId) -> EngineResult<()> {
    if layers::name(layer).is_some() {
        Ok(())
    } else {
        Err(EngineError::invalid_geometry(format!(
            "layer {layer} is not defined"
        )))
    }
}

fn check_copper(layer: LayerId) -> EngineResult<()> {
    check_defined(layer)?;
    if layer.is_copper() {
        Ok(())
    } else {
        Err(EngineError::invalid_geometry(format!(
            "layer {layer} is not a copper layer"
        )))
    }
}

fn check_side(layer: LayerId) -> EngineResult<()> {
    if layer == LayerId::F_CU || layer == LayerId::B_CU {
        Ok(())
    } else {
        Err(EngineError::invalid_geometry(format!(
            "modules must be placed on F.Cu or B.Cu, got layer {layer}"
        )))
    }
}

fn check_drawing(drawing: &NativeDrawing) -> EngineResult<()> {
    check_defined(drawing.layer)?;
    check_positive("line width", drawing.width)?;
    match drawing.shape {
        DrawingShape::Segment { start, end } => {
            check_coord("line start", start)?;
            check_coord("line end", end)
        }
        DrawingShape::Circle { center, radius } => {
            check_coord("circle centre", center)?;
            check_positive("radius", radius)
        }
        DrawingShape::Arc {
            center,
            radius,
            start_angle,
            stop_angle,
        } => {
            check_coord("arc centre", center)?;
            check_finite("arc start angle", start_angle)?;
            check_finite("arc stop angle", stop_angle)?;
            check_positive("radius", radius)
        }
    }
}

impl NativeBoard for MemoryBoard {
    fn add(&mut self, item: NativeItem) -> EngineResult<&NativeItem> {
        self.check(&item)?;

        let id = item.id();
        tracing::trace!(%id, kind = item.kind(), "Placed item");
        let placed: &NativeItem = self.items.entry(id).or_insert(item);
        Ok(placed)
    }

    fn item(&self, id: ItemId) -> Option<&NativeItem> {
        self.items.get(&id)
    }

    fn find_module_by_reference(&self, reference: &str) -> Option<&NativeModule> {
        self.modules().find(|m| m.reference == reference)
    }

    fn modules(&self) -> Box<dyn Iterator<Item = &NativeModule> + '_> {
        Box::new(self.items.values().filter_map(|item| match item {
            NativeItem::Module(module) => Some(module),
            _ => None,
        }))
    }

    fn module_count(&self) -> usize {
        self.modules().count()
    }

    fn tracks(&self) -> Box<dyn Iterator<Item = &NativeItem> + '_> {
        Box::new(self.items.values().filter(|item| item.is_track_item()))
    }

    fn drawings(&self) -> Box<dyn Iterator<Item = &NativeDrawing> + '_> {
        Box::new(self.items.values().filter_map(|item| match item {
            NativeItem::Drawing(drawing) => Some(drawing),
            _ => None,
        }))
    }

    fn design_settings(&self) -> &DesignSettings {
        &self.design_settings
    }

    fn layer_id(&self, name: &str) -> Option<LayerId> {
        layers::parse(name)
    }

    fn layer_name(&self, id: LayerId) -> Option<&str> {
        layers::name(id)
    }

    fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    fn set_file_name(&mut self, path: PathBuf) {
        self.file_name = Some(path);
    }

    fn save(&mut self, path: &Path) -> EngineResult<()> {
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            design_settings: &self.design_settings,
            items: self.items.values().collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|source| EngineError::Serialize { source })?;
        std::fs::write(path, json).map_err(|e| EngineError::file_write(path, e))?;

        self.file_name = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            items = self.items.len(),
            "Wrote board"
        );

        Ok(())
    }
}

/// In-process engine producing [`MemoryBoard`]s.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    design_settings: DesignSettings,
    session: Option<MemoryBoard>,
}

impl MemoryEngine {
    /// Creates an engine with default design settings and no editor session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the design settings given to new boards.
    #[must_use]
    pub fn with_design_settings(mut self, design_settings: DesignSettings) -> Self {
        self.design_settings = design_settings;
        self
    }

    /// Opens `board` in the editor session, replacing any open board.
    pub fn open_in_editor(&mut self, board: MemoryBoard) {
        self.session = Some(board);
    }

    /// Returns true if a board is open in the editor session.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

impl NativeEngine for MemoryEngine {
    type Board = MemoryBoard;

    fn new_board(&self) -> MemoryBoard {
        MemoryBoard::with_design_settings(self.design_settings)
    }

    fn load_board(&self, path: &Path) -> EngineResult<MemoryBoard> {
        MemoryBoard::open(path)
    }

    fn editor_board(&mut self) -> EngineResult<MemoryBoard> {
        self.session.take().ok_or(EngineError::NoActiveSession)
    }
}
