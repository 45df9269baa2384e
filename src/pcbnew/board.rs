//! The board aggregate.
//!
//! [`Board`] wraps one native board and adds convenience constructors for
//! modules, tracks, vias and graphic drawings. Sizes are given in mm and
//! default to the engine's current design settings where the engine has
//! one, or to [`BoardDefaults`] otherwise.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::engine::{
    LayerId, MemoryBoard, NativeBoard, NativeDrawing, NativeEngine, NativeItem, NativeModule,
    NativeTrack, NativeVia, Placeable,
};
use super::error::{BoardError, BoardResult, EngineError};
use super::items::{Drawing, Module, Track, Via};
use super::modules::ModuleList;
use super::units::{checked_from_mm, to_mm, Point};

/// Fallback values used when the caller does not give a layer or size.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardDefaults {
    /// Copper layer for new modules and tracks.
    #[serde(default = "default_copper_layer")]
    pub copper_layer: String,

    /// Layer for new graphic drawings.
    #[serde(default = "default_graphic_layer")]
    pub graphic_layer: String,

    /// Line width for new graphic drawings, in mm.
    #[serde(default = "default_graphic_line_width")]
    pub graphic_line_width: f64,

    /// Layer pair for new vias.
    #[serde(default = "default_via_layer_pair")]
    pub via_layer_pair: (String, String),

    /// Via drill in mm, used when the engine reports no current drill.
    #[serde(default = "default_fallback_via_drill")]
    pub fallback_via_drill: f64,
}

impl Default for BoardDefaults {
    fn default() -> Self {
        Self {
            copper_layer: default_copper_layer(),
            graphic_layer: default_graphic_layer(),
            graphic_line_width: default_graphic_line_width(),
            via_layer_pair: default_via_layer_pair(),
            fallback_via_drill: default_fallback_via_drill(),
        }
    }
}

fn default_copper_layer() -> String {
    "F.Cu".to_string()
}

fn default_graphic_layer() -> String {
    "F.SilkS".to_string()
}

const fn default_graphic_line_width() -> f64 {
    0.15
}

fn default_via_layer_pair() -> (String, String) {
    ("B.Cu".to_string(), "F.Cu".to_string())
}

const fn default_fallback_via_drill() -> f64 {
    0.2
}

/// A printed circuit board.
#[derive(Debug, Clone)]
pub struct Board<N = MemoryBoard> {
    native: N,
    defaults: BoardDefaults,
}

impl Board<MemoryBoard> {
    /// Creates an empty in-memory board.
    #[must_use]
    pub fn new() -> Self {
        Self::wrap(MemoryBoard::new())
    }
}

impl Default for Board<MemoryBoard> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NativeBoard> Board<N> {
    /// Wraps an existing native board.
    #[must_use]
    pub fn wrap(native: N) -> Self {
        Self {
            native,
            defaults: BoardDefaults::default(),
        }
    }

    /// Creates an empty board in `engine`.
    #[must_use]
    pub fn new_in<E: NativeEngine<Board = N>>(engine: &E) -> Self {
        Self::wrap(engine.new_board())
    }

    /// Loads a board file through `engine`.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the file cannot be loaded.
    pub fn load<E: NativeEngine<Board = N>>(
        engine: &E,
        path: impl AsRef<Path>,
    ) -> BoardResult<Self> {
        Ok(Self::wrap(engine.load_board(path.as_ref())?))
    }

    /// Takes the board open in the editor session of `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoActiveSession`] if nothing is open.
    pub fn from_editor<E: NativeEngine<Board = N>>(engine: &mut E) -> BoardResult<Self> {
        Ok(Self::wrap(engine.editor_board()?))
    }

    /// Replaces the fallback values.
    #[must_use]
    pub fn with_defaults(mut self, defaults: BoardDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Current fallback values.
    #[must_use]
    pub const fn defaults(&self) -> &BoardDefaults {
        &self.defaults
    }

    /// The wrapped native board.
    #[must_use]
    pub const fn native(&self) -> &N {
        &self.native
    }

    /// The wrapped native board, mutably.
    pub fn native_mut(&mut self) -> &mut N {
        &mut self.native
    }

    /// Unwraps the native board.
    #[must_use]
    pub fn into_native(self) -> N {
        self.native
    }

    /// Saves the board to its own file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoFileName`] if the board has never been loaded
    /// or saved, or the engine's error if writing fails.
    pub fn save(&mut self) -> BoardResult<()> {
        let path = self
            .native
            .file_name()
            .map(Path::to_path_buf)
            .ok_or(EngineError::NoFileName)?;
        self.save_as(path)
    }

    /// Saves the board to `path`, which becomes its file name.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if writing fails.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> BoardResult<()> {
        self.native.save(path.as_ref())?;
        Ok(())
    }

    /// Name of the board file, if any.
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.native.file_name()
    }

    /// Sets the board file name without saving.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        self.native.set_file_name(path.into());
    }

    /// Places a native item on the board and returns the placed item.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the item is rejected.
    pub fn add<T: Placeable>(&mut self, item: T) -> BoardResult<&T> {
        let placed = self.native.add(item.into())?;
        T::from_native(placed).ok_or(BoardError::UnexpectedItem { id: placed.id() })
    }

    /// The modules on the board.
    #[must_use]
    pub const fn modules(&self) -> ModuleList<'_, N> {
        ModuleList::new(&self.native)
    }

    /// Returns the module with `reference`, or `None`.
    #[must_use]
    pub fn module_by_ref(&self, reference: &str) -> Option<Module<'_>> {
        self.native
            .find_module_by_reference(reference)
            .map(Module::wrap)
    }

    /// Iterates over the vias, in track-list order.
    pub fn vias(&self) -> impl Iterator<Item = Via<'_>> + '_ {
        self.native.tracks().filter_map(as_via)
    }

    /// Iterates over the track segments, in track-list order.
    pub fn tracks(&self) -> impl Iterator<Item = Track<'_>> + '_ {
        self.native.tracks().filter_map(as_track)
    }

    /// Iterates over the graphic drawings.
    pub fn drawings(&self) -> impl Iterator<Item = Drawing<'_>> + '_ {
        self.native.drawings().map(Drawing::wrap)
    }

    /// Resolves a layer name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownLayer`] if the engine does not know it.
    pub fn get_layer(&self, name: &str) -> BoardResult<LayerId> {
        self.native
            .layer_id(name)
            .ok_or_else(|| EngineError::unknown_layer(name).into())
    }

    /// Returns the name of a layer.
    #[must_use]
    pub fn layer_name(&self, id: LayerId) -> Option<&str> {
        self.native.layer_name(id)
    }

    /// Creates a module at `position` on the default copper layer.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the reference is already taken.
    pub fn add_module(
        &mut self,
        reference: impl Into<String>,
        position: impl Into<Point>,
    ) -> BoardResult<Module<'_>> {
        let position = check_point("module position", position.into())?;
        let layer = self.get_layer(&self.defaults.copper_layer)?;
        let module = NativeModule::new(reference, position, layer);
        self.add(module).map(Module::wrap)
    }

    /// Current track width in mm.
    #[must_use]
    pub fn default_width(&self) -> f64 {
        to_mm(self.native.design_settings().current_track_width)
    }

    /// Current via size in mm.
    #[must_use]
    pub fn default_via_size(&self) -> f64 {
        to_mm(self.native.design_settings().current_via_size)
    }

    /// Current via drill in mm, or the fallback drill when the engine has none.
    #[must_use]
    pub fn default_via_drill(&self) -> f64 {
        let drill = self.native.design_settings().current_via_drill;
        if drill > 0 {
            to_mm(drill)
        } else {
            self.defaults.fallback_via_drill
        }
    }

    /// Creates a track segment.
    ///
    /// `layer` defaults to the copper layer, `width` to [`Self::default_width`].
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the layer is unknown or the geometry is
    /// rejected.
    pub fn add_track_segment(
        &mut self,
        start: impl Into<Point>,
        end: impl Into<Point>,
        layer: Option<&str>,
        width: Option<f64>,
    ) -> BoardResult<Track<'_>> {
        let start = check_point("track start", start.into())?;
        let end = check_point("track end", end.into())?;
        let layer = self.get_layer(layer.unwrap_or(&self.defaults.copper_layer))?;
        let width = check_length("track width", width.unwrap_or_else(|| self.default_width()))?;
        let track = NativeTrack::new(start, end, width, layer);
        self.add(track).map(Track::wrap)
    }

    /// Creates a track polyline: one segment from each coordinate to the next.
    ///
    /// Returns the number of segments placed.
    ///
    /// # Errors
    ///
    /// Stops at the first segment the engine rejects and returns its error.
    pub fn add_track<P: Into<Point>>(
        &mut self,
        coords: impl IntoIterator<Item = P>,
        layer: Option<&str>,
        width: Option<f64>,
    ) -> BoardResult<usize> {
        let mut points = coords.into_iter().map(Into::<Point>::into);
        let Some(mut previous) = points.next() else {
            return Ok(0);
        };

        let mut count = 0;
        for point in points {
            self.add_track_segment(previous, point, layer, width)?;
            previous = point;
            count += 1;
        }
        Ok(count)
    }

    /// Creates a via.
    ///
    /// `layer_pair` defaults to the configured pair (`B.Cu`, `F.Cu`); `size`
    /// and `drill` default to [`Self::default_via_size`] and
    /// [`Self::default_via_drill`].
    ///
    /// # Errors
    ///
    /// Returns the engine's error if a layer is unknown or the geometry is
    /// rejected.
    pub fn add_via(
        &mut self,
        coord: impl Into<Point>,
        layer_pair: Option<(&str, &str)>,
        size: Option<f64>,
        drill: Option<f64>,
    ) -> BoardResult<Via<'_>> {
        let (first, second) = layer_pair.unwrap_or((
            self.defaults.via_layer_pair.0.as_str(),
            self.defaults.via_layer_pair.1.as_str(),
        ));
        let layers = (self.get_layer(first)?, self.get_layer(second)?);
        let coord = check_point("via position", coord.into())?;
        let size = check_length("via size", size.unwrap_or_else(|| self.default_via_size()))?;
        let drill = check_length("via drill", drill.unwrap_or_else(|| self.default_via_drill()))?;
        let via = NativeVia::new(coord, layers, size, drill);
        self.add(via).map(Via::wrap)
    }

    /// Creates a graphic line.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the layer is unknown or the geometry is
    /// rejected.
    pub fn add_line(
        &mut self,
        start: impl Into<Point>,
        end: impl Into<Point>,
        layer: Option<&str>,
        width: Option<f64>,
    ) -> BoardResult<Drawing<'_>> {
        let start = check_point("line start", start.into())?;
        let end = check_point("line end", end.into())?;
        let (layer, width) = self.graphic_style(layer, width)?;
        let line = NativeDrawing::segment(start, end, layer, width);
        self.add(line).map(Drawing::wrap)
    }

    /// Creates a graphic polyline: one line from each coordinate to the next.
    ///
    /// Returns the number of lines placed.
    ///
    /// # Errors
    ///
    /// Stops at the first line the engine rejects and returns its error.
    pub fn add_polyline<P: Into<Point>>(
        &mut self,
        coords: impl IntoIterator<Item = P>,
        layer: Option<&str>,
        width: Option<f64>,
    ) -> BoardResult<usize> {
        let mut points = coords.into_iter().map(Into::<Point>::into);
        let Some(mut previous) = points.next() else {
            return Ok(0);
        };

        let mut count = 0;
        for point in points {
            self.add_line(previous, point, layer, width)?;
            previous = point;
            count += 1;
        }
        Ok(count)
    }

    /// Creates a graphic circle.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the layer is unknown or the geometry is
    /// rejected.
    pub fn add_circle(
        &mut self,
        center: impl Into<Point>,
        radius: f64,
        layer: Option<&str>,
        width: Option<f64>,
    ) -> BoardResult<Drawing<'_>> {
        let center = check_point("circle centre", center.into())?;
        let radius = check_length("circle radius", radius)?;
        let (layer, width) = self.graphic_style(layer, width)?;
        let circle = NativeDrawing::circle(center, radius, layer, width);
        self.add(circle).map(Drawing::wrap)
    }

    /// Creates a graphic arc from `start_angle` to `stop_angle` (degrees).
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the layer is unknown or the geometry is
    /// rejected.
    pub fn add_arc(
        &mut self,
        center: impl Into<Point>,
        radius: f64,
        start_angle: f64,
        stop_angle: f64,
        layer: Option<&str>,
        width: Option<f64>,
    ) -> BoardResult<Drawing<'_>> {
        let center = check_point("arc centre", center.into())?;
        let radius = check_length("arc radius", radius)?;
        let start_angle = check_angle("arc start angle", start_angle)?;
        let stop_angle = check_angle("arc stop angle", stop_angle)?;
        let (layer, width) = self.graphic_style(layer, width)?;
        let arc = NativeDrawing::arc(center, radius, start_angle, stop_angle, layer, width);
        self.add(arc).map(Drawing::wrap)
    }

    fn graphic_style(
        &self,
        layer: Option<&str>,
        width: Option<f64>,
    ) -> BoardResult<(LayerId, f64)> {
        let layer = self.get_layer(layer.unwrap_or(&self.defaults.graphic_layer))?;
        let width = check_length(
            "line width",
            width.unwrap_or(self.defaults.graphic_line_width),
        )?;
        Ok((layer, width))
    }
}

/// Passes `mm` through if it converts to internal units without saturating.
fn check_length(what: &str, mm: f64) -> BoardResult<f64> {
    match checked_from_mm(mm) {
        Some(_) => Ok(mm),
        None => Err(EngineError::invalid_geometry(format!(
            "{what} {mm} mm is outside the board coordinate range"
        ))
        .into()),
    }
}

fn check_point(what: &str, point: Point) -> BoardResult<Point> {
    check_length(what, point.x)?;
    check_length(what, point.y)?;
    Ok(point)
}

fn check_angle(what: &str, degrees: f64) -> BoardResult<f64> {
    if degrees.is_finite() {
        Ok(degrees)
    } else {
        Err(EngineError::invalid_geometry(format!("{what} {degrees} is not finite")).into())
    }
}

fn as_via(item: &NativeItem) -> Option<Via<'_>> {
    match item {
        NativeItem::Via(via) => Some(Via::wrap(via)),
        _ => None,
    }
}

fn as_track(item: &NativeItem) -> Option<Track<'_>> {
    match item {
        NativeItem::Track(track) => Some(Track::wrap(track)),
        _ => None,
    }
}
