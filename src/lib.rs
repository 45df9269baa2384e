//! pcbnew-board: typed wrappers over a PCB editing engine
//!
//! This library exposes board entities (modules, tracks, vias, drawing
//! primitives) through convenience accessors and millimetre unit conversions.
//!
//! # Architecture
//!
//! The wrappers own no geometry. They delegate to a native engine:
//!
//! - **Engine seam**: [`pcbnew::NativeEngine`] / [`pcbnew::NativeBoard`], passed in explicitly
//! - **Board**: item construction with design-settings defaults, load and save
//! - **Module list**: reference-keyed lookup and placement-order iteration
//!
//! The engine (not these wrappers) handles:
//! - Item storage and placement order
//! - File persistence
//! - Layer tables and geometry validation
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Configuration error types
//! - [`pcbnew`]: Board wrappers, unit conversion and the in-memory engine

pub mod config;
pub mod error;
pub mod pcbnew;
