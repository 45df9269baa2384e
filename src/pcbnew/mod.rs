//! Board, module, track, via and drawing wrappers.
//!
//! A [`Board`] wraps one native board obtained from a [`NativeEngine`].
//! Everything the board hands out ([`Module`], [`Track`], [`Via`],
//! [`Drawing`], [`ModuleList`]) is a borrowed view over items the engine
//! owns; geometry is exposed in millimetres.
//!
//! ```
//! use pcbnew_board::pcbnew::Board;
//!
//! let mut board = Board::new();
//! board.add_module("R1", (0.0, 0.0)).unwrap();
//! board.add_module("C1", (2.54, 0.0)).unwrap();
//!
//! let modules = board.modules();
//! assert_eq!(modules.len(), 2);
//! assert_eq!(modules.get("C1").unwrap().reference(), "C1");
//! assert!(modules.get("Q1").is_err());
//!
//! for module in modules {
//!     println!("{} at {:?}", module.reference(), module.position());
//! }
//! ```

pub mod board;
pub mod engine;
pub mod error;
pub mod items;
pub mod modules;
pub mod units;

pub use board::{Board, BoardDefaults};
pub use engine::{
    DesignSettings, ItemId, LayerId, MemoryBoard, MemoryEngine, NativeBoard, NativeEngine,
};
pub use error::{BoardError, BoardResult, EngineError, EngineResult};
pub use items::{Drawing, Module, Shape, Track, Via};
pub use modules::{ModuleList, Modules};
pub use units::Point;
