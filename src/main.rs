//! pcbnew-board: inspect board snapshots from the command line
//!
//! Lists modules in placement order, looks up a module by reference, and
//! reports vias and design-settings defaults.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, error, Level};
use tracing_subscriber::EnvFilter;

use pcbnew_board::config;
use pcbnew_board::pcbnew::{Board, BoardDefaults, MemoryEngine, Module, Point, Via};

/// Inspect pcbnew board snapshots.
#[derive(Parser, Debug)]
#[command(name = "pcbnew-board")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "CONFIG_FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List modules in placement order
    Modules {
        /// Board file
        board: PathBuf,

        /// Only list modules whose reference matches this regex
        #[arg(long, value_name = "REGEX")]
        filter: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a single module
    Find {
        /// Board file
        board: PathBuf,

        /// Module reference (e.g. R1)
        reference: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List vias
    Vias {
        /// Board file
        board: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Summarise the board
    Info {
        /// Board file
        board: PathBuf,
    },
}

/// Module as printed by the CLI.
#[derive(Debug, Serialize)]
struct ModuleRow<'a> {
    reference: &'a str,
    value: &'a str,
    position: Point,
    orientation: f64,
    layer: &'a str,
}

impl<'a> ModuleRow<'a> {
    fn new(board: &'a Board, module: Module<'a>) -> Self {
        Self {
            reference: module.reference(),
            value: module.value(),
            position: module.position(),
            orientation: module.orientation(),
            layer: board.layer_name(module.layer()).unwrap_or("?"),
        }
    }

    fn print(&self) {
        println!(
            "{:<8} {:<16} ({:>9.4}, {:>9.4}) {:>6.1}° {}",
            self.reference,
            self.value,
            self.position.x,
            self.position.y,
            self.orientation,
            self.layer
        );
    }
}

/// Via as printed by the CLI.
#[derive(Debug, Serialize)]
struct ViaRow<'a> {
    position: Point,
    size: f64,
    drill: f64,
    layers: (&'a str, &'a str),
}

impl<'a> ViaRow<'a> {
    fn new(board: &'a Board, via: Via<'a>) -> Self {
        let (first, second) = via.layer_pair();
        Self {
            position: via.position(),
            size: via.size(),
            drill: via.drill(),
            layers: (
                board.layer_name(first).unwrap_or("?"),
                board.layer_name(second).unwrap_or("?"),
            ),
        }
    }

    fn print(&self) {
        println!(
            "({:>9.4}, {:>9.4}) size {:.3} drill {:.3} {}-{}",
            self.position.x, self.position.y, self.size, self.drill, self.layers.0, self.layers.1
        );
    }
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Formats an error followed by each of its causes.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn load_board(path: &Path, defaults: &BoardDefaults) -> Result<Board, String> {
    let engine = MemoryEngine::new();
    Board::load(&engine, path)
        .map(|board| board.with_defaults(defaults.clone()))
        .map_err(|e| error_chain(&e))
}

fn parse_filter(filter: Option<&str>) -> Result<Option<Regex>, String> {
    filter
        .map(Regex::new)
        .transpose()
        .map_err(|e| format!("Invalid filter regex: {e}"))
}

/// Rows for the modules whose reference matches `filter`, in placement order.
fn module_rows<'a>(board: &'a Board, filter: Option<&Regex>) -> Vec<ModuleRow<'a>> {
    board
        .modules()
        .iter()
        .filter(|m| filter.map_or(true, |f| f.is_match(m.reference())))
        .map(|m| ModuleRow::new(board, m))
        .collect()
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn run(command: Command, defaults: &BoardDefaults) -> Result<(), String> {
    match command {
        Command::Modules {
            board,
            filter,
            json,
        } => {
            let filter = parse_filter(filter.as_deref())?;
            let board = load_board(&board, defaults)?;
            let rows = module_rows(&board, filter.as_ref());

            debug!(
                shown = rows.len(),
                total = board.modules().len(),
                "Listed modules"
            );

            if json {
                print_json(&rows)?;
            } else {
                rows.iter().for_each(ModuleRow::print);
            }
            Ok(())
        }
        Command::Find {
            board,
            reference,
            json,
        } => {
            let board = load_board(&board, defaults)?;
            let module = board
                .modules()
                .get(&reference)
                .map_err(|e| error_chain(&e))?;
            let row = ModuleRow::new(&board, module);
            if json {
                print_json(&row)?;
            } else {
                row.print();
            }
            Ok(())
        }
        Command::Vias { board, json } => {
            let board = load_board(&board, defaults)?;
            let rows: Vec<_> = board.vias().map(|v| ViaRow::new(&board, v)).collect();
            if json {
                print_json(&rows)?;
            } else {
                rows.iter().for_each(ViaRow::print);
            }
            Ok(())
        }
        Command::Info { board } => {
            let board = load_board(&board, defaults)?;
            if let Some(path) = board.filename() {
                println!("file:           {}", path.display());
            }
            println!("modules:        {}", board.modules().len());
            println!("tracks:         {}", board.tracks().count());
            println!("vias:           {}", board.vias().count());
            println!("drawings:       {}", board.drawings().count());
            println!("track width:    {:.4} mm", board.default_width());
            println!("via size:       {:.4} mm", board.default_via_size());
            println!("via drill:      {:.4} mm", board.default_via_drill());
            Ok(())
        }
    }
}

/// Entry point for the pcbnew-board tool.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", error_chain(&e));
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    match run(args.command, &cfg.board) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(error = %message, "Command failed");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn log_level_from_flags() {
        assert_eq!(get_log_level(0, true, "trace"), Level::ERROR);
        assert_eq!(get_log_level(2, false, "warn"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "INFO"), Level::INFO);
        assert_eq!(get_log_level(0, false, "nonsense"), Level::WARN);
    }

    #[test]
    fn parse_modules_command() {
        let args = Args::parse_from(["pcbnew-board", "-v", "modules", "board.json", "--filter", "^R"]);
        assert_eq!(args.verbose, 1);
        match args.command {
            Command::Modules { board, filter, json } => {
                assert_eq!(board, PathBuf::from("board.json"));
                assert_eq!(filter.as_deref(), Some("^R"));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    /// Writes a board with R1, R2, C1 and one via, returning its directory and path.
    fn sample_board_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");

        let mut board = Board::new();
        board.add_module("R1", (1.0, 1.0)).unwrap();
        board.add_module("C1", (2.0, 1.0)).unwrap();
        board.add_module("R2", (3.0, 1.0)).unwrap();
        board.add_via((2.0, 2.0), None, None, None).unwrap();
        board.save_as(&path).unwrap();

        (dir, path)
    }

    fn find(board: &Path, reference: &str) -> Result<(), String> {
        run(
            Command::Find {
                board: board.to_path_buf(),
                reference: reference.to_string(),
                json: false,
            },
            &BoardDefaults::default(),
        )
    }

    #[test]
    fn find_fails_for_missing_reference() {
        let (_dir, path) = sample_board_file();
        assert!(find(&path, "R1").is_ok());

        let err = find(&path, "Q1").unwrap_err();
        assert!(err.contains("Q1"), "unexpected message: {err}");
    }

    #[test]
    fn modules_filter_selects_matching_references() {
        let (_dir, path) = sample_board_file();
        let board = load_board(&path, &BoardDefaults::default()).unwrap();

        let filter = parse_filter(Some("^R")).unwrap();
        let rows = module_rows(&board, filter.as_ref());
        let references: Vec<_> = rows.iter().map(|r| r.reference).collect();
        assert_eq!(references, ["R1", "R2"]);
        assert_eq!(rows[0].layer, "F.Cu");

        assert_eq!(module_rows(&board, None).len(), 3);

        let filter = parse_filter(Some("^Q")).unwrap();
        assert!(module_rows(&board, filter.as_ref()).is_empty());
    }

    #[test]
    fn modules_command_runs_with_and_without_filter() {
        let (_dir, path) = sample_board_file();
        let defaults = BoardDefaults::default();

        for (filter, json) in [(None, false), (Some("^C".to_string()), true)] {
            let command = Command::Modules {
                board: path.clone(),
                filter,
                json,
            };
            assert!(run(command, &defaults).is_ok());
        }
    }

    #[test]
    fn invalid_filter_is_an_error() {
        let (_dir, path) = sample_board_file();
        let command = Command::Modules {
            board: path,
            filter: Some("(".to_string()),
            json: false,
        };
        let err = run(command, &BoardDefaults::default()).unwrap_err();
        assert!(err.starts_with("Invalid filter regex"));
    }

    #[test]
    fn vias_and_info_commands_run() {
        let (_dir, path) = sample_board_file();
        let defaults = BoardDefaults::default();

        let board = load_board(&path, &defaults).unwrap();
        let via = ViaRow::new(&board, board.vias().next().unwrap());
        assert_eq!(via.layers, ("B.Cu", "F.Cu"));
        assert!((via.drill - 0.4).abs() < 1e-9);

        let vias = Command::Vias {
            board: path.clone(),
            json: true,
        };
        assert!(run(vias, &defaults).is_ok());
        assert!(run(Command::Info { board: path }, &defaults).is_ok());
    }

    #[test]
    fn missing_board_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let command = Command::Info {
            board: dir.path().join("absent.json"),
        };
        assert!(run(command, &BoardDefaults::default()).is_err());
    }

    #[test]
    fn load_errors_include_their_causes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"version\": 1, \"items\": [").unwrap();

        let err = load_board(&path, &BoardDefaults::default()).unwrap_err();
        assert!(err.starts_with("Failed to parse board file"));
        assert!(err.contains("line 1 column"), "cause missing: {err}");
    }
}
