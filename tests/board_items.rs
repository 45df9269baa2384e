//! Item construction through the board: defaults, validation and iteration.

use pcbnew_board::pcbnew::engine::native::{NativeModule, NativeTrack};
use pcbnew_board::pcbnew::{
    Board, BoardDefaults, BoardError, DesignSettings, EngineError, LayerId, MemoryBoard,
    MemoryEngine, Point, Shape,
};

/// Helper to compare floats with tolerance.
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

const F_SILKS: LayerId = LayerId(37);
const DWGS_USER: LayerId = LayerId(40);

// =============================================================================
// Tracks
// =============================================================================

#[test]
fn add_track_places_one_segment_per_coordinate_pair() {
    let mut board = Board::new();
    let coords = [(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (10.0, 5.0)];

    let placed = board.add_track(coords, None, Some(0.3)).unwrap();
    assert_eq!(placed, 3);

    let tracks: Vec<_> = board.tracks().collect();
    assert_eq!(tracks.len(), 3);
    for (track, pair) in tracks.iter().zip(coords.windows(2)) {
        assert_eq!(track.start(), Point::from(pair[0]));
        assert_eq!(track.end(), Point::from(pair[1]));
        assert!(approx_eq(track.width(), 0.3));
        assert_eq!(track.layer(), LayerId::F_CU);
    }
}

#[test]
fn add_track_with_fewer_than_two_points_adds_nothing() {
    let mut board = Board::new();
    assert_eq!(board.add_track(Vec::<(f64, f64)>::new(), None, None).unwrap(), 0);
    assert_eq!(board.add_track([(1.0, 1.0)], None, None).unwrap(), 0);
    assert_eq!(board.tracks().count(), 0);
}

#[test]
fn track_on_named_inner_layer() {
    let mut board = Board::new();
    let track = board
        .add_track_segment((0.0, 0.0), (1.0, 1.0), Some("In2.Cu"), None)
        .unwrap();
    assert_eq!(track.layer(), LayerId(2));
    assert!(approx_eq(track.width(), board_default_width()));
}

fn board_default_width() -> f64 {
    Board::new().default_width()
}

#[test]
fn track_on_non_copper_layer_is_rejected() {
    let mut board = Board::new();
    let err = board
        .add_track_segment((0.0, 0.0), (1.0, 0.0), Some("F.SilkS"), None)
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Engine(EngineError::InvalidGeometry { .. })
    ));
    assert_eq!(board.tracks().count(), 0);
}

#[test]
fn track_with_zero_width_is_rejected() {
    let mut board = Board::new();
    assert!(board
        .add_track_segment((0.0, 0.0), (1.0, 0.0), None, Some(0.0))
        .is_err());
}

#[test]
fn add_track_stops_at_first_rejected_segment() {
    let mut board = Board::new();
    let err = board
        .add_track([(0.0, 0.0), (1.0, 0.0)], Some("No.Such.Layer"), None)
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Engine(EngineError::UnknownLayer { .. })
    ));
    assert_eq!(board.tracks().count(), 0);
}

// =============================================================================
// Vias
// =============================================================================

#[test]
fn via_defaults_come_from_design_settings() {
    let mut board = Board::new();
    let via = board.add_via((2.0, 3.0), None, None, None).unwrap();
    assert_eq!(via.position(), Point::new(2.0, 3.0));
    assert!(approx_eq(via.size(), 0.8));
    assert!(approx_eq(via.drill(), 0.4));
    assert_eq!(via.layer_pair(), (LayerId::B_CU, LayerId::F_CU));
}

#[test]
fn via_drill_falls_back_when_engine_reports_none() {
    let engine = MemoryEngine::new().with_design_settings(DesignSettings {
        current_via_drill: 0,
        ..DesignSettings::default()
    });
    let mut board = Board::new_in(&engine);
    assert!(approx_eq(board.default_via_drill(), 0.2));

    let via = board.add_via((0.0, 0.0), None, None, None).unwrap();
    assert!(approx_eq(via.drill(), 0.2));
}

#[test]
fn via_with_explicit_layers_and_sizes() {
    let mut board = Board::new();
    let via = board
        .add_via((1.0, 1.0), Some(("In1.Cu", "In4.Cu")), Some(0.5), Some(0.25))
        .unwrap();
    assert_eq!(via.layer_pair(), (LayerId(1), LayerId(4)));
    assert!(approx_eq(via.size(), 0.5));
    assert!(approx_eq(via.drill(), 0.25));
}

#[test]
fn via_drill_must_be_smaller_than_size() {
    let mut board = Board::new();
    let err = board
        .add_via((0.0, 0.0), None, Some(0.4), Some(0.4))
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Engine(EngineError::InvalidGeometry { .. })
    ));
    assert_eq!(board.vias().count(), 0);
}

#[test]
fn explicit_zero_via_size_is_an_error_not_a_default() {
    let mut board = Board::new();
    let err = board
        .add_via((0.0, 0.0), None, Some(0.0), None)
        .unwrap_err();
    assert!(matches!(
        err,
        BoardError::Engine(EngineError::InvalidGeometry { .. })
    ));
    assert!(board
        .add_via((0.0, 0.0), None, None, Some(0.0))
        .is_err());
    assert_eq!(board.vias().count(), 0);
}

#[test]
fn vias_and_tracks_share_track_list_order() {
    let mut board = Board::new();
    board.add_via((0.0, 0.0), None, None, None).unwrap();
    board
        .add_track_segment((0.0, 0.0), (3.0, 0.0), None, None)
        .unwrap();
    board.add_via((3.0, 0.0), None, None, None).unwrap();

    let positions: Vec<Point> = board.vias().map(|v| v.position()).collect();
    assert_eq!(positions, [Point::new(0.0, 0.0), Point::new(3.0, 0.0)]);
    assert_eq!(board.tracks().count(), 1);
}

// =============================================================================
// Drawings
// =============================================================================

#[test]
fn graphic_defaults() {
    let mut board = Board::new();
    let line = board.add_line((0.0, 0.0), (4.0, 0.0), None, None).unwrap();
    assert_eq!(line.layer(), F_SILKS);
    assert!(approx_eq(line.width(), 0.15));
    assert_eq!(
        line.shape(),
        Shape::Segment {
            start: Point::new(0.0, 0.0),
            end: Point::new(4.0, 0.0),
        }
    );
}

#[test]
fn configured_defaults_apply_to_new_items() {
    let mut board = Board::new().with_defaults(BoardDefaults {
        copper_layer: "B.Cu".to_string(),
        graphic_layer: "Dwgs.User".to_string(),
        graphic_line_width: 0.1,
        ..BoardDefaults::default()
    });

    let module = board.add_module("J1", (0.0, 0.0)).unwrap();
    assert!(module.is_flipped());

    let circle = board.add_circle((5.0, 5.0), 2.0, None, None).unwrap();
    assert_eq!(circle.layer(), DWGS_USER);
    assert!(approx_eq(circle.width(), 0.1));
}

#[test]
fn polyline_arc_and_circle() {
    let mut board = Board::new();
    let lines = board
        .add_polyline(
            [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)],
            Some("Edge.Cuts"),
            Some(0.05),
        )
        .unwrap();
    assert_eq!(lines, 4);

    board.add_circle((5.0, 5.0), 1.5, None, None).unwrap();
    let arc = board
        .add_arc((5.0, 5.0), 3.0, 0.0, 90.0, None, None)
        .unwrap();
    match arc.shape() {
        Shape::Arc {
            center,
            radius,
            start_angle,
            stop_angle,
        } => {
            assert_eq!(center, Point::new(5.0, 5.0));
            assert!(approx_eq(radius, 3.0));
            assert!(approx_eq(start_angle, 0.0));
            assert!(approx_eq(stop_angle, 90.0));
        }
        other => panic!("expected an arc, got {other:?}"),
    }

    assert_eq!(board.drawings().count(), 6);
}

#[test]
fn circle_with_zero_radius_is_rejected() {
    let mut board = Board::new();
    assert!(board.add_circle((0.0, 0.0), 0.0, None, None).is_err());
    assert_eq!(board.drawings().count(), 0);
}

// =============================================================================
// Unrepresentable input
// =============================================================================

fn is_invalid_geometry<T>(result: Result<T, BoardError>) -> bool {
    matches!(
        result,
        Err(BoardError::Engine(EngineError::InvalidGeometry { .. }))
    )
}

#[test]
fn non_finite_positions_are_rejected() {
    let mut board = Board::new();
    assert!(is_invalid_geometry(board.add_module("R1", (f64::NAN, 1.0))));
    assert!(is_invalid_geometry(
        board.add_module("R2", (0.0, f64::NEG_INFINITY))
    ));
    assert!(is_invalid_geometry(board.add_via(
        (f64::INFINITY, 0.0),
        None,
        None,
        None
    )));
    assert!(is_invalid_geometry(board.add_line(
        (0.0, 0.0),
        (f64::NAN, 0.0),
        None,
        None
    )));
    assert!(board.modules().is_empty());
    assert_eq!(board.vias().count(), 0);
    assert_eq!(board.drawings().count(), 0);
}

#[test]
fn non_finite_sizes_are_rejected() {
    let mut board = Board::new();
    assert!(is_invalid_geometry(board.add_track_segment(
        (0.0, 0.0),
        (1.0, 0.0),
        None,
        Some(f64::INFINITY)
    )));
    assert!(is_invalid_geometry(board.add_via(
        (0.0, 0.0),
        None,
        Some(f64::NAN),
        None
    )));
    assert!(is_invalid_geometry(board.add_circle(
        (0.0, 0.0),
        1.0,
        None,
        Some(f64::INFINITY)
    )));
    assert!(is_invalid_geometry(board.add_arc(
        (0.0, 0.0),
        1.0,
        f64::NAN,
        90.0,
        None,
        None
    )));
    assert_eq!(board.tracks().count(), 0);
    assert_eq!(board.drawings().count(), 0);
}

#[test]
fn out_of_range_values_are_rejected() {
    let mut board = Board::new();
    assert!(is_invalid_geometry(board.add_module("R1", (1e30, 0.0))));
    assert!(is_invalid_geometry(board.add_circle(
        (0.0, 0.0),
        1e30,
        None,
        None
    )));
    assert!(is_invalid_geometry(board.add_track_segment(
        (0.0, 0.0),
        (3000.0, 0.0),
        None,
        None
    )));
    assert_eq!(board.native().item_count(), 0);

    // The largest board the engine takes is a little over 2 m.
    board.add_module("R1", (2000.0, -2000.0)).unwrap();
}

// =============================================================================
// Modules and the engine
// =============================================================================

#[test]
fn duplicate_reference_is_rejected() {
    let mut board = Board::new();
    board.add_module("R1", (0.0, 0.0)).unwrap();
    let err = board.add_module("R1", (1.0, 1.0)).unwrap_err();
    assert!(matches!(
        err,
        BoardError::Engine(EngineError::DuplicateReference { ref reference }) if reference == "R1"
    ));
    assert_eq!(board.modules().len(), 1);
}

#[test]
fn add_accepts_prebuilt_native_items() {
    let mut board = Board::new();
    let module = NativeModule::new("U7", Point::new(1.0, 2.0), LayerId::F_CU)
        .with_value("LM358")
        .with_orientation(90.0);
    let placed = board.add(module).unwrap();
    assert_eq!(placed.reference, "U7");

    let u7 = board.modules().get("U7").unwrap();
    assert_eq!(u7.value(), "LM358");
    assert!(approx_eq(u7.orientation(), 90.0));

    let track = NativeTrack::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 0.2, LayerId::B_CU);
    let placed = board.add(track).unwrap();
    assert_eq!(placed.layer, LayerId::B_CU);
}

#[test]
fn layer_lookup_round_trips_names() {
    let board = Board::<MemoryBoard>::new();
    for name in ["F.Cu", "In15.Cu", "B.Cu", "F.SilkS", "Edge.Cuts", "F.Fab"] {
        let id = board.get_layer(name).unwrap();
        assert_eq!(board.layer_name(id), Some(name));
    }
    assert!(board.get_layer("Top Layer").is_err());
}

#[test]
fn from_editor_takes_the_session_board_once() {
    let mut engine = MemoryEngine::new();
    assert!(matches!(
        Board::from_editor(&mut engine),
        Err(BoardError::Engine(EngineError::NoActiveSession))
    ));

    let mut session = Board::new();
    session.add_module("R1", (0.0, 0.0)).unwrap();
    engine.open_in_editor(session.into_native());
    assert!(engine.has_session());

    let board = Board::from_editor(&mut engine).unwrap();
    assert!(board.modules().contains("R1"));
    assert!(!engine.has_session());
}
