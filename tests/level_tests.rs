// tests/level_tests.rs

use approx::assert_relative_eq;
use macroquad::prelude::vec2;
use macroquad_tiled_level::{
    assemble_layer, LayerMapping, Level, MapError, Property, TextureHandle, Tileset,
    TilesheetSource,
};

fn sheet_128x64() -> Tileset {
    Tileset::build(&[TilesheetSource::new(TextureHandle(0), 128, 64, 32, 32)]).unwrap()
}

#[test]
fn orthogonal_bounds_cover_grid() {
    let level = Level::new("orthogonal", 10, 5, 32, 32);
    let b = level.bounds().unwrap();
    assert_eq!(b.min, vec2(0.0, 0.0));
    assert_eq!(b.max, vec2(320.0, 160.0));
}

#[test]
fn orthogonal_and_isometric_round_trip() {
    for orientation in ["orthogonal", "isometric"] {
        let level = Level::new(orientation, 16, 16, 64, 32).with_offset(vec2(12.0, -7.0));
        for &(x, y) in &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (5.0, 9.0), (15.0, 15.0), (2.5, 0.5)] {
            let screen = level.map_to_position(vec2(x, y)).unwrap();
            let back = level.position_to_map(screen).unwrap();
            assert_relative_eq!(back.x, x, epsilon = 1e-4);
            assert_relative_eq!(back.y, y, epsilon = 1e-4);
        }
    }
}

#[test]
fn staggered_rows_alternate() {
    let level = Level::new("staggered", 8, 8, 64, 32);
    let even = level.map_to_position(vec2(2.0, 4.0)).unwrap();
    let odd = level.map_to_position(vec2(2.0, 5.0)).unwrap();
    assert_eq!(even, vec2(128.0, 64.0));
    assert_eq!(odd, vec2(160.0, 80.0));

    // the inverse picks the row first, then unstaggers the column
    let origin = level.position_to_map(vec2(0.0, 0.0)).unwrap();
    assert_eq!(origin, vec2(0.0, 0.0));
    // row = -2.5 lies in odd row -3, so the column is unstaggered
    let picked = level.position_to_map(odd).unwrap();
    assert_relative_eq!(picked.y, (80.0 - 160.0) / 32.0);
    assert_relative_eq!(picked.x, (160.0 + 80.0 - 32.0) / 64.0);
}

#[test]
fn tileset_uv_layout() {
    let ts = sheet_128x64();
    assert_eq!(ts.len(), 8);
    let first = ts.get(0).unwrap();
    let fifth = ts.get(4).unwrap();
    assert_eq!(first.uv().min, vec2(0.0, 0.0));
    assert_eq!(fifth.uv().min, vec2(0.0, 0.5));
    assert_relative_eq!(fifth.uv().width(), 0.25);
    assert_relative_eq!(fifth.uv().height(), 0.5);
}

#[test]
fn zero_id_is_blank() {
    let level = Level::new("orthogonal", 3, 1, 32, 32);
    let layer = assemble_layer(&level, &LayerMapping::new("l", 3, 1, vec![0, 0, 0]), &sheet_128x64()).unwrap();
    assert_eq!(layer.tiles.len(), 3);
    for t in &layer.tiles {
        assert!(t.point.is_none());
        assert!(t.tile.is_none());
    }
}

#[test]
fn out_of_range_id_produces_no_layer() {
    let mut level = Level::new("orthogonal", 2, 1, 32, 32);
    let err = level
        .assemble_tile_layers(&[LayerMapping::new("l", 2, 1, vec![1, 100])], &sheet_128x64())
        .unwrap_err();
    assert!(matches!(err, MapError::TileIndexOutOfRange { tile_id: 99, .. }));
    assert!(level.tile_layers.is_empty());
}

#[test]
fn tall_tile_bottom_aligns() {
    let level = Level::new("orthogonal", 1, 1, 32, 32);
    let tall = Tileset::build(&[TilesheetSource::new(TextureHandle(0), 32, 48, 32, 48)]).unwrap();
    let layer = assemble_layer(&level, &LayerMapping::new("props", 1, 1, vec![1]), &tall).unwrap();
    assert_eq!(layer.tiles[0].point, Some(vec2(0.0, -16.0)));
}

#[test]
fn walkable_only_for_exact_true() {
    let level = Level::new("orthogonal", 1, 1, 32, 32);
    let layer = assemble_layer(&level, &LayerMapping::new("l", 1, 1, vec![1]), &sheet_128x64()).unwrap();
    let mut tile = layer.tiles[0].clone();
    assert!(!tile.is_walkable());

    for (value, expected) in [("true", true), ("True", false), ("1", false)] {
        tile.properties.insert("walkable", Property::new("bool", value));
        assert_eq!(tile.is_walkable(), expected, "value {value:?}");
    }
}

#[test]
fn hexagonal_fails_until_corrected() {
    let mut level = Level::new("hexagonal", 4, 4, 32, 32);
    let err = level.map_to_position(vec2(0.0, 0.0)).unwrap_err();
    assert!(matches!(err, MapError::UnsupportedOrientation(_)));
    assert!(!level.is_projection_resolved());

    level.set_orientation("staggered");
    assert!(level.map_to_position(vec2(0.0, 1.0)).is_ok());
    assert!(level.is_projection_resolved());
}
