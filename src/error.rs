use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for level construction, coordinate queries and map decoding
#[derive(Debug, Error)]
pub enum MapError {
    /// The orientation string is none of `orthogonal`, `isometric` or `staggered`
    #[error("Level: Unsupported orientation {0}")]
    UnsupportedOrientation(String),

    /// A layer mapping references a global tile id the tileset does not have
    #[error("layer '{layer}' references tile index {tile_id} but the tileset holds {tileset_len} tiles")]
    TileIndexOutOfRange {
        /// Layer name.
        layer: String,
        /// Zero-based tileset index (global id minus one).
        tile_id: usize,
        /// Tiles available.
        tileset_len: usize,
    },

    /// A tilesheet declares a zero tile width or height
    #[error("tilesheet {sheet} has a zero tile width or height")]
    InvalidTileSize {
        /// Index of the sheet in the build input.
        sheet: usize,
    },

    /// A layer's data length does not cover every cell of the level
    #[error("layer '{layer}' holds {actual} tile ids, expected {expected}")]
    InvalidLayerSize {
        /// Layer name.
        layer: String,
        /// Cells in the level grid.
        expected: usize,
        /// Ids the layer holds.
        actual: usize,
    },

    /// A polyline points string holds something other than `x,y` number pairs
    #[error("invalid points string: {points:?}")]
    InvalidPoints {
        /// The offending points string.
        points: String,
    },

    /// File I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// JSON parse error
    #[error("JSON parse error in {path}: {source}")]
    Json {
        /// Document that failed to parse.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The map document is structurally unusable
    #[error("invalid map: {0}")]
    InvalidMap(String),

    /// Unsupported file format (non-JSON)
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// A property declares a type tag this crate does not know
    #[error("property '{name}' has unsupported type '{kind}'")]
    UnsupportedPropertyType {
        /// Property name.
        name: String,
        /// Type tag found.
        kind: String,
    },
}
