use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::grid::RenderStrategy;

/// Error type for tile assets, grids and the batch renderer
#[derive(Debug)]
pub enum TileError {
    /// A tile name has no entry in the registry (flat mode color lookup)
    MissingTile {
        /// Name that was looked up
        name: String,
    },
    /// The renderer was used before any grid was assigned
    NoGrid,
    /// A vertex offset does not address six vertices inside the buffer
    OffsetOutOfRange {
        /// First vertex of the quad
        offset: usize,
        /// Current buffer length
        len: usize,
    },
    /// A grid was handed to the rendering path it was not built for
    StrategyConflict {
        /// Strategy the caller needs
        expected: RenderStrategy,
        /// Strategy the grid was constructed with
        found: RenderStrategy,
    },
    /// The tileset description is unusable
    InvalidTileSet(String),
    /// A registry color could not be parsed
    InvalidColor {
        /// Tile the color belongs to
        name: String,
        /// Raw value from the description
        value: String,
    },
    /// File I/O error
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// JSON decode error
    Json {
        /// File being decoded
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
    /// Unsupported file format (non-JSON)
    UnsupportedFormat(String),
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::MissingTile { name } => {
                write!(f, "Tile '{}' is not registered", name)
            }
            TileError::NoGrid => write!(f, "No tile grid has been assigned to the renderer"),
            TileError::OffsetOutOfRange { offset, len } => write!(
                f,
                "Vertex offset {} is out of range for a buffer of {} vertices",
                offset, len
            ),
            TileError::StrategyConflict { expected, found } => write!(
                f,
                "Grid is set up for {:?} rendering, {:?} was requested",
                found, expected
            ),
            TileError::InvalidTileSet(reason) => write!(f, "Invalid tileset: {}", reason),
            TileError::InvalidColor { name, value } => {
                write!(f, "Invalid color '{}' for tile '{}'", value, name)
            }
            TileError::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            TileError::Json { path, source } => {
                write!(f, "Failed to parse JSON in {}: {}", path.display(), source)
            }
            TileError::UnsupportedFormat(path) => write!(f, "Unsupported file format: {}", path),
        }
    }
}

impl error::Error for TileError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            TileError::Io { source, .. } => Some(source),
            TileError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
