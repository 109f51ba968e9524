use macroquad::prelude::*;
use serde::Deserialize;

use crate::error::TileError;

/// Layout of a square-tile texture atlas.
///
/// Tiles are laid out row-major, `columns` per row, each `tile_size` pixels
/// wide and high, optionally separated by `spacing` and inset by `margin`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TileSet {
    /// Atlas image, relative to the description file
    #[serde(default)]
    pub image: String,
    /// Edge length of every tile in pixels
    #[serde(alias = "tilesize")]
    pub tile_size: u32,
    /// Tiles per atlas row
    pub columns: u32,
    /// Number of tiles in the atlas
    #[serde(default, alias = "tilecount")]
    pub tile_count: u32,
    /// Gap between neighbouring tiles
    #[serde(default)]
    pub spacing: u32,
    /// Border around the whole atlas
    #[serde(default)]
    pub margin: u32,
}

impl TileSet {
    /// Tightly packed atlas with no spacing or margin.
    pub fn new(tile_size: u32, columns: u32, tile_count: u32) -> Result<Self, TileError> {
        let ts = TileSet {
            image: String::new(),
            tile_size,
            columns,
            tile_count,
            spacing: 0,
            margin: 0,
        };
        ts.validate()?;
        Ok(ts)
    }

    pub(crate) fn validate(&self) -> Result<(), TileError> {
        if self.tile_size == 0 {
            return Err(TileError::InvalidTileSet("tile size must be positive".into()));
        }
        if self.columns == 0 {
            return Err(TileError::InvalidTileSet("atlas needs at least one column".into()));
        }
        Ok(())
    }

    /// Pixel origin of `index` inside the atlas. The index must lie within the
    /// atlas; this is not checked.
    #[inline]
    pub fn atlas_origin(&self, index: u32) -> (u32, u32) {
        let col = index % self.columns;
        let row = index / self.columns;
        let stride = self.tile_size + self.spacing;
        (self.margin + col * stride, self.margin + row * stride)
    }

    /// Source rectangle of `index` in atlas pixels.
    pub fn source_rect(&self, index: u32) -> Rect {
        let (x, y) = self.atlas_origin(index);
        let ts = self.tile_size as f32;
        Rect::new(x as f32, y as f32, ts, ts)
    }

    /// Pixel size of the atlas implied by the layout.
    pub fn atlas_size(&self) -> (u32, u32) {
        let rows = self.tile_count.div_ceil(self.columns).max(1);
        let stride = self.tile_size + self.spacing;
        (
            2 * self.margin + self.columns * stride - self.spacing,
            2 * self.margin + rows * stride - self.spacing,
        )
    }
}
