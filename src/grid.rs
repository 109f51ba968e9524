use std::sync::Arc;

use macroquad::prelude::*;
use parking_lot::RwLock;

use crate::drawable::TileDrawable;
use crate::error::TileError;
use crate::render::{build_quad, RenderTarget, Shading};
use crate::spatial::cell_index;

/// Grid shared between game logic (writer) and the batch renderer (reader).
pub type SharedGrid = Arc<RwLock<TileGrid>>;

/// Which rendering path a grid is drawn with. The two are mutually
/// exclusive: a batched grid is only drawn by
/// [`TileMapBatchRenderer`](crate::TileMapBatchRenderer), an immediate grid
/// only through [`TileGrid::draw_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStrategy {
    /// One draw call for the whole grid.
    #[default]
    Batched,
    /// One draw call per tile. Debug fallback.
    Immediate,
}

/// One cell of the grid.
#[derive(Debug, Clone)]
pub struct Tile {
    position: Vec2,
    size: f32,
    payload: Option<Box<dyn TileDrawable>>,
}

impl Tile {
    pub fn new(position: Vec2, size: f32) -> Self {
        Tile {
            position,
            size,
            payload: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn payload(&self) -> Option<&dyn TileDrawable> {
        self.payload.as_deref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut (dyn TileDrawable + 'static)> {
        self.payload.as_deref_mut()
    }

    /// Places `payload` in this cell, moving it to the cell's position.
    pub fn set_payload(&mut self, mut payload: Box<dyn TileDrawable>) {
        payload.set_position(self.position);
        self.payload = Some(payload);
    }

    pub fn take_payload(&mut self) -> Option<Box<dyn TileDrawable>> {
        self.payload.take()
    }

    /// Draws this tile on its own. Empty tiles draw nothing.
    pub fn draw<T>(
        &self,
        target: &mut dyn RenderTarget<T>,
        shading: Shading<'_>,
        atlas: &T,
    ) -> Result<(), TileError> {
        let Some(payload) = self.payload() else {
            return Ok(());
        };
        let quad = build_quad(payload, shading)?;
        let texture = match shading {
            Shading::Flat(_) => None,
            Shading::Textured(_) => Some(atlas),
        };
        target.draw_triangles(&quad, texture);
        Ok(())
    }
}

/// Fixed-size, row-major grid of tiles.
#[derive(Debug, Clone)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    tile_size: f32,
    strategy: RenderStrategy,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// A grid meant for the batch renderer.
    pub fn new(rows: usize, cols: usize, tile_size: f32) -> Self {
        Self::with_strategy(rows, cols, tile_size, RenderStrategy::Batched)
    }

    /// Lays out `rows * cols` empty tiles from the origin, `tile_size` apart.
    pub fn with_strategy(
        rows: usize,
        cols: usize,
        tile_size: f32,
        strategy: RenderStrategy,
    ) -> Self {
        let mut tiles = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let position = vec2(col as f32 * tile_size, row as f32 * tile_size);
                tiles.push(Tile::new(position, tile_size));
            }
        }

        TileGrid {
            rows,
            cols,
            tile_size,
            strategy,
            tiles,
        }
    }

    /// Wraps the grid for sharing with a renderer.
    pub fn into_shared(self) -> SharedGrid {
        Arc::new(RwLock::new(self))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<&Tile> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.tiles.get(cell_index(row, col, self.cols))
    }

    pub fn tile_mut(&mut self, row: usize, col: usize) -> Option<&mut Tile> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.tiles.get_mut(cell_index(row, col, self.cols))
    }

    /// Row-major iteration over every tile.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Replaces the payload at `(row, col)`. Returns false when out of bounds.
    pub fn set_payload(&mut self, row: usize, col: usize, payload: Box<dyn TileDrawable>) -> bool {
        match self.tile_mut(row, col) {
            Some(tile) => {
                tile.set_payload(payload);
                true
            }
            None => false,
        }
    }

    pub fn clear_payload(&mut self, row: usize, col: usize) -> Option<Box<dyn TileDrawable>> {
        self.tile_mut(row, col).and_then(Tile::take_payload)
    }

    /// Gives every cell its own copy of `prototype`.
    pub fn fill_all_with(&mut self, prototype: &dyn TileDrawable) {
        // one clone per cell; cells never share a payload
        for tile in &mut self.tiles {
            tile.set_payload(prototype.box_clone());
        }
    }

    /// Immediate path: every tile issues its own draw call.
    pub fn draw_all<T>(
        &self,
        target: &mut dyn RenderTarget<T>,
        shading: Shading<'_>,
        atlas: &T,
    ) -> Result<(), TileError> {
        if self.strategy != RenderStrategy::Immediate {
            return Err(TileError::StrategyConflict {
                expected: RenderStrategy::Immediate,
                found: self.strategy,
            });
        }
        for tile in &self.tiles {
            tile.draw(target, shading, atlas)?;
        }
        Ok(())
    }
}
