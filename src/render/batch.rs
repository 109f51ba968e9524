use std::sync::Arc;

use log::{debug, trace, warn};
use macroquad::prelude::Texture2D;
use parking_lot::{Mutex, RwLock};

use super::quad::{build_quad, Shading, Vertex};
use super::target::RenderTarget;
use crate::config::{RendererConfig, SyncMode};
use crate::drawable::TileDrawable;
use crate::error::TileError;
use crate::grid::{RenderStrategy, SharedGrid, TileGrid};
use crate::registry::ColorLookup;
use crate::spatial::{buffer_len, vertex_offset, VERTICES_PER_TILE};
use crate::tileset::TileSet;

/// Everything the draw call reads. Guarded by one lock.
struct BatchState {
    /// `None` until a grid is assigned.
    vertices: Option<Vec<Vertex>>,
    textured: bool,
}

/// Draws a whole [`TileGrid`] with a single triangle-list draw call.
///
/// The renderer keeps a flat vertex buffer with six vertices per cell, at
/// offset `6 * (row * cols + col)`. [`refresh_all`](Self::refresh_all)
/// rewrites the quads of populated cells; cells without a payload keep
/// whatever was last written to them. [`render`](Self::render) submits the
/// buffer, binding the atlas unless flat mode is on.
///
/// All methods take `&self`, so one renderer can be shared between a logic
/// thread that refreshes and a render thread that draws. With
/// [`SyncMode::PerCell`] the buffer lock is held per cell, so a draw can mix
/// two passes; [`SyncMode::DoubleBuffered`] publishes whole passes.
pub struct TileMapBatchRenderer<T = Texture2D> {
    grid: RwLock<Option<SharedGrid>>,
    state: Mutex<BatchState>,
    back: Mutex<Vec<Vertex>>,
    tileset: Arc<TileSet>,
    colors: Arc<dyn ColorLookup>,
    atlas: T,
    sync: SyncMode,
}

impl<T> TileMapBatchRenderer<T> {
    /// Builds a renderer with no grid. `atlas` is bound in textured mode.
    pub fn new(
        tileset: Arc<TileSet>,
        colors: Arc<dyn ColorLookup>,
        atlas: T,
        config: RendererConfig,
    ) -> Self {
        TileMapBatchRenderer {
            grid: RwLock::new(None),
            state: Mutex::new(BatchState {
                vertices: None,
                textured: config.textured,
            }),
            back: Mutex::new(Vec::new()),
            tileset,
            colors,
            atlas,
            sync: config.sync,
        }
    }

    pub fn tileset(&self) -> &TileSet {
        &self.tileset
    }

    pub fn atlas(&self) -> &T {
        &self.atlas
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync
    }

    /// The grid currently referenced, if any.
    pub fn grid(&self) -> Option<SharedGrid> {
        self.grid.read().clone()
    }

    /// Points the renderer at `grid` and reallocates the buffer to
    /// `6 * rows * cols` vertices. Vertex content is filled by the next
    /// refresh. The previous grid is only released, never modified.
    pub fn set_grid(&self, grid: SharedGrid) -> Result<(), TileError> {
        let mut slot = self.grid.write();
        let len = {
            let g = grid.read();
            if g.strategy() != RenderStrategy::Batched {
                return Err(TileError::StrategyConflict {
                    expected: RenderStrategy::Batched,
                    found: g.strategy(),
                });
            }
            buffer_len(g.rows(), g.cols())
        };

        {
            let mut state = self.state.lock();
            state.vertices = Some(vec![Vertex::default(); len]);
        }
        self.back.lock().clear();
        *slot = Some(grid);

        debug!("tile batch buffer allocated: {} vertices", len);
        Ok(())
    }

    /// Whether quads are written and drawn against the atlas.
    pub fn is_textured(&self) -> bool {
        self.state.lock().textured
    }

    /// Switches between atlas sampling and flat registry colors. The next
    /// [`render`](Self::render) binds or drops the atlas right away; vertex
    /// attributes only change for quads written by later refreshes.
    pub fn set_textured(&self, textured: bool) {
        let mut state = self.state.lock();
        if state.textured != textured {
            debug!("tile batch textured mode: {}", textured);
        }
        state.textured = textured;
    }

    /// Number of vertices in the buffer; zero before a grid is assigned.
    pub fn vertex_count(&self) -> usize {
        self.state.lock().vertices.as_ref().map_or(0, Vec::len)
    }

    /// Copy of the current buffer.
    pub fn snapshot(&self) -> Result<Vec<Vertex>, TileError> {
        self.state.lock().vertices.clone().ok_or(TileError::NoGrid)
    }

    fn shading(&self, textured: bool) -> Shading<'_> {
        if textured {
            Shading::Textured(&self.tileset)
        } else {
            Shading::Flat(&*self.colors)
        }
    }

    /// Recomputes the quad of every populated cell, row-major.
    ///
    /// Stops at the first cell whose name is missing from the color registry
    /// in flat mode; cells before it keep their new quads.
    pub fn refresh_all(&self) -> Result<(), TileError> {
        let slot = self.grid.read();
        let grid = match &*slot {
            Some(grid) => grid.read(),
            None => return Err(TileError::NoGrid),
        };

        trace!(
            "refreshing {}x{} tile batch ({:?})",
            grid.rows(),
            grid.cols(),
            self.sync
        );

        let result = match self.sync {
            SyncMode::PerCell => self.refresh_per_cell(&grid),
            SyncMode::DoubleBuffered => self.refresh_swapped(&grid),
        };
        if let Err(err) = &result {
            warn!("tile batch refresh aborted: {}", err);
        }
        result
    }

    fn refresh_per_cell(&self, grid: &TileGrid) -> Result<(), TileError> {
        for (cell, tile) in grid.tiles().enumerate() {
            if let Some(payload) = tile.payload() {
                self.refresh_one(payload, cell * VERTICES_PER_TILE)?;
            }
        }
        Ok(())
    }

    fn refresh_swapped(&self, grid: &TileGrid) -> Result<(), TileError> {
        let mut back = self.back.lock();
        let textured = {
            let state = self.state.lock();
            let front = state.vertices.as_ref().ok_or(TileError::NoGrid)?;
            back.clone_from(front);
            state.textured
        };

        let shading = self.shading(textured);
        for (cell, tile) in grid.tiles().enumerate() {
            if let Some(payload) = tile.payload() {
                write_quad(&mut back, cell * VERTICES_PER_TILE, payload, shading)?;
            }
        }

        let mut state = self.state.lock();
        if let Some(front) = state.vertices.as_mut() {
            std::mem::swap(front, &mut *back);
        }
        Ok(())
    }

    /// Writes the six vertices at `offset` from `payload`'s position and
    /// bounds, using the current mode.
    pub fn refresh_one(&self, payload: &dyn TileDrawable, offset: usize) -> Result<(), TileError> {
        let mut state = self.state.lock();
        let shading = self.shading(state.textured);
        let vertices = state.vertices.as_mut().ok_or(TileError::NoGrid)?;
        write_quad(vertices, offset, payload, shading)
    }

    /// Refreshes a single cell. Returns `false` if the cell is empty.
    pub fn refresh_cell(&self, row: usize, col: usize) -> Result<bool, TileError> {
        let slot = self.grid.read();
        let grid = match &*slot {
            Some(grid) => grid.read(),
            None => return Err(TileError::NoGrid),
        };
        let cols = grid.cols();

        match grid.tile(row, col).and_then(|t| t.payload()) {
            Some(payload) => {
                self.refresh_one(payload, vertex_offset(row, col, cols))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Submits the whole buffer as one triangle list.
    pub fn render(&self, target: &mut dyn RenderTarget<T>) -> Result<(), TileError> {
        let state = self.state.lock();
        let vertices = state.vertices.as_ref().ok_or(TileError::NoGrid)?;
        let texture = if state.textured {
            Some(&self.atlas)
        } else {
            None
        };
        target.draw_triangles(vertices, texture);
        Ok(())
    }
}

fn write_quad(
    vertices: &mut [Vertex],
    offset: usize,
    payload: &dyn TileDrawable,
    shading: Shading<'_>,
) -> Result<(), TileError> {
    let len = vertices.len();
    let slots = offset
        .checked_add(VERTICES_PER_TILE)
        .and_then(|end| vertices.get_mut(offset..end))
        .ok_or(TileError::OffsetOutOfRange { offset, len })?;
    slots.copy_from_slice(&build_quad(payload, shading)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::TileSprite;
    use crate::registry::{TileInfo, TileRegistry};
    use macroquad::prelude::*;

    fn renderer(textured: bool) -> TileMapBatchRenderer<()> {
        let mut reg = TileRegistry::new();
        reg.insert("dirt", TileInfo { index: 1, color: BROWN });
        TileMapBatchRenderer::new(
            Arc::new(TileSet::new(8, 4, 16).unwrap()),
            Arc::new(reg),
            (),
            RendererConfig {
                textured,
                ..Default::default()
            },
        )
    }

    #[test]
    fn refresh_without_grid_is_an_error() {
        let r = renderer(true);
        let sprite = TileSprite::new("dirt", 1, vec2(8.0, 8.0));
        assert!(matches!(r.refresh_all(), Err(TileError::NoGrid)));
        assert!(matches!(r.refresh_one(&sprite, 0), Err(TileError::NoGrid)));
        assert!(matches!(r.snapshot(), Err(TileError::NoGrid)));
        assert_eq!(r.vertex_count(), 0);
    }

    #[test]
    fn refresh_one_rejects_offsets_past_the_buffer() {
        let r = renderer(true);
        r.set_grid(TileGrid::new(1, 2, 8.0).into_shared()).unwrap();
        let sprite = TileSprite::new("dirt", 1, vec2(8.0, 8.0));

        assert!(r.refresh_one(&sprite, 6).is_ok());
        assert!(matches!(
            r.refresh_one(&sprite, 7),
            Err(TileError::OffsetOutOfRange { offset: 7, len: 12 })
        ));
        assert!(matches!(
            r.refresh_one(&sprite, usize::MAX - 2),
            Err(TileError::OffsetOutOfRange { len: 12, .. })
        ));
    }

    #[test]
    fn immediate_grids_are_refused() {
        let r = renderer(true);
        let grid = TileGrid::with_strategy(1, 1, 8.0, RenderStrategy::Immediate).into_shared();
        assert!(matches!(
            r.set_grid(grid),
            Err(TileError::StrategyConflict { .. })
        ));
        assert!(r.grid().is_none());
    }

    #[test]
    fn refresh_cell_reports_empty_cells() {
        let r = renderer(false);
        let grid = TileGrid::new(2, 2, 8.0).into_shared();
        grid.write()
            .set_payload(1, 1, Box::new(TileSprite::new("dirt", 1, vec2(8.0, 8.0))));
        r.set_grid(grid).unwrap();

        assert!(!r.refresh_cell(0, 0).unwrap());
        assert!(r.refresh_cell(1, 1).unwrap());
        let verts = r.snapshot().unwrap();
        assert_eq!(verts[18].position, vec2(8.0, 8.0));
        assert_eq!(verts[18].color(), Some(BROWN));
    }
}
