/// Two triangles per cell.
pub const VERTICES_PER_TILE: usize = 6;

/// Row-major cell index.
#[inline]
pub fn cell_index(row: usize, col: usize, cols: usize) -> usize {
    row * cols + col
}

/// First vertex owned by `(row, col)`.
#[inline]
pub fn vertex_offset(row: usize, col: usize, cols: usize) -> usize {
    VERTICES_PER_TILE * cell_index(row, col, cols)
}

/// Buffer length for a `rows` x `cols` grid.
#[inline]
pub fn buffer_len(rows: usize, cols: usize) -> usize {
    VERTICES_PER_TILE * rows * cols
}
