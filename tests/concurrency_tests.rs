// tests/concurrency_tests.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use macroquad::prelude::*;
use macroquad_tile_batch::{
    corners, RenderTarget, RendererConfig, SharedGrid, SyncMode, TileGrid, TileMapBatchRenderer,
    TileSet, TileSprite, Vertex,
};

const ROWS: usize = 4;
const COLS: usize = 4;
const TILE: f32 = 8.0;
const PASSES: usize = 2_000;
const DRAWS: usize = 10_000;

/// Checks every vertex it is handed and records what colors a frame used.
struct Checker {
    frames: usize,
    mixed_frames: usize,
}

impl RenderTarget<()> for Checker {
    fn draw_triangles(&mut self, vertices: &[Vertex], texture: Option<&()>) {
        assert!(texture.is_none());
        assert_eq!(vertices.len(), 6 * ROWS * COLS);

        let mut seen = Vec::new();
        for (cell, quad) in vertices.chunks(6).enumerate() {
            let color = quad[0].color().expect("flat mode");
            if color == BLANK {
                assert!(quad.iter().all(|v| *v == Vertex::default()));
            } else {
                assert!(color == RED || color == BLUE);
                let origin = vec2((cell % COLS) as f32 * TILE, (cell / COLS) as f32 * TILE);
                let expected = corners(origin, vec2(TILE, TILE));
                for (v, p) in quad.iter().zip(expected) {
                    assert_eq!(v.position, p);
                    assert_eq!(v.color(), Some(color));
                }
            }
            if !seen.contains(&color) {
                seen.push(color);
            }
        }
        self.frames += 1;
        if seen.len() > 1 {
            self.mixed_frames += 1;
        }
    }
}

fn setup(sync: SyncMode) -> (Arc<TileMapBatchRenderer<()>>, SharedGrid) {
    let colors: HashMap<String, Color> = [("red".to_owned(), RED), ("blue".to_owned(), BLUE)]
        .into_iter()
        .collect();
    let renderer = TileMapBatchRenderer::new(
        Arc::new(TileSet::new(8, 4, 16).unwrap()),
        Arc::new(colors),
        (),
        RendererConfig {
            textured: false,
            sync,
        },
    );
    let grid = TileGrid::new(ROWS, COLS, TILE).into_shared();
    renderer.set_grid(grid.clone()).unwrap();
    (Arc::new(renderer), grid)
}

fn run(sync: SyncMode) -> Checker {
    let (renderer, grid) = setup(sync);
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let renderer = renderer.clone();
        let done = done.clone();
        thread::spawn(move || {
            for pass in 0..PASSES {
                let name = if pass % 2 == 0 { "red" } else { "blue" };
                grid.write()
                    .fill_all_with(&TileSprite::new(name, 0, vec2(TILE, TILE)));
                renderer.refresh_all().unwrap();
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let mut checker = Checker {
        frames: 0,
        mixed_frames: 0,
    };
    for _ in 0..DRAWS {
        renderer.render(&mut checker).unwrap();
    }
    while !done.load(Ordering::SeqCst) {
        renderer.render(&mut checker).unwrap();
    }
    writer.join().expect("writer panicked");
    checker
}

#[test]
fn per_cell_refresh_and_render_interleave_safely() {
    let checker = run(SyncMode::PerCell);
    assert!(checker.frames >= DRAWS);
}

#[test]
fn double_buffered_frames_are_never_mixed() {
    let checker = run(SyncMode::DoubleBuffered);
    assert!(checker.frames >= DRAWS);
    assert_eq!(checker.mixed_frames, 0);
}
