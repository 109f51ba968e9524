use std::sync::Arc;

use macroquad::prelude::*;
use macroquad_tile_batch::{
    decode_registry_str, MeshTarget, RendererConfig, TileGrid, TileMapBatchRenderer, TileSet,
};

const REGISTRY: &str = r##"{"tiles":[
    {"name":"grass","index":0,"color":"#3a9d23"},
    {"name":"water","index":1,"color":"#2050c0"},
    {"name":"sand","index":2,"color":"#d8c078"}
]}"##;

fn window_conf() -> Conf {
    Conf {
        window_title: "Batched Tile Grid".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

/// Paints one solid square per registered tile so the demo needs no assets.
fn build_atlas(tileset: &TileSet, colors: &[Color]) -> Texture2D {
    let (w, h) = tileset.atlas_size();
    let mut img = Image::gen_image_color(w as u16, h as u16, BLANK);
    for (index, color) in colors.iter().enumerate() {
        let src = tileset.source_rect(index as u32);
        for y in src.y as u32..(src.y + src.h) as u32 {
            for x in src.x as u32..(src.x + src.w) as u32 {
                let edge = x == src.x as u32 || y == src.y as u32;
                img.set_pixel(x, y, if edge { BLACK } else { *color });
            }
        }
    }
    let tex = Texture2D::from_image(&img);
    tex.set_filter(FilterMode::Nearest);
    tex
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("demo failed: {err:#}");
    }
}

async fn run() -> anyhow::Result<()> {
    let registry = decode_registry_str(REGISTRY)?;
    let tileset = TileSet::new(16, 4, 3)?;
    let atlas = build_atlas(&tileset, &[GREEN, BLUE, BEIGE]);

    let grid = TileGrid::new(45, 80, 16.0).into_shared();
    grid.write().fill_all_with(&registry.sprite("grass", vec2(16.0, 16.0))?);

    let names = ["grass", "water", "sand"];
    let renderer = TileMapBatchRenderer::new(
        Arc::new(tileset),
        Arc::new(registry.clone()),
        atlas,
        RendererConfig::default(),
    );
    renderer.set_grid(grid.clone())?;

    let mut target = MeshTarget::new();
    let mut tick = 0usize;

    loop {
        if is_key_pressed(KeyCode::T) {
            renderer.set_textured(!renderer.is_textured());
        }
        if is_mouse_button_down(MouseButton::Left) {
            let (mx, my) = mouse_position();
            let (row, col) = ((my / 16.0) as usize, (mx / 16.0) as usize);
            let name = names[tick / 30 % names.len()];
            grid.write()
                .set_payload(row, col, Box::new(registry.sprite(name, vec2(16.0, 16.0))?));
        }

        renderer.refresh_all()?;

        clear_background(BLACK);
        renderer.render(&mut target)?;

        draw_text(
            &format!("FPS: {}  [T] textured: {}", get_fps(), renderer.is_textured()),
            20.0,
            30.0,
            30.0,
            RED,
        );

        tick += 1;
        next_frame().await;
    }
}
