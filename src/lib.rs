//! Single-draw-call tile grid renderer for Macroquad.
//!
//! A [`TileGrid`] holds the game's cells; a [`TileMapBatchRenderer`] mirrors
//! it in one flat vertex buffer and draws the whole grid as one triangle list,
//! either sampling a texture atlas described by a [`TileSet`] or with solid
//! colors from a [`TileRegistry`].

mod config;
mod drawable;
mod error;
mod grid;
mod loader {
    pub mod json_loader;
}
mod registry;
mod render;
pub mod spatial;
mod tileset;

pub use config::{RendererConfig, SyncMode};
pub use drawable::{TileDrawable, TileSprite};
pub use error::TileError;
pub use grid::{RenderStrategy, SharedGrid, Tile, TileGrid};
pub use loader::json_loader::{
    decode_config_file, decode_registry_file, decode_registry_str, decode_tileset_file,
    decode_tileset_str, load_atlas_texture,
};
pub use registry::{parse_hex_color, ColorLookup, TileInfo, TileRegistry};
pub use render::{
    build_quad, corners, MeshTarget, Quad, RenderTarget, Shading, TileMapBatchRenderer, Vertex,
    VertexAttr,
};
pub use tileset::TileSet;
