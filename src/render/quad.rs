use macroquad::prelude::*;

use crate::drawable::TileDrawable;
use crate::error::TileError;
use crate::registry::ColorLookup;
use crate::spatial::VERTICES_PER_TILE;
use crate::tileset::TileSet;

/// Per-vertex attribute; which one is written depends on the renderer mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexAttr {
    /// Solid color, flat mode
    Color(Color),
    /// Atlas pixel coordinate, textured mode
    TexCoord(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec2,
    pub attr: VertexAttr,
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            position: Vec2::ZERO,
            attr: VertexAttr::Color(BLANK),
        }
    }
}

impl Vertex {
    pub fn color(&self) -> Option<Color> {
        match self.attr {
            VertexAttr::Color(c) => Some(c),
            VertexAttr::TexCoord(_) => None,
        }
    }

    pub fn tex_coord(&self) -> Option<Vec2> {
        match self.attr {
            VertexAttr::TexCoord(uv) => Some(uv),
            VertexAttr::Color(_) => None,
        }
    }
}

pub type Quad = [Vertex; VERTICES_PER_TILE];

/// How a quad gets its attribute.
#[derive(Clone, Copy)]
pub enum Shading<'a> {
    Flat(&'a dyn ColorLookup),
    Textured(&'a TileSet),
}

/// Corner order shared by every cell:
/// top-left, top-right, bottom-left, bottom-left, bottom-right, top-right.
#[inline]
pub fn corners(origin: Vec2, size: Vec2) -> [Vec2; VERTICES_PER_TILE] {
    let (x, y) = (origin.x, origin.y);
    let (sx, sy) = (size.x, size.y);
    [
        vec2(x, y),
        vec2(x + sx, y),
        vec2(x, y + sy),
        vec2(x, y + sy),
        vec2(x + sx, y + sy),
        vec2(x + sx, y),
    ]
}

/// Six vertices for one payload.
pub fn build_quad(tile: &dyn TileDrawable, shading: Shading<'_>) -> Result<Quad, TileError> {
    let bounds = tile.bounds();
    let positions = corners(tile.position(), vec2(bounds.w, bounds.h));

    let attrs: [VertexAttr; VERTICES_PER_TILE] = match shading {
        Shading::Flat(colors) => [VertexAttr::Color(colors.lookup(tile.name())?); VERTICES_PER_TILE],
        Shading::Textured(tileset) => {
            let (tx, ty) = tileset.atlas_origin(tile.index());
            let ts = tileset.tile_size as f32;
            corners(vec2(tx as f32, ty as f32), vec2(ts, ts)).map(VertexAttr::TexCoord)
        }
    };

    let mut quad = [Vertex::default(); VERTICES_PER_TILE];
    for (v, (position, attr)) in quad.iter_mut().zip(positions.into_iter().zip(attrs)) {
        *v = Vertex { position, attr };
    }
    Ok(quad)
}
