use macroquad::models::{draw_mesh, Mesh, Vertex as MeshVertex};
use macroquad::prelude::*;

use super::quad::{Vertex, VertexAttr};

/// Anything that can draw a triangle list, optionally sampling `texture`.
pub trait RenderTarget<T> {
    fn draw_triangles(&mut self, vertices: &[Vertex], texture: Option<&T>);
}

/// Largest triangle list that still fits `u16` indices.
const MAX_MESH_VERTICES: usize = 6 * 10_922;

/// Draws into the current macroquad camera through [`draw_mesh`].
///
/// Texture coordinates arrive in atlas pixels and are normalized against the
/// bound texture here. Buffers longer than a `u16`-indexed mesh are split.
#[derive(Default)]
pub struct MeshTarget {
    vertices: Vec<MeshVertex>,
    indices: Vec<u16>,
}

impl MeshTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderTarget<Texture2D> for MeshTarget {
    fn draw_triangles(&mut self, vertices: &[Vertex], texture: Option<&Texture2D>) {
        let inv_size = texture
            .map(|t| vec2(1.0 / t.width(), 1.0 / t.height()))
            .unwrap_or(Vec2::ZERO);

        for chunk in vertices.chunks(MAX_MESH_VERTICES) {
            self.vertices.clear();
            self.indices.clear();

            for (i, v) in chunk.iter().enumerate() {
                let (uv, color) = match (v.attr, texture) {
                    (VertexAttr::TexCoord(px), Some(_)) => (px * inv_size, WHITE),
                    (VertexAttr::TexCoord(_), None) => (Vec2::ZERO, WHITE),
                    (VertexAttr::Color(c), _) => (Vec2::ZERO, c),
                };
                self.vertices.push(MeshVertex::new(
                    v.position.x,
                    v.position.y,
                    0.0,
                    uv.x,
                    uv.y,
                    color,
                ));
                self.indices.push(i as u16);
            }

            let mesh = Mesh {
                vertices: std::mem::take(&mut self.vertices),
                indices: std::mem::take(&mut self.indices),
                texture: texture.cloned(),
            };
            draw_mesh(&mesh);
            self.vertices = mesh.vertices;
            self.indices = mesh.indices;
        }
    }
}
