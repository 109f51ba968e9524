mod batch;
mod quad;
mod target;

pub use batch::TileMapBatchRenderer;
pub use quad::{build_quad, corners, Quad, Shading, Vertex, VertexAttr};
pub use target::{MeshTarget, RenderTarget};
