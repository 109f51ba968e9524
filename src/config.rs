use serde::Deserialize;

/// How vertex writes are published to the draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// The buffer lock is taken once per cell. A draw may see a pass that is
    /// only partly applied, but never a partly written vertex.
    #[default]
    PerCell,
    /// A refresh pass is built into a back buffer and swapped in under one
    /// short lock, so every draw sees a complete pass.
    DoubleBuffered,
}

/// Renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Sample the atlas (true) or use registry colors (false)
    pub textured: bool,
    pub sync: SyncMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            textured: true,
            sync: SyncMode::PerCell,
        }
    }
}
