use std::collections::HashMap;

use macroquad::prelude::*;

use crate::drawable::TileSprite;
use crate::error::TileError;

/// Name to color lookup used by flat (untextured) rendering.
pub trait ColorLookup: Send + Sync {
    /// Solid color registered for `name`.
    fn lookup(&self, name: &str) -> Result<Color, TileError>;
}

impl ColorLookup for HashMap<String, Color> {
    fn lookup(&self, name: &str) -> Result<Color, TileError> {
        self.get(name).copied().ok_or_else(|| TileError::MissingTile {
            name: name.to_owned(),
        })
    }
}

/// Static data for one kind of tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileInfo {
    /// Logical index into the atlas
    pub index: u32,
    /// Color used when textures are off
    pub color: Color,
}

/// Every tile kind known to the game, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    tiles: HashMap<String, TileInfo>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, info: TileInfo) {
        self.tiles.insert(name.into(), info);
    }

    pub fn get(&self, name: &str) -> Option<&TileInfo> {
        self.tiles.get(name)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// A fresh payload for the tile kind `name`, sized `size`.
    pub fn sprite(&self, name: &str, size: Vec2) -> Result<TileSprite, TileError> {
        let info = self.get(name).ok_or_else(|| TileError::MissingTile {
            name: name.to_owned(),
        })?;
        Ok(TileSprite::new(name, info.index, size))
    }
}

impl ColorLookup for TileRegistry {
    fn lookup(&self, name: &str) -> Result<Color, TileError> {
        self.get(name)
            .map(|info| info.color)
            .ok_or_else(|| TileError::MissingTile {
                name: name.to_owned(),
            })
    }
}

/// Parses `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        6 => Some(Color::from_rgba(channel(0)?, channel(2)?, channel(4)?, 255)),
        8 => Some(Color::from_rgba(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => None,
    }
}
