use std::fmt::Debug;

use macroquad::prelude::*;

/// Content that can sit in a grid cell.
pub trait TileDrawable: Send + Sync + Debug {
    /// Registry name, used for flat-mode colors.
    fn name(&self) -> &str;
    /// Logical atlas index, used for textured mode.
    fn index(&self) -> u32;
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    /// Axis-aligned bounds in screen space.
    fn bounds(&self) -> Rect;
    /// Independent deep copy.
    fn box_clone(&self) -> Box<dyn TileDrawable>;
}

impl Clone for Box<dyn TileDrawable> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// A single atlas sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSprite {
    pub name: String,
    pub index: u32,
    pub position: Vec2,
    pub size: Vec2,
}

impl TileSprite {
    pub fn new(name: impl Into<String>, index: u32, size: Vec2) -> Self {
        TileSprite {
            name: name.into(),
            index,
            position: Vec2::ZERO,
            size,
        }
    }
}

impl TileDrawable for TileSprite {
    fn name(&self) -> &str {
        &self.name
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    fn box_clone(&self) -> Box<dyn TileDrawable> {
        Box::new(self.clone())
    }
}
