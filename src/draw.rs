//! What an external renderer needs to draw a frame: geometry and colors only

use serde::{Deserialize, Serialize};

/// An `[r, g, b]` color
pub type Rgb = [u8; 3];

/// Color used for entities without a team or possession color
pub const DEFAULT_COLOR: Rgb = [0, 255, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawableKind {
    Player,
    Ball,
}

/// A rectangle to draw, in frame-local pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub kind: DrawableKind,
    pub id: Option<u64>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Rgb,
    pub label: Option<String>,
}
