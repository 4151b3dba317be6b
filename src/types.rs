//! Data model: the entities that flow through a single `pack_wall` call.
//!
//! All entities here are created during one invocation, are immutable once
//! emitted, and are owned exclusively by that call's [`PackResult`].

use serde::{Deserialize, Serialize};

use crate::warnings::Warning;

/// An integer-millimetre vertex in the wall frame (origin bottom-left, x
/// right, y up).
pub type Point = (i64, i64);

/// A simple closed polygon as supplied at the module boundary: a single
/// ring of integer-millimetre vertices. Holes are not expressed here —
/// they only ever arise internally, as the difference of apertures from
/// the exterior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingPolygon {
    pub vertices: Vec<Point>,
}

impl RingPolygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Shoelace-formula signed area (mm^2), positive for CCW rings.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let (x0, y0) = self.vertices[i];
            let (x1, y1) = self.vertices[(i + 1) % n];
            sum += (x0 as f64) * (y1 as f64) - (x1 as f64) * (y0 as f64);
        }
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }
}

/// One standard block placed in the wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    /// Standard catalogue width this block was placed from (== `width`).
    pub source_block_width: i64,
    pub is_standard: bool,
}

impl PlacedBlock {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            source_block_width: width,
            is_standard: true,
        }
    }

    pub fn left(&self) -> i64 {
        self.x
    }

    pub fn right(&self) -> i64 {
        self.x + self.width
    }
}

/// A non-standard piece cut from a standard block to cover residue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPiece {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    /// Exact polygon after clipping, in the wall frame.
    pub geometry: RingPolygon,
    /// Smallest standard width >= `width`: the stock this would be cut from.
    pub source_block_width: i64,
    /// `source_block_width - width`: the cutting offcut.
    pub waste: i64,
}

impl CustomPiece {
    pub fn right(&self) -> i64 {
        self.x + self.width
    }
}

/// A horizontal band `[y, y + height)` of placed/custom pieces, used
/// internally by the packers and the reinforcement validator.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub y: i64,
    pub height: i64,
    pub placed: Vec<PlacedBlock>,
    pub customs: Vec<CustomPiece>,
}

impl Row {
    pub fn new(y: i64, height: i64) -> Self {
        Self {
            y,
            height,
            placed: Vec::new(),
            customs: Vec::new(),
        }
    }
}

/// The full output of one `pack_wall` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackResult {
    pub placed: Vec<PlacedBlock>,
    pub customs: Vec<CustomPiece>,
    pub warnings: Vec<Warning>,
}
