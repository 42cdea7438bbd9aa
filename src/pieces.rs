//! Puzzle piece definitions and coordinate types.
//!
//! Each piece is a set of unit block positions on the grid, normalized to
//! start at the origin. The standard ten-piece catalog covers 47 cells,
//! which is exactly the 50 board cells minus the three date holes.

use serde::{Deserialize, Serialize};

use crate::geometry;

/// A 2D grid coordinate (column, row).
pub type Point = (i32, i32);

/// Number of pieces in the standard catalog.
pub const CATALOG_SIZE: usize = 10;

/// The standard catalog shapes: three tetrominoes and seven pentominoes.
///
/// Blocks are listed row by row, top to bottom; the sketches next to each
/// shape read the same way.
pub const SHAPES: [&[Point]; CATALOG_SIZE] = [
    // .##
    // ##.
    &[(1, 0), (2, 0), (0, 1), (1, 1)],
    // ####
    &[(0, 0), (1, 0), (2, 0), (3, 0)],
    // ###
    // ..#
    &[(0, 0), (1, 0), (2, 0), (2, 1)],
    // #.
    // ##
    // ##
    &[(0, 0), (0, 1), (1, 1), (0, 2), (1, 2)],
    // ##..
    // .###
    &[(0, 0), (1, 0), (1, 1), (2, 1), (3, 1)],
    // ##.
    // .#.
    // .##
    &[(0, 0), (1, 0), (1, 1), (1, 2), (2, 2)],
    // #.#
    // ###
    &[(0, 0), (2, 0), (0, 1), (1, 1), (2, 1)],
    // ###
    // ..#
    // ..#
    &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
    // ###
    // .#.
    // .#.
    &[(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)],
    // ####
    // ...#
    &[(0, 0), (1, 0), (2, 0), (3, 0), (3, 1)],
];

/// A puzzle piece: a stable id plus its canonical block layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    id: u8,
    blocks: Vec<Point>,
}

impl Piece {
    /// Creates a piece, normalizing the blocks to the origin.
    pub fn new(id: u8, blocks: Vec<Point>) -> Self {
        Self {
            id,
            blocks: geometry::layout_for(&blocks, 0),
        }
    }

    /// The piece's stable identifier (its catalog index for standard pieces).
    pub fn id(&self) -> u8 {
        self.id
    }

    /// The canonical, origin-normalized blocks.
    pub fn blocks(&self) -> &[Point] {
        &self.blocks
    }

    /// Number of blocks, i.e. cells this piece covers.
    pub fn size(&self) -> usize {
        self.blocks.len()
    }
}

/// Builds the standard ten-piece catalog.
///
/// Piece ids are the catalog indices 0-9 and appear verbatim in saved
/// solutions, so the order of [`SHAPES`] must not change.
pub fn catalog() -> Vec<Piece> {
    SHAPES
        .iter()
        .enumerate()
        .map(|(id, shape)| Piece::new(id as u8, shape.to_vec()))
        .collect()
}

/// One placed piece of an assignment.
///
/// `gx`/`gy` anchor the rotated layout's bounding-box corner on the board
/// and `rotation` counts quarter turns. The serialized field names are the
/// on-disk solution format and must stay stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub id: u8,
    pub gx: i32,
    pub gy: i32,
    pub rotation: u8,
}

impl PlacedPiece {
    /// Board cells covered by this placement of the given shape.
    pub fn cells(&self, shape: &[Point]) -> Vec<Point> {
        geometry::layout_for(shape, self.rotation)
            .into_iter()
            .map(|(bx, by)| (self.gx + bx, self.gy + by))
            .collect()
    }
}
