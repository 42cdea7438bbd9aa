//! 2D rotation and normalization utilities.
//!
//! A piece lying flat on the board has 4 possible orientations (quarter
//! turns; the puzzle allows no reflections). All rotation math lives here
//! and nowhere else: the placement generator, the assignment verifier and
//! the text renderer go through [`layout_for`], so a solved assignment
//! always paints exactly the cells the solver covered.

use crate::pieces::Point;

/// Rotates a point by `times` quarter turns about the origin.
///
/// One quarter turn maps (x, y) to (-y, x).
pub fn rotate_point(point: Point, times: u8) -> Point {
    let (mut x, mut y) = point;
    for _ in 0..times {
        let next_x = -y;
        let next_y = x;
        x = next_x;
        y = next_y;
    }
    (x, y)
}

/// A piece shape at one of its distinct rotations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Quarter turns applied to the canonical shape (0-3).
    pub rotation: u8,
    /// Rotated blocks, normalized to the origin and sorted.
    pub blocks: Vec<Point>,
}

/// Rotates a shape and normalizes the result.
pub fn layout_for(shape: &[Point], rotation: u8) -> Vec<Point> {
    let rotated = shape.iter().map(|&point| rotate_point(point, rotation)).collect();
    normalize(rotated)
}

/// Translates blocks so the minimum x and y are both zero, then sorts
/// them by (x, y).
///
/// Two layouts that cover the same cells thus compare equal regardless of
/// how they were produced.
fn normalize(mut blocks: Vec<Point>) -> Vec<Point> {
    let Some(min_x) = blocks.iter().map(|&(x, _)| x).min() else {
        return blocks;
    };
    let Some(min_y) = blocks.iter().map(|&(_, y)| y).min() else {
        return blocks;
    };

    for (x, y) in &mut blocks {
        *x -= min_x;
        *y -= min_y;
    }

    blocks.sort_unstable();
    blocks
}

/// Generates the distinct rotation layouts of a shape.
///
/// All four quarter turns are normalized and deduplicated; each surviving
/// layout keeps the smallest rotation count that produces it, so
/// rotationally symmetric shapes contribute fewer than 4 layouts.
pub fn unique_rotations(shape: &[Point]) -> Vec<Layout> {
    let mut layouts: Vec<Layout> = Vec::with_capacity(4);

    for rotation in 0..4u8 {
        let blocks = layout_for(shape, rotation);
        if layouts.iter().any(|layout| layout.blocks == blocks) {
            continue;
        }
        layouts.push(Layout { rotation, blocks });
    }

    layouts
}
