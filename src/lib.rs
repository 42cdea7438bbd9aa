//! Calendar Puzzle Solver Library
//!
//! Solves the daily calendar tiling puzzle: ten flat pieces cover a 7x8
//! board of month, day and weekday cells so that exactly three cells stay
//! open, spelling out a target date. The engine is an exact-cover
//! depth-first search over pre-computed placement bitmasks, with
//! most-constrained-cell branching and a connectivity/area prune.

pub mod board;
pub mod date;
pub mod geometry;
pub mod persistence;
pub mod pieces;
pub mod solver;

pub use board::{render, Board, BoardError, Cell, CellId, CellKind, Holes};
pub use date::{Date, DateError, TargetDate};
pub use pieces::{catalog, Piece, PlacedPiece};
pub use solver::{
    solution_key, solve, solve_with, verify, CancelFlag, Outcome, SearchStats, SolutionKey,
    SolveError, SolveOptions, VerifyError,
};
