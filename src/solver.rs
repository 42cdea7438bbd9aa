//! Exact-cover placement search for the calendar board.
//!
//! Key techniques:
//! - Bitmask for covered cells (u64 over the coverable-cell index)
//! - Pre-computed placement bitmasks for instant overlap detection
//! - Most-constrained-cell branching (fewest live candidates first)
//! - Flood-fill component prune with a subset-sum feasibility bitset
//! - Forward check that every unplaced piece still fits somewhere
//!
//! The search is deterministic: the same board, target and catalog always
//! produce the same assignment in the same number of nodes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::{Board, BoardError, CellId, Holes};
use crate::date::TargetDate;
use crate::geometry;
use crate::pieces::{Piece, PlacedPiece, Point};

/// Bit set over coverable-cell indices.
pub type CellMask = u64;

/// Maximum number of pieces in a catalog (width of the remaining-piece
/// bitmask).
pub const MAX_PIECES: usize = 16;

/// Maximum number of coverable cells on a board (width of [`CellMask`]).
pub const MAX_CELLS: usize = 64;

/// A caller contract violation, detected before any search runs.
///
/// Distinct from [`Outcome::NoSolution`], which is a normal answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// The piece catalog is empty.
    EmptyCatalog,
    /// Two catalog pieces share an id.
    DuplicatePieceId(u8),
    /// A catalog piece has no blocks.
    EmptyPiece(u8),
    /// The catalog exceeds [`MAX_PIECES`].
    TooManyPieces(usize),
    /// The board exposes more than [`MAX_CELLS`] coverable cells.
    BoardTooLarge(usize),
    /// The board rejected the target's hole ids.
    Board(BoardError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::EmptyCatalog => write!(f, "piece catalog is empty"),
            SolveError::DuplicatePieceId(id) => write!(f, "duplicate piece id {id} in catalog"),
            SolveError::EmptyPiece(id) => write!(f, "piece {id} has no blocks"),
            SolveError::TooManyPieces(count) => {
                write!(f, "catalog has {count} pieces, the limit is {MAX_PIECES}")
            }
            SolveError::BoardTooLarge(count) => {
                write!(f, "board has {count} coverable cells, the limit is {MAX_CELLS}")
            }
            SolveError::Board(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<BoardError> for SolveError {
    fn from(err: BoardError) -> Self {
        SolveError::Board(err)
    }
}

/// Result of a finished (or abandoned) search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A full assignment: one entry per catalog piece, covering every
    /// coverable cell exactly once.
    Solved(Vec<PlacedPiece>),
    /// The search space is exhausted without a non-excluded assignment.
    NoSolution,
    /// The cancel flag was raised before the search finished.
    Cancelled,
}

impl Outcome {
    /// The assignment, if one was found.
    pub fn solution(&self) -> Option<&[PlacedPiece]> {
        match self {
            Outcome::Solved(placements) => Some(placements),
            _ => None,
        }
    }
}

/// Search counters, filled in by every solve call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search-tree nodes entered.
    pub nodes: u64,
    /// Branches abandoned by the component area prune.
    pub area_prunes: u64,
    /// Branches abandoned because some empty cell had no live candidate.
    pub dead_cells: u64,
    /// Candidates skipped because another piece would lose its last fit.
    pub forward_skips: u64,
    /// Complete covers rejected by the exclusion set.
    pub excluded_hits: u64,
}

/// Cooperative cancellation for long-running searches.
///
/// The engine checks the flag once per search node, so raising it stops
/// the solve promptly with [`Outcome::Cancelled`]. Share it with a worker
/// thread through an `Arc`.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Raises the flag; a running search stops at its next node.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Order-independent identity of a complete assignment.
///
/// Keys of already-seen solutions can be fed back through
/// [`SolveOptions::exclude`] to cycle through alternative assignments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SolutionKey(Vec<PlacedPiece>);

/// Canonical key for an assignment: its placements sorted by piece id.
pub fn solution_key(placements: &[PlacedPiece]) -> SolutionKey {
    let mut sorted = placements.to_vec();
    sorted.sort_unstable();
    SolutionKey(sorted)
}

/// Optional controls for [`solve_with`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveOptions<'a> {
    /// Assignments to skip. A complete cover whose key is in this set is
    /// treated as a failed leaf and the search continues past it in the
    /// usual branch order.
    pub exclude: Option<&'a FxHashSet<SolutionKey>>,
    /// Checked once per search node when present.
    pub cancel: Option<&'a CancelFlag>,
}

/// Index over the coverable cells of one (board, holes) instance.
///
/// Rebuilt per solve, since the holes move with the target date. Cells
/// are numbered in board order, so everything derived from the index is
/// deterministic.
struct CoverIndex {
    /// Cell index by grid position; holes and void positions are absent.
    index_by_grid: FxHashMap<Point, usize>,
    /// Grid-adjacent coverable neighbors of each cell, one entry per cell.
    neighbors: Vec<Vec<usize>>,
    /// Mask with one bit per coverable cell.
    full_mask: CellMask,
}

impl CoverIndex {
    fn build(board: &Board, holes: &Holes) -> Result<Self, SolveError> {
        let mut positions = Vec::new();
        let mut index_by_grid = FxHashMap::default();

        for cell in board.cells() {
            if holes.contains(cell.id) {
                continue;
            }
            index_by_grid.insert((cell.gx, cell.gy), positions.len());
            positions.push((cell.gx, cell.gy));
        }
        if positions.len() > MAX_CELLS {
            return Err(SolveError::BoardTooLarge(positions.len()));
        }

        let neighbors = positions
            .iter()
            .map(|&(gx, gy)| {
                [(gx + 1, gy), (gx - 1, gy), (gx, gy + 1), (gx, gy - 1)]
                    .into_iter()
                    .filter_map(|position| index_by_grid.get(&position).copied())
                    .collect()
            })
            .collect();

        let full_mask = if positions.len() == MAX_CELLS {
            CellMask::MAX
        } else {
            (1 << positions.len()) - 1
        };

        Ok(Self {
            index_by_grid,
            neighbors,
            full_mask,
        })
    }
}

/// One candidate placement: a rotated piece anchored on the board, with
/// the coverable cells it occupies as a pre-computed bitmask.
#[derive(Clone, Debug)]
struct Placement {
    mask: CellMask,
    gx: i32,
    gy: i32,
    rotation: u8,
}

/// All valid placements of one piece: every distinct rotation at every
/// anchor where each block lands on a coverable cell.
fn build_placements(piece: &Piece, index: &CoverIndex, board: &Board) -> Vec<Placement> {
    let mut placements = Vec::new();

    for layout in geometry::unique_rotations(piece.blocks()) {
        for gy in 0..board.height() {
            'anchor: for gx in 0..board.width() {
                let mut mask: CellMask = 0;
                for &(bx, by) in &layout.blocks {
                    let Some(&cell) = index.index_by_grid.get(&(gx + bx, gy + by)) else {
                        continue 'anchor;
                    };
                    mask |= 1 << cell;
                }
                placements.push(Placement {
                    mask,
                    gx,
                    gy,
                    rotation: layout.rotation,
                });
            }
        }
    }

    placements
}

fn validate_catalog(pieces: &[Piece]) -> Result<(), SolveError> {
    if pieces.is_empty() {
        return Err(SolveError::EmptyCatalog);
    }
    if pieces.len() > MAX_PIECES {
        return Err(SolveError::TooManyPieces(pieces.len()));
    }
    let mut seen = FxHashSet::default();
    for piece in pieces {
        if piece.size() == 0 {
            return Err(SolveError::EmptyPiece(piece.id()));
        }
        if !seen.insert(piece.id()) {
            return Err(SolveError::DuplicatePieceId(piece.id()));
        }
    }
    Ok(())
}

/// Iterates the set bit positions of a piece bitmask, lowest first.
fn piece_bits(mask: u16) -> impl Iterator<Item = usize> {
    let mut rest = mask;
    std::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        let index = rest.trailing_zeros() as usize;
        rest &= rest - 1;
        Some(index)
    })
}

/// Outcome of one search subtree.
enum Step {
    Found,
    Exhausted,
    Cancelled,
}

/// Search state shared across the recursion.
struct Searcher<'a> {
    /// Placement tables indexed by catalog position.
    placements: &'a [Vec<Placement>],
    /// Piece sizes indexed by catalog position.
    sizes: &'a [u32],
    /// Coverable-cell adjacency from the [`CoverIndex`].
    neighbors: &'a [Vec<usize>],
    /// Piece ids indexed by catalog position.
    piece_ids: &'a [u8],
    full_mask: CellMask,
    exclude: Option<&'a FxHashSet<SolutionKey>>,
    cancel: Option<&'a CancelFlag>,
    /// Placements chosen on the current path, in placement order.
    assignment: Vec<PlacedPiece>,
    stats: SearchStats,
}

impl Searcher<'_> {
    /// Depth-first search. `occupied` and `remaining` travel by value, so
    /// backtracking a piece is a plain return plus an assignment pop.
    fn dfs(&mut self, occupied: CellMask, remaining: u16) -> Step {
        if self.cancel.is_some_and(|flag| flag.is_cancelled()) {
            return Step::Cancelled;
        }
        self.stats.nodes += 1;

        if occupied == self.full_mask && remaining == 0 {
            if self.is_excluded() {
                self.stats.excluded_hits += 1;
                return Step::Exhausted;
            }
            return Step::Found;
        }
        if remaining == 0 {
            return Step::Exhausted;
        }
        if self.area_prune(occupied, remaining) {
            self.stats.area_prunes += 1;
            return Step::Exhausted;
        }
        let Some(pivot) = self.most_constrained_cell(occupied, remaining) else {
            return Step::Exhausted;
        };

        let placements = self.placements;
        for piece in piece_bits(remaining) {
            for placement in &placements[piece] {
                if placement.mask & occupied != 0 || (placement.mask >> pivot) & 1 == 0 {
                    continue;
                }
                let next_occupied = occupied | placement.mask;
                let next_remaining = remaining & !(1 << piece);
                if !self.all_pieces_still_fit(next_occupied, next_remaining) {
                    self.stats.forward_skips += 1;
                    continue;
                }

                self.assignment.push(PlacedPiece {
                    id: self.piece_ids[piece],
                    gx: placement.gx,
                    gy: placement.gy,
                    rotation: placement.rotation,
                });
                match self.dfs(next_occupied, next_remaining) {
                    Step::Exhausted => {
                        self.assignment.pop();
                    }
                    step => return step,
                }
            }
        }

        Step::Exhausted
    }

    fn is_excluded(&self) -> bool {
        self.exclude
            .is_some_and(|set| set.contains(&solution_key(&self.assignment)))
    }

    /// True if some connected empty region cannot be tiled exactly by any
    /// subset of the remaining pieces.
    fn area_prune(&self, occupied: CellMask, remaining: u16) -> bool {
        let empty = self.full_mask & !occupied;
        if empty == 0 {
            return false;
        }

        // reachable subset sums of the remaining piece sizes, as a bitset
        let mut sums: u128 = 1;
        let mut min_size = u32::MAX;
        for piece in piece_bits(remaining) {
            let size = self.sizes[piece];
            min_size = min_size.min(size);
            if size < 128 {
                sums |= sums << size;
            }
        }

        let mut seen: CellMask = 0;
        let mut rest = empty;
        while rest != 0 {
            let start = rest.trailing_zeros() as usize;

            // flood fill one component of empty cells
            let mut area = 0u32;
            let mut stack = vec![start];
            seen |= 1 << start;
            while let Some(cell) = stack.pop() {
                area += 1;
                for &neighbor in &self.neighbors[cell] {
                    if (empty >> neighbor) & 1 == 1 && (seen >> neighbor) & 1 == 0 {
                        seen |= 1 << neighbor;
                        stack.push(neighbor);
                    }
                }
            }

            if area < min_size || (sums >> area) & 1 == 0 {
                return true;
            }
            rest = empty & !seen;
        }

        false
    }

    /// The empty cell covered by the fewest live candidates.
    ///
    /// Scans cells in index order and keeps the first strict minimum, so
    /// branch order is stable. Returns `None` when some empty cell has no
    /// candidate at all (the branch is dead) or when no cell is empty.
    fn most_constrained_cell(&mut self, occupied: CellMask, remaining: u16) -> Option<usize> {
        let placements = self.placements;
        let mut best: Option<(usize, u32)> = None;

        let mut empty = self.full_mask & !occupied;
        while empty != 0 {
            let cell = empty.trailing_zeros() as usize;
            empty &= empty - 1;

            let mut count = 0u32;
            for piece in piece_bits(remaining) {
                for placement in &placements[piece] {
                    if placement.mask & occupied == 0 && (placement.mask >> cell) & 1 == 1 {
                        count += 1;
                    }
                }
            }
            if count == 0 {
                self.stats.dead_cells += 1;
                return None;
            }
            if best.map_or(true, |(_, best_count)| count < best_count) {
                best = Some((cell, count));
                if count == 1 {
                    break;
                }
            }
        }

        best.map(|(cell, _)| cell)
    }

    /// Forward check: every remaining piece keeps at least one placement
    /// disjoint from the occupied cells.
    fn all_pieces_still_fit(&self, occupied: CellMask, remaining: u16) -> bool {
        piece_bits(remaining).all(|piece| {
            self.placements[piece]
                .iter()
                .any(|placement| placement.mask & occupied == 0)
        })
    }
}

/// Solves the puzzle: covers every non-hole cell exactly once, using each
/// catalog piece exactly once.
///
/// Returns the first assignment in deterministic branch order,
/// [`Outcome::NoSolution`] if none exists, or a [`SolveError`] when the
/// configuration itself is unusable.
pub fn solve(board: &Board, target: &TargetDate, pieces: &[Piece]) -> Result<Outcome, SolveError> {
    solve_with(board, target, pieces, &SolveOptions::default()).map(|(outcome, _)| outcome)
}

/// [`solve`] with exclusion keys and cancellation, reporting search
/// statistics alongside the outcome.
pub fn solve_with(
    board: &Board,
    target: &TargetDate,
    pieces: &[Piece],
    options: &SolveOptions<'_>,
) -> Result<(Outcome, SearchStats), SolveError> {
    validate_catalog(pieces)?;
    let holes = board.holes_for(target)?;
    let index = CoverIndex::build(board, &holes)?;

    let placements: Vec<Vec<Placement>> = pieces
        .iter()
        .map(|piece| build_placements(piece, &index, board))
        .collect();
    let sizes: Vec<u32> = pieces.iter().map(|piece| piece.size() as u32).collect();
    let piece_ids: Vec<u8> = pieces.iter().map(Piece::id).collect();

    let mut searcher = Searcher {
        placements: &placements,
        sizes: &sizes,
        neighbors: &index.neighbors,
        piece_ids: &piece_ids,
        full_mask: index.full_mask,
        exclude: options.exclude,
        cancel: options.cancel,
        assignment: Vec::with_capacity(pieces.len()),
        stats: SearchStats::default(),
    };

    let all_pieces = ((1u32 << pieces.len()) - 1) as u16;
    let step = searcher.dfs(0, all_pieces);
    let stats = searcher.stats;
    let outcome = match step {
        Step::Found => Outcome::Solved(searcher.assignment),
        Step::Exhausted => Outcome::NoSolution,
        Step::Cancelled => Outcome::Cancelled,
    };
    Ok((outcome, stats))
}

/// A violation found by [`verify`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyError {
    /// A catalog piece is missing from the assignment.
    MissingPiece(u8),
    /// A piece appears more than once in the assignment.
    DuplicateEntry(u8),
    /// An entry names a piece that is not in the catalog.
    UnknownPiece(u8),
    /// A block lands on no cell of the board.
    OffBoard { id: u8, gx: i32, gy: i32 },
    /// A block covers one of the three holes.
    CoversHole { id: u8, cell: CellId },
    /// Two pieces cover the same cell.
    Overlap { cell: CellId },
    /// A coverable cell is left uncovered.
    Uncovered { cell: CellId },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::MissingPiece(id) => write!(f, "piece {id} was never placed"),
            VerifyError::DuplicateEntry(id) => write!(f, "piece {id} is placed twice"),
            VerifyError::UnknownPiece(id) => write!(f, "piece {id} is not in the catalog"),
            VerifyError::OffBoard { id, gx, gy } => {
                write!(f, "piece {id} has a block off the board at ({gx}, {gy})")
            }
            VerifyError::CoversHole { id, cell } => {
                write!(f, "piece {id} covers the open cell {cell}")
            }
            VerifyError::Overlap { cell } => write!(f, "two pieces overlap on cell {cell}"),
            VerifyError::Uncovered { cell } => write!(f, "cell {cell} is left uncovered"),
        }
    }
}

impl std::error::Error for VerifyError {}

/// Checks a finished assignment against the board: every catalog piece
/// placed exactly once, all blocks on coverable cells, no overlaps, no
/// covered hole, no uncovered cell.
pub fn verify(
    board: &Board,
    holes: &Holes,
    pieces: &[Piece],
    placements: &[PlacedPiece],
) -> Result<(), VerifyError> {
    let mut placed = FxHashSet::default();
    for entry in placements {
        if !placed.insert(entry.id) {
            return Err(VerifyError::DuplicateEntry(entry.id));
        }
    }
    for piece in pieces {
        if !placed.contains(&piece.id()) {
            return Err(VerifyError::MissingPiece(piece.id()));
        }
    }

    let mut covered: FxHashSet<CellId> = FxHashSet::default();
    for entry in placements {
        let Some(piece) = pieces.iter().find(|piece| piece.id() == entry.id) else {
            return Err(VerifyError::UnknownPiece(entry.id));
        };
        for (gx, gy) in entry.cells(piece.blocks()) {
            let Some(cell) = board.cell_at(gx, gy) else {
                return Err(VerifyError::OffBoard { id: entry.id, gx, gy });
            };
            if holes.contains(cell.id) {
                return Err(VerifyError::CoversHole {
                    id: entry.id,
                    cell: cell.id,
                });
            }
            if !covered.insert(cell.id) {
                return Err(VerifyError::Overlap { cell: cell.id });
            }
        }
    }

    for cell in board.cells() {
        if !holes.contains(cell.id) && !covered.contains(&cell.id) {
            return Err(VerifyError::Uncovered { cell: cell.id });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::pieces::catalog;

    fn february_3_tuesday() -> TargetDate {
        TargetDate {
            month_index: 1,
            day: 3,
            weekday_index: 2,
        }
    }

    /// A `width` x `height` rectangle of filler cells, with the three
    /// hole cells parked on an extra row below it.
    fn filler_board(width: i32, height: i32) -> (Board, TargetDate) {
        let mut cells = Vec::new();
        let mut tag = 0u16;
        for gy in 0..height {
            for gx in 0..width {
                cells.push(Cell {
                    id: CellId::Filler(tag),
                    gx,
                    gy,
                });
                tag += 1;
            }
        }
        cells.push(Cell { id: CellId::Month(0), gx: 0, gy: height });
        cells.push(Cell { id: CellId::Day(1), gx: 1, gy: height });
        cells.push(Cell { id: CellId::Weekday(0), gx: 2, gy: height });

        let board = Board::from_cells(cells).expect("test board is valid");
        let target = TargetDate {
            month_index: 0,
            day: 1,
            weekday_index: 0,
        };
        (board, target)
    }

    fn square() -> Vec<Point> {
        vec![(0, 0), (1, 0), (0, 1), (1, 1)]
    }

    fn two_squares() -> Vec<Piece> {
        vec![Piece::new(0, square()), Piece::new(1, square())]
    }

    #[test]
    fn test_cover_index_for_the_standard_board() {
        let board = Board::standard();
        let holes = board.holes_for(&february_3_tuesday()).unwrap();
        let index = CoverIndex::build(&board, &holes).unwrap();

        assert_eq!(index.neighbors.len(), 47);
        assert_eq!(index.full_mask, (1u64 << 47) - 1);

        // M0 keeps a single coverable neighbor, M6 below it (M1 is a hole)
        let m0 = index.index_by_grid[&(0, 0)];
        assert_eq!(index.neighbors[m0].len(), 1);

        // D10 sits right under the D3 hole; left, right and down survive
        let d10 = index.index_by_grid[&(2, 3)];
        assert_eq!(index.neighbors[d10].len(), 3);
    }

    #[test]
    fn test_placements_cover_piece_size_bits() {
        let board = Board::standard();
        let holes = board.holes_for(&february_3_tuesday()).unwrap();
        let index = CoverIndex::build(&board, &holes).unwrap();

        for piece in catalog() {
            let placements = build_placements(&piece, &index, &board);
            assert!(!placements.is_empty(), "piece {} cannot be placed", piece.id());

            for placement in &placements {
                assert_eq!(placement.mask.count_ones() as usize, piece.size());
            }

            let mut seen = FxHashSet::default();
            for placement in &placements {
                assert!(
                    seen.insert((placement.rotation, placement.gx, placement.gy)),
                    "duplicate placement for piece {}",
                    piece.id()
                );
            }
        }
    }

    #[test]
    fn test_two_squares_tile_a_2x4_strip() {
        let (board, target) = filler_board(4, 2);
        let pieces = two_squares();

        let outcome = solve(&board, &target, &pieces).expect("valid configuration");
        let Outcome::Solved(placements) = outcome else {
            panic!("expected a solution, got {outcome:?}");
        };

        let holes = board.holes_for(&target).unwrap();
        verify(&board, &holes, &pieces, &placements).expect("solution must verify");

        // deterministic branch order lands piece 0 on the left
        assert_eq!(
            placements,
            vec![
                PlacedPiece { id: 0, gx: 0, gy: 0, rotation: 0 },
                PlacedPiece { id: 1, gx: 2, gy: 0, rotation: 0 },
            ]
        );
    }

    #[test]
    fn test_exclusion_cycles_through_both_assignments() {
        let (board, target) = filler_board(4, 2);
        let pieces = two_squares();

        let Ok(Outcome::Solved(first)) = solve(&board, &target, &pieces) else {
            panic!("the strip must be solvable");
        };

        let mut excluded = FxHashSet::default();
        excluded.insert(solution_key(&first));
        let options = SolveOptions {
            exclude: Some(&excluded),
            ..Default::default()
        };
        let (outcome, stats) = solve_with(&board, &target, &pieces, &options).unwrap();
        let Outcome::Solved(second) = outcome else {
            panic!("a second assignment must exist");
        };
        assert_ne!(solution_key(&first), solution_key(&second));
        assert_eq!(stats.excluded_hits, 1);

        excluded.insert(solution_key(&second));
        let options = SolveOptions {
            exclude: Some(&excluded),
            ..Default::default()
        };
        let (outcome, stats) = solve_with(&board, &target, &pieces, &options).unwrap();
        assert_eq!(outcome, Outcome::NoSolution);
        assert_eq!(stats.excluded_hits, 2);
    }

    #[test]
    fn test_area_mismatch_is_pruned_at_the_root() {
        // nine catalog pieces cover 42 cells; the board needs 47
        let board = Board::standard();
        let mut pieces = catalog();
        pieces.pop();

        let (outcome, stats) = solve_with(
            &board,
            &february_3_tuesday(),
            &pieces,
            &SolveOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::NoSolution);
        assert_eq!(stats.nodes, 1, "must fail before branching");
        assert_eq!(stats.area_prunes, 1);
    }

    #[test]
    fn test_isolated_pocket_is_pruned() {
        // a 4-cell strip plus one unreachable stray cell
        let mut cells: Vec<Cell> = (0..4)
            .map(|gx| Cell {
                id: CellId::Filler(gx as u16),
                gx,
                gy: 0,
            })
            .collect();
        cells.push(Cell { id: CellId::Filler(9), gx: 5, gy: 0 });
        cells.push(Cell { id: CellId::Month(0), gx: 0, gy: 1 });
        cells.push(Cell { id: CellId::Day(1), gx: 1, gy: 1 });
        cells.push(Cell { id: CellId::Weekday(0), gx: 2, gy: 1 });
        let board = Board::from_cells(cells).unwrap();
        let target = TargetDate {
            month_index: 0,
            day: 1,
            weekday_index: 0,
        };
        let pieces = vec![Piece::new(0, vec![(0, 0), (1, 0), (2, 0), (3, 0)])];

        let (outcome, stats) =
            solve_with(&board, &target, &pieces, &SolveOptions::default()).unwrap();
        assert_eq!(outcome, Outcome::NoSolution);
        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.area_prunes, 1);
    }

    #[test]
    fn test_unfittable_piece_reports_a_dead_cell() {
        // a 1x4 strip cannot host a 2x2 square anywhere
        let (board, target) = filler_board(4, 1);
        let pieces = vec![Piece::new(0, square())];

        let (outcome, stats) =
            solve_with(&board, &target, &pieces, &SolveOptions::default()).unwrap();
        assert_eq!(outcome, Outcome::NoSolution);
        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.dead_cells, 1);
    }

    #[test]
    fn test_forward_check_skips_doomed_candidates() {
        // a 3x3 square of fillers; the plus pentomino and the square can
        // cover 9 cells on paper but can never coexist
        let (board, target) = filler_board(3, 3);
        let pieces = vec![
            Piece::new(0, square()),
            Piece::new(1, vec![(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)]),
        ];

        let (outcome, stats) =
            solve_with(&board, &target, &pieces, &SolveOptions::default()).unwrap();
        assert_eq!(outcome, Outcome::NoSolution);
        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.forward_skips, 1);
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let (board, target) = filler_board(4, 2);
        assert_eq!(
            solve(&board, &target, &[]),
            Err(SolveError::EmptyCatalog)
        );
    }

    #[test]
    fn test_duplicate_piece_ids_are_rejected() {
        let (board, target) = filler_board(4, 2);
        let pieces = vec![Piece::new(3, square()), Piece::new(3, square())];
        assert_eq!(
            solve(&board, &target, &pieces),
            Err(SolveError::DuplicatePieceId(3))
        );
    }

    #[test]
    fn test_empty_piece_is_rejected() {
        let (board, target) = filler_board(4, 2);
        let pieces = vec![Piece::new(0, square()), Piece::new(2, vec![])];
        assert_eq!(
            solve(&board, &target, &pieces),
            Err(SolveError::EmptyPiece(2))
        );
    }

    #[test]
    fn test_unknown_hole_is_rejected() {
        let board = Board::standard();
        let target = TargetDate {
            month_index: 12,
            day: 3,
            weekday_index: 2,
        };
        assert_eq!(
            solve(&board, &target, &catalog()),
            Err(SolveError::Board(BoardError::UnknownHole(CellId::Month(12))))
        );
    }

    #[test]
    fn test_cancelled_before_the_first_node() {
        let (board, target) = filler_board(4, 2);
        let pieces = two_squares();
        let flag = CancelFlag::new();
        flag.cancel();

        let options = SolveOptions {
            cancel: Some(&flag),
            ..Default::default()
        };
        let (outcome, stats) = solve_with(&board, &target, &pieces, &options).unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(stats.nodes, 0);
    }

    #[test]
    fn test_solution_key_ignores_placement_order() {
        let a = PlacedPiece { id: 0, gx: 0, gy: 0, rotation: 0 };
        let b = PlacedPiece { id: 1, gx: 2, gy: 0, rotation: 0 };
        assert_eq!(solution_key(&[a, b]), solution_key(&[b, a]));
        assert_ne!(
            solution_key(&[a, b]),
            solution_key(&[PlacedPiece { id: 0, gx: 2, gy: 0, rotation: 0 }, b])
        );
    }

    #[test]
    fn test_verify_rejects_each_violation() {
        let (board, target) = filler_board(4, 2);
        let pieces = two_squares();
        let holes = board.holes_for(&target).unwrap();
        let left = PlacedPiece { id: 0, gx: 0, gy: 0, rotation: 0 };
        let right = PlacedPiece { id: 1, gx: 2, gy: 0, rotation: 0 };

        assert_eq!(verify(&board, &holes, &pieces, &[left, right]), Ok(()));

        assert_eq!(
            verify(&board, &holes, &pieces, &[left]),
            Err(VerifyError::MissingPiece(1))
        );
        assert_eq!(
            verify(&board, &holes, &pieces, &[left, left]),
            Err(VerifyError::DuplicateEntry(0))
        );
        assert_eq!(
            verify(
                &board,
                &holes,
                &pieces,
                &[left, right, PlacedPiece { id: 9, gx: 0, gy: 0, rotation: 0 }]
            ),
            Err(VerifyError::UnknownPiece(9))
        );
        assert_eq!(
            verify(
                &board,
                &holes,
                &pieces,
                &[left, PlacedPiece { id: 1, gx: 3, gy: 0, rotation: 0 }]
            ),
            Err(VerifyError::OffBoard { id: 1, gx: 4, gy: 0 })
        );
        assert_eq!(
            verify(
                &board,
                &holes,
                &pieces,
                &[left, PlacedPiece { id: 1, gx: 2, gy: 1, rotation: 0 }]
            ),
            Err(VerifyError::CoversHole { id: 1, cell: CellId::Weekday(0) })
        );
        assert_eq!(
            verify(
                &board,
                &holes,
                &pieces,
                &[left, PlacedPiece { id: 1, gx: 1, gy: 0, rotation: 0 }]
            ),
            Err(VerifyError::Overlap { cell: CellId::Filler(1) })
        );
        assert_eq!(
            verify(&board, &holes, &pieces[..1], &[left]),
            Err(VerifyError::Uncovered { cell: CellId::Filler(2) })
        );
    }
}
