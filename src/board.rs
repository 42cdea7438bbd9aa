//! Board topology for the calendar puzzle.
//!
//! The standard board is a 7x8 grid carrying 50 labeled cells: twelve
//! months, thirty-one days and seven weekdays. A target date turns three
//! of them into holes that must stay open; every other cell must be
//! covered. Custom boards (any set of uniquely labeled, uniquely placed
//! cells) are supported for smaller puzzles and tests.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::date::TargetDate;
use crate::pieces::{Piece, PlacedPiece};

/// Month labels as printed on the board, indexed by month index.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Weekday labels as printed on the board, starting with Sunday.
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tues", "Wed", "Thur", "Fri", "Sat"];

/// Category of a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Month,
    Day,
    Weekday,
    Filler,
}

/// Identity of a board cell.
///
/// Month indices are 0-based (0 = Jan), days are 1-based and weekday
/// indices are 0-based starting Sunday. `Filler` cells carry an arbitrary
/// tag and only appear on custom boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellId {
    Month(u8),
    Day(u8),
    Weekday(u8),
    Filler(u16),
}

impl CellId {
    pub fn kind(&self) -> CellKind {
        match self {
            CellId::Month(_) => CellKind::Month,
            CellId::Day(_) => CellKind::Day,
            CellId::Weekday(_) => CellKind::Weekday,
            CellId::Filler(_) => CellKind::Filler,
        }
    }

    /// True if the id's payload is in range for its kind.
    fn is_valid(self) -> bool {
        match self {
            CellId::Month(month) => month < 12,
            CellId::Day(day) => (1..=31).contains(&day),
            CellId::Weekday(weekday) => weekday < 7,
            CellId::Filler(_) => true,
        }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellId::Month(month) => write!(f, "M{month}"),
            CellId::Day(day) => write!(f, "D{day}"),
            CellId::Weekday(weekday) => write!(f, "W{weekday}"),
            CellId::Filler(tag) => write!(f, "F{tag}"),
        }
    }
}

/// A single board cell at fixed grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub id: CellId,
    pub gx: i32,
    pub gy: i32,
}

impl Cell {
    pub fn kind(&self) -> CellKind {
        self.id.kind()
    }

    /// The label printed on this cell ("Feb", "17", "Tues"; empty for filler).
    pub fn label(&self) -> String {
        match self.id {
            CellId::Month(month) => MONTHS.get(month as usize).copied().unwrap_or("?").to_string(),
            CellId::Day(day) => day.to_string(),
            CellId::Weekday(weekday) => {
                WEEKDAYS.get(weekday as usize).copied().unwrap_or("?").to_string()
            }
            CellId::Filler(_) => String::new(),
        }
    }
}

/// The three cells a target date leaves open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Holes {
    pub month: CellId,
    pub day: CellId,
    pub weekday: CellId,
}

impl Holes {
    /// True if `id` is one of the three holes.
    pub fn contains(&self, id: CellId) -> bool {
        id == self.month || id == self.day || id == self.weekday
    }
}

/// A malformed board description or an unmatchable target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    /// Two cells share the same grid coordinates.
    DuplicateCoord { gx: i32, gy: i32 },
    /// Two cells share the same id.
    DuplicateId(CellId),
    /// A cell id's payload is out of range for its kind.
    InvalidId(CellId),
    /// A cell sits at negative grid coordinates.
    NegativeCoord { gx: i32, gy: i32 },
    /// A hole id names no cell on this board.
    UnknownHole(CellId),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::DuplicateCoord { gx, gy } => {
                write!(f, "two cells share position ({gx}, {gy})")
            }
            BoardError::DuplicateId(id) => write!(f, "two cells share id {id}"),
            BoardError::InvalidId(id) => write!(f, "cell id {id} is out of range"),
            BoardError::NegativeCoord { gx, gy } => {
                write!(f, "cell position ({gx}, {gy}) is negative")
            }
            BoardError::UnknownHole(id) => write!(f, "no cell {id} on this board"),
        }
    }
}

impl std::error::Error for BoardError {}

/// An immutable board: a set of labeled cells with position and id lookups.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: Vec<Cell>,
    by_grid: FxHashMap<(i32, i32), usize>,
    by_id: FxHashMap<CellId, usize>,
    width: i32,
    height: i32,
}

impl Board {
    /// Builds a board from an explicit cell list, preserving cell order.
    ///
    /// Ids and positions must be unique and coordinates non-negative.
    pub fn from_cells(cells: Vec<Cell>) -> Result<Self, BoardError> {
        let mut by_grid = FxHashMap::default();
        let mut by_id = FxHashMap::default();

        for (index, cell) in cells.iter().enumerate() {
            if !cell.id.is_valid() {
                return Err(BoardError::InvalidId(cell.id));
            }
            if cell.gx < 0 || cell.gy < 0 {
                return Err(BoardError::NegativeCoord {
                    gx: cell.gx,
                    gy: cell.gy,
                });
            }
            if by_grid.insert((cell.gx, cell.gy), index).is_some() {
                return Err(BoardError::DuplicateCoord {
                    gx: cell.gx,
                    gy: cell.gy,
                });
            }
            if by_id.insert(cell.id, index).is_some() {
                return Err(BoardError::DuplicateId(cell.id));
            }
        }

        let width = cells.iter().map(|cell| cell.gx + 1).max().unwrap_or(0);
        let height = cells.iter().map(|cell| cell.gy + 1).max().unwrap_or(0);

        Ok(Self {
            cells,
            by_grid,
            by_id,
            width,
            height,
        })
    }

    /// The standard 50-cell calendar board.
    ///
    /// Months fill two 6-wide rows at the top, days 1-28 four full 7-wide
    /// rows below them, then a final L of days 29-31 and the seven
    /// weekdays wrapping around the bottom-right corner.
    pub fn standard() -> Self {
        let mut cells = Vec::with_capacity(50);

        for gx in 0..6 {
            cells.push(Cell {
                id: CellId::Month(gx as u8),
                gx,
                gy: 0,
            });
        }
        for gx in 0..6 {
            cells.push(Cell {
                id: CellId::Month(6 + gx as u8),
                gx,
                gy: 1,
            });
        }

        let mut day = 1u8;
        for gy in 2..=5 {
            for gx in 0..7 {
                cells.push(Cell {
                    id: CellId::Day(day),
                    gx,
                    gy,
                });
                day += 1;
            }
        }
        for (offset, gx) in (0..3).enumerate() {
            cells.push(Cell {
                id: CellId::Day(29 + offset as u8),
                gx,
                gy: 6,
            });
        }

        for (offset, gx) in (3..7).enumerate() {
            cells.push(Cell {
                id: CellId::Weekday(offset as u8),
                gx,
                gy: 6,
            });
        }
        for (offset, gx) in (4..7).enumerate() {
            cells.push(Cell {
                id: CellId::Weekday(4 + offset as u8),
                gx,
                gy: 7,
            });
        }

        Self::from_cells(cells).expect("standard board layout is valid")
    }

    /// All cells in board order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Looks up a cell by id.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.by_id.get(&id).map(|&index| &self.cells[index])
    }

    /// Looks up a cell by grid position.
    pub fn cell_at(&self, gx: i32, gy: i32) -> Option<&Cell> {
        self.by_grid.get(&(gx, gy)).map(|&index| &self.cells[index])
    }

    /// One past the rightmost occupied column.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// One past the bottom occupied row.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Derives the three hole ids for a target date.
    ///
    /// Fails if any of the three names no cell on this board, so an
    /// impossible target is reported before any search starts.
    pub fn holes_for(&self, target: &TargetDate) -> Result<Holes, BoardError> {
        let holes = Holes {
            month: CellId::Month(target.month_index),
            day: CellId::Day(target.day),
            weekday: CellId::Weekday(target.weekday_index),
        };
        for id in [holes.month, holes.day, holes.weekday] {
            if self.cell(id).is_none() {
                return Err(BoardError::UnknownHole(id));
            }
        }
        Ok(holes)
    }
}

/// Renders an assignment as a character grid.
///
/// Each cell shows the covering piece's 1-based position in `pieces`
/// ('1'-'9', then 'A'-'Z', '?' beyond), '.' if uncovered and '*' for the
/// three holes; positions without a cell stay blank. Rows are
/// right-trimmed and joined with newlines.
pub fn render(
    board: &Board,
    holes: &Holes,
    pieces: &[Piece],
    placements: &[PlacedPiece],
) -> String {
    let width = board.width() as usize;
    let height = board.height() as usize;
    let mut grid = vec![vec![' '; width]; height];

    for cell in board.cells() {
        let glyph = if holes.contains(cell.id) { '*' } else { '.' };
        grid[cell.gy as usize][cell.gx as usize] = glyph;
    }

    for placed in placements {
        let Some(index) = pieces.iter().position(|piece| piece.id() == placed.id) else {
            continue;
        };
        let number = index + 1;
        let glyph = match number {
            1..=9 => (b'0' + number as u8) as char,
            10..=35 => (b'A' + (number as u8 - 10)) as char,
            _ => '?',
        };
        for (gx, gy) in placed.cells(pieces[index].blocks()) {
            if board.cell_at(gx, gy).is_some() {
                grid[gy as usize][gx as usize] = glyph;
            }
        }
    }

    grid.iter()
        .map(|row| row.iter().collect::<String>().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
