use super::PlayerId;
use crate::error::BoardError;
use crate::pieces::PieceId;

pub const DEFAULT_COLS: usize = 7;
pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_CONNECT: usize = 4;

/// Forward scan directions as (dcol, drow): right, down, down-right, up-right.
/// Every maximal run is found from its first cell along one of these.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Grid coordinate. Row 0 is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub col: usize,
    pub row: usize,
}

impl CellPos {
    pub const fn new(col: usize, row: usize) -> Self {
        CellPos { col, row }
    }

    fn offset(self, dcol: isize, drow: isize) -> Option<CellPos> {
        Some(CellPos {
            col: self.col.checked_add_signed(dcol)?,
            row: self.row.checked_add_signed(drow)?,
        })
    }
}

/// What a committed cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub owner: PlayerId,
    pub piece: PieceId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    num_cols: usize,
    num_rows: usize,
    num_connect: usize,
    /// Row-major: `cells[row * num_cols + col]`.
    cells: Vec<Option<Occupant>>,
}

impl Board {
    /// Create a new empty board
    pub fn new(num_cols: usize, num_rows: usize, num_connect: usize) -> Self {
        Board {
            num_cols,
            num_rows,
            num_connect,
            cells: vec![None; num_cols * num_rows],
        }
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_connect(&self) -> usize {
        self.num_connect
    }

    pub fn contains(&self, cell: CellPos) -> bool {
        cell.col < self.num_cols && cell.row < self.num_rows
    }

    fn index(&self, cell: CellPos) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.row * self.num_cols + cell.col)
    }

    /// Occupant of a cell; `None` for empty or out-of-range cells.
    pub fn get(&self, cell: CellPos) -> Option<Occupant> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    pub fn owner(&self, cell: CellPos) -> Option<PlayerId> {
        self.get(cell).map(|occupant| occupant.owner)
    }

    pub fn is_occupied(&self, cell: CellPos) -> bool {
        self.get(cell).is_some()
    }

    /// Every cell with its occupant, row by row from the top.
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, Option<Occupant>)> + '_ {
        self.cells.iter().enumerate().map(|(i, occupant)| {
            (CellPos::new(i % self.num_cols, i / self.num_cols), *occupant)
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Check if a column still has at least one free cell
    pub fn column_has_room(&self, col: usize) -> bool {
        col < self.num_cols && (0..self.num_rows).any(|row| !self.is_occupied(CellPos::new(col, row)))
    }

    /// Columns that can still take a piece.
    pub fn open_columns(&self) -> Vec<usize> {
        (0..self.num_cols)
            .filter(|&col| self.column_has_room(col))
            .collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Bind an occupant to a cell. Never overwrites.
    pub fn commit(&mut self, cell: CellPos, occupant: Occupant) -> Result<(), BoardError> {
        let index = self.index(cell).ok_or(BoardError::OutOfBounds(cell))?;
        if self.cells[index].is_some() {
            return Err(BoardError::CellOccupied(cell));
        }
        self.cells[index] = Some(occupant);
        Ok(())
    }

    /// Every player owning a run of at least `num_connect` cells, sorted.
    pub fn evaluate_winners(&self) -> Vec<PlayerId> {
        let mut winners: Vec<PlayerId> = self
            .runs()
            .into_iter()
            .map(|(owner, _)| owner)
            .collect();
        winners.sort_unstable();
        winners.dedup();
        winners
    }

    /// Cells belonging to any winning run, sorted, for highlighting.
    pub fn winning_positions(&self) -> Vec<CellPos> {
        let mut positions: Vec<CellPos> = self
            .runs()
            .into_iter()
            .flat_map(|(_, cells)| cells)
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    /// Scan forward from every occupied cell and collect qualifying runs.
    fn runs(&self) -> Vec<(PlayerId, Vec<CellPos>)> {
        let mut runs = Vec::new();
        for (start, occupant) in self.cells() {
            let Some(occupant) = occupant else {
                continue;
            };
            for (dcol, drow) in DIRECTIONS {
                let run = self.run_from(start, occupant.owner, dcol, drow);
                if run.len() >= self.num_connect {
                    runs.push((occupant.owner, run));
                }
            }
        }
        runs
    }

    /// Consecutive cells owned by `owner`, starting at `start`.
    fn run_from(&self, start: CellPos, owner: PlayerId, dcol: isize, drow: isize) -> Vec<CellPos> {
        let mut run = vec![start];
        let mut cursor = start;
        while let Some(next) = cursor.offset(dcol, drow) {
            if self.owner(next) != Some(owner) {
                break;
            }
            run.push(next);
            cursor = next;
        }
        run
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_CONNECT)
    }
}
