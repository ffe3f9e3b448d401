//! N x N board, line detection and the computer's move selector

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// A player's symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

/// Board coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Square board, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Mark>>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    pub fn get(&self, cell: Cell) -> Option<Mark> {
        if !self.contains(cell) {
            return None;
        }
        self.cells[cell.row * self.size + cell.col]
    }

    /// Place a mark. Out-of-range or occupied cells are left untouched.
    pub fn place(&mut self, cell: Cell, mark: Mark) -> bool {
        if !self.contains(cell) || self.get(cell).is_some() {
            return false;
        }
        self.cells[cell.row * self.size + cell.col] = Some(mark);
        true
    }

    /// Empty cells, row by row
    pub fn empty_cells(&self) -> Vec<Cell> {
        self.all_cells().filter(|c| self.get(*c).is_none()).collect()
    }

    /// Occupied cells with their marks
    pub fn marks(&self) -> impl Iterator<Item = (Cell, Mark)> + '_ {
        self.all_cells()
            .filter_map(|c| self.get(c).map(|m| (c, m)))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// The mark owning a full row, column or diagonal, if any
    pub fn winner(&self) -> Option<Mark> {
        self.lines().into_iter().find_map(|line| {
            let first = self.get(line[0])?;
            line.iter()
                .all(|c| self.get(*c) == Some(first))
                .then_some(first)
        })
    }

    /// Would placing `mark` on the empty `cell` complete a line?
    pub fn completes_line(&self, cell: Cell, mark: Mark) -> bool {
        let mut trial = self.clone();
        trial.place(cell, mark) && trial.winner() == Some(mark)
    }

    fn all_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).flat_map(move |r| (0..self.size).map(move |c| Cell::new(r, c)))
    }

    fn lines(&self) -> Vec<Vec<Cell>> {
        let n = self.size;
        let mut lines = Vec::with_capacity(2 * n + 2);
        for i in 0..n {
            lines.push((0..n).map(|j| Cell::new(i, j)).collect());
            lines.push((0..n).map(|j| Cell::new(j, i)).collect());
        }
        lines.push((0..n).map(|i| Cell::new(i, i)).collect());
        lines.push((0..n).map(|i| Cell::new(i, n - 1 - i)).collect());
        lines
    }
}

/// One-ply move choice: win now, else block, else a random empty cell
///
/// Returns `None` only when the board has no empty cell.
pub fn select_move<R: Rng + ?Sized>(
    board: &Board,
    mover: Mark,
    opponent: Mark,
    rng: &mut R,
) -> Option<Cell> {
    let empty = board.empty_cells();

    if let Some(win) = empty.iter().find(|c| board.completes_line(**c, mover)) {
        return Some(*win);
    }
    if let Some(block) = empty.iter().find(|c| board.completes_line(**c, opponent)) {
        return Some(*block);
    }
    empty.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn board(rows: [&str; 3]) -> Board {
        let mut b = Board::new(3);
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let mark = match ch {
                    'X' => Mark::X,
                    'O' => Mark::O,
                    _ => continue,
                };
                b.place(Cell::new(r, c), mark);
            }
        }
        b
    }

    #[test]
    fn test_winner_rows_columns_diagonals() {
        assert_eq!(board(["XXX", "OO.", "..."]).winner(), Some(Mark::X));
        assert_eq!(board(["OX.", "OX.", "O.."]).winner(), Some(Mark::O));
        assert_eq!(board(["X.O", ".XO", "..X"]).winner(), Some(Mark::X));
        assert_eq!(board(["X.O", ".OX", "O.."]).winner(), Some(Mark::O));
        assert_eq!(board(["XOX", "XOO", "OXX"]).winner(), None);
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_range() {
        let mut b = Board::new(3);
        assert!(b.place(Cell::new(1, 1), Mark::X));
        assert!(!b.place(Cell::new(1, 1), Mark::O));
        assert_eq!(b.get(Cell::new(1, 1)), Some(Mark::X));
        assert!(!b.place(Cell::new(3, 0), Mark::O));
        assert_eq!(b.empty_cells().len(), 8);
    }

    #[test]
    fn test_is_full() {
        assert!(board(["XOX", "XOO", "OXX"]).is_full());
        assert!(!board(["XOX", "XOO", "OX."]).is_full());
    }

    #[test]
    fn test_selector_prefers_win_over_block() {
        // O can win at (0,2); X threatens at (2,2)
        let b = board(["OO.", "XX.", "..."]);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(select_move(&b, Mark::O, Mark::X, &mut rng), Some(Cell::new(0, 2)));
    }

    #[test]
    fn test_selector_blocks() {
        let b = board(["XX.", ".O.", "..."]);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(select_move(&b, Mark::O, Mark::X, &mut rng), Some(Cell::new(0, 2)));
    }

    #[test]
    fn test_selector_random_picks_empty_cell() {
        let b = board(["X..", "...", "..."]);
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let cell = select_move(&b, Mark::O, Mark::X, &mut rng).unwrap();
            assert!(b.get(cell).is_none());
        }
    }

    #[test]
    fn test_selector_full_board() {
        let b = board(["XOX", "XOO", "OXX"]);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(select_move(&b, Mark::O, Mark::X, &mut rng), None);
    }

    #[test]
    fn test_larger_board_lines() {
        let mut b = Board::new(4);
        for i in 0..4 {
            b.place(Cell::new(i, 3 - i), Mark::O);
        }
        assert_eq!(b.winner(), Some(Mark::O));
    }
}
