use crate::grid::CellState::{Alive, Dead};
use rand::Rng;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CellState {
    Dead,
    Alive,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        self == Alive
    }
}

/// Rectangular board of cells, rows outer, columns inner.
/// Every row holds exactly `cols()` entries.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    pub cells: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            cells: vec![vec![Dead; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Out-of-bounds coordinates read as dead.
    pub fn get(&self, row: usize, col: usize) -> CellState {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(Dead)
    }

    /// Out-of-bounds coordinates are silently ignored.
    pub fn set(&mut self, row: usize, col: usize, state: CellState) {
        if row < self.rows() && col < self.cols() {
            self.cells[row][col] = state;
        }
    }

    /// Flip a cell between dead and alive; out-of-bounds is a no-op.
    pub fn toggle(&mut self, row: usize, col: usize) {
        if row < self.rows() && col < self.cols() {
            self.cells[row][col] = match self.cells[row][col] {
                Alive => Dead,
                Dead => Alive,
            };
        }
    }

    pub fn randomize(&mut self) {
        let mut rng = rand::rng();
        for row in &mut self.cells {
            for cell in row {
                *cell = if rng.random_bool(0.5) { Alive } else { Dead };
            }
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Dead);
        }
    }

    pub fn population(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_alive()).count())
            .sum()
    }

    /// Advance the grid by one generation (Game of Life logic).
    /// The next generation is computed from the prior one only and swapped
    /// in wholesale. Returns false when the board did not change.
    pub fn advance(&mut self) -> bool {
        let mut next = vec![vec![Dead; self.cols()]; self.rows()];

        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let alive_neighbors = self.neighbor_count(row, col);

                next[row][col] = match (self.cells[row][col], alive_neighbors) {
                    (Alive, 2..=3) => Alive, // Survives
                    (Dead, 3) => Alive,      // Becomes alive
                    _ => Dead,               // Dies or remains dead
                };
            }
        }

        if self.cells == next {
            return false;
        }
        self.cells = next;
        true
    }

    /// Count the number of alive neighbors for a cell. The boundary is
    /// hard: coordinates off the board count as dead, no wraparound.
    pub fn neighbor_count(&self, row: usize, col: usize) -> usize {
        let mut count = 0;

        for dr in [-1isize, 0, 1] {
            for dc in [-1isize, 0, 1] {
                if dr == 0 && dc == 0 {
                    // Skip the cell itself
                    continue;
                }

                let (Some(r), Some(c)) = (
                    row.checked_add_signed(dr),
                    col.checked_add_signed(dc),
                ) else {
                    continue;
                };

                if r < self.rows() && c < self.cols() && self.cells[r][c] == Alive {
                    count += 1;
                }
            }
        }

        count
    }

    /// Rebuild the board at new dimensions, keeping whatever part of the
    /// current pattern still fits. Cells outside the overlap start dead.
    pub fn resized(&self, rows: usize, cols: usize) -> Grid {
        let mut grid = Grid::new(rows, cols);
        for row in 0..rows.min(self.rows()) {
            for col in 0..cols.min(self.cols()) {
                grid.cells[row][col] = self.cells[row][col];
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: usize, cols: usize, alive: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(rows, cols);
        for &(row, col) in alive {
            grid.set(row, col, Alive);
        }
        grid
    }

    #[test]
    fn new_grid_is_all_dead() {
        let grid = Grid::new(4, 7);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 7);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn neighbor_count_caps_at_eight_and_skips_self() {
        let mut grid = Grid::new(3, 3);
        for row in 0..3 {
            for col in 0..3 {
                grid.set(row, col, Alive);
            }
        }
        assert_eq!(grid.neighbor_count(1, 1), 8);
        // Corner of a fully alive board: 3 neighbors, never the cell itself.
        assert_eq!(grid.neighbor_count(0, 0), 3);
    }

    #[test]
    fn neighbors_off_the_board_count_as_dead() {
        let grid = grid_from(3, 3, &[(0, 0), (0, 1)]);
        // (0, 0) sits in the corner; only (0, 1) is a live neighbor.
        assert_eq!(grid.neighbor_count(0, 0), 1);
        assert_eq!(grid.neighbor_count(2, 2), 0);
    }

    #[test]
    fn all_dead_grid_stays_dead() {
        let mut grid = Grid::new(5, 8);
        assert!(!grid.advance());
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn lone_cell_dies_of_underpopulation() {
        let mut grid = grid_from(3, 3, &[(1, 1)]);
        assert!(grid.advance());
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn block_is_a_still_life() {
        let block = &[(1, 1), (1, 2), (2, 1), (2, 2)];
        let mut grid = grid_from(4, 4, block);
        let before = grid.clone();
        for _ in 0..5 {
            assert!(!grid.advance());
            assert_eq!(grid, before);
        }
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let mut grid = grid_from(3, 3, &[(1, 0), (1, 1), (1, 2)]);
        let horizontal = grid.clone();
        let vertical = grid_from(3, 3, &[(0, 1), (1, 1), (2, 1)]);

        assert!(grid.advance());
        assert_eq!(grid, vertical);
        assert!(grid.advance());
        assert_eq!(grid, horizontal);
    }

    #[test]
    fn transitions_never_observe_updated_neighbors() {
        // An in-place raster sweep over the blinker would birth (0, 2) off
        // the freshly-written (0, 1) and keep (1, 0) alive off it too.
        let mut grid = grid_from(3, 3, &[(1, 0), (1, 1), (1, 2)]);
        grid.advance();
        assert_eq!(grid.get(0, 2), Dead);
        assert_eq!(grid.get(1, 0), Dead);
        assert_eq!(grid.get(1, 2), Dead);
        assert_eq!(grid.get(1, 1), Alive);
    }

    #[test]
    fn set_and_toggle_ignore_out_of_bounds() {
        let mut grid = Grid::new(3, 3);
        let before = grid.clone();
        grid.set(3, 0, Alive);
        grid.set(0, 3, Alive);
        grid.set(usize::MAX, usize::MAX, Alive);
        grid.toggle(7, 7);
        assert_eq!(grid, before);
    }

    #[test]
    fn toggle_flips_state() {
        let mut grid = Grid::new(2, 2);
        grid.toggle(0, 1);
        assert_eq!(grid.get(0, 1), Alive);
        grid.toggle(0, 1);
        assert_eq!(grid.get(0, 1), Dead);
    }

    #[test]
    fn clear_kills_everything() {
        let mut grid = grid_from(3, 3, &[(0, 0), (1, 1), (2, 2)]);
        grid.clear();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn randomize_fills_every_row() {
        let mut grid = Grid::new(40, 40);
        grid.randomize();
        // 1600 fair coin flips landing all on one side is not a thing.
        assert!(grid.population() > 0);
        assert!(grid.population() < 1600);
    }

    #[test]
    fn resized_preserves_the_overlap() {
        let grid = grid_from(4, 4, &[(0, 0), (1, 1), (3, 3)]);

        let shrunk = grid.resized(2, 2);
        assert_eq!(shrunk.get(0, 0), Alive);
        assert_eq!(shrunk.get(1, 1), Alive);
        assert_eq!(shrunk.population(), 2);

        let grown = grid.resized(6, 6);
        assert_eq!(grown.get(3, 3), Alive);
        assert_eq!(grown.population(), 3);
        assert_eq!(grown.get(5, 5), Dead);
    }
}
