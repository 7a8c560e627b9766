use std::time::{Duration, Instant};

use crate::grid::{CellState, Grid};
use crate::playback::Playback;
use crate::viewport::{ResizePolicy, Viewport};

/// How pointer input edits the board.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EditMode {
    /// Pointer-down flips the cell; drags are ignored.
    Toggle,
    /// Pointer-down and drag force cells alive, never toggling.
    Paint,
}

/// Everything a frontend needs in one owned place: the board, the viewport
/// geometry, and the playback clock. No ambient globals.
pub struct Session {
    pub grid: Grid,
    viewport: Viewport,
    playback: Playback,
    edit_mode: EditMode,
}

impl Session {
    pub fn new(
        policy: ResizePolicy,
        edit_mode: EditMode,
        width: u32,
        height: u32,
        interval: Duration,
    ) -> Self {
        let viewport = Viewport::new(policy, width, height);
        let grid = Grid::new(viewport.rows(), viewport.cols());
        Session {
            grid,
            viewport,
            playback: Playback::new(interval),
            edit_mode,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn is_running(&self) -> bool {
        self.playback.is_running()
    }

    /// New drawable size. When the policy re-derives the grid dimensions the
    /// board is rebuilt around the surviving overlap of the pattern.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.viewport.resize(width, height) {
            self.grid = self.grid.resized(self.viewport.rows(), self.viewport.cols());
        }
    }

    /// Pointer press at grid-relative pixel coordinates. Misses outside the
    /// board are silently ignored.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let Some((row, col)) = self.viewport.cell_at(x, y) else {
            return;
        };
        match self.edit_mode {
            EditMode::Toggle => self.grid.toggle(row, col),
            EditMode::Paint => self.grid.set(row, col, CellState::Alive),
        }
    }

    /// Pointer drag at grid-relative pixel coordinates. Only paints.
    pub fn pointer_drag(&mut self, x: f32, y: f32) {
        if self.edit_mode != EditMode::Paint {
            return;
        }
        if let Some((row, col)) = self.viewport.cell_at(x, y) {
            self.grid.set(row, col, CellState::Alive);
        }
    }

    /// Poll the playback clock; a due tick applies exactly one generation.
    /// Returns whether the board changed.
    pub fn update(&mut self, now: Instant) -> bool {
        if self.playback.tick(now) {
            self.grid.advance()
        } else {
            false
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.playback.start(now);
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn toggle_running(&mut self, now: Instant) {
        if self.playback.is_running() {
            self.playback.stop();
        } else {
            self.playback.start(now);
        }
    }

    /// Wipes the board and stops playback.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.playback.stop();
    }

    pub fn randomize(&mut self) {
        self.grid.randomize();
    }

    pub fn accelerate(&mut self) {
        self.playback.accelerate();
    }

    pub fn slow(&mut self) {
        self.playback.slow();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState::{Alive, Dead};

    const INTERVAL: Duration = Duration::from_millis(100);

    fn toggle_session() -> Session {
        // 20 rows x 40 cols at 20 px cells.
        Session::new(
            ResizePolicy::FitCellSize { rows: 20, cols: 40 },
            EditMode::Toggle,
            800,
            400,
            INTERVAL,
        )
    }

    fn paint_session() -> Session {
        Session::new(
            ResizePolicy::FixedCellSize { cell_size: 16 },
            EditMode::Paint,
            640,
            480,
            INTERVAL,
        )
    }

    #[test]
    fn grid_matches_viewport_dimensions() {
        let session = toggle_session();
        assert_eq!(session.grid.rows(), 20);
        assert_eq!(session.grid.cols(), 40);
    }

    #[test]
    fn toggle_mode_flips_on_press_and_ignores_drags() {
        let mut session = toggle_session();
        session.pointer_down(45.0, 25.0);
        assert_eq!(session.grid.get(1, 2), Alive);
        session.pointer_down(45.0, 25.0);
        assert_eq!(session.grid.get(1, 2), Dead);

        session.pointer_drag(45.0, 25.0);
        assert_eq!(session.grid.get(1, 2), Dead);
    }

    #[test]
    fn paint_mode_forces_alive_and_never_toggles() {
        let mut session = paint_session();
        session.pointer_down(8.0, 8.0);
        assert_eq!(session.grid.get(0, 0), Alive);
        session.pointer_down(8.0, 8.0);
        assert_eq!(session.grid.get(0, 0), Alive);

        session.pointer_drag(40.0, 8.0);
        assert_eq!(session.grid.get(0, 2), Alive);
    }

    #[test]
    fn presses_off_the_board_are_ignored() {
        let mut session = toggle_session();
        session.pointer_down(-4.0, 10.0);
        session.pointer_down(10.0, 4000.0);
        assert_eq!(session.grid.population(), 0);
    }

    #[test]
    fn update_steps_only_while_running() {
        let mut session = toggle_session();
        // Blinker center column.
        session.grid.set(1, 0, Alive);
        session.grid.set(1, 1, Alive);
        session.grid.set(1, 2, Alive);

        let t0 = Instant::now();
        assert!(!session.update(t0));
        assert_eq!(session.playback().generation(), 0);

        session.start(t0);
        assert!(session.update(t0));
        assert_eq!(session.playback().generation(), 1);
        assert_eq!(session.grid.get(0, 1), Alive);
    }

    #[test]
    fn stop_before_the_first_tick_leaves_the_board_alone() {
        let mut session = toggle_session();
        session.grid.set(1, 1, Alive);
        let t0 = Instant::now();

        session.start(t0);
        session.stop();
        assert!(!session.update(t0 + INTERVAL * 3));
        assert_eq!(session.playback().generation(), 0);
        assert_eq!(session.grid.get(1, 1), Alive);
    }

    #[test]
    fn clear_stops_playback() {
        let mut session = paint_session();
        session.grid.set(2, 2, Alive);
        session.start(Instant::now());

        session.clear();
        assert!(!session.is_running());
        assert_eq!(session.grid.population(), 0);
    }

    #[test]
    fn count_fit_resize_preserves_the_pattern_overlap() {
        let mut session = paint_session();
        session.grid.set(0, 0, Alive);
        session.grid.set(5, 5, Alive);

        session.resize(96, 96); // 6 x 6 cells
        assert_eq!(session.grid.rows(), 6);
        assert_eq!(session.grid.cols(), 6);
        assert_eq!(session.grid.get(0, 0), Alive);
        assert_eq!(session.grid.get(5, 5), Alive);

        session.resize(80, 80); // 5 x 5 cells, (5, 5) falls off
        assert_eq!(session.grid.population(), 1);
    }
}
