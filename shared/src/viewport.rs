/// How the board reacts to the drawable surface changing size.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ResizePolicy {
    /// Row/column counts are fixed; the cell pixel size adapts to fit.
    FitCellSize { rows: usize, cols: usize },
    /// Cell pixel size is fixed; the row/column counts adapt to fit.
    FixedCellSize { cell_size: u32 },
}

/// Derives grid dimensions and cell geometry from the drawable surface and
/// maps pixel positions back to cell coordinates.
#[derive(Debug)]
pub struct Viewport {
    policy: ResizePolicy,
    rows: usize,
    cols: usize,
    cell_size: u32,
}

impl Viewport {
    pub fn new(policy: ResizePolicy, width: u32, height: u32) -> Self {
        let mut viewport = Viewport {
            policy,
            rows: 0,
            cols: 0,
            cell_size: 1,
        };
        viewport.apply(width, height);
        viewport
    }

    fn apply(&mut self, width: u32, height: u32) {
        match self.policy {
            ResizePolicy::FitCellSize { rows, cols } => {
                self.rows = rows.max(1);
                self.cols = cols.max(1);
                let fit_w = width / self.cols as u32;
                let fit_h = height / self.rows as u32;
                self.cell_size = fit_w.min(fit_h).max(1);
            }
            ResizePolicy::FixedCellSize { cell_size } => {
                self.cell_size = cell_size.max(1);
                self.rows = (height / self.cell_size).max(1) as usize;
                self.cols = (width / self.cell_size).max(1) as usize;
            }
        }
    }

    /// Recompute geometry for a new drawable size. Returns true when the
    /// grid dimensions changed and the board needs reconciling.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let dims = (self.rows, self.cols);
        self.apply(width, height);
        dims != (self.rows, self.cols)
    }

    /// Pixel position (relative to the grid origin) to cell coordinate.
    /// Positions off the grid map to `None`.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let row = (y as u32 / self.cell_size) as usize;
        let col = (x as u32 / self.cell_size) as usize;
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn grid_pixel_width(&self) -> u32 {
        self.cols as u32 * self.cell_size
    }

    pub fn grid_pixel_height(&self) -> u32 {
        self.rows as u32 * self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_cell_size_takes_the_tighter_axis() {
        let viewport = Viewport::new(ResizePolicy::FitCellSize { rows: 20, cols: 40 }, 800, 400);
        assert_eq!(viewport.cell_size(), 20);
        assert_eq!((viewport.rows(), viewport.cols()), (20, 40));

        let squeezed = Viewport::new(ResizePolicy::FitCellSize { rows: 20, cols: 40 }, 800, 100);
        assert_eq!(squeezed.cell_size(), 5);
    }

    #[test]
    fn fit_cell_size_never_reaches_zero() {
        let viewport = Viewport::new(ResizePolicy::FitCellSize { rows: 20, cols: 40 }, 10, 10);
        assert_eq!(viewport.cell_size(), 1);
    }

    #[test]
    fn fit_cell_size_keeps_dimensions_across_resizes() {
        let mut viewport = Viewport::new(ResizePolicy::FitCellSize { rows: 20, cols: 40 }, 800, 400);
        assert!(!viewport.resize(1600, 900));
        assert_eq!((viewport.rows(), viewport.cols()), (20, 40));
        assert_eq!(viewport.cell_size(), 40);
    }

    #[test]
    fn fixed_cell_size_derives_counts_from_the_surface() {
        let mut viewport = Viewport::new(ResizePolicy::FixedCellSize { cell_size: 16 }, 640, 480);
        assert_eq!((viewport.rows(), viewport.cols()), (30, 40));
        assert_eq!(viewport.cell_size(), 16);

        assert!(viewport.resize(320, 480));
        assert_eq!((viewport.rows(), viewport.cols()), (30, 20));

        // Same derived counts: no reconciliation signalled.
        assert!(!viewport.resize(335, 495));
    }

    #[test]
    fn fixed_cell_size_keeps_at_least_one_row_and_column() {
        let viewport = Viewport::new(ResizePolicy::FixedCellSize { cell_size: 16 }, 4, 4);
        assert_eq!((viewport.rows(), viewport.cols()), (1, 1));
    }

    #[test]
    fn cell_at_divides_by_cell_size() {
        let viewport = Viewport::new(ResizePolicy::FitCellSize { rows: 20, cols: 40 }, 800, 400);
        assert_eq!(viewport.cell_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(viewport.cell_at(19.9, 19.9), Some((0, 0)));
        assert_eq!(viewport.cell_at(20.0, 0.0), Some((0, 1)));
        assert_eq!(viewport.cell_at(795.0, 395.0), Some((19, 39)));
    }

    #[test]
    fn cell_at_rejects_positions_off_the_grid() {
        let viewport = Viewport::new(ResizePolicy::FitCellSize { rows: 20, cols: 40 }, 800, 400);
        assert_eq!(viewport.cell_at(-1.0, 5.0), None);
        assert_eq!(viewport.cell_at(5.0, -0.1), None);
        assert_eq!(viewport.cell_at(800.0, 5.0), None);
        assert_eq!(viewport.cell_at(5.0, 400.0), None);
    }
}
