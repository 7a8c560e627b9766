use eframe::egui;
use eframe::egui::{Color32, Sense, Stroke, Ui};
use eframe::run_native;
use shared::session::{EditMode, Session};
use shared::viewport::ResizePolicy;
use std::time::{Duration, Instant};

const GRID_ROWS: usize = 20;
const GRID_COLS: usize = 40;
const STEP_INTERVAL: Duration = Duration::from_millis(100);
const ALIVE_COLOR: Color32 = Color32::from_gray(25);
const DEAD_COLOR: Color32 = Color32::from_gray(245);
const OUTLINE_COLOR: Color32 = Color32::from_gray(160);

fn main() -> eframe::Result {
    env_logger::init();
    log::info!("starting {GRID_ROWS}x{GRID_COLS} board, {STEP_INTERVAL:?} per generation");

    run_native(
        "Game of Life",
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 540.0]),
            ..Default::default()
        },
        Box::new(|cc| Ok(Box::new(GuiOfLife::new(cc)))),
    )
}

struct GuiOfLife {
    session: Session,
}

impl GuiOfLife {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // The real drawable size arrives with the first frame's resize.
        let session = Session::new(
            ResizePolicy::FitCellSize {
                rows: GRID_ROWS,
                cols: GRID_COLS,
            },
            EditMode::Toggle,
            900,
            540,
            STEP_INTERVAL,
        );
        Self { session }
    }

    fn controls(&mut self, ui: &mut Ui, now: Instant) {
        ui.horizontal(|ui| {
            let label = if self.session.is_running() { "Stop" } else { "Start" };
            if ui.button(label).clicked() {
                self.session.toggle_running(now);
            }
            if ui.button("Clear").clicked() {
                self.session.clear();
            }
            if ui.button("Randomize").clicked() {
                self.session.randomize();
            }
            if ui.button("Slower").clicked() {
                self.session.slow();
            }
            if ui.button("Faster").clicked() {
                self.session.accelerate();
            }

            ui.separator();
            ui.label(format!("Generation: {}", self.session.playback().generation()));
            ui.label(format!("Alive: {}", self.session.grid.population()));
            ui.label(format!(
                "Interval: {} ms",
                self.session.playback().interval().as_millis()
            ));
        });
    }

    fn board(&mut self, ui: &mut Ui) {
        // Feed the drawable size to the viewport; with the fixed-count
        // policy only the cell size changes, never the board contents.
        let avail = ui.available_size();
        self.session.resize(avail.x.max(0.0) as u32, avail.y.max(0.0) as u32);

        let viewport = self.session.viewport();
        let size = egui::vec2(
            viewport.grid_pixel_width() as f32,
            viewport.grid_pixel_height() as f32,
        );
        let cell_size = viewport.cell_size() as f32;

        let (response, painter) = ui.allocate_painter(size, Sense::click());

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let rel = pos - response.rect.min;
                self.session.pointer_down(rel.x, rel.y);
            }
        }

        let outline = Stroke::new(1.0, OUTLINE_COLOR);
        for (row_index, row) in self.session.grid.cells.iter().enumerate() {
            for (col_index, cell) in row.iter().enumerate() {
                let pos = response.rect.min
                    + egui::vec2(col_index as f32 * cell_size, row_index as f32 * cell_size);
                let rect = egui::Rect::from_min_size(pos, egui::vec2(cell_size, cell_size));

                let fill = if cell.is_alive() { ALIVE_COLOR } else { DEAD_COLOR };
                painter.rect_filled(rect, 0.0, fill);
                painter.rect_stroke(rect, 0.0, outline);
            }
        }
    }
}

impl eframe::App for GuiOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.session.update(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Game of Life");
            self.controls(ui, now);
            ui.separator();
            self.board(ui);
        });

        // Wake up exactly when the next generation is due.
        if let Some(wait) = self.session.playback().time_until_tick(now) {
            ctx.request_repaint_after(wait);
        }
    }
}
