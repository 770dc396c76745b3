/// Egui-based playback viewer: runs the explorer on an ASCII map while
/// recording a snapshot per iteration, then replays the run with play/
/// pause and a scrub slider. The out-of-scope GUI/camera collaborator
/// named in spec section 1, grounded on the teacher's own `visualize.rs`
/// (same play/pause/slider/painter structure, adapted to one agent and
/// one map instead of two robots' maps side by side).
use eframe::egui;
use eframe::App;
use std::env;
use std::process::ExitCode;

use hpa_explore::map_loader::load_map_from_file;
use hpa_explore::types::CellState;
use hpa_explore::{explore, Cell, ExploreInput, ExploreOptions, Heading, ProgressEvent};

/// One recorded iteration: a plain snapshot with no borrowed data, since
/// `ProgressEvent` only lives for the duration of the callback.
#[derive(Clone)]
struct Frame {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
    agent_pos: Cell,
    agent_heading: Heading,
    target: Option<Cell>,
    coverage: f64,
}

impl Frame {
    fn from_event(event: &ProgressEvent) -> Self {
        let known = event.known_map;
        let cells = known.cells_iter().map(|(_, state)| state).collect();
        Self {
            width: known.width,
            height: known.height,
            cells,
            agent_pos: event.agent_position,
            agent_heading: event.agent_heading,
            target: event.current_target,
            coverage: event.coverage,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <map_file> [start_row start_col]", args[0]);
        return ExitCode::FAILURE;
    }
    let maze = match load_map_from_file(&args[1]) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("failed to load map: {e}");
            return ExitCode::FAILURE;
        }
    };
    let start_row: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);
    let start_col: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0);

    let input = ExploreInput {
        maze,
        start: Cell::new(start_row, start_col),
    };
    let options = ExploreOptions::default();

    let mut frames = Vec::new();
    let mut on_progress = |event: &ProgressEvent| frames.push(Frame::from_event(event));
    if let Err(e) = explore(&input, &options, Some(&mut on_progress)) {
        eprintln!("exploration aborted: {e}");
        return ExitCode::FAILURE;
    }
    if frames.is_empty() {
        eprintln!("exploration produced no iterations to play back");
        return ExitCode::FAILURE;
    }

    let app = VisualizeApp::new(frames);
    let native_options = eframe::NativeOptions::default();
    if eframe::run_native("Hierarchical Exploration Playback", native_options, Box::new(|_cc| Box::new(app))).is_err() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

const CELL_PX: f32 = 8.0;

struct VisualizeApp {
    frames: Vec<Frame>,
    tick: usize,
    playing: bool,
    frame_counter: usize,
    frames_per_tick: usize,
}

impl VisualizeApp {
    fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            tick: 0,
            playing: false,
            frame_counter: 0,
            frames_per_tick: 2,
        }
    }
}

impl App for VisualizeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let frame = &self.frames[self.tick];
            ui.heading(format!("Iteration {} / {}  coverage {:.1}%", self.tick, self.frames.len() - 1, frame.coverage));
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "Pause" } else { "Play" }).clicked() {
                    self.playing = !self.playing;
                }
                ui.add(egui::Slider::new(&mut self.tick, 0..=self.frames.len() - 1).text("Iteration"));
            });
            ui.add_space(10.0);

            if self.playing && self.tick < self.frames.len() - 1 {
                self.frame_counter += 1;
                if self.frame_counter >= self.frames_per_tick {
                    self.tick += 1;
                    self.frame_counter = 0;
                }
                ctx.request_repaint();
            } else {
                self.frame_counter = 0;
            }

            let frame = &self.frames[self.tick];
            let map_pixel_width = frame.width as f32 * CELL_PX;
            let map_pixel_height = frame.height as f32 * CELL_PX;
            let (rect, _response) = ui.allocate_exact_size(egui::vec2(map_pixel_width, map_pixel_height), egui::Sense::hover());
            let painter = ui.painter_at(rect);

            for row in 0..frame.height {
                for col in 0..frame.width {
                    let idx = row * frame.width + col;
                    let color = match frame.cells[idx] {
                        CellState::Wall => egui::Color32::BLACK,
                        CellState::Walkable => egui::Color32::WHITE,
                        CellState::Unknown => egui::Color32::from_gray(70),
                    };
                    let x0 = rect.left() + col as f32 * CELL_PX;
                    let y0 = rect.top() + row as f32 * CELL_PX;
                    painter.rect_filled(egui::Rect::from_min_size(egui::pos2(x0, y0), egui::vec2(CELL_PX, CELL_PX)), 0.0, color);
                }
            }

            if let Some(target) = frame.target {
                let x = rect.left() + target.col as f32 * CELL_PX + CELL_PX / 2.0;
                let y = rect.top() + target.row as f32 * CELL_PX + CELL_PX / 2.0;
                painter.circle_stroke(egui::pos2(x, y), CELL_PX, egui::Stroke::new(1.5, egui::Color32::from_rgb(0, 160, 0)));
            }

            let ax = rect.left() + frame.agent_pos.col as f32 * CELL_PX + CELL_PX / 2.0;
            let ay = rect.top() + frame.agent_pos.row as f32 * CELL_PX + CELL_PX / 2.0;
            painter.circle_filled(egui::pos2(ax, ay), CELL_PX * 0.6, egui::Color32::from_rgb(0, 120, 255));
            let (hdr, hdc) = frame.agent_heading.delta();
            painter.line_segment(
                [egui::pos2(ax, ay), egui::pos2(ax + hdc as f32 * CELL_PX, ay + hdr as f32 * CELL_PX)],
                egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 80, 0)),
            );
        });
    }
}
