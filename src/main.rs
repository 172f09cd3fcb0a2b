use arboard::Clipboard;
use log::{error, info, warn};
use macroquad::prelude::*;
use pathviz::action_log::ActionLog;
use pathviz::config::{Config, CONFIG_FILE};
use pathviz::{Controller, Grid, InputEvent, Key, Layout, Palette, Renderer, Response, Rgb};
use std::sync::OnceLock;

static CONFIG: OnceLock<Config> = OnceLock::new();

fn config() -> &'static Config {
    CONFIG.get_or_init(Config::load)
}

fn init_logging() {
    // Peek at the configured level so messages from the real load are kept
    let level = Config::from_file(CONFIG_FILE)
        .map(|c| c.logging.level)
        .unwrap_or_else(|_| "info".to_string());
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}

fn window_conf() -> Conf {
    init_logging();
    let config = config();
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: config.grid.width_px as i32,
        window_height: config.grid.width_px as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.0, rgb.1, rgb.2, 255)
}

/// Paints cells as filled squares with grid lines on top
struct MacroquadRenderer {
    palette: Palette,
    show_grid_lines: bool,
}

impl Renderer for MacroquadRenderer {
    fn render(&mut self, grid: &Grid) {
        clear_background(to_color(self.palette.empty));

        let width = grid.cell_width() as f32;
        for cell in grid.iter() {
            let (x, y) = cell.origin();
            draw_rectangle(x as f32, y as f32, width, width, to_color(self.palette.color(cell.state())));
        }

        if self.show_grid_lines {
            let line_color = to_color(self.palette.grid_lines);
            let extent = width * grid.rows() as f32;
            for i in 0..=grid.rows() {
                let offset = i as f32 * width;
                draw_line(0.0, offset, extent, offset, 1.0, line_color);
                draw_line(offset, 0.0, offset, extent, 1.0, line_color);
            }
        }
    }
}

/// Sample the input devices once per frame
fn poll_input(running: bool) -> Vec<InputEvent> {
    let mut events = Vec::new();

    if is_quit_requested() {
        events.push(InputEvent::Quit);
    }

    let (x, y) = mouse_position();
    events.push(InputEvent::PointerMoved { x, y });

    if is_mouse_button_down(MouseButton::Left) {
        events.push(InputEvent::PrimaryDown);
    } else if is_mouse_button_down(MouseButton::Right) {
        events.push(InputEvent::SecondaryDown);
    }

    for code in get_keys_pressed() {
        let key = match code {
            KeyCode::Space => Key::Run,
            KeyCode::R => Key::Reset,
            KeyCode::C => Key::ClearSearch,
            KeyCode::K => Key::CopyLayout,
            KeyCode::V => Key::PasteLayout,
            KeyCode::Escape if running => Key::Cancel,
            KeyCode::Escape => {
                events.push(InputEvent::Quit);
                continue;
            }
            _ => Key::Other,
        };
        events.push(InputEvent::KeyDown(key));
    }

    events
}

fn copy_to_clipboard(text: &str) {
    match Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text) {
                warn!("Failed to copy to clipboard: {}", e);
            } else {
                info!("Grid layout copied to clipboard");
                // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
        }
        Err(e) => warn!("Failed to access clipboard: {}", e),
    }
}

fn paste_from_clipboard(controller: &mut Controller) {
    let text = match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read clipboard: {}", e);
            return;
        }
    };
    match Layout::parse(&text) {
        Ok(layout) => match controller.load_layout(&layout) {
            Ok(true) => info!("Loaded {}x{} layout from clipboard", layout.rows, layout.rows),
            Ok(false) => {}
            Err(e) => warn!("Clipboard layout does not fit the window: {}", e),
        },
        Err(e) => warn!("Clipboard does not hold a grid layout: {}", e),
    }
}

/// Everything one window session owns
struct Session {
    controller: Controller,
    renderer: MacroquadRenderer,
    steps_per_frame: usize,
}

impl Session {
    fn new(config: &Config) -> Option<Self> {
        let grid = match Grid::new(config.grid.rows, config.grid.width_px) {
            Ok(grid) => grid,
            Err(e) => {
                error!("Invalid grid configuration: {}", e);
                return None;
            }
        };

        let mut controller = Controller::new(grid).with_clear_before_run(config.search.clear_before_run);
        if config.logging.enable_action_log {
            controller = controller.with_action_log(ActionLog::new());
        }

        Some(Session {
            controller,
            renderer: MacroquadRenderer {
                palette: config.palette(),
                show_grid_lines: config.visual.show_grid_lines,
            },
            steps_per_frame: config.search.steps_per_frame.max(1),
        })
    }

    /// Returns false once the session should end
    fn frame(&mut self) -> bool {
        for event in poll_input(self.controller.is_running()) {
            match self.controller.handle(event) {
                Response::Continue => {}
                Response::Quit => return false,
                Response::CopyLayout(text) => copy_to_clipboard(&text),
                Response::PasteRequested => paste_from_clipboard(&mut self.controller),
            }
        }

        if self.controller.is_running() {
            self.controller.advance(self.steps_per_frame, &mut ());
        }

        self.renderer.render(self.controller.grid());
        true
    }

    fn teardown(self, config: &Config) {
        if let Some(log) = self.controller.action_log() {
            info!("{}", log.summary().replace('\n', "; "));
            if let Err(e) = log.save_to_file(&config.logging.action_log_path) {
                error!("Failed to save action log: {}", e);
            }
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = config();
    let Some(mut session) = Session::new(config) else {
        return;
    };

    prevent_quit();
    info!(
        "Left click: start, end, then barriers | Right click: erase | Space: run | R: reset | \
         C: clear search | K/V: copy/paste layout | Esc: cancel or quit"
    );

    while session.frame() {
        next_frame().await
    }

    session.teardown(config);
}
