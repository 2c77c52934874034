mod sink;

use anyhow::{Context, Result};
use clap::Parser;
use routeplot::{
    input::{EventSource, InputEvent, KeyCode, MouseButton, TickOutcome},
    prelude::*,
};
use sink::EguiSink;
use std::{cell::RefCell, path::PathBuf, rc::Rc};

type Controller = InputController<Box<dyn LineChannel>>;

/// Log filter when `RUST_LOG` is unset. Protocol notices and the pipe wait
/// log at warn and info.
const DEFAULT_LOG_FILTER: &str = "info";

/// Scroll distance, in points, that counts as one wheel notch.
const SCROLL_NOTCH: f32 = 50.0;

#[derive(Parser)]
#[command(name = "routeplot-app", about = "Plot dot pairs and routes on a raster map")]
struct Cli {
    /// Talk to the route service on stdin/stdout instead of the named pipes.
    #[arg(long)]
    stdin: bool,

    /// JSON configuration file. Built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding one `<zoom>.png` per zoom level.
    #[arg(long)]
    tiles: Option<PathBuf>,

    /// JSON dot script played back on the space key.
    #[arg(long, requires = "scenario")]
    script: Option<PathBuf>,

    /// Scenario to take from the dot script.
    #[arg(long)]
    scenario: Option<String>,

    /// Play the dot script without opening a window.
    #[arg(long, requires = "script")]
    headless: bool,
}

fn main() -> Result<()> {
    logger(env_logger::Env::default()).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MapConfig::from_json_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => MapConfig::default(),
    };
    if let Some(tiles) = &cli.tiles {
        config.tiles.directory = tiles.clone();
    }

    let tiles = CachedTileProvider::new(
        DirectoryTileProvider::new(config.tiles.clone()),
        config.tiles.cache_capacity,
    );
    let display = config.display;
    let channel_config = config.channel.clone();
    let map = MapView::new(config, Box::new(tiles)).context("setting up the map")?;

    let channel: Box<dyn LineChannel> = if cli.stdin {
        Box::new(transport::open_console())
    } else {
        Box::new(transport::open_pipes(&channel_config).context("opening route service pipes")?)
    };

    let mut controller = InputController::new(map, channel);
    if let (Some(path), Some(scenario)) = (&cli.script, &cli.scenario) {
        controller = controller.with_script(DotScript::from_json_file(path, scenario)?);
    }

    if cli.headless {
        let mut sink = RecordingSink::new();
        controller.run(&mut ScriptDriver, &mut sink)?;
        log::info!("headless run presented {} frames", sink.frames().len());
        return Ok(());
    }

    let failure = Rc::new(RefCell::new(None));
    let app = PlotterApp {
        controller,
        sink: None,
        display,
        failure: Rc::clone(&failure),
        closing: false,
        scroll: ScrollAccumulator::default(),
    };

    let (width, height) = app.display.window_size();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_resizable(false)
            .with_title("Navigation - Plotter"),
        ..Default::default()
    };

    eframe::run_native("routeplot", options, Box::new(|_cc| Box::new(app)))
        .map_err(|err| anyhow::anyhow!("window failed: {}", err))?;

    let failure = failure.borrow_mut().take();
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn logger(env: env_logger::Env) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or(DEFAULT_LOG_FILTER))
}

/// Collapses trackpad scrolling into wheel notches so a swipe zooms one
/// level at a time.
#[derive(Debug, Default)]
struct ScrollAccumulator {
    pending: f32,
}

impl ScrollAccumulator {
    /// Adds `delta` and returns the direction of a completed notch.
    fn push(&mut self, delta: f32) -> Option<f64> {
        if self.pending != 0.0 && self.pending.signum() != delta.signum() {
            self.pending = 0.0;
        }
        self.pending += delta;
        if self.pending.abs() < SCROLL_NOTCH {
            return None;
        }
        let notch = self.pending.signum() as f64;
        self.pending = 0.0;
        Some(notch)
    }
}

/// Presses space every frame so a loaded dot script plays to the end.
struct ScriptDriver;

impl EventSource for ScriptDriver {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        vec![InputEvent::KeyUp(KeyCode::Space)]
    }
}

struct PlotterApp {
    controller: Controller,
    sink: Option<EguiSink>,
    display: DisplayConfig,
    failure: Rc<RefCell<Option<anyhow::Error>>>,
    closing: bool,
    scroll: ScrollAccumulator,
}

impl PlotterApp {
    fn close(&mut self, ctx: &egui::Context) {
        self.closing = true;
        if let Err(err) = self.controller.shutdown() {
            log::warn!("could not notify route service: {}", err);
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl eframe::App for PlotterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let display = &self.display;
        let sink = self.sink.get_or_insert_with(|| {
            EguiSink::new(
                ctx.clone(),
                display.display_range(),
                display.status_bar_height,
            )
        });

        if !self.closing {
            let events = translate_events(ctx, &mut self.scroll);
            match self.controller.tick(events, sink) {
                Ok(TickOutcome::Continue) => {}
                Ok(TickOutcome::Quit) => self.close(ctx),
                Err(err) => {
                    log::error!("plotter stopped: {}", err);
                    *self.failure.borrow_mut() = Some(err.into());
                    self.close(ctx);
                }
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(sink) = &self.sink {
                    sink.paint(ui.painter());
                }
            });

        match self.controller.map().config().frame.target_frame_duration() {
            Some(frame) => ctx.request_repaint_after(frame),
            None => ctx.request_repaint(),
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(err) = self.controller.shutdown() {
            log::warn!("could not notify route service: {}", err);
        }
    }
}

fn translate_events(ctx: &egui::Context, scroll: &mut ScrollAccumulator) -> Vec<InputEvent> {
    ctx.input(|input| {
        let mut events = Vec::new();
        if input.viewport().close_requested() {
            events.push(InputEvent::Quit);
        }
        let pointer = input
            .pointer
            .latest_pos()
            .map(pixel)
            .unwrap_or(PixelPoint::ZERO);

        for event in &input.events {
            match event {
                egui::Event::Key {
                    key,
                    pressed,
                    repeat: false,
                    ..
                } => {
                    let code = key_code(*key);
                    events.push(if *pressed {
                        InputEvent::KeyDown(code)
                    } else {
                        InputEvent::KeyUp(code)
                    });
                }
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let position = pixel(*pos);
                    let button = mouse_button(*button);
                    events.push(if *pressed {
                        InputEvent::MouseDown { position, button }
                    } else {
                        InputEvent::MouseUp { position, button }
                    });
                }
                egui::Event::PointerMoved(pos) => events.push(InputEvent::MouseMove {
                    position: pixel(*pos),
                }),
                egui::Event::Scroll(delta) if delta.y != 0.0 => {
                    if let Some(notch) = scroll.push(delta.y) {
                        events.push(InputEvent::Scroll {
                            delta: notch,
                            position: pointer,
                        });
                    }
                }
                egui::Event::WindowFocused(false) => events.push(InputEvent::FocusLost),
                _ => {}
            }
        }
        events
    })
}

fn pixel(pos: egui::Pos2) -> PixelPoint {
    PixelPoint::new(pos.x as i32, pos.y as i32)
}

fn key_code(key: egui::Key) -> KeyCode {
    match key {
        egui::Key::W => KeyCode::W,
        egui::Key::A => KeyCode::A,
        egui::Key::S => KeyCode::S,
        egui::Key::D => KeyCode::D,
        egui::Key::Q => KeyCode::Q,
        egui::Key::E => KeyCode::E,
        egui::Key::R => KeyCode::R,
        egui::Key::Space => KeyCode::Space,
        other => KeyCode::Other(other as u32),
    }
}

fn mouse_button(button: egui::PointerButton) -> MouseButton {
    match button {
        egui::PointerButton::Primary => MouseButton::Left,
        egui::PointerButton::Secondary => MouseButton::Right,
        egui::PointerButton::Middle => MouseButton::Middle,
        other => MouseButton::Other(other as u16),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_shows_notices() {
        let logger = logger(env_logger::Env::new().filter("ROUTEPLOT_TEST_UNSET_FILTER")).build();
        assert!(logger.filter() >= log::LevelFilter::Info);
    }

    #[test]
    fn test_wheel_notch_zooms_once() {
        let mut scroll = ScrollAccumulator::default();
        assert_eq!(scroll.push(50.0), Some(1.0));
        assert_eq!(scroll.push(-120.0), Some(-1.0));
    }

    #[test]
    fn test_trackpad_swipe_is_collapsed() {
        let mut scroll = ScrollAccumulator::default();
        let notches: Vec<_> = (0..20).filter_map(|_| scroll.push(4.0)).collect();
        assert_eq!(notches, vec![1.0]);
    }

    #[test]
    fn test_direction_change_resets_partial_scroll() {
        let mut scroll = ScrollAccumulator::default();
        assert_eq!(scroll.push(40.0), None);
        assert_eq!(scroll.push(-40.0), None);
        assert_eq!(scroll.push(-10.0), Some(-1.0));
    }
}
