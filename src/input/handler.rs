use crate::{
    core::{
        config::FrameTimingConfig, constants::STATUS_CALCULATING, geo::PixelPoint, map::MapView,
        viewport::ZoomDirection,
    },
    input::{
        events::{InputEvent, InputState, KeyCode},
        script::DotScript,
    },
    prelude::{Duration, Instant},
    protocol::{channel::LineChannel, client::ProtocolClient},
    rendering::sink::RenderSink,
    Result,
};
use std::collections::VecDeque;

/// Whether the loop keeps going after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Anything that can hand over the input gathered since the last frame.
pub trait EventSource {
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// Replays prepared frames of events, then reports [`InputEvent::Quit`].
#[derive(Debug, Clone, Default)]
pub struct QueuedEvents {
    frames: VecDeque<Vec<InputEvent>>,
}

impl QueuedEvents {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl EventSource for QueuedEvents {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.frames
            .pop_front()
            .unwrap_or_else(|| vec![InputEvent::Quit])
    }
}

/// Paces the loop to the configured frame rate
#[derive(Debug)]
pub struct FrameClock {
    frame: Option<Duration>,
    last: Instant,
    frames: u64,
}

impl FrameClock {
    pub fn new(timing: &FrameTimingConfig) -> Self {
        Self {
            frame: timing.target_frame_duration(),
            last: Instant::now(),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Sleeps out the rest of the current frame. A frame that already ran
    /// long (a route exchange, a tile load) is not made up for.
    pub fn wait(&mut self) {
        if let Some(frame) = self.frame {
            let elapsed = self.last.elapsed();
            if elapsed < frame {
                std::thread::sleep(frame - elapsed);
            }
        }
        self.last = Instant::now();
        self.frames += 1;
    }
}

/// Turns input into map changes and route requests, one tick at a time.
///
/// A tick drains the given events, applies continuous pan and drag from what
/// is still held, runs at most one route exchange, then renders a frame. The
/// exchange blocks the tick until the route service answers.
pub struct InputController<C> {
    map: MapView,
    client: ProtocolClient<C>,
    state: InputState,
    script: Option<DotScript>,
    quit_sent: bool,
}

impl<C: LineChannel> InputController<C> {
    pub fn new(map: MapView, channel: C) -> Self {
        Self {
            map,
            client: ProtocolClient::new(channel),
            state: InputState::new(),
            script: None,
            quit_sent: false,
        }
    }

    /// Feeds scripted dot batches on the space key
    pub fn with_script(mut self, script: DotScript) -> Self {
        self.script = Some(script);
        self
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn client(&self) -> &ProtocolClient<C> {
        &self.client
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn tick(
        &mut self,
        events: impl IntoIterator<Item = InputEvent>,
        sink: &mut dyn RenderSink,
    ) -> Result<TickOutcome> {
        for event in events {
            if self.handle_event(event, sink)? == TickOutcome::Quit {
                return Ok(TickOutcome::Quit);
            }
        }

        for direction in self.state.held_pan_directions() {
            self.map.pan(direction);
        }
        let delta = self.state.take_drag_delta();
        if delta != PixelPoint::ZERO {
            self.map.drag(delta);
        }

        if let Some(pair) = self.map.check_pair_complete() {
            self.map
                .render(sink, self.state.pointer(), Some(STATUS_CALCULATING))?;
            let response = self.client.request_route(&pair)?;
            self.map.add_route(response.waypoints, pair.color())?;
        }

        self.map.render(sink, self.state.pointer(), None)?;
        Ok(TickOutcome::Continue)
    }

    /// Ticks until quit, pacing frames, then tells the route service to stop.
    pub fn run<S: EventSource + ?Sized>(
        &mut self,
        source: &mut S,
        sink: &mut dyn RenderSink,
    ) -> Result<()> {
        let mut clock = FrameClock::new(&self.map.config().frame);
        log::info!("input loop started");

        loop {
            let events = source.poll_events();
            match self.tick(events, sink) {
                Ok(TickOutcome::Continue) => clock.wait(),
                Ok(TickOutcome::Quit) => break,
                Err(err) => {
                    if let Err(shutdown_err) = self.shutdown() {
                        log::warn!("could not notify route service: {}", shutdown_err);
                    }
                    return Err(err);
                }
            }
        }

        log::info!("input loop finished after {} frames", clock.frames());
        self.shutdown()
    }

    /// Sends the quit line once. Later calls do nothing.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.quit_sent {
            return Ok(());
        }
        self.quit_sent = true;
        self.client.shutdown()
    }

    fn handle_event(&mut self, event: InputEvent, sink: &mut dyn RenderSink) -> Result<TickOutcome> {
        if event == InputEvent::Quit {
            log::info!("quit requested");
            return Ok(TickOutcome::Quit);
        }

        if let Some(click) = self.state.apply(&event) {
            let dot = self.map.add_dot(click)?;
            log::info!("dot placed at {}", dot);
        }

        let pointer = self.state.pointer();
        match event {
            InputEvent::KeyUp(KeyCode::Q) => {
                self.map.change_zoom(ZoomDirection::In, pointer, sink)?;
            }
            InputEvent::KeyUp(KeyCode::E) => {
                self.map.change_zoom(ZoomDirection::Out, pointer, sink)?;
            }
            InputEvent::KeyUp(KeyCode::R) => self.map.refresh(),
            InputEvent::KeyUp(KeyCode::Space) => return self.play_script_batch(),
            InputEvent::Scroll { delta, position } if delta > 0.0 => {
                self.map.change_zoom(ZoomDirection::In, position, sink)?;
            }
            InputEvent::Scroll { delta, position } if delta < 0.0 => {
                self.map.change_zoom(ZoomDirection::Out, position, sink)?;
            }
            _ => {}
        }
        Ok(TickOutcome::Continue)
    }

    fn play_script_batch(&mut self) -> Result<TickOutcome> {
        let Some(script) = self.script.as_mut() else {
            log::debug!("no dot script loaded");
            return Ok(TickOutcome::Continue);
        };
        let Some(batch) = script.next_batch() else {
            log::info!("dot script '{}' exhausted", script.scenario());
            return Ok(TickOutcome::Quit);
        };

        for position in batch {
            self.map.add_dot(position)?;
        }
        Ok(TickOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::config::MapConfig,
        input::events::MouseButton,
        protocol::channel::{NoticeRoute, StreamChannel},
        rendering::sink::RecordingSink,
        tiles::source::MemoryTileProvider,
    };
    use std::io::Cursor;

    type TestChannel = StreamChannel<Cursor<Vec<u8>>, Vec<u8>>;

    fn controller(response: &str) -> InputController<TestChannel> {
        let mut config = MapConfig::default();
        config.frame.target_fps = None;
        let map = MapView::new(config, Box::new(MemoryTileProvider::solid(10..=16, 4, 4))).unwrap();
        let channel = StreamChannel::new(
            Cursor::new(response.as_bytes().to_vec()),
            Vec::new(),
            NoticeRoute::Log,
        );
        InputController::new(map, channel)
    }

    fn sent(controller: &InputController<TestChannel>) -> String {
        String::from_utf8(controller.client().channel().writer().clone()).unwrap()
    }

    fn click(x: i32, y: i32) -> Vec<InputEvent> {
        let position = PixelPoint::new(x, y);
        vec![
            InputEvent::MouseDown {
                position,
                button: MouseButton::Left,
            },
            InputEvent::MouseUp {
                position,
                button: MouseButton::Left,
            },
        ]
    }

    #[test]
    fn test_quit_stops_the_tick() {
        let mut controller = controller("");
        let mut sink = RecordingSink::new();
        let outcome = controller
            .tick(vec![InputEvent::Quit, InputEvent::KeyUp(KeyCode::Q)], &mut sink)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Quit);
        assert_eq!(controller.map().viewport().zoom(), 12);
        assert!(sink.frames().is_empty());
    }

    #[test]
    fn test_held_key_pans_every_tick() {
        let mut controller = controller("");
        let mut sink = RecordingSink::new();
        let start = controller.map().viewport().offset();

        controller
            .tick(vec![InputEvent::KeyDown(KeyCode::D)], &mut sink)
            .unwrap();
        controller.tick(Vec::new(), &mut sink).unwrap();
        controller
            .tick(vec![InputEvent::KeyUp(KeyCode::D)], &mut sink)
            .unwrap();

        assert_eq!(
            controller.map().viewport().offset(),
            start + PixelPoint::new(2, 0)
        );
        assert_eq!(sink.frames().len(), 3);
    }

    #[test]
    fn test_drag_does_not_place_a_dot() {
        let mut controller = controller("");
        let mut sink = RecordingSink::new();
        let start = controller.map().viewport().offset();

        controller
            .tick(
                vec![
                    InputEvent::MouseDown {
                        position: PixelPoint::new(200, 200),
                        button: MouseButton::Left,
                    },
                    InputEvent::MouseMove {
                        position: PixelPoint::new(190, 205),
                    },
                ],
                &mut sink,
            )
            .unwrap();
        controller
            .tick(
                vec![InputEvent::MouseUp {
                    position: PixelPoint::new(190, 205),
                    button: MouseButton::Left,
                }],
                &mut sink,
            )
            .unwrap();

        assert_eq!(
            controller.map().viewport().offset(),
            start + PixelPoint::new(10, -5)
        );
        assert!(controller.map().annotations().dots().is_empty());
    }

    #[test]
    fn test_key_bindings_zoom_and_refresh() {
        let mut controller = controller("");
        let mut sink = RecordingSink::new();

        controller
            .tick(vec![InputEvent::KeyUp(KeyCode::Q)], &mut sink)
            .unwrap();
        assert_eq!(controller.map().viewport().zoom(), 13);
        controller
            .tick(
                vec![
                    InputEvent::KeyUp(KeyCode::E),
                    InputEvent::KeyUp(KeyCode::E),
                ],
                &mut sink,
            )
            .unwrap();
        assert_eq!(controller.map().viewport().zoom(), 11);

        controller.tick(click(50, 50), &mut sink).unwrap();
        assert_eq!(controller.map().annotations().dots().len(), 1);
        controller
            .tick(vec![InputEvent::KeyUp(KeyCode::R)], &mut sink)
            .unwrap();
        assert!(controller.map().annotations().dots().is_empty());
    }

    #[test]
    fn test_scroll_zooms_around_pointer() {
        let mut controller = controller("");
        let mut sink = RecordingSink::new();
        let position = PixelPoint::new(300, 200);

        controller
            .tick(vec![InputEvent::Scroll { delta: 1.0, position }], &mut sink)
            .unwrap();
        assert_eq!(controller.map().viewport().zoom(), 13);
        assert_eq!(controller.state().pointer(), position);

        controller
            .tick(vec![InputEvent::Scroll { delta: -2.0, position }], &mut sink)
            .unwrap();
        assert_eq!(controller.map().viewport().zoom(), 12);
    }

    #[test]
    fn test_pair_triggers_one_exchange() {
        let mut controller = controller("53.5 -113.5\n53.6 -113.4\nE\n");
        let mut sink = RecordingSink::new();

        controller.tick(click(100, 100), &mut sink).unwrap();
        assert!(sent(&controller).is_empty());

        controller.tick(click(150, 120), &mut sink).unwrap();
        assert_eq!(sent(&controller).lines().count(), 2);
        assert_eq!(controller.client().exchanges(), 1);
        assert_eq!(controller.map().annotations().routes().len(), 1);
        assert!(sink.texts().any(|text| text == "Calculating Route ..."));

        controller.tick(Vec::new(), &mut sink).unwrap();
        assert_eq!(controller.client().exchanges(), 1);
    }

    #[test]
    fn test_script_batches_then_quit() {
        let script = DotScript::new(
            "test",
            vec![vec![PixelPoint::new(10, 10), PixelPoint::new(40, 30)]],
        );
        let mut controller = controller("E\n").with_script(script);
        let mut sink = RecordingSink::new();

        let outcome = controller
            .tick(vec![InputEvent::KeyUp(KeyCode::Space)], &mut sink)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(controller.map().annotations().dots().len(), 2);
        assert_eq!(controller.client().exchanges(), 1);
        assert!(controller.map().annotations().routes().is_empty());

        let outcome = controller
            .tick(vec![InputEvent::KeyUp(KeyCode::Space)], &mut sink)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Quit);
    }

    #[test]
    fn test_space_without_script_is_ignored() {
        let mut controller = controller("");
        let mut sink = RecordingSink::new();
        let outcome = controller
            .tick(vec![InputEvent::KeyUp(KeyCode::Space)], &mut sink)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Continue);
    }

    #[test]
    fn test_run_sends_quit_once() {
        let mut controller = controller("");
        let mut sink = RecordingSink::new();
        let mut events = QueuedEvents::new(vec![Vec::new(), Vec::new()]);

        controller.run(&mut events, &mut sink).unwrap();
        controller.shutdown().unwrap();

        assert_eq!(sent(&controller), "Q\n");
        assert_eq!(sink.frames().len(), 2);
    }
}
