use routeplot::{
    input::{KeyCode, MouseButton, QueuedEvents, TickOutcome},
    prelude::*,
    rendering::DrawCommand,
};
use std::io::Cursor;

type TestChannel = StreamChannel<Cursor<Vec<u8>>, Vec<u8>>;

fn channel(response: &str) -> TestChannel {
    StreamChannel::new(
        Cursor::new(response.as_bytes().to_vec()),
        Vec::new(),
        NoticeRoute::Log,
    )
}

fn controller(response: &str) -> InputController<TestChannel> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut config = MapConfig::default();
    config.frame.target_fps = None;
    let tiles = MemoryTileProvider::solid(10..=16, 8, 8);
    let map = MapView::new(config, Box::new(tiles)).unwrap();
    InputController::new(map, channel(response))
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
fn test_end_to_end_route() {
    let mut controller = controller("45.1 -113.2\n45.3 -113.4\nE\n");
    let mut sink = RecordingSink::new();

    let offset = controller.map().viewport().offset();
    let projection = controller.map().projection().clone();
    let first = projection
        .unproject(offset + PixelPoint::new(100, 100), 12)
        .unwrap();
    let second = projection
        .unproject(offset + PixelPoint::new(150, 120), 12)
        .unwrap();
    let pair_color = controller.map().annotations().current_color();

    controller.tick(click(100, 100), &mut sink).unwrap();
    controller.tick(click(150, 120), &mut sink).unwrap();

    assert_eq!(
        sent(&controller),
        format!(
            "{:.6} {:.6}\n{:.6} {:.6}\n",
            first.lat, first.lng, second.lat, second.lng
        )
    );

    let annotations = controller.map().annotations();
    assert_eq!(annotations.routes().len(), 1);
    let route = &annotations.routes()[0];
    assert_eq!(
        route.waypoints(),
        &[LatLng::new(45.1, -113.2), LatLng::new(45.3, -113.4)]
    );
    assert_eq!(route.color(), pair_color);
    assert_eq!(annotations.dots()[0].color(), pair_color);
    assert_eq!(annotations.dots()[1].color(), pair_color);
    assert_ne!(annotations.current_color(), pair_color);

    let frame = sink.last_frame().unwrap();
    assert!(frame
        .iter()
        .any(|command| matches!(command, DrawCommand::Polyline { width: 2, color, .. } if *color == pair_color)));
}

#[test]
fn test_protocol_recovery_adds_no_route() {
    let mut controller = controller("bad\n1.0 2.0 3.0\nE\n");
    let mut sink = RecordingSink::new();

    controller.tick(click(10, 10), &mut sink).unwrap();
    controller.tick(click(20, 20), &mut sink).unwrap();

    assert!(controller.map().annotations().routes().is_empty());
    assert_eq!(controller.client().exchanges(), 1);
    assert_eq!(controller.client().state(), ExchangeState::Idle);
}

#[test]
fn test_single_waypoint_is_rejected_until_a_valid_end() {
    let mut client = ProtocolClient::new(channel("45.0 -113.0\nE\n45.1 -113.2\n45.3 -113.4\nE\n"));
    let pair = DotPair {
        start: Dot::new(LatLng::new(53.5, -113.5), Color::WHITE),
        end: Dot::new(LatLng::new(53.6, -113.4), Color::WHITE),
    };

    let response = client.request_route(&pair).unwrap();
    assert_eq!(response.notices, vec![ProtocolNotice::NotEnoughWaypoints]);
    assert_eq!(response.waypoints.len(), 2);
}

#[test]
fn test_consecutive_pairs_get_distinct_colors() {
    let mut controller = controller("E\nE\nE\n");
    let mut sink = RecordingSink::new();

    for k in 0..3 {
        controller.tick(click(10 + k, 10), &mut sink).unwrap();
        controller.tick(click(40 + k, 40), &mut sink).unwrap();
    }

    let dots = controller.map().annotations().dots();
    assert_eq!(dots.len(), 6);
    for pair in dots.chunks(2) {
        assert_eq!(pair[0].color(), pair[1].color());
    }
    assert_ne!(dots[0].color(), dots[2].color());
    assert_ne!(dots[2].color(), dots[4].color());
    assert_eq!(controller.client().exchanges(), 3);
}

#[test]
fn test_closed_channel_stops_the_loop() {
    let mut controller = controller("45.1 -113.2\n");
    let mut sink = RecordingSink::new();
    let mut events = QueuedEvents::new(vec![click(10, 10), click(20, 20), Vec::new()]);

    let result = controller.run(&mut events, &mut sink);
    assert!(matches!(result, Err(MapError::ChannelClosed)));
    assert!(sent(&controller).ends_with("Q\n"));
}

#[test]
fn test_zoom_keeps_geography_under_cursor() {
    let mut controller = controller("");
    let mut sink = RecordingSink::new();
    let cursor = PixelPoint::new(260, 240);

    controller
        .tick(vec![InputEvent::MouseMove { position: cursor }], &mut sink)
        .unwrap();
    let before = controller.map().lat_lng_at(cursor).unwrap();

    controller
        .tick(vec![InputEvent::KeyUp(KeyCode::Q)], &mut sink)
        .unwrap();
    assert_eq!(controller.map().viewport().zoom(), 13);
    let after = controller.map().lat_lng_at(cursor).unwrap();

    let pixel_degrees = 360.0 / (2_f64.powi(13) * 256.0);
    assert!((after.lat - before.lat).abs() < 2.0 * pixel_degrees);
    assert!((after.lng - before.lng).abs() < 2.0 * pixel_degrees);
    assert!(sink.texts().any(|text| text == "Loading ..."));
    assert!(sink.texts().any(|text| text == "Zoom: 3"));
}

#[test]
fn test_scripted_session() {
    let script = DotScript::from_json_str(
        r#"{"scenarios": {"pairs": [[[100, 100], [150, 120]], [[200, 200], [220, 260]]]}}"#,
        "pairs",
    )
    .unwrap();
    let response = "45.1 -113.2\n45.3 -113.4\nE\n53.5 -113.5\n53.6 -113.4\nE\n";
    let mut controller = controller(response).with_script(script);
    let mut sink = RecordingSink::new();
    let space = || vec![InputEvent::KeyUp(KeyCode::Space)];
    let mut events = QueuedEvents::new(vec![space(), space(), space(), Vec::new()]);

    controller.run(&mut events, &mut sink).unwrap();

    assert_eq!(controller.map().annotations().dots().len(), 4);
    assert_eq!(controller.map().annotations().routes().len(), 2);
    assert_eq!(sent(&controller).lines().count(), 5);
    assert!(sent(&controller).ends_with("Q\n"));
}

#[test]
fn test_refresh_then_new_pair_still_triggers() {
    let mut controller = controller("E\nE\n");
    let mut sink = RecordingSink::new();

    controller.tick(click(10, 10), &mut sink).unwrap();
    controller.tick(click(20, 20), &mut sink).unwrap();
    let outcome = controller
        .tick(vec![InputEvent::KeyUp(KeyCode::R)], &mut sink)
        .unwrap();
    assert_eq!(outcome, TickOutcome::Continue);
    assert!(controller.map().annotations().dots().is_empty());

    controller.tick(click(30, 30), &mut sink).unwrap();
    controller.tick(click(40, 40), &mut sink).unwrap();
    assert_eq!(controller.client().exchanges(), 2);
}
