use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;
use serde_json::json;

use cluster_gauge::color::Palette;
use cluster_gauge::layers::Layout;
use cluster_gauge::{resolve, Color, Gauge, GaugeConfig, SweepState, Zone};

const SIZE: f64 = 120.0;

fn frame(size: f64, density: f64) -> Vec<u8> {
    let side = (size * density).round() as usize;
    vec![0; side * side * 4]
}

fn pixel(frame: &[u8], side: usize, x: usize, y: usize) -> Color {
    let i = (y * side + x) * 4;
    Color::rgba(frame[i], frame[i + 1], frame[i + 2], frame[i + 3])
}

#[test]
fn speed_preset_maps_seventy_exactly() {
    let mut gauge = Gauge::new("speed");
    gauge.set_value(70.0, true);
    let expected = (-225.0f64 + (70.0 / 140.0) * 270.0 - 90.0).to_radians();
    assert_relative_eq!(gauge.advance(0.0), expected, epsilon = 1e-12);
    assert_relative_eq!(gauge.advance(0.0), expected, epsilon = 1e-12);
}

#[test]
fn sweep_visits_max_then_min_and_returns_once() {
    let mut gauge = Gauge::new(json!({ "min": 0.0, "max": 100.0, "value": 50.0 }));
    let completions = Arc::new(AtomicUsize::new(0));
    let counter = completions.clone();
    gauge.on_sweep_complete(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let max_angle = gauge.value_to_angle(100.0);
    let min_angle = gauge.value_to_angle(0.0);
    let real_angle = gauge.value_to_angle(50.0);

    gauge.sweep();
    assert_eq!(gauge.sweep_state(), SweepState::SweepingUp);

    let mut t = 0.0;
    while t < 800.0 {
        gauge.advance(t);
        assert_eq!(gauge.target_angle(), max_angle);
        t += 16.0;
    }
    gauge.advance(800.0);
    assert_eq!(gauge.sweep_state(), SweepState::SweepingDown);
    assert_eq!(gauge.target_angle(), min_angle);

    t = 816.0;
    while t < 10_000.0 {
        gauge.advance(t);
        t += 16.0;
    }
    assert_eq!(gauge.sweep_state(), SweepState::Idle);
    assert_eq!(gauge.target_angle(), real_angle);
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[test]
fn values_set_during_sweep_apply_afterwards() {
    let mut gauge = Gauge::new(json!({ "value": 50.0 }));
    gauge.sweep();
    gauge.advance(0.0);
    gauge.set_value(30.0, false);
    assert_eq!(gauge.value(), 30.0);
    assert_eq!(gauge.target_angle(), gauge.value_to_angle(100.0));

    let mut t = 16.0;
    while gauge.sweep_state() != SweepState::Idle && t < 10_000.0 {
        gauge.advance(t);
        t += 16.0;
    }
    assert_eq!(gauge.sweep_state(), SweepState::Idle);
    assert_eq!(gauge.target_angle(), gauge.value_to_angle(30.0));
}

#[test]
fn legacy_redline_synthesizes_exactly_one_zone() {
    let config = GaugeConfig::builder().max(80.0).redline_start(60.0).build();
    let palette = Palette::from_config(&config);
    let layout = Layout::new(SIZE, &config, &palette, None);
    assert_eq!(layout.zones.len(), 1);
    assert_eq!((layout.zones[0].start, layout.zones[0].end), (60.0, 80.0));

    let explicit = GaugeConfig::builder()
        .max(80.0)
        .redline_start(60.0)
        .zones(vec![Zone::new(0.0, 10.0, "#00ff00")])
        .build();
    let layout = Layout::new(SIZE, &explicit, &palette, None);
    assert_eq!(layout.zones, vec![Zone::new(0.0, 10.0, "#00ff00")]);
}

#[test]
fn artwork_is_rebuilt_only_when_needed() {
    let mut gauge = Gauge::new("rpm");
    let mut small = frame(SIZE, 1.0);
    let mut dense = frame(SIZE, 2.0);

    gauge.render(&mut small, SIZE, 1.0, 0.0).unwrap();
    gauge.set_value(4.0, false);
    gauge.render(&mut small, SIZE, 1.0, 16.0).unwrap();
    gauge.render(&mut small, SIZE, 1.0, 32.0).unwrap();
    assert_eq!(gauge.artwork_rebuilds(), 1);

    gauge.render(&mut dense, SIZE, 2.0, 48.0).unwrap();
    assert_eq!(gauge.artwork_rebuilds(), 2);

    gauge.configure(json!({ "preset": "rpm", "faceStyle": "dark" }));
    gauge.render(&mut dense, SIZE, 2.0, 64.0).unwrap();
    assert_eq!(gauge.artwork_rebuilds(), 3);

    gauge.set_ring_value(0, 1.0);
    gauge.set_reduced_motion(true);
    gauge.render(&mut dense, SIZE, 2.0, 80.0).unwrap();
    assert_eq!(gauge.artwork_rebuilds(), 3);
}

#[test]
fn needle_moves_between_frames() {
    let mut gauge = Gauge::new(json!({ "value": 0.0, "background": "#000000" }));
    let side = SIZE as usize;
    let mut at_min = frame(SIZE, 1.0);
    gauge.render(&mut at_min, SIZE, 1.0, 0.0).unwrap();

    gauge.set_value(100.0, true);
    let mut at_max = frame(SIZE, 1.0);
    gauge.render(&mut at_max, SIZE, 1.0, 16.0).unwrap();

    assert_ne!(at_min, at_max);
    assert_eq!(pixel(&at_min, side, 0, 0), Color::BLACK);
    assert_eq!(pixel(&at_max, side, 0, 0), Color::BLACK);
}

#[test]
fn every_layer_draws_without_panicking() {
    let config = resolve(json!({
        "preset": "boost",
        "showOdometer": true,
        "showDigitalValue": true,
        "needleGlow": true,
        "innerRing": {},
        "microTicks": {},
        "activeTicks": {},
        "progressArc": { "stops": [] , "color": "#00ff00" },
        "texts": [{ "text": "TURBO", "x": 0.5, "y": 0.3 }],
        "rings": [
            { "value": 90.0, "segments": 12, "flashThreshold": 80.0 },
            { "value": 20.0, "radius": 0.4, "startAngle": 90.0, "endAngle": -90.0 }
        ],
        "complications": [{
            "x": 0.3, "y": 0.7, "value": 40.0,
            "startAngle": 100.0, "endAngle": -100.0,
            "label": "OIL", "units": "bar",
            "zones": [{ "start": 80.0, "end": 100.0, "color": "#ff0000" }],
            "pointer": {}, "marker": { "value": 60.0 },
            "labels": [{ "text": "LO", "at": 0.0 }, { "text": "HI", "at": 100.0 }]
        }],
        "colors": { "needle": "not-a-color" }
    }));
    let mut gauge = Gauge::new(config);
    gauge.set_value(1.0, false);
    let mut buf = frame(SIZE, 1.5);
    let mut t = 0.0;
    for _ in 0..5 {
        gauge.render(&mut buf, SIZE, 1.5, t).unwrap();
        t += 16.0;
    }
    assert!(gauge.angle().is_finite());
}

#[test]
fn degenerate_configuration_still_renders() {
    let mut gauge = Gauge::new(json!({
        "min": 5.0, "max": 5.0, "startAngle": 30.0, "endAngle": 30.0
    }));
    let mut buf = frame(SIZE, 1.0);
    let angle = gauge.render(&mut buf, SIZE, 1.0, 0.0).unwrap();
    assert!(angle.is_finite());
    gauge.set_value(1e9, false);
    assert!(gauge.render(&mut buf, SIZE, 1.0, 1000.0).unwrap().is_finite());
}

#[test]
fn unknown_preset_falls_back_to_defaults() {
    let gauge = Gauge::new("hyperdrive");
    assert_eq!(gauge.config(), &GaugeConfig::default());
}

#[test]
fn labels_units_readout_and_texts_reach_the_frame() {
    let decorated = json!({
        "preset": "speed",
        "label": "SPEED",
        "units": "km/h",
        "customLabels": ["0", "20", "40", "60", "80", "100", "120", "MAX"],
        "showDigitalValue": true,
        "digitalDisplay": { "background": null },
        "texts": [{ "text": "ECO", "x": 0.5, "y": 0.3 }]
    });
    let bare = json!({ "preset": "speed", "label": "", "units": "" });
    let render = |config: &serde_json::Value, with_font: bool| {
        let mut gauge = Gauge::new(config.clone());
        if !with_font {
            gauge.set_typeface(None);
        }
        let mut buf = frame(200.0, 1.0);
        gauge.render(&mut buf, 200.0, 1.0, 0.0).unwrap();
        buf
    };

    assert_ne!(render(&decorated, true), render(&bare, true));
    // Without a font the same two configurations are indistinguishable.
    assert_eq!(render(&decorated, false), render(&bare, false));
}

#[test]
fn huge_counts_render_without_exhausting_memory() {
    let mut gauge = Gauge::new(json!({
        "majorTicks": 2,
        "minorTicks": u32::MAX,
        "microTicks": { "count": u32::MAX },
        "rings": [{ "value": 50.0, "segments": u32::MAX }],
        "complications": [{ "ticks": { "count": u32::MAX } }]
    }));
    let mut buf = frame(SIZE, 1.0);
    for i in 0..3 {
        gauge.render(&mut buf, SIZE, 1.0, i as f64 * 16.0).unwrap();
    }
    assert!(gauge.angle().is_finite());
}
