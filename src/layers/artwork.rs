// ============================================================================
// STATIC ARTWORK
// ============================================================================
//
// Value-independent layers, back to front. Rebuilt only when size, pixel density or the
// configuration revision change.

use std::f64::consts::SQRT_2;

use crate::canvas::{ArcSpan, Canvas, PixelBuffer};
use crate::color::{interpolate_colors, Color, Palette};
use crate::config::{FaceStyle, GaugeConfig};
use crate::error::Result;
use crate::geometry::{fraction_to_angle, value_to_angle};
use crate::text::{draw_text, Typeface};

use super::{color_or, draw_tick, Layout, Scene, StaticLayer};

pub const STATIC_LAYERS: &[(&str, StaticLayer)] = &[
    ("shadow", draw_shadow),
    ("bezel", draw_bezel),
    ("lip", draw_lip),
    ("face", draw_face),
    ("texts", draw_texts),
    ("zones", draw_zones),
    ("micro-ticks", draw_micro_ticks),
    ("ticks", draw_ticks),
    ("labels", draw_labels),
    ("label-units", draw_label_and_units),
    ("odometer", draw_odometer),
    ("inner-ring", draw_inner_ring),
    ("glass", draw_glass),
];

/// Pre-rendered static layers for one size, density and configuration revision.
#[derive(Debug, Clone)]
pub struct StaticArtwork {
    size: f64,
    density: f64,
    revision: u64,
    buffer: PixelBuffer,
}

impl StaticArtwork {
    pub fn is_current(&self, size: f64, density: f64, revision: u64) -> bool {
        self.size == size && self.density == density && self.revision == revision
    }

    pub fn pixels(&self) -> &[u8] {
        &self.buffer.pixels
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }
}

/// Side of the physical surface for a logical `size` at `density`.
pub fn physical_side(size: f64, density: f64) -> usize {
    let side = (size * density).round();
    if side.is_finite() && side > 0.0 {
        side as usize
    } else {
        0
    }
}

/// Renders every static layer into a new offscreen surface.
pub fn build_static_artwork(
    size: f64,
    density: f64,
    revision: u64,
    config: &GaugeConfig,
    palette: &Palette,
    typeface: Option<&Typeface>,
    layout: &Layout,
) -> Result<StaticArtwork> {
    let side = physical_side(size, density);
    let mut buffer = PixelBuffer::new(side, side, density)?;
    {
        let mut canvas = buffer.canvas()?;
        let scene = Scene {
            config,
            palette,
            typeface,
            layout,
        };
        paint_static_layers(&mut canvas, &scene);
    }
    log::debug!("built static artwork {side}x{side} (size {size}, density {density}, revision {revision})");
    Ok(StaticArtwork {
        size,
        density,
        revision,
        buffer,
    })
}

/// Clears to the background and draws every static layer straight onto `canvas`.
pub fn paint_static_layers(canvas: &mut Canvas, scene: &Scene) {
    canvas.clear(Color::parse_or(&scene.config.background, Color::WHITE));
    for (name, layer) in STATIC_LAYERS {
        log::trace!("static layer {name}");
        layer(canvas, scene);
    }
}

// ----------------------------------------------------------------------------
// Case
// ----------------------------------------------------------------------------

fn draw_shadow(canvas: &mut Canvas, scene: &Scene) {
    let d = &scene.layout.dial;
    let soft = d.r * 0.06;
    canvas.fill_band(d.cx, d.cy + d.r * 0.02, 0.0, d.r + soft, None, |s| {
        let fade = ((d.r + soft - s.distance) / (2.0 * soft)).clamp(0.0, 1.0);
        Color::BLACK.with_alpha(0.35 * fade * fade)
    });
}

fn draw_bezel(canvas: &mut Canvas, scene: &Scene) {
    let d = &scene.layout.dial;
    let stops = match scene.config.face_style {
        FaceStyle::Light => [
            (0.0, Color::new(0xf5, 0xf5, 0xf5)),
            (0.5, Color::new(0x9e, 0x9e, 0x9e)),
            (1.0, Color::new(0x42, 0x42, 0x42)),
        ],
        FaceStyle::Dark => [
            (0.0, Color::new(0x8a, 0x8d, 0x93)),
            (0.5, Color::new(0x3a, 0x3c, 0x40)),
            (1.0, Color::new(0x11, 0x12, 0x14)),
        ],
    };
    // Diagonal from the top-left highlight to the bottom-right shadow.
    canvas.fill_band(d.cx, d.cy, d.bezel_inner, d.r, None, |s| {
        let t = 0.5 + ((s.x - d.cx) + (s.y - d.cy)) / (2.0 * SQRT_2 * d.r);
        interpolate_colors(&stops, t, Color::BLACK)
    });
}

fn draw_lip(canvas: &mut Canvas, scene: &Scene) {
    let d = &scene.layout.dial;
    let face = scene.palette.face_color();
    let inner = d.face * 0.9;
    let depth = (d.bezel_inner - inner).max(f64::EPSILON);
    canvas.fill_band(d.cx, d.cy, inner, d.bezel_inner, None, |s| {
        face.darken(0.25 + 0.35 * ((s.distance - inner) / depth).clamp(0.0, 1.0))
    });
}

fn draw_face(canvas: &mut Canvas, scene: &Scene) {
    let d = &scene.layout.dial;
    let face = scene.palette.face_color();
    let (hi, lo) = match scene.config.face_style {
        FaceStyle::Light => (face.lighten(0.08), face.darken(0.12)),
        FaceStyle::Dark => (face.lighten(0.06), face.darken(0.35)),
    };
    let stops = [(0.0, hi), (0.55, face), (1.0, lo)];
    // Light falls from slightly above center.
    let (lx, ly) = (d.cx, d.cy - d.face * 0.2);
    let reach = d.face * 1.2;
    canvas.fill_band(d.cx, d.cy, 0.0, d.face, None, |s| {
        let t = (s.x - lx).hypot(s.y - ly) / reach;
        interpolate_colors(&stops, t, face)
    });
}

// ----------------------------------------------------------------------------
// Markings
// ----------------------------------------------------------------------------

fn draw_texts(canvas: &mut Canvas, scene: &Scene) {
    let layout = scene.layout;
    for item in &scene.config.texts {
        let size = layout.radius(item.font_size.unwrap_or(0.08));
        let color = color_or(item.color.as_deref(), scene.palette.label_color());
        draw_text(
            canvas,
            scene.typeface,
            item.x * layout.size,
            item.y * layout.size,
            &item.text,
            size,
            color,
        );
    }
}

fn draw_zones(canvas: &mut Canvas, scene: &Scene) {
    let layout = scene.layout;
    let d = &layout.dial;
    let redline = scene.palette.redline_color();
    for zone in &layout.zones {
        let from = value_to_angle(scene.config, zone.start);
        let to = value_to_angle(scene.config, zone.end);
        let outer = d.tick_outer - layout.radius(zone.offset.unwrap_or(0.0));
        let inner = outer - layout.radius(zone.width.unwrap_or(0.05));
        let color = Color::parse_or(&zone.color, redline);
        canvas.fill_band(d.cx, d.cy, inner, outer, Some(ArcSpan::new(from, to)), |_| color);
    }
}

fn draw_micro_ticks(canvas: &mut Canvas, scene: &Scene) {
    let Some(micro) = &scene.config.micro_ticks else {
        return;
    };
    let config = scene.config;
    if micro.count == 0 || config.start_angle == config.end_angle {
        return;
    }
    let layout = scene.layout;
    let d = &layout.dial;
    let color = color_or(micro.color.as_deref(), scene.palette.minor_ticks_color());
    let outer = d.tick_inner();
    let inner = outer - layout.radius(micro.length);
    for i in 0..=micro.count {
        let angle = fraction_to_angle(
            i as f64 / micro.count as f64,
            config.start_angle,
            config.end_angle,
        );
        let (x0, y0) = d.point(angle, outer);
        let (x1, y1) = d.point(angle, inner);
        canvas.draw_thick_line_aa(x0, y0, x1, y1, micro.width, color);
    }
}

fn draw_ticks(canvas: &mut Canvas, scene: &Scene) {
    let palette = scene.palette;
    let (major, minor, redline) = (
        palette.ticks_color(),
        palette.minor_ticks_color(),
        palette.redline_color(),
    );
    for tick in &scene.layout.ticks.ticks {
        let color = if scene.config.is_danger(tick.value) {
            redline
        } else if tick.major {
            major
        } else {
            minor
        };
        draw_tick(canvas, &scene.layout.dial, tick, color);
    }
}

fn draw_labels(canvas: &mut Canvas, scene: &Scene) {
    let layout = scene.layout;
    let ticks = &layout.ticks;
    let size = ticks.font_size;
    let (numbers, redline) = (scene.palette.numbers_color(), scene.palette.redline_color());
    for tick in &ticks.ticks {
        let Some(text) = tick.label.and_then(|i| ticks.labels.get(i)) else {
            continue;
        };
        let color = if scene.config.is_danger(tick.value) {
            redline
        } else {
            numbers
        };
        let (x, y) = layout.dial.point(tick.angle, ticks.label_radius);
        draw_text(canvas, scene.typeface, x, y, text, size, color);
    }
}

fn draw_label_and_units(canvas: &mut Canvas, scene: &Scene) {
    let layout = scene.layout;
    let d = &layout.dial;
    let config = scene.config;
    if !config.label.is_empty() {
        draw_text(
            canvas,
            scene.typeface,
            d.cx,
            d.cy - layout.radius(0.35),
            &config.label,
            layout.radius(0.09),
            scene.palette.label_color(),
        );
    }
    if !config.units.is_empty() {
        draw_text(
            canvas,
            scene.typeface,
            d.cx,
            d.cy + layout.radius(0.22),
            &config.units,
            layout.radius(0.07),
            scene.palette.units_color(),
        );
    }
}

/// Six-digit counter window; the digits are a fixed placeholder.
fn draw_odometer(canvas: &mut Canvas, scene: &Scene) {
    if !scene.config.show_odometer {
        return;
    }
    let layout = scene.layout;
    let d = &layout.dial;
    let (w, h) = (layout.radius(0.5), layout.radius(0.12));
    let (x, y) = (d.cx - w / 2.0, d.cy + layout.radius(0.4));
    let frame = scene.palette.ticks_color();
    canvas.fill_rounded_rect(x, y, w, h, h * 0.15, Color::new(0x12, 0x12, 0x12));
    canvas.stroke_rect(x, y, w, h, 1.0, frame.with_alpha(0.6));
    let cell = w / 6.0;
    for i in 1..6 {
        let cx = x + cell * i as f64;
        canvas.draw_thick_line_aa(cx, y, cx, y + h, 0.75, Color::new(0x3a, 0x3a, 0x3a));
    }
    for i in 0..6 {
        draw_text(
            canvas,
            scene.typeface,
            x + cell * (i as f64 + 0.5),
            y + h / 2.0,
            "0",
            h * 0.7,
            Color::new(0xee, 0xee, 0xee),
        );
    }
}

fn draw_inner_ring(canvas: &mut Canvas, scene: &Scene) {
    let Some(ring) = &scene.config.inner_ring else {
        return;
    };
    let layout = scene.layout;
    let d = &layout.dial;
    let color = color_or(ring.color.as_deref(), scene.palette.ticks_color());
    let (r, half) = (layout.radius(ring.radius), layout.radius(ring.width) / 2.0);
    canvas.fill_band(d.cx, d.cy, r - half, r + half, None, |_| color);
}

fn draw_glass(canvas: &mut Canvas, scene: &Scene) {
    let layout = scene.layout;
    let d = &layout.dial;
    canvas.fill_ellipse(
        d.cx - layout.radius(0.2),
        d.cy - layout.radius(0.45),
        layout.radius(0.75),
        layout.radius(0.28),
        -0.35,
        |k| Color::WHITE.with_alpha(0.18 * (1.0 - k).powi(2)),
    );
    let inner = layout.radius(0.75);
    let depth = (d.face - inner).max(f64::EPSILON);
    canvas.fill_band(d.cx, d.cy, inner, d.face, None, |s| {
        let t = ((s.distance - inner) / depth).clamp(0.0, 1.0);
        Color::BLACK.with_alpha(0.25 * t * t)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Zone;
    use crate::text::Typeface;

    fn build(config: &GaugeConfig, size: f64, density: f64) -> StaticArtwork {
        let palette = Palette::from_config(config);
        let layout = Layout::new(size, config, &palette, None);
        build_static_artwork(size, density, 1, config, &palette, None, &layout).unwrap()
    }

    #[test]
    fn artwork_is_sized_by_density() {
        let art = build(&GaugeConfig::default(), 100.0, 2.0);
        assert_eq!((art.buffer().width, art.buffer().height), (200, 200));
        assert!(art.is_current(100.0, 2.0, 1));
        assert!(!art.is_current(100.0, 1.0, 1));
        assert!(!art.is_current(100.0, 2.0, 2));
    }

    #[test]
    fn corners_keep_background_and_face_is_painted() {
        let config = GaugeConfig::builder().background("#0000ff").build();
        let art = build(&config, 200.0, 1.0);
        assert_eq!(art.buffer().pixel(0, 0), Some(Color::new(0, 0, 0xff)));
        let center = art.buffer().pixel(100, 100).unwrap();
        assert_ne!(center, Color::new(0, 0, 0xff));
        assert_eq!(center.a, 0xff);
    }

    #[test]
    fn zone_band_takes_zone_color() {
        let config = GaugeConfig::builder()
            .zones(vec![Zone {
                width: Some(0.2),
                ..Zone::new(0.0, 100.0, "#00ff00")
            }])
            .major_ticks(0)
            .build();
        let palette = Palette::from_config(&config);
        let layout = Layout::new(200.0, &config, &palette, None);
        let art = build_static_artwork(200.0, 1.0, 0, &config, &palette, None, &layout).unwrap();
        // Straight up is the middle of the default sweep.
        let y = (layout.dial.cy - layout.dial.tick_outer + layout.radius(0.1)).round() as usize;
        let c = art.buffer().pixel(100, y).unwrap();
        assert!(c.g > 0xb0 && c.r < 0x60 && c.b < 0x60, "{c:?}");
    }

    #[test]
    fn layer_order_is_back_to_front() {
        let names: Vec<&str> = STATIC_LAYERS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.first(), Some(&"shadow"));
        assert_eq!(names.last(), Some(&"glass"));
        let pos = |n: &str| names.iter().position(|x| *x == n);
        assert!(pos("zones") < pos("ticks"));
        assert!(pos("ticks") < pos("labels"));
    }

    #[test]
    fn zero_size_is_an_error_not_a_panic() {
        let config = GaugeConfig::default();
        let palette = Palette::from_config(&config);
        let layout = Layout::new(0.0, &config, &palette, None);
        assert!(build_static_artwork(0.0, 1.0, 0, &config, &palette, None, &layout).is_err());
    }

    struct Drawn {
        buf: PixelBuffer,
        layout: Layout,
        config: GaugeConfig,
    }

    impl Drawn {
        fn new(config: GaugeConfig, layer: StaticLayer) -> Self {
            let palette = Palette::from_config(&config);
            let face = Typeface::builtin().unwrap();
            let layout = Layout::new(400.0, &config, &palette, Some(&face));
            let mut buf = PixelBuffer::new(400, 400, 1.0).unwrap();
            {
                let mut canvas = buf.canvas().unwrap();
                canvas.clear(Color::BLACK);
                let scene = Scene {
                    config: &config,
                    palette: &palette,
                    typeface: Some(&face),
                    layout: &layout,
                };
                layer(&mut canvas, &scene);
            }
            Self { buf, layout, config }
        }

        /// Redline-colored pixels within `half` of the point at `radius` on the angle of `value`.
        fn red_near(&self, value: f64, radius: f64, half: i64) -> usize {
            let angle = value_to_angle(&self.config, value);
            let (x, y) = self.layout.dial.point(angle, radius);
            let (x, y) = (x as i64, y as i64);
            let mut count = 0;
            for py in y - half..=y + half {
                for px in x - half..=x + half {
                    let Some(c) = self.buf.pixel(px as usize, py as usize) else {
                        continue;
                    };
                    if c.r > 0x90 && c.g < 0x60 {
                        count += 1;
                    }
                }
            }
            count
        }

        fn tick_radius(&self) -> f64 {
            let d = &self.layout.dial;
            d.tick_outer - d.major_tick_length / 2.0
        }
    }

    fn legacy(redline: Option<f64>, danger: Option<f64>) -> GaugeConfig {
        GaugeConfig::builder()
            .minor_ticks(0)
            .maybe_redline_start(redline)
            .maybe_danger_start(danger)
            .build()
    }

    #[test]
    fn each_legacy_threshold_reddens_ticks_on_its_own() {
        for (config, first_red) in [
            (legacy(None, Some(50.0)), 50.0),
            (legacy(Some(80.0), None), 80.0),
            (legacy(Some(80.0), Some(50.0)), 50.0),
        ] {
            let drawn = Drawn::new(config, draw_ticks);
            let r = drawn.tick_radius();
            for value in [0.0, 10.0, 40.0, first_red - 10.0] {
                assert_eq!(drawn.red_near(value, r, 1), 0, "tick {value} below {first_red}");
            }
            for value in [first_red, 90.0, 100.0] {
                assert!(drawn.red_near(value, r, 1) > 0, "tick {value} from {first_red}");
            }
        }
    }

    #[test]
    fn each_legacy_threshold_reddens_labels_on_its_own() {
        for (config, first_red) in [(legacy(None, Some(50.0)), 50.0), (legacy(Some(80.0), None), 80.0)] {
            let drawn = Drawn::new(config, draw_labels);
            let r = drawn.layout.ticks.label_radius;
            let half = (drawn.layout.ticks.font_size * 0.6) as i64;
            assert_eq!(drawn.red_near(first_red - 10.0, r, half), 0);
            assert!(drawn.red_near(first_red, r, half) > 0);
            assert!(drawn.red_near(100.0, r, half) > 0);
        }
    }

    #[test]
    fn only_redline_draws_the_zone_when_both_are_set() {
        let drawn = Drawn::new(legacy(Some(80.0), Some(50.0)), draw_zones);
        let d = drawn.layout.dial;
        let r = d.tick_outer - drawn.layout.radius(0.025);
        assert!(drawn.red_near(90.0, r, 1) > 0);
        assert_eq!(drawn.red_near(60.0, r, 1), 0);
        assert_eq!(drawn.red_near(70.0, r, 1), 0);
    }
}
