// ============================================================================
// WINDOW HOST
// ============================================================================
//
// A thin winit + pixels shell around one gauge. Values arrive over an mpsc channel so any
// thread (stdin reader, simulator, network bridge) can drive the needle.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bon::Builder;
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::ConfigSource;
use crate::error::{GaugeError, Result};
use crate::gauge::Gauge;

/// Command enum for type-safe gauge updates
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    SetValue(f64),
    SetValueImmediate(f64),
    SetRingValue(usize, f64),
    SetComplicationValue(usize, f64),
    Sweep,
    Configure(ConfigSource),
}

impl GaugeCommand {
    /// Parses one line of text input: a bare number, `sweep`, `ring <i> <v>` or
    /// `complication <i> <v>`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let head = words.next()?;
        let command = match head {
            "sweep" => GaugeCommand::Sweep,
            "ring" | "complication" => {
                let index = words.next()?.parse().ok()?;
                let value = words.next()?.parse().ok()?;
                if head == "ring" {
                    GaugeCommand::SetRingValue(index, value)
                } else {
                    GaugeCommand::SetComplicationValue(index, value)
                }
            }
            number => GaugeCommand::SetValue(number.parse().ok()?),
        };
        words.next().is_none().then_some(command)
    }

    pub fn apply(self, gauge: &mut Gauge) {
        match self {
            GaugeCommand::SetValue(value) => gauge.set_value(value, false),
            GaugeCommand::SetValueImmediate(value) => gauge.set_value(value, true),
            GaugeCommand::SetRingValue(index, value) => {
                if !gauge.set_ring_value(index, value) {
                    log::warn!("no ring {index} to set");
                }
            }
            GaugeCommand::SetComplicationValue(index, value) => {
                if !gauge.set_complication_value(index, value) {
                    log::warn!("no complication {index} to set");
                }
            }
            GaugeCommand::Sweep => gauge.sweep(),
            GaugeCommand::Configure(source) => gauge.configure(source),
        }
    }
}

/// Configuration for the host window
#[derive(Debug, Clone, Builder)]
pub struct WindowOptions {
    #[builder(default = "cluster-gauge".to_string(), into)]
    pub title: String,
    /// Logical side of the square window
    #[builder(default = 400.0)]
    pub size: f64,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
}

fn window_error(err: impl std::fmt::Display) -> GaugeError {
    GaugeError::Window(err.to_string())
}

/// Opens a window and runs `gauge` until it is closed.
pub fn run(
    mut gauge: Gauge,
    options: WindowOptions,
    receiver: Option<Receiver<GaugeCommand>>,
) -> Result<()> {
    let event_loop = EventLoop::new().map_err(window_error)?;
    let window = WindowBuilder::new()
        .with_title(&options.title)
        .with_inner_size(LogicalSize::new(options.size, options.size))
        .with_min_inner_size(LogicalSize::new(64.0, 64.0))
        .build(&event_loop)
        .map_err(window_error)?;
    let window = Arc::new(window);

    let mut density = window.scale_factor();
    let size = window.inner_size();
    let mut side = size.width.min(size.height).max(1);
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(side, side, surface_texture).map_err(window_error)?;

    let window_clone = window.clone();
    let frame_duration = Duration::from_secs_f64(1.0 / options.max_framerate.max(1.0));
    let started = Instant::now();
    let mut last_frame = Instant::now();

    event_loop
        .run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => window_target.exit(),
                    WindowEvent::Resized(new_size) => {
                        side = new_size.width.min(new_size.height).max(1);
                        let (w, h) = (new_size.width.max(1), new_size.height.max(1));
                        if let Err(err) = pixels.resize_surface(w, h) {
                            log::warn!("surface resize failed: {err}");
                        }
                        if let Err(err) = pixels.resize_buffer(side, side) {
                            log::warn!("buffer resize failed: {err}");
                        }
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        density = scale_factor;
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(receiver) = &receiver {
                            while let Ok(command) = receiver.try_recv() {
                                command.apply(&mut gauge);
                            }
                        }
                        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                        let logical = side as f64 / density;
                        if let Err(err) = gauge.render(pixels.frame_mut(), logical, density, now_ms) {
                            log::warn!("frame skipped: {err}");
                        }
                        if let Err(err) = pixels.render() {
                            log::error!("presenting frame failed: {err}");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })
        .map_err(window_error)?;

    Ok(())
}
