use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rand::Rng;
use serde_json::Value;

use cluster_gauge::config::{read_overrides, PRESET_NAMES};
use cluster_gauge::window::{self, GaugeCommand, WindowOptions};
use cluster_gauge::{ConfigSource, Gauge, Typeface};

/// Instrument-cluster gauge in a window, driven from stdin.
///
/// Each stdin line is a value, `sweep`, `ring <i> <v>` or `complication <i> <v>`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Named preset to start from
    #[arg(long, default_value = "speed")]
    preset: String,

    /// JSON file of configuration overrides layered over the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// TrueType/OpenType font for labels, replacing the bundled DejaVu Sans Mono
    #[arg(long)]
    font: Option<PathBuf>,

    /// Logical window size
    #[arg(long, default_value_t = 400.0)]
    size: f64,

    /// Run the self-test sweep on start
    #[arg(long)]
    sweep: bool,

    /// Feed random values to the needle
    #[arg(long)]
    demo: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !PRESET_NAMES.contains(&args.preset.as_str()) {
        log::warn!("unknown preset {:?}, expected one of {PRESET_NAMES:?}", args.preset);
    }
    let source = match &args.config {
        Some(path) => {
            let mut overrides = read_overrides(path)
                .with_context(|| format!("reading gauge config {}", path.display()))?;
            if let Some(map) = overrides.as_object_mut() {
                map.entry("preset")
                    .or_insert_with(|| Value::String(args.preset.clone()));
            }
            ConfigSource::Overrides(overrides)
        }
        None => ConfigSource::Preset(args.preset.clone()),
    };

    let mut gauge = Gauge::new(source);
    if let Some(path) = &args.font {
        let typeface = Typeface::load(path)
            .with_context(|| format!("loading font {}", path.display()))?;
        gauge.set_typeface(Some(typeface));
    }
    if args.sweep {
        gauge.sweep();
    }

    let (sender, receiver) = mpsc::channel();
    spawn_stdin_reader(sender.clone());
    if args.demo {
        let (min, max) = (gauge.config().min, gauge.config().max);
        spawn_demo(sender, min, max);
    }

    let title = match gauge.config().label.as_str() {
        "" => "cluster-gauge".to_string(),
        label => label.to_string(),
    };
    let options = WindowOptions::builder().title(title).size(args.size).build();
    window::run(gauge, options, Some(receiver))?;
    Ok(())
}

fn spawn_stdin_reader(sender: Sender<GaugeCommand>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match GaugeCommand::parse(&line) {
                Some(command) => {
                    if sender.send(command).is_err() {
                        break;
                    }
                }
                None => log::warn!("ignoring input {line:?}"),
            }
        }
    });
}

fn spawn_demo(sender: Sender<GaugeCommand>, min: f64, max: f64) {
    if !(max > min) {
        return;
    }
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            thread::sleep(Duration::from_millis(rng.random_range(600..=1800)));
            let value = rng.random_range(min..=max);
            if sender.send(GaugeCommand::SetValue(value)).is_err() {
                break;
            }
        }
    });
}
