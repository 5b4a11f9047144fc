//! Inspector utility: decode a clip and report its frame-pipeline geometry.

use std::path::PathBuf;

use serde::Serialize;

use genrescope::acquire::{ClipSource, FileClipSource};
use genrescope::analysis::spectrogram::MEL_BANDS;
use genrescope::config;
use genrescope::logging;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Serialize)]
struct ClipReport {
    title: String,
    sample_rate: u32,
    samples: usize,
    duration_seconds: f32,
    chunk: usize,
    stride: usize,
    segments: usize,
    frames: usize,
    frame_shape: [usize; 2],
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };

    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let settings = match &options.config_path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;

    let source = FileClipSource::new(&settings);
    let clip = source
        .fetch(&options.clip_path.to_string_lossy())
        .map_err(|err| err.to_string())?;

    let pipeline = genrescope::analysis::pipeline::FramePipeline::new(&settings);
    let plan = pipeline.plan(clip.mono.len());
    let frames = pipeline.frames(&clip.mono, clip.sample_rate)?;

    let report = ClipReport {
        title: clip.title,
        sample_rate: clip.sample_rate,
        samples: clip.mono.len(),
        duration_seconds: clip.mono.len() as f32 / clip.sample_rate.max(1) as f32,
        chunk: plan.chunk,
        stride: plan.stride,
        segments: plan.ranges.len(),
        frames: frames.len(),
        frame_shape: [MEL_BANDS, settings.max_length],
    };
    let json = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}

struct Options {
    clip_path: PathBuf,
    config_path: Option<PathBuf>,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut clip_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--config requires a path".to_string())?;
                config_path = Some(PathBuf::from(value));
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown option: {other}"));
            }
            other => {
                if clip_path.is_some() {
                    return Err("Only one clip path may be given".to_string());
                }
                clip_path = Some(PathBuf::from(other));
            }
        }
    }
    match clip_path {
        Some(clip_path) => Ok(Some(Options {
            clip_path,
            config_path,
        })),
        None => {
            print_usage();
            Err("Missing clip path".to_string())
        }
    }
}

fn print_usage() {
    println!("Usage: genrescope [--config <settings.toml>] <clip>");
    println!();
    println!("Decodes a local audio clip, runs the frame pipeline and prints");
    println!("the resulting segmentation and frame geometry as JSON.");
}
