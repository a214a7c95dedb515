//! overlay_demo - run the live capture → inference → overlay pipeline

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::Duration;

use frame_overlay::engine::builtin;
use frame_overlay::ui::{format_duration, Ui};
use frame_overlay::{
    open_source, Display, OverlayConfig, Pipeline, PipelineSettings, RgbCanvas, SourceSettings,
};

const UPDATE_POLL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON config file.
    #[arg(long, env = "OVERLAY_CONFIG")]
    config: Option<PathBuf>,
    /// Frame source: stub://<name> or a local image path.
    #[arg(long)]
    source: Option<String>,
    /// Bundled model name (color-classifier | bright-region-detector).
    #[arg(long)]
    model: Option<String>,
    /// Stop after this many captured frames.
    #[arg(long)]
    frames: Option<u64>,
    /// Capture rate.
    #[arg(long)]
    fps: Option<u32>,
    /// Queue every frame instead of dropping late ones.
    #[arg(long)]
    no_drop: bool,
    /// Write the last composited frame here as PNG.
    #[arg(long)]
    out: Option<PathBuf>,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let ui = Ui::from_args(Some(&args.ui), std::io::stderr().is_terminal());

    let cfg = {
        let _stage = ui.stage("Load configuration");
        let mut cfg = OverlayConfig::load_from(args.config.as_deref())?;
        if let Some(source) = &args.source {
            cfg.source.uri = source.clone();
        }
        if let Some(model) = &args.model {
            cfg.model = model.clone();
        }
        if let Some(fps) = args.fps {
            cfg.source.target_fps = fps;
        }
        if args.frames.is_some() {
            cfg.source.frame_limit = args.frames;
        }
        if args.no_drop {
            cfg.drop_late_frames = false;
        }
        cfg.validate()?;
        cfg
    };

    let engine = {
        let _stage = ui.stage("Load model");
        builtin::load(&cfg.model)?
    };
    log::info!(
        "model {} {} produces {}",
        engine.name(),
        engine.version(),
        engine.result_kind()
    );

    let (width, height) = surface_size(&cfg.source)?;
    let source = open_source(&cfg.source)?;
    let handle = Pipeline::spawn(source, engine, PipelineSettings::from_config(&cfg))?;

    let stop = handle.stop_flag();
    ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))
        .context("installing Ctrl-C handler")?;
    log::info!(
        "capturing from {} at {} fps (Ctrl-C to stop)",
        cfg.source.uri,
        cfg.source.target_fps
    );

    let started = std::time::Instant::now();
    let mut display = Display::new(RgbCanvas::new(width, height));
    let progress = ui.frames(cfg.source.frame_limit);
    while display.wait(handle.updates(), UPDATE_POLL) {
        progress.update(&handle.stats(), display.renderer().overlays().len());
    }
    progress.finish();
    let summary = handle.join()?;

    if let Some(out) = &args.out {
        let _stage = ui.stage("Write composited frame");
        if display.last_sequence().is_none() {
            log::warn!("no frame was processed successfully; writing an empty canvas");
        }
        display.surface().save_png(out)?;
    }

    let stats = summary.stats;
    println!(
        "{}: {} captured, {} shown, {} dropped late, {} invalid, {} unknown result, {} engine failures in {}",
        summary.source.uri,
        stats.captured,
        stats.published,
        stats.dropped_late,
        stats.invalid_input,
        stats.unknown_result,
        stats.engine_failures,
        format_duration(started.elapsed())
    );
    if let Some(sequence) = display.last_sequence() {
        println!(
            "last frame {} with {} overlays",
            sequence,
            display.renderer().overlays().len()
        );
    }
    Ok(())
}

/// Still images are shown at their native size; synthetic cameras use the
/// configured dimensions.
fn surface_size(source: &SourceSettings) -> Result<(u32, u32)> {
    if source.is_synthetic() {
        return Ok((source.width, source.height));
    }
    let path = Path::new(source.uri.trim());
    image::image_dimensions(path).with_context(|| format!("reading {}", path.display()))
}
