//! annotate_image - draw a detector's bounding boxes onto one still image

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use frame_overlay::engine::builtin::{self, BrightRegionDetector};
use frame_overlay::ingest::{FrameSource, ImageFileConfig, ImageFileSource};
use frame_overlay::ui::Ui;
use frame_overlay::{CaptionAnchor, Display, FrameProcessor, OverlayStyle, ResultKind, RgbCanvas};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image to annotate (PNG or JPEG).
    input: PathBuf,
    /// Bounding-box model to run.
    #[arg(long, env = "OVERLAY_MODEL", default_value = BrightRegionDetector::NAME)]
    model: String,
    /// Output PNG path.
    #[arg(long, default_value = "annotated.png")]
    out: PathBuf,
    /// Caption placement (additive | box-top).
    #[arg(long, env = "OVERLAY_CAPTION_ANCHOR", default_value = "additive")]
    caption_anchor: String,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let ui = Ui::from_args(Some(&args.ui), std::io::stderr().is_terminal());

    let caption_anchor = CaptionAnchor::parse(&args.caption_anchor)
        .ok_or_else(|| anyhow!("unknown caption anchor '{}'", args.caption_anchor))?;
    let engine = builtin::load(&args.model)?;
    if engine.result_kind() != ResultKind::BoundingBoxes {
        return Err(anyhow!(
            "model '{}' produces {}, annotate_image needs bounding-boxes",
            engine.name(),
            engine.result_kind()
        ));
    }

    let frame = {
        let _stage = ui.stage("Decode image");
        let mut source = ImageFileSource::new(ImageFileConfig {
            path: args.input.clone(),
            frame_limit: Some(1),
        });
        source.connect()?;
        source
            .next_frame()?
            .ok_or_else(|| anyhow!("{} produced no frame", args.input.display()))?
    };

    let mut processor = FrameProcessor::new(
        engine,
        OverlayStyle {
            caption_anchor,
            ..OverlayStyle::default()
        },
    );
    let mut display = Display::new(RgbCanvas::new(frame.width, frame.height));
    {
        let _stage = ui.stage("Evaluate and draw");
        let processed = processor
            .process(&frame)
            .with_context(|| format!("evaluating {}", args.input.display()))?;
        display.apply(processed.into());
        display.refresh();
    }
    log::info!(
        "{} boxes from {} {}",
        display.renderer().overlays().len(),
        processor.engine().name(),
        processor.engine().version()
    );

    {
        let _stage = ui.stage("Write annotated image");
        display.surface().save_png(&args.out)?;
    }
    println!("{}", args.out.display());
    Ok(())
}
