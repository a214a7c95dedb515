//! Capture → inference → display plumbing.
//!
//! Three stages, each owning its data:
//!
//! - the capture thread pulls `RawFrame`s from a `FrameSource` at the target
//!   rate and offers each one to the worker through a rendezvous channel;
//! - the inference worker adapts, evaluates and builds overlays for one frame
//!   at a time;
//! - the `Display`, driven from the caller's thread, receives `UiUpdate`s and
//!   owns the `OverlayRenderer` and its drawing surface.
//!
//! Frame failures are counted and logged in the worker and never reach the
//! display, so the display always shows the last successful frame.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};

use crate::adapter::FrameAdapter;
use crate::config::OverlayConfig;
use crate::engine::InferenceEngine;
use crate::error::PipelineError;
use crate::frame::{EngineInput, RawFrame};
use crate::ingest::{FrameSource, SourceStats};
use crate::overlay::{DrawingSurface, Overlay, OverlayStyle};
use crate::renderer::{overlays_for, OverlayRenderer};

/// One frame's worth of drawable output.
#[derive(Debug)]
pub struct ProcessedFrame {
    pub sequence: u64,
    pub overlays: Vec<Overlay>,
    pub input: EngineInput,
}

/// Adapter, engine and overlay construction for a single frame.
pub struct FrameProcessor {
    adapter: FrameAdapter,
    engine: Box<dyn InferenceEngine>,
    style: OverlayStyle,
}

impl FrameProcessor {
    pub fn new(engine: Box<dyn InferenceEngine>, style: OverlayStyle) -> Self {
        Self {
            adapter: FrameAdapter::new(),
            engine,
            style,
        }
    }

    pub fn engine(&self) -> &dyn InferenceEngine {
        self.engine.as_ref()
    }

    pub fn process(&mut self, frame: &RawFrame) -> Result<ProcessedFrame, PipelineError> {
        let input = self.adapter.adapt(frame)?;
        let result = self.engine.evaluate(&input)?;
        let overlays = overlays_for(&result, &self.style)?;
        log::debug!(
            "frame {}: {} {} -> {} overlays",
            frame.sequence,
            result.len(),
            result.kind(),
            overlays.len()
        );
        Ok(ProcessedFrame {
            sequence: frame.sequence,
            overlays,
            input,
        })
    }
}

/// Counters shared by the capture and worker threads.
#[derive(Debug, Default)]
pub struct PipelineStats {
    captured: AtomicU64,
    dropped_late: AtomicU64,
    invalid_input: AtomicU64,
    unknown_result: AtomicU64,
    engine_failures: AtomicU64,
    published: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub captured: u64,
    pub dropped_late: u64,
    pub invalid_input: u64,
    pub unknown_result: u64,
    pub engine_failures: u64,
    pub published: u64,
}

impl StatsSnapshot {
    /// Frames that reached the worker but produced no update.
    pub fn failed(&self) -> u64 {
        self.invalid_input + self.unknown_result + self.engine_failures
    }
}

impl PipelineStats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self, err: &PipelineError) {
        match err {
            PipelineError::InvalidInputFormat(_) | PipelineError::LockPoisoned => {
                Self::bump(&self.invalid_input)
            }
            PipelineError::UnknownResultType { .. } => Self::bump(&self.unknown_result),
            PipelineError::Engine(_) => Self::bump(&self.engine_failures),
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            captured: self.captured.load(Ordering::Relaxed),
            dropped_late: self.dropped_late.load(Ordering::Relaxed),
            invalid_input: self.invalid_input.load(Ordering::Relaxed),
            unknown_result: self.unknown_result.load(Ordering::Relaxed),
            engine_failures: self.engine_failures.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
        }
    }
}

/// Message from the worker to the display.
#[derive(Debug)]
pub struct UiUpdate {
    pub sequence: u64,
    pub overlays: Vec<Overlay>,
    /// The frame the overlays were computed from.
    pub frame: EngineInput,
}

impl From<ProcessedFrame> for UiUpdate {
    fn from(processed: ProcessedFrame) -> Self {
        Self {
            sequence: processed.sequence,
            overlays: processed.overlays,
            frame: processed.input,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PipelineSettings {
    pub target_fps: u32,
    pub drop_late_frames: bool,
    pub style: OverlayStyle,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            target_fps: 15,
            drop_late_frames: true,
            style: OverlayStyle::default(),
        }
    }
}

impl PipelineSettings {
    /// Still-image sources always hand over in lockstep: with only a few
    /// frames, losing one to a busy (or not yet started) worker loses the run.
    pub fn from_config(cfg: &OverlayConfig) -> Self {
        Self {
            target_fps: cfg.source.target_fps,
            drop_late_frames: cfg.drop_late_frames && cfg.source.is_synthetic(),
            style: OverlayStyle {
                caption_anchor: cfg.caption_anchor,
                ..OverlayStyle::default()
            },
        }
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Connect `source` and start the capture and inference threads.
    pub fn spawn(
        mut source: Box<dyn FrameSource>,
        engine: Box<dyn InferenceEngine>,
        settings: PipelineSettings,
    ) -> Result<PipelineHandle> {
        source.connect().context("connecting frame source")?;

        let stop = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(PipelineStats::default());
        let (frame_tx, frame_rx) = mpsc::sync_channel::<RawFrame>(0);
        let (ui_tx, ui_rx) = mpsc::channel::<UiUpdate>();

        let mut processor = FrameProcessor::new(engine, settings.style);
        let worker_stats = Arc::clone(&stats);
        let worker = thread::Builder::new()
            .name("inference".to_string())
            .spawn(move || {
                for frame in frame_rx {
                    match processor.process(&frame) {
                        Ok(processed) => {
                            if ui_tx.send(processed.into()).is_err() {
                                log::debug!("display gone; inference worker exiting");
                                break;
                            }
                            PipelineStats::bump(&worker_stats.published);
                        }
                        Err(err) => {
                            worker_stats.record_failure(&err);
                            log::warn!("frame {} dropped: {}", frame.sequence, err);
                        }
                    }
                }
            })
            .context("spawning inference thread")?;

        let capture_stop = Arc::clone(&stop);
        let capture_stats = Arc::clone(&stats);
        let capture = thread::Builder::new()
            .name("capture".to_string())
            .spawn(move || capture_loop(source, frame_tx, settings, &capture_stop, &capture_stats))
            .context("spawning capture thread")?;

        Ok(PipelineHandle {
            updates: ui_rx,
            stop,
            stats,
            capture: Some(capture),
            worker: Some(worker),
        })
    }
}

fn capture_loop(
    mut source: Box<dyn FrameSource>,
    frame_tx: SyncSender<RawFrame>,
    settings: PipelineSettings,
    stop: &AtomicBool,
    stats: &PipelineStats,
) -> SourceStats {
    let interval = settings.frame_interval();
    while !stop.load(Ordering::Relaxed) {
        let started = Instant::now();
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!("capture: source exhausted");
                break;
            }
            Err(err) => {
                log::warn!("capture: source failed: {:#}", err);
                break;
            }
        };
        PipelineStats::bump(&stats.captured);

        if settings.drop_late_frames {
            match frame_tx.try_send(frame) {
                Ok(()) => {}
                Err(TrySendError::Full(frame)) => {
                    PipelineStats::bump(&stats.dropped_late);
                    log::debug!("capture: worker busy, dropped frame {}", frame.sequence);
                }
                Err(TrySendError::Disconnected(_)) => break,
            }
        } else if frame_tx.send(frame).is_err() {
            break;
        }

        if let Some(rest) = interval.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
    source.stats()
}

/// Running pipeline. Dropping the handle stops capture without waiting.
pub struct PipelineHandle {
    updates: Receiver<UiUpdate>,
    stop: Arc<AtomicBool>,
    stats: Arc<PipelineStats>,
    capture: Option<JoinHandle<SourceStats>>,
    worker: Option<JoinHandle<()>>,
}

#[derive(Clone, Debug)]
pub struct PipelineSummary {
    pub source: SourceStats,
    pub stats: StatsSnapshot,
}

impl PipelineHandle {
    pub fn updates(&self) -> &Receiver<UiUpdate> {
        &self.updates
    }

    /// Flag that ends the capture loop when set.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Wait for both threads. Updates still queued are discarded.
    pub fn join(mut self) -> Result<PipelineSummary> {
        let source = match self.capture.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| anyhow!("capture thread panicked"))?,
            None => return Err(anyhow!("pipeline already joined")),
        };
        if let Some(handle) = self.worker.take() {
            handle
                .join()
                .map_err(|_| anyhow!("inference thread panicked"))?;
        }
        Ok(PipelineSummary {
            source,
            stats: self.stats.snapshot(),
        })
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// UI-thread side: owns the renderer and the surface it paints.
pub struct Display<S: DrawingSurface> {
    renderer: OverlayRenderer,
    surface: S,
    last_sequence: Option<u64>,
}

impl<S: DrawingSurface> Display<S> {
    pub fn new(surface: S) -> Self {
        Self {
            renderer: OverlayRenderer::new(),
            surface,
            last_sequence: None,
        }
    }

    /// Take one update: show its frame and swap in its overlays.
    pub fn apply(&mut self, update: UiUpdate) {
        self.surface.present_frame(&update.frame);
        self.renderer.replace(update.overlays);
        self.last_sequence = Some(update.sequence);
    }

    /// Apply every queued update, then redraw if anything changed.
    /// Returns the number of updates applied.
    pub fn pump(&mut self, updates: &Receiver<UiUpdate>) -> usize {
        let mut applied = 0;
        while let Ok(update) = updates.try_recv() {
            self.apply(update);
            applied += 1;
        }
        self.refresh();
        applied
    }

    /// Redraw if the overlay set changed since the last paint.
    pub fn refresh(&mut self) -> bool {
        if !self.renderer.needs_display() {
            return false;
        }
        self.renderer.redraw(&mut self.surface);
        true
    }

    /// Block up to `timeout` for the next update, then pump.
    /// Returns `false` once the worker has gone away and nothing is queued.
    pub fn wait(&mut self, updates: &Receiver<UiUpdate>, timeout: Duration) -> bool {
        match updates.recv_timeout(timeout) {
            Ok(update) => {
                self.apply(update);
                self.pump(updates);
                true
            }
            Err(RecvTimeoutError::Timeout) => true,
            Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn last_sequence(&self) -> Option<u64> {
        self.last_sequence
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ClassLabel, EvaluationResult, ResultKind};
    use crate::frame::PixelFormat;
    use crate::overlay::{DrawCommand, RecordingSurface};
    use std::collections::VecDeque;

    struct Scripted {
        steps: VecDeque<Result<EvaluationResult, String>>,
    }

    impl Scripted {
        fn new(steps: Vec<Result<EvaluationResult, String>>) -> Box<Self> {
            Box::new(Self {
                steps: steps.into(),
            })
        }
    }

    impl InferenceEngine for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn result_kind(&self) -> ResultKind {
            ResultKind::ClassLabels
        }

        fn evaluate(&mut self, _input: &EngineInput) -> anyhow::Result<EvaluationResult> {
            match self.steps.pop_front() {
                Some(Ok(result)) => Ok(result),
                Some(Err(msg)) => Err(anyhow!(msg)),
                None => Err(anyhow!("script exhausted")),
            }
        }
    }

    fn labels(names: &[&str]) -> EvaluationResult {
        EvaluationResult::ClassLabels(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| ClassLabel::new(i as i32, *n))
                .collect(),
        )
    }

    fn rgb_frame(sequence: u64) -> RawFrame {
        RawFrame::rgb24(vec![10; 4 * 2 * 3], 4, 2, sequence)
    }

    fn texts(display: &Display<RecordingSurface>) -> Vec<String> {
        display
            .surface()
            .texts()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn processor_counts_errors_by_kind() {
        let stats = PipelineStats::default();
        let mut processor = FrameProcessor::new(
            Scripted::new(vec![Err("boom".into())]),
            OverlayStyle::default(),
        );

        let bgra = RawFrame::new(vec![0; 4 * 2 * 4], 4, 2, PixelFormat::Bgra32, 16, 0);
        let err = processor.process(&bgra).unwrap_err();
        stats.record_failure(&err);
        assert!(!bgra.is_locked());

        let err = processor.process(&rgb_frame(1)).unwrap_err();
        stats.record_failure(&err);

        let snap = stats.snapshot();
        assert_eq!(snap.invalid_input, 1);
        assert_eq!(snap.engine_failures, 1);
        assert_eq!(snap.failed(), 2);
    }

    #[test]
    fn failed_frame_keeps_previous_overlays() {
        let mut processor = FrameProcessor::new(
            Scripted::new(vec![Ok(labels(&["cat", "dog"])), Err("engine fault".into())]),
            OverlayStyle::default(),
        );
        let (tx, rx) = mpsc::channel();
        for sequence in 0..2 {
            if let Ok(processed) = processor.process(&rgb_frame(sequence)) {
                tx.send(UiUpdate::from(processed)).unwrap();
            }
        }

        let mut display = Display::new(RecordingSurface::new(64, 48));
        assert_eq!(display.pump(&rx), 1);
        assert_eq!(display.last_sequence(), Some(0));
        assert_eq!(display.renderer().generation(), 1);
        assert_eq!(texts(&display), vec!["cat", "dog"]);
    }

    #[test]
    fn apply_presents_the_frame_before_overlays() {
        let mut processor =
            FrameProcessor::new(Scripted::new(vec![Ok(labels(&["x"]))]), OverlayStyle::default());
        let mut display = Display::new(RecordingSurface::new(64, 48));
        display.apply(processor.process(&rgb_frame(7)).unwrap().into());
        let (_, rx) = mpsc::channel::<UiUpdate>();
        display.pump(&rx);

        let commands = display.surface().commands();
        assert!(matches!(commands.first(), Some(DrawCommand::Clear)));
        assert!(commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "x")));
        assert_eq!(display.last_sequence(), Some(7));
    }

    #[test]
    fn still_images_never_drop_late_frames() {
        let mut cfg = OverlayConfig::default();
        assert!(PipelineSettings::from_config(&cfg).drop_late_frames);

        cfg.source.uri = "/tmp/still.png".to_string();
        assert!(!PipelineSettings::from_config(&cfg).drop_late_frames);

        cfg.source.uri = "stub://camera".to_string();
        cfg.drop_late_frames = false;
        assert!(!PipelineSettings::from_config(&cfg).drop_late_frames);
    }

    #[test]
    fn spawned_pipeline_delivers_every_frame_without_dropping() -> Result<()> {
        let source = crate::ingest::open_source(&crate::config::SourceSettings {
            uri: "stub://unit".to_string(),
            width: 16,
            height: 8,
            frame_limit: Some(3),
            ..crate::config::SourceSettings::default()
        })?;
        let engine = Scripted::new(vec![
            Ok(labels(&["a"])),
            Ok(labels(&["b"])),
            Ok(labels(&["c"])),
        ]);
        let settings = PipelineSettings {
            target_fps: 1000,
            drop_late_frames: false,
            ..PipelineSettings::default()
        };
        let handle = Pipeline::spawn(source, engine, settings)?;
        let mut display = Display::new(RecordingSurface::new(16, 8));
        while display.wait(handle.updates(), Duration::from_millis(200)) {}

        let summary = handle.join()?;
        assert_eq!(summary.stats.captured, 3);
        assert_eq!(summary.stats.published, 3);
        assert_eq!(summary.stats.dropped_late, 0);
        assert_eq!(summary.source.frames_captured, 3);
        assert_eq!(display.last_sequence(), Some(2));
        assert_eq!(texts(&display), vec!["c"]);
        Ok(())
    }
}
