use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

use crate::pipeline::StatsSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

impl UiMode {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("plain") => UiMode::Plain,
            Some("pretty") => UiMode::Pretty,
            _ => UiMode::Auto,
        }
    }
}

/// Terminal feedback for the binaries: spinners on a TTY, `==>` lines otherwise.
#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
}

impl Ui {
    pub fn new(mode: UiMode, is_tty: bool) -> Self {
        Self { mode, is_tty }
    }

    /// `NO_COLOR` turns `auto` into plain output.
    pub fn from_args(ui_flag: Option<&str>, is_tty: bool) -> Self {
        let mode = match UiMode::parse(ui_flag) {
            UiMode::Auto if std::env::var_os("NO_COLOR").is_some() => UiMode::Plain,
            mode => mode,
        };
        Self::new(mode, is_tty)
    }

    fn pretty(&self) -> bool {
        self.is_tty && self.mode != UiMode::Plain
    }

    pub fn stage(&self, name: &str) -> StageGuard {
        if self.pretty() {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(format!("{name}..."));
            StageGuard::new(name.to_string(), Some(spinner))
        } else {
            eprintln!("==> {}", name);
            StageGuard::new(name.to_string(), None)
        }
    }

    /// Live frame counter. `total` is the frame limit, if any.
    pub fn frames(&self, total: Option<u64>) -> FrameProgress {
        if !self.pretty() {
            return FrameProgress { bar: None };
        }
        let (bar, template) = match total {
            Some(total) => (
                ProgressBar::new(total),
                "{bar:30} {pos}/{len} frames {msg}",
            ),
            None => (ProgressBar::new_spinner(), "{spinner} {pos} frames {msg}"),
        };
        bar.set_draw_target(ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        FrameProgress { bar: Some(bar) }
    }
}

pub struct FrameProgress {
    bar: Option<ProgressBar>,
}

impl FrameProgress {
    pub fn update(&self, stats: &StatsSnapshot, overlays: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(stats.captured);
            bar.set_message(format!(
                "({} shown, {} late, {} failed, {} overlays)",
                stats.published,
                stats.dropped_late,
                stats.failed(),
                overlays
            ));
        }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

pub struct StageGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl StageGuard {
    fn new(name: String, spinner: Option<ProgressBar>) -> Self {
        Self {
            name,
            start: Instant::now(),
            spinner,
        }
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let message = format!("done: {} ({})", self.name, format_duration(self.start.elapsed()));
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(message);
        } else {
            eprintln!("{message}");
        }
    }
}

pub fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
