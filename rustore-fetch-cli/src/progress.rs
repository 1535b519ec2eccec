//! Download progress bar.
//!
//! The bar is created lazily on the first chunk, once it is known whether the
//! server sent a content length: a byte bar when it did, a spinner otherwise.

use std::sync::{Arc, OnceLock};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rustore_fetch::download::ProgressCallback;

const BAR_TEMPLATE: &str =
    "{prefix} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{prefix} {spinner} {bytes} ({bytes_per_sec})";

/// Progress display for a single download.
pub struct DownloadProgress {
    label: String,
    visible: bool,
    bar: OnceLock<ProgressBar>,
}

impl DownloadProgress {
    /// Progress drawn to the terminal, prefixed with `label`.
    pub fn new(label: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            visible: true,
            bar: OnceLock::new(),
        })
    }

    /// Progress that tracks state without drawing.
    #[cfg(test)]
    pub fn hidden(label: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            visible: false,
            bar: OnceLock::new(),
        })
    }

    /// Callback that feeds this display.
    pub fn callback(self: &Arc<Self>) -> ProgressCallback {
        let progress = Arc::clone(self);
        Box::new(move |done, total| progress.update(done, total))
    }

    fn update(&self, done: u64, total: Option<u64>) {
        let bar = self.bar.get_or_init(|| self.create_bar(total));
        bar.set_position(done);
    }

    fn create_bar(&self, total: Option<u64>) -> ProgressBar {
        if self.visible {
            println!("Скачивание...");
        }

        let bar = match total {
            Some(len) => ProgressBar::new(len).with_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            ),
            None => ProgressBar::new_spinner().with_style(
                ProgressStyle::with_template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            ),
        };

        if !self.visible {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_prefix(self.label.clone());
        bar
    }

    /// Finish the bar, leaving its last state on screen.
    pub fn finish(&self) {
        if let Some(bar) = self.bar.get() {
            bar.finish();
        }
    }

    /// Remove the bar from the screen, e.g. before printing an error.
    pub fn abandon(&self) {
        if let Some(bar) = self.bar.get() {
            bar.abandon();
        }
    }

    #[cfg(test)]
    fn bar(&self) -> Option<&ProgressBar> {
        self.bar.get()
    }
}
