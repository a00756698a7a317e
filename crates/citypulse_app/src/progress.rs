use citypulse_engine::{ProgressEvent, ProgressSink};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{msg:>10} [{elapsed_precise}] [{bar:40}] {pos}/{len} (eta {eta})";

/// Terminal progress bar for the harvest and enrichment loops.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { label, total } => {
                match total {
                    Some(total) => {
                        let style = ProgressStyle::with_template(BAR_TEMPLATE)
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("=> ");
                        self.bar.set_style(style);
                        self.bar.set_length(total);
                    }
                    None => self.bar.set_style(ProgressStyle::default_spinner()),
                }
                self.bar.set_message(label);
                self.bar.set_position(0);
                self.bar.set_draw_target(ProgressDrawTarget::stderr());
            }
            ProgressEvent::Advanced { completed } => self.bar.set_position(completed),
            ProgressEvent::Finished => self.bar.finish_and_clear(),
        }
    }
}
