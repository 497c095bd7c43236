use log::trace;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

use crate::models::ProgressEvent;

pub type ProgressSink = UnboundedSender<ProgressEvent>;

/// Estimated seconds left, extrapolated linearly from the work done so far.
///
/// Unsmoothed: successive estimates can jump around.
pub fn estimate_remaining(percent: u8, elapsed_seconds: u64) -> u64 {
    if percent == 0 {
        return 0;
    }
    let estimated_total = (elapsed_seconds as f64 / f64::from(percent) * 100.0) as u64;
    estimated_total.saturating_sub(elapsed_seconds)
}

/// Status line shown while a fetch is running
pub fn patience_message(percent: u8) -> &'static str {
    if percent < 80 {
        "Getting data from YouTube takes time, please be patient..."
    } else {
        "We are almost there, please wait a bit more..."
    }
}

/// Counts completed units of work and publishes a [`ProgressEvent`] per unit.
///
/// One unit is one playlist listing or one video lookup. Reported percentages
/// never decrease.
pub struct ProgressTracker {
    sink: ProgressSink,
    started: Instant,
    total_units: usize,
    units_completed: usize,
    last_percent: u8,
}

impl ProgressTracker {
    pub fn new(sink: ProgressSink) -> Self {
        Self {
            sink,
            started: Instant::now(),
            total_units: 0,
            units_completed: 0,
            last_percent: 0,
        }
    }

    pub fn set_total_units(&mut self, total_units: usize) {
        self.total_units = total_units;
    }

    pub fn units_completed(&self) -> usize {
        self.units_completed
    }

    /// Record one finished unit and publish the new percentage
    pub fn complete_unit(&mut self) {
        self.units_completed = (self.units_completed + 1).min(self.total_units);
        let percent = if self.total_units == 0 {
            100
        } else {
            (self.units_completed * 100 / self.total_units) as u8
        };
        self.emit(percent);
    }

    /// Publish the closing 100% event
    pub fn finish(&mut self) {
        self.units_completed = self.total_units;
        self.emit(100);
    }

    fn emit(&mut self, percent: u8) {
        let percent = percent.clamp(self.last_percent, 100);
        self.last_percent = percent;

        let event = ProgressEvent {
            percent_complete: percent,
            elapsed_seconds: self.started.elapsed().as_secs(),
        };
        trace!("progress {:?}", event);

        // A listener that went away does not stop the fetch
        let _ = self.sink.send(event);
    }
}
