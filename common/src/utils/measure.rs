//! Measuring the time of operations

use std::time::{Duration, Instant};

/// Logs the time elapsed between its creation and being dropped.
pub struct MeasureTime {
    start: Instant,
    label: &'static str,
}

impl MeasureTime {
    pub fn new() -> Self {
        Self::with_label("Processing")
    }

    pub fn with_label(label: &'static str) -> Self {
        Self {
            start: Instant::now(),
            label,
        }
    }
}

impl Default for MeasureTime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MeasureTime {
    fn drop(&mut self) {
        // truncate to seconds, good enough
        let duration = Duration::from_secs(self.start.elapsed().as_secs());
        log::info!("{} took {}", self.label, humantime::format_duration(duration));
    }
}
