use super::{Progress, ProgressBar};
use indicatif::{MultiProgress, ProgressStyle};

const TEMPLATE: &str = "{msg} {wide_bar} {pos}/{len} ({eta})";

impl Progress for MultiProgress {
    type Instance = indicatif::ProgressBar;

    fn start(&self, work: usize) -> Self::Instance {
        let bar = indicatif::ProgressBar::new(work.try_into().unwrap_or(u64::MAX));
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style);
        }
        self.add(bar)
    }
}

impl ProgressBar for indicatif::ProgressBar {
    async fn increment(&mut self, work: usize) {
        self.inc(work.try_into().unwrap_or(u64::MAX));
    }

    async fn finish(self) {
        self.finish_and_clear();
    }

    async fn set_message(&mut self, msg: String) {
        indicatif::ProgressBar::set_message(self, msg);
    }
}
