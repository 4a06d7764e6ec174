use env_logger::Builder;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::LevelFilter;
use std::io::Write;

#[derive(Clone, Debug, clap::Args)]
pub struct Logging {
    /// Be quiet. Conflicts with 'verbose'.
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Be more verbose. May be repeated multiple times to increase verbosity.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Add timestamps to the output messages
    #[arg(long, global = true)]
    pub log_timestamps: bool,

    /// Disable progress bar
    #[arg(long, global = true, conflicts_with = "progress")]
    pub no_progress: bool,

    /// Enable progress bar
    #[arg(long, global = true)]
    pub progress: bool,

    /// Provide a RUST_LOG filter, conflicts with --verbose and --quiet
    #[arg(long, global = true, conflicts_with_all(["verbose", "quiet"]), env("RUST_LOG"))]
    pub log: Option<String>,
}

/// Levels for everything else, and for the application's own modules.
fn levels(quiet: bool, verbose: u8) -> (LevelFilter, Option<LevelFilter>) {
    match (quiet, verbose) {
        (true, _) => (LevelFilter::Off, None),
        (_, 0) => (LevelFilter::Warn, None),
        (_, 1) => (LevelFilter::Warn, Some(LevelFilter::Info)),
        (_, 2) => (LevelFilter::Warn, Some(LevelFilter::Debug)),
        (_, 3) => (LevelFilter::Info, Some(LevelFilter::Debug)),
        (_, 4) => (LevelFilter::Debug, None),
        (_, 5) => (LevelFilter::Debug, Some(LevelFilter::Trace)),
        (_, _) => (LevelFilter::Trace, None),
    }
}

impl Logging {
    /// Initialize the logging system.
    ///
    /// Returns a [`MultiProgress`] instance if progress bars are enabled. Log output is then
    /// routed through it, so that it doesn't interfere with the bars.
    pub fn init(
        self,
        app_modules: &[&'static str],
        default_progress: bool,
    ) -> Option<MultiProgress> {
        let mut builder = Builder::new();

        match &self.log {
            Some(log) => {
                builder.parse_filters(log);
            }
            None => {
                if !self.log_timestamps {
                    builder.format(|buf, record| writeln!(buf, "{}", record.args()));
                }

                let (level, app_level) = levels(self.quiet, self.verbose);
                builder.filter_level(level);
                if let Some(app_level) = app_level {
                    builder.filter_module("feed_common", app_level);
                    for module in app_modules {
                        builder.filter_module(module, app_level);
                    }
                }
            }
        };

        let progress = match (self.no_progress, self.progress) {
            (true, _) => false,
            (_, true) => true,
            _ => default_progress,
        };

        if self.quiet || !progress {
            builder.init();
            return None;
        }

        let logger = builder.build();
        let max_level = logger.filter();
        let multi = MultiProgress::new();
        // LogWrapper::try_init resets the max level, so set up the logger manually
        let _ = log::set_boxed_logger(Box::new(LogWrapper::new(multi.clone(), logger)));
        log::set_max_level(max_level);

        Some(multi)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verbosity() {
        assert_eq!(levels(true, 3), (LevelFilter::Off, None));
        assert_eq!(levels(false, 0), (LevelFilter::Warn, None));
        assert_eq!(
            levels(false, 1),
            (LevelFilter::Warn, Some(LevelFilter::Info))
        );
        assert_eq!(levels(false, 42), (LevelFilter::Trace, None));
    }
}
