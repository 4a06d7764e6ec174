//! Command line helpers
pub mod client;
pub mod log;

/// Defaults a command may override.
pub trait CommandDefaults {
    /// Whether the command shows a progress bar, unless requested otherwise.
    fn progress(&self) -> bool {
        true
    }
}
