#![deny(clippy::unwrap_used)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod compression;
pub mod fetcher;
pub mod retrieve;
pub mod progress;
pub mod utils;
