//! Common utilities
pub mod measure;
pub mod url;
