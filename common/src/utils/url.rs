//! URL helpers

/// Join a relative path to a base URL, as `{base}/{path}`.
///
/// Unlike [`url::Url::join`], this never drops the last segment of the base URL, no matter if it
/// carries a trailing slash or not. The result is not validated.
pub fn join_path(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
