//! Dotenv assignments read through `dotenvy` without touching the process
//! environment.

use camino::Utf8Path;

/// Assignments in `data`, in file order. Lines `dotenvy` cannot parse are
/// logged and skipped.
pub(super) fn parse_dotenv(path: &Utf8Path, data: &str) -> Vec<(String, String)> {
    dotenvy::from_read_iter(data.as_bytes())
        .filter_map(|item| {
            item.map_err(|err| {
                tracing::warn!(%path, error = %err, "skipping malformed dotenv line");
            })
            .ok()
        })
        .collect()
}
