//! Download completion detection via directory snapshots.
//!
//! Chrome writes downloads under a temporary name (`.crdownload`) and renames
//! them when complete. There is no completion event on the filesystem side,
//! so the watcher compares directory listings taken before and after the
//! download was triggered, once per second, until a new finished file shows
//! up or the window elapses. Known limitation: a very slow download or an
//! unusual temporary suffix can escape the window; the suffix list is
//! configurable but the mechanism is deliberately kept as simple as this.

use std::{
    collections::HashSet,
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use {
    tokio::time::{Duration, sleep},
    tracing::debug,
};

/// Poll interval for download detection.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Create the download directory if it does not exist yet.
/// Returns true when the directory was created.
pub fn ensure_dir(dir: &Path) -> io::Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(dir)?;
    Ok(true)
}

/// Names currently present in the directory.
pub fn snapshot(dir: &Path) -> io::Result<HashSet<OsString>> {
    let mut names = HashSet::new();
    for entry in std::fs::read_dir(dir)? {
        names.insert(entry?.file_name());
    }
    Ok(names)
}

/// Whether a filename carries a known in-progress-download suffix.
pub fn is_in_progress(name: &OsString, suffixes: &[String]) -> bool {
    let name = name.to_string_lossy();
    suffixes.iter().any(|s| name.ends_with(s.as_str()))
}

/// Wait for a file that was not in `before` and is not an in-progress
/// download, polling once per second for up to `timeout`.
///
/// Returns the path of the new file, or `None` when the window elapses.
pub async fn wait_for_new_file(
    dir: &Path,
    before: &HashSet<OsString>,
    timeout: Duration,
    suffixes: &[String],
) -> io::Result<Option<PathBuf>> {
    let attempts = timeout.as_secs().max(1);

    for attempt in 0..attempts {
        sleep(POLL_INTERVAL).await;

        let after = snapshot(dir)?;
        let new_file = after
            .difference(before)
            .find(|name| !is_in_progress(name, suffixes));

        if let Some(name) = new_file {
            debug!(file = %name.to_string_lossy(), attempt, "new download detected");
            return Ok(Some(dir.join(name)));
        }
    }

    Ok(None)
}
