//! Crash-recovery sweep.
//!
//! Interrupted atomic writes leave `*.dhubtmp.*` files behind. On engine
//! startup the whole root is swept and stale leftovers are removed. Namespace
//! directories are never touched, even when empty: an empty namespace is a
//! registered repository location, not garbage.

use crate::engine::TMP_MARKER;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Leftovers younger than this may belong to a write still in flight.
const STALE_AFTER: Duration = Duration::from_secs(300);

pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || sweep(&root, now)).await {
        Ok(report) if report.removed > 0 || report.failed > 0 => {
            info!(removed = report.removed, failed = report.failed, "Cleaned up temporary files");
        },
        Err(e) => {
            error!(error = %e, "Temp file cleanup task panicked");
        },
        _ => {},
    }
}

#[derive(Debug, Default)]
struct SweepReport {
    removed: usize,
    failed: usize,
}

fn sweep(root: &Path, now: SystemTime) -> SweepReport {
    let mut report = SweepReport::default();

    let leftovers = WalkDir::new(root)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.contains(TMP_MARKER))
        });

    for entry in leftovers {
        let path = entry.path();
        if !is_stale(path, now) {
            continue;
        }
        match std::fs::remove_file(path) {
            Ok(()) => report.removed += 1,
            Err(e) => {
                warn!(p = %path.display(), err = %e, "IO fail");
                report.failed += 1;
            },
        }
    }

    report
}

/// Unreadable metadata counts as stale; a leftover we cannot date is not
/// worth keeping.
fn is_stale(path: &Path, now: SystemTime) -> bool {
    std::fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}
