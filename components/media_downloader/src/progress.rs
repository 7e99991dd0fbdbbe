// components/media_downloader/src/progress.rs
use crate::types::ProgressEvent;
use std::path::PathBuf;

/// Parse a single `[download]` line printed by yt-dlp with `--newline`.
///
/// Returns `None` for anything that is not a destination or percentage line.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let rest = line.trim().strip_prefix("[download]")?.trim_start();

    if let Some(path) = rest.strip_prefix("Destination:") {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        return Some(ProgressEvent::Destination {
            path: PathBuf::from(path),
        });
    }

    let (number, _) = rest.split_once('%')?;
    let percent: f64 = number.trim().parse().ok()?;
    if !percent.is_finite() {
        return None;
    }

    Some(ProgressEvent::Downloading {
        percent: percent.clamp(0.0, 100.0),
    })
}
