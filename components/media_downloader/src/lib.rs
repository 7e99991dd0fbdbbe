// components/media_downloader/src/lib.rs
mod options;
mod progress;
mod types;
mod ytdlp;

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub use options::{
    build_options, output_template_in, EngineOptions, PostProcessor, DEFAULT_MP3_BITRATE_KBPS,
    DEFAULT_OUTPUT_TEMPLATE, MAX_MP3_BITRATE_KBPS, MAX_VIDEO_HEIGHT, MIN_MP3_BITRATE_KBPS,
};
pub use progress::parse_progress_line;
pub use types::{DownloadError, DownloadOutcome, DownloadRequest, MediaFormat, ProgressEvent};
pub use ytdlp::{Downloader, ProgressFn, YtDlp};

pub struct MediaDownloader {
    downloader: Arc<dyn Downloader + Send + Sync>,
}

impl fmt::Debug for MediaDownloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaDownloader").finish_non_exhaustive()
    }
}

impl MediaDownloader {
    /// Create a MediaDownloader backed by yt-dlp, optionally preparing the
    /// directory downloads will land in
    pub async fn new(ytdlp: YtDlp, download_path: Option<&Path>) -> Result<Self, DownloadError> {
        Self::new_with_downloader(Arc::new(ytdlp), download_path).await
    }

    /// Create a new MediaDownloader with a specific downloader implementation
    pub async fn new_with_downloader(
        downloader: Arc<dyn Downloader + Send + Sync>,
        download_path: Option<&Path>,
    ) -> Result<Self, DownloadError> {
        // Missing binaries must be reported before anything touches the network
        downloader.check_available().await?;

        if let Some(path) = download_path {
            tokio::fs::create_dir_all(path).await?;
        }

        Ok(Self { downloader })
    }

    /// Download and convert whatever `request` asks for
    pub async fn download(
        &self,
        request: &DownloadRequest,
        progress: ProgressFn<'_>,
    ) -> Result<DownloadOutcome, DownloadError> {
        let options = EngineOptions::for_request(request)?;

        info!(url = %request.url, format = %request.format, "starting download");
        let outcome = self.downloader.download(&options, &request.url, progress).await?;

        if outcome.files.is_empty() {
            warn!(url = %request.url, "engine finished without reporting any file");
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use ytdlp::stub::DownloaderStub;

    const URL: &str = "https://example.com/watch?v=abc";

    #[tokio::test]
    async fn test_downloader_creation() {
        let temp_dir = TempDir::new().unwrap();
        let download_path = temp_dir.path().join("videos");

        let downloader = MediaDownloader::new_with_downloader(
            Arc::new(DownloaderStub::default()),
            Some(download_path.as_path()),
        )
        .await;

        assert!(
            downloader.is_ok(),
            "Downloader creation failed with error: {:?}",
            downloader.err().unwrap()
        );

        match fs::metadata(&download_path) {
            Ok(meta) => assert!(meta.is_dir()),
            Err(e) => panic!(
                "Download directory '{}' was not created: {}",
                download_path.display(),
                e
            ),
        }
    }

    #[tokio::test]
    async fn test_missing_dependency_stops_creation() {
        let temp_dir = TempDir::new().unwrap();
        let download_path = temp_dir.path().join("never");

        let result = MediaDownloader::new_with_downloader(
            Arc::new(DownloaderStub::missing("ffmpeg")),
            Some(download_path.as_path()),
        )
        .await;

        assert_matches!(result, Err(DownloadError::DependencyNotFound(name)) if name == "ffmpeg");
        assert!(!download_path.exists());
    }

    #[tokio::test]
    async fn test_download_mp3() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(DownloaderStub::default());
        let downloader =
            MediaDownloader::new_with_downloader(stub.clone(), Some(temp_dir.path()))
                .await
                .unwrap();

        let request = DownloadRequest::new(MediaFormat::Mp3, URL)
            .unwrap()
            .with_quality(Some(256))
            .with_output_template(Some(output_template_in(temp_dir.path())));

        let events = Mutex::new(Vec::new());
        let outcome = downloader
            .download(&request, &|event: ProgressEvent| events.lock().unwrap().push(event))
            .await
            .unwrap();

        assert_eq!(outcome.files, vec![temp_dir.path().join("Test Video.mp3")]);
        assert_eq!(stub.downloads.load(Ordering::SeqCst), 1);

        let events = events.into_inner().unwrap();
        assert_matches!(events.last(), Some(ProgressEvent::Finished { path }) if path.ends_with("Test Video.mp3"));
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_engine() {
        let stub = Arc::new(DownloaderStub::default());
        let downloader = MediaDownloader::new_with_downloader(stub.clone(), None)
            .await
            .unwrap();

        let request = DownloadRequest::new(MediaFormat::Mp3, URL)
            .unwrap()
            .with_quality(Some(500));

        let result = downloader.download(&request, &|_: ProgressEvent| {}).await;

        assert_matches!(result, Err(DownloadError::InvalidQuality(500)));
        assert_eq!(stub.downloads.load(Ordering::SeqCst), 0);
    }
}
