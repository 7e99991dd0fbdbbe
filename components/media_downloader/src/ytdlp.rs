// components/media_downloader/src/ytdlp.rs
use crate::options::EngineOptions;
use crate::progress::parse_progress_line;
use crate::types::{DownloadError, DownloadOutcome, ProgressEvent};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};
use url::Url;

/// Callback receiving engine progress as it happens
pub type ProgressFn<'a> = &'a (dyn Fn(ProgressEvent) + Send + Sync);

#[async_trait]
pub trait Downloader {
    /// Check that the engine and the transcoder it relies on can be found
    async fn check_available(&self) -> Result<(), DownloadError>;

    /// Fetch `url` and post-process it as `options` describe
    async fn download(
        &self,
        options: &EngineOptions,
        url: &Url,
        progress: ProgressFn<'_>,
    ) -> Result<DownloadOutcome, DownloadError>;
}

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    ffmpeg: Option<PathBuf>,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            ffmpeg: None,
        }
    }
}

impl YtDlp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific yt-dlp executable instead of the one on `PATH`
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Use a specific ffmpeg executable instead of the one on `PATH`
    pub fn with_ffmpeg(mut self, ffmpeg: impl Into<PathBuf>) -> Self {
        self.ffmpeg = Some(ffmpeg.into());
        self
    }

    fn ffmpeg_program(&self) -> &Path {
        self.ffmpeg.as_deref().unwrap_or(Path::new("ffmpeg"))
    }

    fn command_args(&self, options: &EngineOptions, url: &Url) -> Vec<String> {
        let mut args = options.to_args();

        // --print implies --quiet, so progress has to be asked for explicitly
        args.extend(
            ["--newline", "--progress", "--print", "after_move:filepath"]
                .iter()
                .map(|s| s.to_string()),
        );

        if let Some(ffmpeg) = &self.ffmpeg {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.to_string_lossy().into_owned());
        }

        args.push("--".to_string());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl Downloader for YtDlp {
    async fn check_available(&self) -> Result<(), DownloadError> {
        let engine = which::which(&self.program).map_err(|_| {
            DownloadError::DependencyNotFound(format!("yt-dlp ({})", self.program.display()))
        })?;
        debug!(path = %engine.display(), "found yt-dlp");

        let ffmpeg = which::which(self.ffmpeg_program()).map_err(|_| {
            DownloadError::DependencyNotFound(format!(
                "ffmpeg ({})",
                self.ffmpeg_program().display()
            ))
        })?;
        debug!(path = %ffmpeg.display(), "found ffmpeg");

        Ok(())
    }

    async fn download(
        &self,
        options: &EngineOptions,
        url: &Url,
        progress: ProgressFn<'_>,
    ) -> Result<DownloadOutcome, DownloadError> {
        let args = self.command_args(options, url);
        debug!(program = %self.program.display(), ?args, "running yt-dlp");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::DownloadFailed("yt-dlp stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::DownloadFailed("yt-dlp stderr unavailable".to_string()))?;

        let read_stdout = async {
            let mut files = Vec::new();
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Some(event) = parse_progress_line(line) {
                    progress(event);
                } else if !line.starts_with('[') {
                    // printed by `--print after_move:filepath`
                    let path = PathBuf::from(line);
                    progress(ProgressEvent::Finished { path: path.clone() });
                    files.push(path);
                } else {
                    debug!(target: "yt_dlp", "{line}");
                }
            }
            Ok::<_, std::io::Error>(files)
        };

        let read_stderr = async {
            let mut last_error = None;
            let mut lines = BufReader::new(stderr).lines();
            while let Some(line) = lines.next_line().await? {
                if let Some(event) = parse_progress_line(&line) {
                    progress(event);
                    continue;
                }
                if line.starts_with("ERROR:") {
                    warn!(target: "yt_dlp", "{line}");
                    last_error = Some(line);
                } else {
                    debug!(target: "yt_dlp", "{line}");
                }
            }
            Ok::<_, std::io::Error>(last_error)
        };

        let (files, last_error) = tokio::try_join!(read_stdout, read_stderr)?;
        let status = child.wait().await?;

        if !status.success() {
            return Err(classify_failure(&status.to_string(), last_error.as_deref()));
        }

        Ok(DownloadOutcome { files })
    }
}

/// Decide whether a failed run broke while fetching or while converting.
fn classify_failure(status: &str, last_error: Option<&str>) -> DownloadError {
    let Some(line) = last_error else {
        return DownloadError::DownloadFailed(format!("yt-dlp exited with status: {status}"));
    };

    let message = line.strip_prefix("ERROR:").unwrap_or(line).trim().to_string();
    let lowered = message.to_ascii_lowercase();

    if lowered.starts_with("postprocessing")
        || lowered.contains("ffmpeg")
        || lowered.contains("ffprobe")
    {
        DownloadError::ConversionFailed(message)
    } else {
        DownloadError::DownloadFailed(message)
    }
}
