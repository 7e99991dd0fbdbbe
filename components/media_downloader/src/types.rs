// components/media_downloader/src/types.rs
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Unsupported format '{0}': expected mp4 or mp3")]
    InvalidFormat(String),

    #[error("Invalid audio quality {0} kbps: expected a bitrate between 64 and 320")]
    InvalidQuality(u32),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DownloadError {
    /// True for errors caused by what the user asked for, detected before
    /// anything external runs.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DownloadError::InvalidFormat(_)
                | DownloadError::InvalidQuality(_)
                | DownloadError::InvalidUrl(_)
        )
    }
}

/// Output container the user wants to end up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    /// Video and audio muxed into MP4, capped at 1080p
    Mp4,
    /// Audio only, transcoded to MP3
    Mp3,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Mp3 => "mp3",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaFormat {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(MediaFormat::Mp4),
            "mp3" => Ok(MediaFormat::Mp3),
            _ => Err(DownloadError::InvalidFormat(s.to_string())),
        }
    }
}

/// Everything the user asked for in a single invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub format: MediaFormat,

    /// Audio bitrate in kbps, only read for MP3
    pub quality: Option<u32>,

    /// Engine output template, used verbatim when present
    pub output_template: Option<String>,

    pub url: Url,

    /// Download every entry when the URL points at a playlist
    pub playlist: bool,

    /// Replace files that already exist at the destination
    pub overwrite: bool,
}

impl DownloadRequest {
    pub fn new(format: MediaFormat, url: &str) -> Result<Self, DownloadError> {
        let url = Url::parse(url).map_err(|e| DownloadError::InvalidUrl(format!("{url}: {e}")))?;

        Ok(Self {
            format,
            quality: None,
            output_template: None,
            url,
            playlist: false,
            overwrite: false,
        })
    }

    pub fn with_quality(mut self, quality: Option<u32>) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_output_template(mut self, template: Option<String>) -> Self {
        self.output_template = template;
        self
    }

    pub fn with_playlist(mut self, playlist: bool) -> Self {
        self.playlist = playlist;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// A single line of engine output that carries something worth reporting
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The engine started writing to a new file
    Destination { path: PathBuf },

    /// Percentage of the current file downloaded so far
    Downloading { percent: f64 },

    /// Final path of a file after all post-processing
    Finished { path: PathBuf },
}

/// Files the engine reported as finished, after post-processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[rstest]
    #[case("mp4", MediaFormat::Mp4)]
    #[case("mp3", MediaFormat::Mp3)]
    #[case("MP3", MediaFormat::Mp3)]
    #[case(" Mp4 ", MediaFormat::Mp4)]
    fn parses_supported_formats(#[case] input: &str, #[case] expected: MediaFormat) {
        assert_eq!(input.parse::<MediaFormat>().unwrap(), expected);
    }

    #[rstest]
    #[case("avi")]
    #[case("")]
    #[case("mp4a")]
    #[case("flac")]
    fn rejects_unsupported_formats(#[case] input: &str) {
        assert_matches!(
            input.parse::<MediaFormat>(),
            Err(DownloadError::InvalidFormat(f)) if f == input
        );
    }

    #[test]
    fn request_rejects_relative_url() {
        assert_matches!(
            DownloadRequest::new(MediaFormat::Mp4, "watch?v=abc"),
            Err(DownloadError::InvalidUrl(_))
        );
    }

    #[test]
    fn request_defaults_to_single_video_without_overwrite() {
        let request = DownloadRequest::new(MediaFormat::Mp3, "https://example.com/watch?v=abc").unwrap();
        assert!(!request.playlist);
        assert!(!request.overwrite);
        assert_eq!(request.quality, None);
        assert_eq!(request.output_template, None);
    }

    #[test]
    fn input_errors_are_classified() {
        assert!(DownloadError::InvalidFormat("avi".into()).is_invalid_input());
        assert!(DownloadError::InvalidQuality(500).is_invalid_input());
        assert!(DownloadError::InvalidUrl("x".into()).is_invalid_input());
        assert!(!DownloadError::DependencyNotFound("ffmpeg".into()).is_invalid_input());
        assert!(!DownloadError::DownloadFailed("boom".into()).is_invalid_input());
        assert!(!DownloadError::ConversionFailed("boom".into()).is_invalid_input());
    }
}
