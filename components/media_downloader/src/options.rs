// components/media_downloader/src/options.rs
//! Maps a [`DownloadRequest`] onto the options yt-dlp understands.
//!
//! Nothing in here touches the network, the filesystem or a child process,
//! so every decision about stream selection and post-processing can be
//! checked without yt-dlp or ffmpeg installed.

use crate::types::{DownloadError, DownloadRequest, MediaFormat};
use serde::Serialize;
use std::path::Path;

/// Naming pattern used when the user gives no template
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Bitrate used for MP3 extraction when no quality is requested
pub const DEFAULT_MP3_BITRATE_KBPS: u32 = 192;

pub const MIN_MP3_BITRATE_KBPS: u32 = 64;
pub const MAX_MP3_BITRATE_KBPS: u32 = 320;

/// Vertical resolution cap for MP4 downloads
pub const MAX_VIDEO_HEIGHT: u32 = 1080;

/// Post-processing step the engine hands over to ffmpeg
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "key")]
pub enum PostProcessor {
    #[serde(rename = "FFmpegExtractAudio")]
    ExtractAudio { codec: MediaFormat, bitrate_kbps: u32 },
}

/// Fully specified configuration for one engine run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineOptions {
    /// Stream selector, in yt-dlp format-selection syntax
    pub format: String,

    /// Container to merge separate video and audio streams into
    pub merge_output_format: Option<MediaFormat>,

    pub output_template: String,
    pub no_playlist: bool,
    pub overwrite: bool,
    pub no_warnings: bool,
    pub postprocessors: Vec<PostProcessor>,
}

/// Default naming pattern placed inside `dir`
pub fn output_template_in(dir: impl AsRef<Path>) -> String {
    dir.as_ref()
        .join(DEFAULT_OUTPUT_TEMPLATE)
        .to_string_lossy()
        .into_owned()
}

/// Build engine options from raw user input.
///
/// `quality` is only validated and used for MP3; MP4 ignores it.
pub fn build_options(
    format: &str,
    quality: Option<u32>,
    output_template: Option<&str>,
    url: &str,
) -> Result<EngineOptions, DownloadError> {
    let format: MediaFormat = format.parse()?;
    let request = DownloadRequest::new(format, url)?
        .with_quality(quality)
        .with_output_template(output_template.map(str::to_owned));

    EngineOptions::for_request(&request)
}

impl EngineOptions {
    pub fn for_request(request: &DownloadRequest) -> Result<Self, DownloadError> {
        let (format, merge_output_format, postprocessors) = match request.format {
            MediaFormat::Mp4 => (mp4_selector(), Some(MediaFormat::Mp4), Vec::new()),
            MediaFormat::Mp3 => {
                let bitrate_kbps = mp3_bitrate(request.quality)?;
                (
                    "bestaudio/best".to_string(),
                    None,
                    vec![PostProcessor::ExtractAudio {
                        codec: MediaFormat::Mp3,
                        bitrate_kbps,
                    }],
                )
            }
        };

        let output_template = request
            .output_template
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT_TEMPLATE.to_string());

        Ok(Self {
            format,
            merge_output_format,
            output_template,
            no_playlist: !request.playlist,
            overwrite: request.overwrite,
            no_warnings: true,
            postprocessors,
        })
    }

    /// Bitrate requested from the audio extraction step, if there is one
    pub fn bitrate_kbps(&self) -> Option<u32> {
        self.postprocessors.iter().find_map(|pp| match pp {
            PostProcessor::ExtractAudio { bitrate_kbps, .. } => Some(*bitrate_kbps),
        })
    }

    /// Render as yt-dlp command line arguments, without the URL
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["--format".to_string(), self.format.clone()];

        if let Some(container) = self.merge_output_format {
            args.push("--merge-output-format".to_string());
            args.push(container.to_string());
        }

        for pp in &self.postprocessors {
            match pp {
                PostProcessor::ExtractAudio {
                    codec,
                    bitrate_kbps,
                } => {
                    args.push("--extract-audio".to_string());
                    args.push("--audio-format".to_string());
                    args.push(codec.to_string());
                    args.push("--audio-quality".to_string());
                    args.push(format!("{bitrate_kbps}K"));
                }
            }
        }

        args.push("--output".to_string());
        args.push(self.output_template.clone());

        args.push(if self.no_playlist { "--no-playlist" } else { "--yes-playlist" }.to_string());
        args.push(if self.overwrite { "--force-overwrites" } else { "--no-overwrites" }.to_string());

        if self.no_warnings {
            args.push("--no-warnings".to_string());
        }

        args
    }
}

// H.264 + AAC pairs mux into MP4 without re-encoding, so try those first.
fn mp4_selector() -> String {
    let h = MAX_VIDEO_HEIGHT;
    format!(
        "bestvideo[ext=mp4][height<={h}][vcodec^=avc1]+bestaudio[ext=m4a]\
         /bestvideo[height<={h}]+bestaudio\
         /best[height<={h}]"
    )
}

fn mp3_bitrate(quality: Option<u32>) -> Result<u32, DownloadError> {
    match quality {
        None => Ok(DEFAULT_MP3_BITRATE_KBPS),
        Some(kbps) if (MIN_MP3_BITRATE_KBPS..=MAX_MP3_BITRATE_KBPS).contains(&kbps) => Ok(kbps),
        Some(kbps) => Err(DownloadError::InvalidQuality(kbps)),
    }
}
