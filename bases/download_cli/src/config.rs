// bases/download_cli/src/config.rs
use crate::args::Args;
use media_downloader::{output_template_in, DownloadError, DownloadRequest, MediaFormat, YtDlp};
use std::path::PathBuf;
use tracing::warn;

/// Everything one run needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct Config {
    pub request: DownloadRequest,

    /// Directory that has to exist before the engine writes into it
    pub download_path: Option<PathBuf>,

    pub ytdlp: YtDlp,

    /// Only show the engine options, never download
    pub print_options: bool,
}

impl Config {
    /// Create configuration from CLI arguments
    pub fn from_args(args: &Args) -> Result<Self, DownloadError> {
        let format: MediaFormat = args.format.parse()?;

        if format == MediaFormat::Mp4 && args.quality.is_some() {
            warn!("--quality only applies to mp3, ignoring it");
        }

        let output_template = match (&args.template, &args.output) {
            (Some(template), _) => Some(template.clone()),
            (None, Some(dir)) => Some(output_template_in(dir)),
            (None, None) => None,
        };

        let request = DownloadRequest::new(format, &args.url)?
            .with_quality(args.quality)
            .with_output_template(output_template)
            .with_playlist(args.playlist)
            .with_overwrite(args.overwrite);

        let mut ytdlp = YtDlp::new();
        if let Some(program) = &args.yt_dlp {
            ytdlp = ytdlp.with_program(program);
        }
        if let Some(ffmpeg) = &args.ffmpeg {
            ytdlp = ytdlp.with_ffmpeg(ffmpeg);
        }

        Ok(Self {
            request,
            download_path: args.output.clone(),
            ytdlp,
            print_options: args.print_options,
        })
    }
}
