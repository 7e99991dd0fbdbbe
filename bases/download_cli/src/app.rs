// bases/download_cli/src/app.rs
use crate::args::Args;
use crate::config::Config;
use crate::output::OutputHandler;
use color_eyre::Result;
use media_downloader::{DownloadError, EngineOptions, MediaDownloader, ProgressEvent};

/// Download or conversion failed, or anything else went wrong at runtime
pub const EXIT_FAILURE: i32 = 1;
/// The request itself was unusable
pub const EXIT_INVALID_INPUT: i32 = 2;
/// yt-dlp or ffmpeg could not be found
pub const EXIT_MISSING_DEPENDENCY: i32 = 3;

pub struct App {
    args: Args,
    output: OutputHandler,
}

impl App {
    pub fn new(args: Args) -> Self {
        let output = OutputHandler::new(args.verbose);
        Self { args, output }
    }

    pub async fn run(&self) -> Result<()> {
        let config = Config::from_args(&self.args)?;

        // Validate before looking for binaries or touching the network
        let options = EngineOptions::for_request(&config.request)?;

        if config.print_options {
            self.output.print_options(&options)?;
            return Ok(());
        }

        let downloader =
            MediaDownloader::new(config.ytdlp.clone(), config.download_path.as_deref()).await?;

        self.output.print_download_start(&config.request);

        let outcome = downloader
            .download(&config.request, &|event: ProgressEvent| {
                self.output.print_progress(&event)
            })
            .await?;

        self.output.print_download_complete(&outcome);

        Ok(())
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}

/// Pick the process exit code for an error that ended the run
pub fn exit_code(error: &color_eyre::Report) -> i32 {
    match error.downcast_ref::<DownloadError>() {
        Some(e) if e.is_invalid_input() => EXIT_INVALID_INPUT,
        Some(DownloadError::DependencyNotFound(_)) => EXIT_MISSING_DEPENDENCY,
        _ => EXIT_FAILURE,
    }
}
