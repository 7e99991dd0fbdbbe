// bases/download_cli/src/output.rs
use color_eyre::Result;
use media_downloader::{DownloadOutcome, DownloadRequest, EngineOptions, ProgressEvent};
use std::io::Write;

pub struct OutputHandler {
    verbose: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_options(&self, options: &EngineOptions) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(options)?);
        if self.verbose {
            println!("yt-dlp {}", options.to_args().join(" "));
        }
        Ok(())
    }

    pub fn print_download_start(&self, request: &DownloadRequest) {
        println!("Starting {} download from: {}", request.format, request.url);
    }

    pub fn print_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Destination { path } => {
                if self.verbose {
                    println!("Destination: {}", path.display());
                }
            }
            ProgressEvent::Downloading { percent } => {
                print!("\rDownloading: {:5.1}%", percent);
                let _ = std::io::stdout().flush();
            }
            ProgressEvent::Finished { path } => {
                println!("\nFinished: {}", path.display());
            }
        }
    }

    pub fn print_download_complete(&self, outcome: &DownloadOutcome) {
        match outcome.files.len() {
            0 => println!("Done, but yt-dlp did not report any file"),
            1 => println!("Done"),
            n => println!("Done, {} files downloaded", n),
        }

        if self.verbose {
            for file in &outcome.files {
                println!("  {}", file.display());
            }
        }
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}
