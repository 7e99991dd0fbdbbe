// bases/download_cli/src/args.rs
use clap::Parser;
use std::path::PathBuf;

/// Download videos as MP4 (up to 1080p) or extract their audio as MP3
#[derive(Parser, Debug)]
#[command(name = "fordownload", author, version, about, long_about = None)]
pub struct Args {
    /// Video URL to download from
    pub url: String,

    /// Output format: mp4 or mp3
    #[arg(short, long, default_value = "mp4")]
    pub format: String,

    /// Audio bitrate in kbps for mp3 (64-320, defaults to 192)
    #[arg(long, value_name = "KBPS")]
    pub quality: Option<u32>,

    /// Directory to store downloaded files
    #[arg(short, long, value_name = "DIR", conflicts_with = "template")]
    pub output: Option<PathBuf>,

    /// Output filename template, handed to yt-dlp as is
    #[arg(short, long)]
    pub template: Option<String>,

    /// Download every video when the URL points at a playlist
    #[arg(long)]
    pub playlist: bool,

    /// Overwrite files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Print the yt-dlp options as JSON and exit without downloading
    #[arg(long)]
    pub print_options: bool,

    /// yt-dlp executable to run
    #[arg(long = "yt-dlp", env = "FORDOWNLOAD_YT_DLP", value_name = "PATH")]
    pub yt_dlp: Option<PathBuf>,

    /// ffmpeg executable yt-dlp should use
    #[arg(long, env = "FORDOWNLOAD_FFMPEG", value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
