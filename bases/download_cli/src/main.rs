// bases/download_cli/src/main.rs
mod app;
mod args;
mod config;
mod output;

use app::App;
use args::Args;
use clap::Parser;
use color_eyre::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let default_filter = if args.verbose {
        "fordownload=debug,media_downloader=debug,yt_dlp=debug"
    } else {
        "fordownload=info,media_downloader=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(args);

    if let Err(error) = app.run().await {
        app.print_error(&error);
        std::process::exit(app::exit_code(&error));
    }
    Ok(())
}
