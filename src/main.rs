use clap::{Parser, Subcommand};
use skyloop::{config, output, server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skyloop")]
#[command(about = "Live slideshow server for all-sky camera frames")]
#[command(long_about = "\
Live slideshow server for all-sky camera frames

Serves one page that plays the most recent JPEGs under the image directory
as a loop, oldest to newest, at 12 frames per second. Every page load
rescans the directory, so new frames appear on reload.

Site layout:

  site/
  ├── config.toml                  # Optional, overrides stock defaults
  └── images/                      # Scanned recursively for .jpg/.jpeg
      ├── 20260101/
      │   ├── 203000.jpg
      │   └── 203030.jpg
      └── latest.jpg

Selection: the newest N files by modification time (N = `frames`, default
48), played oldest first. Each URL carries ?v=<mtime> so a file rewritten
in place is fetched again.

Set RUST_LOG to control log output (default: info).

Run 'skyloop gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory holding config.toml and the image directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the slideshow page and images
    Serve {
        /// Address to listen on, overrides [server] bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the frames the page would play right now
    Scan,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Command::Serve { bind } => {
            let site_config = config::load_config(&cli.root)?;
            let bind = bind.unwrap_or_else(|| site_config.server.bind.clone());
            let state = server::AppState::from_config(&site_config, &cli.root);
            server::serve(state, &bind).await?;
        }
        Command::Scan => {
            let site_config = config::load_config(&cli.root)?;
            let state = server::AppState::from_config(&site_config, &cli.root);
            let frames = state.frame_urls();
            output::print_scan_output(&frames, state.frame_limit, &state.images_root);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
