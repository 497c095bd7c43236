use std::path::PathBuf;

use clap::{Parser, Subcommand};
use env_logger::Env;

use channel_tally::commands;
use channel_tally::commands::fetch::FetchOptions;
use channel_tally::config::load_env;
use channel_tally::report::{DEFAULT_ROWS_PER_PAGE, ReportFormat};

#[derive(Parser)]
#[command(name = "channel-tally")]
#[command(about = "Tally playlists, videos and total watch-time of a YouTube channel")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a channel's playlists and total video length
    Fetch {
        /// Channel URL (e.g., https://www.youtube.com/@name, .../channel/UC..., .../user/name)
        channel: String,

        /// YouTube Data API key (defaults to YOUTUBE_API_KEY)
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// Write a report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,

        /// Playlist rows per report page
        #[arg(long, default_value_t = DEFAULT_ROWS_PER_PAGE)]
        rows_per_page: usize,
    },

    /// Save the YouTube Data API key
    Init {
        /// YouTube Data API key
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables
    load_env();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch {
            channel,
            api_key,
            output,
            format,
            rows_per_page,
        } => {
            let options = FetchOptions {
                api_key,
                output: output.as_deref(),
                format,
                rows_per_page,
            };
            commands::fetch::run(&channel, options).await
        }
        Commands::Init { api_key, force } => commands::init::run(api_key, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
