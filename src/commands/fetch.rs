use std::io::{self, Write};
use std::path::Path;

use crate::config::resolve_api_key;
use crate::engine::start_fetch;
use crate::error::Result;
use crate::models::{AggregateResult, FetchRequest, ProgressEvent};
use crate::progress::{estimate_remaining, patience_message};
use crate::report::{ReportFormat, channel_info_rows, render, summary_rows};

pub struct FetchOptions<'a> {
    pub api_key: Option<String>,
    pub output: Option<&'a Path>,
    pub format: ReportFormat,
    pub rows_per_page: usize,
}

pub async fn run(channel: &str, options: FetchOptions<'_>) -> Result<()> {
    let api_key = resolve_api_key(options.api_key)?;

    eprintln!("Collecting data from YouTube...");
    let mut handle = start_fetch(FetchRequest::new(api_key, channel))?;

    let mut drew_progress = false;
    loop {
        tokio::select! {
            event = handle.next_event() => match event {
                Some(event) => {
                    draw_progress(event);
                    drew_progress = true;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                handle.cancel();
                break;
            }
        }
    }
    if drew_progress {
        eprintln!();
    }

    let result = handle.result().await?;
    eprintln!("Data fetching complete!");

    print_summary(&result);

    if let Some(path) = options.output {
        render(&result, path, options.format, options.rows_per_page)?;
        println!("\nReport saved to {}", path.display());
    }

    Ok(())
}

fn draw_progress(event: ProgressEvent) {
    let remaining = estimate_remaining(event.percent_complete, event.elapsed_seconds);
    let status = if event.percent_complete < 100 {
        patience_message(event.percent_complete)
    } else {
        "Done!"
    };

    eprint!(
        "\r\x1b[2K[{:>3}%] {} Estimated time remaining: {} seconds",
        event.percent_complete, status, remaining
    );
    let _ = io::stderr().flush();
}

fn print_summary(result: &AggregateResult) {
    for (key, value) in channel_info_rows(&result.channel)
        .into_iter()
        .chain(summary_rows(result))
    {
        println!("{:<24} {}", format!("{}:", key), value);
    }

    if result.playlist_stats.is_empty() {
        println!("\nNo playlists found.");
        return;
    }

    let title_width = result
        .playlist_stats
        .iter()
        .map(|s| s.title.chars().count())
        .max()
        .unwrap_or(0)
        .clamp("Playlist Title".len(), 60);

    println!();
    println!("{:<width$}  {}", "Playlist Title", "Number of Videos", width = title_width);
    println!("{}  {}", "-".repeat(title_width), "-".repeat(16));
    for stat in &result.playlist_stats {
        println!("{:<width$}  {:>16}", stat.title, stat.video_count, width = title_width);
    }
}
