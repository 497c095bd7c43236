use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::duration::format_hms;
use crate::error::{Error, Result};
use crate::models::{AggregateResult, ChannelSummary, PlaylistStat, Statistic};

pub const REPORT_TITLE: &str = "YouTube Channel Summary";
pub const DEFAULT_ROWS_PER_PAGE: usize = 40;

/// Output document kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// Key/value rows of the channel information table
pub fn channel_info_rows(channel: &ChannelSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Channel", channel.title.clone()),
        ("Author", channel.author_name.clone()),
        ("Subscribers", channel.subscriber_count.to_string()),
        ("Total Views", channel.view_count.to_string()),
        ("Channel Created on", created_label(channel)),
    ]
}

/// Key/value rows of the summary table
pub fn summary_rows(result: &AggregateResult) -> Vec<(&'static str, String)> {
    vec![
        ("Total Video Length", format_hms(result.total_duration)),
        ("Number of Playlists", result.playlist_count.to_string()),
        ("Total Number of Videos", result.video_count.to_string()),
    ]
}

fn created_label(channel: &ChannelSummary) -> String {
    channel
        .created
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Escape characters that would break a markdown table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn push_key_value_table(output: &mut String, rows: &[(&'static str, String)]) {
    output.push_str("| Field | Value |\n|---|---|\n");
    for (key, value) in rows {
        output.push_str(&format!("| {} | {} |\n", key, cell(value)));
    }
}

/// Render the report as markdown, splitting the playlist table into pages
pub fn render_markdown(result: &AggregateResult, rows_per_page: usize) -> String {
    let rows_per_page = rows_per_page.max(1);
    let pages: Vec<&[PlaylistStat]> = if result.playlist_stats.is_empty() {
        vec![&result.playlist_stats[..]]
    } else {
        result.playlist_stats.chunks(rows_per_page).collect()
    };
    let page_count = pages.len();

    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", REPORT_TITLE));

    output.push_str("## Channel\n\n");
    push_key_value_table(&mut output, &channel_info_rows(&result.channel));

    output.push_str("\n## Summary\n\n");
    push_key_value_table(&mut output, &summary_rows(result));

    for (index, page) in pages.iter().enumerate() {
        if index == 0 {
            output.push_str("\n## Playlists\n\n");
        } else {
            output.push_str("\n---\n\n## Playlists (continued)\n\n");
        }

        output.push_str("| Playlist Title | Number of Videos |\n|---|---:|\n");
        for stat in page.iter() {
            output.push_str(&format!("| {} | {} |\n", cell(&stat.title), stat.video_count));
        }

        output.push_str(&format!("\n_Page {} of {}_\n", index + 1, page_count));
    }

    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    title: &'static str,
    channel: JsonChannel<'a>,
    summary: JsonSummary,
    playlists: &'a [PlaylistStat],
}

#[derive(Serialize)]
struct JsonChannel<'a> {
    title: &'a str,
    author: &'a str,
    subscribers: Option<u64>,
    total_views: Option<u64>,
    created: Option<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    total_video_length: String,
    total_video_seconds: u64,
    playlist_count: usize,
    video_count: usize,
}

/// Render the report as pretty-printed JSON; unknown statistics become `null`
pub fn render_json(result: &AggregateResult) -> Result<String> {
    let channel = &result.channel;
    let report = JsonReport {
        title: REPORT_TITLE,
        channel: JsonChannel {
            title: &channel.title,
            author: &channel.author_name,
            subscribers: Statistic::known(channel.subscriber_count),
            total_views: Statistic::known(channel.view_count),
            created: channel.created.map(|d| d.format("%Y-%m-%d").to_string()),
        },
        summary: JsonSummary {
            total_video_length: format_hms(result.total_duration),
            total_video_seconds: result.total_duration.as_secs(),
            playlist_count: result.playlist_count,
            video_count: result.video_count,
        },
        playlists: &result.playlist_stats,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write the report for `result` to `path`
pub fn render(
    result: &AggregateResult,
    path: &Path,
    format: ReportFormat,
    rows_per_page: usize,
) -> Result<()> {
    if result.playlist_stats.is_empty() {
        return Err(Error::Config(
            "No data to export: the channel has no playlists.".to_string(),
        ));
    }

    let document = match format {
        ReportFormat::Markdown => render_markdown(result, rows_per_page),
        ReportFormat::Json => render_json(result)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, document)?;

    info!("Report written to {}", path.display());
    Ok(())
}
