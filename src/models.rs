use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

/// A channel statistic the platform may withhold (e.g. hidden subscriber counts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Known(u64),
    Unknown,
}

impl Statistic {
    /// Interpret the platform's string-encoded counter
    pub fn from_api(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse().ok())
            .map(Statistic::Known)
            .unwrap_or(Statistic::Unknown)
    }

    pub fn known(self) -> Option<u64> {
        match self {
            Statistic::Known(n) => Some(n),
            Statistic::Unknown => None,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Known(n) => write!(f, "{}", n),
            Statistic::Unknown => f.write_str("Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub title: String,
    pub author_name: String,
    pub subscriber_count: Statistic,
    pub view_count: Statistic,
    pub created: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistStat {
    pub title: String,
    pub video_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub channel: ChannelSummary,
    pub total_duration: Duration,
    pub playlist_count: usize,
    pub video_count: usize,
    /// In discovery order; titles may repeat
    pub playlist_stats: Vec<PlaylistStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub percent_complete: u8,
    pub elapsed_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub credential: String,
    pub channel_reference: String,
}

impl FetchRequest {
    pub fn new(credential: impl Into<String>, channel_reference: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            channel_reference: channel_reference.into(),
        }
    }
}

/// A playlist owned by the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub title: String,
}

/// One entry of a playlist; only the referenced video matters here
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItem {
    pub video_id: String,
}

/// One page of a listing response
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: None,
        }
    }

    pub fn with_token(items: Vec<T>, token: impl Into<String>) -> Self {
        Self {
            items,
            next_page_token: Some(token.into()),
        }
    }
}
