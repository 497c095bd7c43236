//! YouTube Data API v3 access.
//!
//! [`ChannelApi`] is the seam the aggregation engine talks to; [`YouTubeClient`]
//! implements it over HTTP. Every listing endpoint is requested with the fixed
//! page size [`MAX_RESULTS`].

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::api_base_url;
use crate::error::{Error, Result};
use crate::models::{ChannelSummary, Page, Playlist, PlaylistItem, Statistic};

/// Per-request maximum accepted by every listing endpoint
pub const MAX_RESULTS: u32 = 50;

/// Operations the aggregation engine needs from the platform
pub trait ChannelApi: Send + Sync {
    /// `channels?forUsername=`: ID of the first match, if any
    fn channel_id_for_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// `search?type=channel&q=`: channel ID of the first result, if any
    fn search_channel_id(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// `channels?id=`: snippet and statistics, `None` if the ID matches nothing
    fn channel_summary(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = Result<Option<ChannelSummary>>> + Send;

    fn playlists_page(
        &self,
        channel_id: &str,
        page_token: Option<String>,
    ) -> impl Future<Output = Result<Page<Playlist>>> + Send;

    fn playlist_items_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> impl Future<Output = Result<Page<PlaylistItem>>> + Send;

    /// `videos?id=`: raw `contentDetails.duration`, `None` for deleted or private videos
    fn video_duration(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// HTTP client for the YouTube Data API
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, api_base_url())
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Issue a GET and decode the body; failures are classified by `kind`
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        kind: fn(String) -> Error,
    ) -> Result<T> {
        debug!("GET {}/{} {:?}", self.base_url, endpoint, params);

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| kind(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| kind(e.to_string()))?;

        if !status.is_success() {
            return Err(kind(api_error_message(status.as_u16(), &text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| kind(format!("Unexpected {} response: {}", endpoint, e)))
    }
}

impl ChannelApi for YouTubeClient {
    async fn channel_id_for_username(&self, username: &str) -> Result<Option<String>> {
        let response: ListResponse<ChannelResource> = self
            .get(
                "channels",
                &[("part", "id"), ("forUsername", username)],
                Error::DetailLookup,
            )
            .await?;

        Ok(response.items.into_iter().next().map(|c| c.id))
    }

    async fn search_channel_id(&self, query: &str) -> Result<Option<String>> {
        let response: ListResponse<SearchResult> = self
            .get(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "channel"),
                    ("maxResults", "1"),
                    ("q", query),
                ],
                Error::DetailLookup,
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|r| r.snippet.channel_id))
    }

    async fn channel_summary(&self, channel_id: &str) -> Result<Option<ChannelSummary>> {
        let response: ListResponse<ChannelResource> = self
            .get(
                "channels",
                &[("part", "snippet,statistics"), ("id", channel_id)],
                Error::DetailLookup,
            )
            .await?;

        Ok(response.items.into_iter().next().map(ChannelResource::into_summary))
    }

    async fn playlists_page(
        &self,
        channel_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Playlist>> {
        let max_results = MAX_RESULTS.to_string();
        let mut params = vec![
            ("part", "id,snippet"),
            ("channelId", channel_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token.as_deref() {
            params.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistResource> =
            self.get("playlists", &params, Error::Listing).await?;

        Ok(Page {
            items: response
                .items
                .into_iter()
                .map(|p| Playlist {
                    id: p.id,
                    title: p.snippet.title.unwrap_or_default(),
                })
                .collect(),
            next_page_token: response.next_page_token,
        })
    }

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<PlaylistItem>> {
        let max_results = MAX_RESULTS.to_string();
        let mut params = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token.as_deref() {
            params.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistItemResource> =
            self.get("playlistItems", &params, Error::Listing).await?;

        Ok(Page {
            items: response
                .items
                .into_iter()
                .map(|i| PlaylistItem {
                    video_id: i.content_details.video_id,
                })
                .collect(),
            next_page_token: response.next_page_token,
        })
    }

    async fn video_duration(&self, video_id: &str) -> Result<Option<String>> {
        let response: ListResponse<VideoResource> = self
            .get(
                "videos",
                &[("part", "contentDetails"), ("id", video_id)],
                Error::DetailLookup,
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .map(|v| v.content_details.duration))
    }
}

/// Build a readable message from an error response body
fn api_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => format!("YouTube API error ({}): {}", status, parsed.error.message),
        Err(_) if body.trim().is_empty() => format!("YouTube API error ({})", status),
        Err(_) => format!("YouTube API error ({}): {}", status, body.trim()),
    }
}

/// Calendar date of an RFC 3339 timestamp such as `2006-09-21T17:23:41Z`
fn published_date(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            let date = value.split('T').next()?;
            NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChannelResource {
    id: String,
    #[serde(default)]
    snippet: Option<ChannelSnippet>,
    #[serde(default)]
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    title: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    subscriber_count: Option<String>,
    view_count: Option<String>,
    #[serde(default)]
    hidden_subscriber_count: bool,
}

impl ChannelResource {
    fn into_summary(self) -> ChannelSummary {
        let snippet = self.snippet.unwrap_or_default();
        let statistics = self.statistics.unwrap_or_default();
        let title = snippet.title.unwrap_or_default();

        let subscriber_count = if statistics.hidden_subscriber_count {
            Statistic::Unknown
        } else {
            Statistic::from_api(statistics.subscriber_count.as_deref())
        };

        ChannelSummary {
            // The API exposes no separate owner name
            author_name: title.clone(),
            title,
            subscriber_count,
            view_count: Statistic::from_api(statistics.view_count.as_deref()),
            created: snippet.published_at.as_deref().and_then(published_date),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    id: String,
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    content_details: VideoContentDetails,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: String,
}
