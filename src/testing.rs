//! In-memory [`ChannelApi`] for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::models::{ChannelSummary, Page, Playlist, PlaylistItem, Statistic};
use crate::youtube::{ChannelApi, MAX_RESULTS};

pub struct FakeApi {
    usernames: HashMap<String, String>,
    handles: HashMap<String, String>,
    channels: HashMap<String, ChannelSummary>,
    playlists: HashMap<String, Vec<Playlist>>,
    items: HashMap<String, Vec<PlaylistItem>>,
    durations: HashMap<String, String>,
    failing_items: HashMap<String, String>,
    failing_videos: HashMap<String, String>,
    stall_videos: bool,
    page_size: usize,
    requests: AtomicUsize,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            usernames: HashMap::new(),
            handles: HashMap::new(),
            channels: HashMap::new(),
            playlists: HashMap::new(),
            items: HashMap::new(),
            durations: HashMap::new(),
            failing_items: HashMap::new(),
            failing_videos: HashMap::new(),
            stall_videos: false,
            page_size: MAX_RESULTS as usize,
            requests: AtomicUsize::new(0),
        }
    }
}

impl FakeApi {
    pub fn with_username(mut self, username: &str, channel_id: &str) -> Self {
        self.usernames.insert(username.to_string(), channel_id.to_string());
        self
    }

    pub fn with_handle(mut self, handle: &str, channel_id: &str) -> Self {
        self.handles.insert(handle.to_string(), channel_id.to_string());
        self
    }

    pub fn with_channel(mut self, channel_id: &str, title: &str) -> Self {
        self.channels.insert(
            channel_id.to_string(),
            ChannelSummary {
                title: title.to_string(),
                author_name: title.to_string(),
                subscriber_count: Statistic::Known(1000),
                view_count: Statistic::Unknown,
                created: chrono::NaiveDate::from_ymd_opt(2010, 5, 1),
            },
        );
        self
    }

    /// Add a playlist whose videos are `{playlist_id}-v0`, `{playlist_id}-v1`, ...
    pub fn with_playlist(
        mut self,
        channel_id: &str,
        playlist_id: &str,
        title: &str,
        durations: &[&str],
    ) -> Self {
        self.playlists
            .entry(channel_id.to_string())
            .or_default()
            .push(Playlist {
                id: playlist_id.to_string(),
                title: title.to_string(),
            });

        let items = self.items.entry(playlist_id.to_string()).or_default();
        for raw in durations {
            let video_id = format!("{}-v{}", playlist_id, items.len());
            self.durations.insert(video_id.clone(), raw.to_string());
            items.push(PlaylistItem { video_id });
        }
        self
    }

    /// Append an item whose video lookup returns nothing
    pub fn with_missing_video(mut self, playlist_id: &str) -> Self {
        let items = self.items.entry(playlist_id.to_string()).or_default();
        items.push(PlaylistItem {
            video_id: format!("{}-gone{}", playlist_id, items.len()),
        });
        self
    }

    pub fn with_failing_items(mut self, playlist_id: &str, message: &str) -> Self {
        self.failing_items.insert(playlist_id.to_string(), message.to_string());
        self
    }

    pub fn with_failing_video(mut self, video_id: &str, message: &str) -> Self {
        self.failing_videos.insert(video_id.to_string(), message.to_string());
        self
    }

    /// Video lookups never complete
    pub fn with_stalled_videos(mut self) -> Self {
        self.stall_videos = true;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn page_of<T: Clone>(&self, all: &[T], token: Option<String>) -> Page<T> {
        let start: usize = token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(all.len());
        let items = all.get(start..end).map(<[T]>::to_vec).unwrap_or_default();
        let next_page_token = (end < all.len()).then(|| end.to_string());
        Page { items, next_page_token }
    }
}

impl ChannelApi for FakeApi {
    async fn channel_id_for_username(&self, username: &str) -> Result<Option<String>> {
        self.count();
        Ok(self.usernames.get(username).cloned())
    }

    async fn search_channel_id(&self, query: &str) -> Result<Option<String>> {
        self.count();
        Ok(self.handles.get(query).cloned())
    }

    async fn channel_summary(&self, channel_id: &str) -> Result<Option<ChannelSummary>> {
        self.count();
        Ok(self.channels.get(channel_id).cloned())
    }

    async fn playlists_page(
        &self,
        channel_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Playlist>> {
        self.count();
        let all = self.playlists.get(channel_id).map(Vec::as_slice).unwrap_or_default();
        Ok(self.page_of(all, page_token))
    }

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<PlaylistItem>> {
        self.count();
        if let Some(message) = self.failing_items.get(playlist_id) {
            return Err(Error::Listing(message.clone()));
        }
        let all = self.items.get(playlist_id).map(Vec::as_slice).unwrap_or_default();
        Ok(self.page_of(all, page_token))
    }

    async fn video_duration(&self, video_id: &str) -> Result<Option<String>> {
        self.count();
        if self.stall_videos {
            std::future::pending::<()>().await;
        }
        if let Some(message) = self.failing_videos.get(video_id) {
            return Err(Error::DetailLookup(message.clone()));
        }
        Ok(self.durations.get(video_id).cloned())
    }
}
