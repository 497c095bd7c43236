use std::collections::HashMap;
use std::time::Duration;

use channel_tally::error::{Error, Result};
use channel_tally::models::{ChannelSummary, Page, Playlist, PlaylistItem, Statistic};
use channel_tally::report::{self, ReportFormat};
use channel_tally::spawn_fetch;
use channel_tally::youtube::ChannelApi;

/// Channel "UCdemo" reachable through the handle "@demo", with two playlists
struct DemoChannel {
    playlists: Vec<Playlist>,
    items: HashMap<String, Vec<PlaylistItem>>,
    durations: HashMap<String, String>,
    broken_playlist: Option<String>,
}

impl DemoChannel {
    fn new() -> Self {
        let mut channel = Self {
            playlists: Vec::new(),
            items: HashMap::new(),
            durations: HashMap::new(),
            broken_playlist: None,
        };
        channel.add("PL1", "Getting Started", &["PT3M", "PT4M", "PT5M"]);
        channel.add(
            "PL2",
            "Deep Dives",
            &["PT1H", "PT45M", "PT30M15S", "PT0S", "PT59S"],
        );
        channel
    }

    fn add(&mut self, id: &str, title: &str, durations: &[&str]) {
        self.playlists.push(Playlist {
            id: id.to_string(),
            title: title.to_string(),
        });
        let items = durations
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let video_id = format!("{id}-{i}");
                self.durations.insert(video_id.clone(), raw.to_string());
                PlaylistItem { video_id }
            })
            .collect();
        self.items.insert(id.to_string(), items);
    }
}

impl ChannelApi for DemoChannel {
    async fn channel_id_for_username(&self, _username: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn search_channel_id(&self, query: &str) -> Result<Option<String>> {
        Ok((query == "demo").then(|| "UCdemo".to_string()))
    }

    async fn channel_summary(&self, channel_id: &str) -> Result<Option<ChannelSummary>> {
        Ok((channel_id == "UCdemo").then(|| ChannelSummary {
            title: "Demo".to_string(),
            author_name: "Demo".to_string(),
            subscriber_count: Statistic::Unknown,
            view_count: Statistic::Known(42),
            created: None,
        }))
    }

    // One playlist per page to exercise continuation tokens
    async fn playlists_page(
        &self,
        _channel_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Playlist>> {
        let index: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let next = (index + 1 < self.playlists.len()).then(|| (index + 1).to_string());
        Ok(Page {
            items: vec![self.playlists[index].clone()],
            next_page_token: next,
        })
    }

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        _page_token: Option<String>,
    ) -> Result<Page<PlaylistItem>> {
        if self.broken_playlist.as_deref() == Some(playlist_id) {
            return Err(Error::Listing(
                "The playlist identified could not be found.".to_string(),
            ));
        }
        Ok(Page::last(self.items[playlist_id].clone()))
    }

    async fn video_duration(&self, video_id: &str) -> Result<Option<String>> {
        Ok(self.durations.get(video_id).cloned())
    }
}

#[tokio::test]
async fn handle_fetch_produces_report() {
    let handle = spawn_fetch(DemoChannel::new(), "https://www.youtube.com/@demo");

    let mut percents = Vec::new();
    let result = handle
        .wait_with_progress(|event| percents.push(event.percent_complete))
        .await
        .unwrap();

    assert_eq!(result.playlist_count, 2);
    assert_eq!(result.video_count, 8);
    let expected = (3 + 4 + 5) * 60 + 3600 + 45 * 60 + 30 * 60 + 15 + 59;
    assert_eq!(result.total_duration, Duration::from_secs(expected));
    assert_eq!(result.playlist_stats[0].title, "Getting Started");
    assert_eq!(result.playlist_stats[1].title, "Deep Dives");

    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(percents.last(), Some(&100));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.md");
    report::render(&result, &path, ReportFormat::Markdown, 1).unwrap();

    let doc = std::fs::read_to_string(&path).unwrap();
    assert!(doc.contains("| Total Video Length | 2:28:14 |"));
    assert!(doc.contains("| Subscribers | Unknown |"));
    assert!(doc.contains("_Page 2 of 2_"));
}

#[tokio::test]
async fn broken_listing_returns_no_result() {
    let mut channel = DemoChannel::new();
    channel.broken_playlist = Some("PL2".to_string());

    let handle = spawn_fetch(channel, "https://www.youtube.com/@demo");
    let mut events = 0;
    let err = handle.wait_with_progress(|_| events += 1).await.unwrap_err();

    assert!(matches!(err, Error::Listing(_)));
    assert_eq!(err.to_string(), "The playlist identified could not be found.");
    assert_eq!(events, 0);
}
