//! The aggregation pipeline: channel → playlists → playlist items → video durations.
//!
//! [`fetch`] runs the pipeline on the caller's task; [`spawn_fetch`] and
//! [`start_fetch`] run it on a dedicated tokio task and hand back a
//! [`FetchHandle`] that yields progress events and then the result.

use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;

use crate::config::validate_api_key;
use crate::duration::{self, format_hms};
use crate::error::{Error, Result};
use crate::models::{AggregateResult, FetchRequest, PlaylistItem, PlaylistStat, ProgressEvent};
use crate::pagination::collect_all;
use crate::progress::{ProgressSink, ProgressTracker};
use crate::resolver::resolve;
use crate::youtube::{ChannelApi, YouTubeClient};

/// Aggregate a channel's playlists, video counts and total duration.
///
/// Progress is published on `sink` once per playlist and once per video, then a
/// final 100% event. Nothing is published if the channel cannot be resolved.
/// The first failing request aborts the whole fetch.
pub async fn fetch<A: ChannelApi>(
    api: &A,
    channel_reference: &str,
    sink: ProgressSink,
) -> Result<AggregateResult> {
    let channel_id = resolve(api, channel_reference).await?;
    info!("Resolved {:?} to channel {}", channel_reference, channel_id);

    let channel = api
        .channel_summary(&channel_id)
        .await?
        .ok_or_else(|| Error::ChannelNotFound(channel_id.clone()))?;

    let channel_id = channel_id.as_str();
    let playlists = collect_all(move |token| api.playlists_page(channel_id, token)).await?;
    info!("Found {} playlist(s) for {}", playlists.len(), channel.title);

    // Item counts must all be known before the first percentage means anything
    let mut listings: Vec<Vec<PlaylistItem>> = Vec::with_capacity(playlists.len());
    for playlist in &playlists {
        let playlist_id = playlist.id.as_str();
        let items =
            collect_all(move |token| api.playlist_items_page(playlist_id, token)).await?;
        debug!("Playlist {} lists {} item(s)", playlist.id, items.len());
        listings.push(items);
    }

    let video_count: usize = listings.iter().map(Vec::len).sum();
    let mut tracker = ProgressTracker::new(sink);
    tracker.set_total_units(playlists.len() + video_count);

    let mut total_duration = Duration::ZERO;
    let mut playlist_stats = Vec::with_capacity(playlists.len());

    for (playlist, items) in playlists.iter().zip(&listings) {
        playlist_stats.push(PlaylistStat {
            title: playlist.title.clone(),
            video_count: items.len(),
        });
        tracker.complete_unit();

        let mut playlist_duration = Duration::ZERO;
        for item in items {
            let length = video_length(api, &item.video_id).await?;
            playlist_duration = playlist_duration.saturating_add(length);
            tracker.complete_unit();
        }

        info!(
            "Playlist {:?}: {} video(s), {}",
            playlist.title,
            items.len(),
            format_hms(playlist_duration)
        );
        total_duration = total_duration.saturating_add(playlist_duration);
    }

    tracker.finish();

    info!(
        "Channel {}: {} playlist(s), {} video(s), {}",
        channel.title,
        playlists.len(),
        video_count,
        format_hms(total_duration)
    );

    Ok(AggregateResult {
        channel,
        total_duration,
        playlist_count: playlists.len(),
        video_count,
        playlist_stats,
    })
}

/// Deleted and private videos have no details and count as zero length
async fn video_length<A: ChannelApi>(api: &A, video_id: &str) -> Result<Duration> {
    match api
        .video_duration(video_id)
        .await
        .map_err(Error::into_detail_lookup)?
    {
        Some(raw) => duration::parse(&raw),
        None => {
            warn!("Video {} returned no details, counting it as 0:00:00", video_id);
            Ok(Duration::ZERO)
        }
    }
}

/// A fetch running on its own task
pub struct FetchHandle {
    events: UnboundedReceiver<ProgressEvent>,
    task: JoinHandle<Result<AggregateResult>>,
}

impl FetchHandle {
    /// Next progress event; `None` once the fetch has finished
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }

    /// Stop the fetch; the result becomes [`Error::Cancelled`]
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wait for the outcome, discarding undelivered events
    pub async fn result(self) -> Result<AggregateResult> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    /// Hand every event to `on_event`, then return the outcome
    pub async fn wait_with_progress<F>(mut self, mut on_event: F) -> Result<AggregateResult>
    where
        F: FnMut(ProgressEvent),
    {
        while let Some(event) = self.next_event().await {
            on_event(event);
        }
        self.result().await
    }
}

/// Run [`fetch`] on a new tokio task
pub fn spawn_fetch<A>(api: A, channel_reference: impl Into<String>) -> FetchHandle
where
    A: ChannelApi + 'static,
{
    let channel_reference = channel_reference.into();
    let (tx, rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move { fetch(&api, &channel_reference, tx).await });

    FetchHandle { events: rx, task }
}

/// Start a fetch against the YouTube Data API using the request's credential
pub fn start_fetch(request: FetchRequest) -> Result<FetchHandle> {
    validate_api_key(&request.credential)?;
    if request.channel_reference.trim().is_empty() {
        return Err(Error::ChannelNotFound(String::new()));
    }

    let api = YouTubeClient::new(request.credential.trim())?;
    Ok(spawn_fetch(api, request.channel_reference))
}
