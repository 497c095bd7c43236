use log::debug;

use crate::error::{Error, Result};
use crate::youtube::ChannelApi;

const CHANNEL_MARKER: &str = "channel/";
const USER_MARKER: &str = "user/";
const HANDLE_MARKER: &str = "@";

/// How a channel reference names its channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelReference {
    /// `.../channel/UC...`: already canonical
    Id(String),
    /// `.../user/name`: legacy username
    Username(String),
    /// `.../@name`: handle, resolved through channel search
    Handle(String),
}

impl ChannelReference {
    /// Classify a reference; markers are tried in fixed priority order.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        let not_found = || Error::ChannelNotFound(reference.to_string());

        if let Some(rest) = after_marker(reference, CHANNEL_MARKER) {
            return segment(rest).map(Self::Id).ok_or_else(not_found);
        }
        if let Some(rest) = after_marker(reference, USER_MARKER) {
            return segment(rest).map(Self::Username).ok_or_else(not_found);
        }
        if let Some(rest) = after_marker(reference, HANDLE_MARKER) {
            return segment(rest).map(Self::Handle).ok_or_else(not_found);
        }

        Err(not_found())
    }
}

/// Text after the first `marker` that starts a path segment
fn after_marker<'a>(reference: &'a str, marker: &str) -> Option<&'a str> {
    reference
        .match_indices(marker)
        .find(|(pos, _)| *pos == 0 || reference[..*pos].ends_with('/'))
        .map(|(pos, _)| &reference[pos + marker.len()..])
}

/// First path segment, without query string or fragment
fn segment(rest: &str) -> Option<String> {
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let value = rest[..end].trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Map a channel URL or handle to its canonical channel ID.
///
/// At most one API request is made. A lookup that fails in transport surfaces
/// as [`Error::DetailLookup`]; one that finds nothing is [`Error::ChannelNotFound`].
pub async fn resolve<A: ChannelApi>(api: &A, reference: &str) -> Result<String> {
    let parsed = ChannelReference::parse(reference)?;
    debug!("Resolving {:?}", parsed);

    let found = match parsed {
        ChannelReference::Id(id) => Some(id),
        ChannelReference::Username(name) => api.channel_id_for_username(&name).await?,
        ChannelReference::Handle(handle) => api.search_channel_id(&handle).await?,
    };

    found
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::ChannelNotFound(reference.trim().to_string()))
}
