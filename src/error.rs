use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key not set. Run `channel-tally init` or pass --api-key.")]
    ApiKeyMissing,

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// A paginated listing failed; carries the underlying message unchanged
    #[error("{0}")]
    Listing(String),

    #[error("Malformed duration: {0:?}")]
    MalformedDuration(String),

    /// A single-resource lookup failed; carries the underlying message unchanged
    #[error("{0}")]
    DetailLookup(String),

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Reclassify a page failure as a listing failure, keeping its message.
    pub fn into_listing(self) -> Self {
        match self {
            Error::Listing(_) | Error::Cancelled => self,
            Error::Http(e) => Error::Listing(e.to_string()),
            other => Error::Listing(other.to_string()),
        }
    }

    /// Reclassify a resource lookup failure as a detail-lookup failure, keeping its message.
    pub fn into_detail_lookup(self) -> Self {
        match self {
            Error::DetailLookup(_) | Error::MalformedDuration(_) | Error::Cancelled => self,
            Error::Http(e) => Error::DetailLookup(e.to_string()),
            other => Error::DetailLookup(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
