pub mod commands;
pub mod config;
pub mod duration;
pub mod engine;
pub mod error;
pub mod models;
pub mod pagination;
pub mod progress;
pub mod report;
pub mod resolver;
pub mod youtube;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{FetchHandle, fetch, spawn_fetch, start_fetch};
pub use error::{Error, Result};
pub use models::{AggregateResult, ChannelSummary, FetchRequest, PlaylistStat, ProgressEvent, Statistic};
