pub mod cache_store;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod joiner;
pub mod pipeline;
pub mod player_index;
pub mod records;
pub mod resolver;
pub mod sink;
pub mod table;

pub use error::{FetchError, StatsError};
