use std::path::PathBuf;

use thiserror::Error;

use crate::cache_store::Namespace;

pub type Result<T, E = StatsError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("http {status} from {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    // Worth another attempt: connection-level failures and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::InvalidUrl { .. } | Self::Client(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no cached {namespace} entry for {key}")]
    NotFound { namespace: Namespace, key: String },

    #[error("invalid cache key {0:?}")]
    InvalidKey(String),

    #[error("io error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json in {what}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected payload in {what}: {reason}")]
    Decode { what: String, reason: String },

    #[error("player {0:?} has no column slot; index was not built from this dataset")]
    UnknownPlayer(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl StatsError {
    pub fn decode(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            what: what.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FetchError;

    fn status(code: u16) -> FetchError {
        FetchError::Status {
            url: "http://stats.nba.com/stats/boxscoretraditionalv2".to_string(),
            status: code,
        }
    }

    #[test]
    fn only_server_errors_are_retried() {
        assert!(status(500).is_transient());
        assert!(status(503).is_transient());
        assert!(!status(404).is_transient());
        assert!(!status(400).is_transient());
        let invalid = FetchError::InvalidUrl {
            url: "stats/leaguegamelog".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(!invalid.is_transient());
    }
}
