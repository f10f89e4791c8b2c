use thiserror::Error;

/// Failures that end a suggestion run or spoil a single parsed field
#[derive(Debug, Error)]
pub enum SuggestError {
    /// A player or game dataset could not be retrieved or parsed
    #[error("Cannot retrieve {what}")]
    DataUnavailable { what: String },

    /// A single attribute could not be parsed; callers skip the affected record
    #[error("Malformed {field}: {value:?}")]
    MalformedField { field: &'static str, value: String },

    #[error("No available games, check usernames and/or collections for owned games")]
    NoOwnedGames,

    #[error("No possible games for a group of {group_size} players, sorry")]
    NoPlayableGames { group_size: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SuggestError {
    pub fn unavailable(what: impl Into<String>) -> Self {
        Self::DataUnavailable { what: what.into() }
    }

    pub fn malformed(field: &'static str, value: impl Into<String>) -> Self {
        Self::MalformedField {
            field,
            value: value.into(),
        }
    }
}

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to cache errors
pub fn cache_context(operation: &str, key: &str) -> String {
    format!("Failed to {} cache for key: {}", operation, key)
}
