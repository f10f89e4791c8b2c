use std::path::PathBuf;

/// Relative importance of each signal in the final score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalWeights {
    pub playing_time: f64,
    pub weight: f64,
    pub suggested_players: f64,
    pub players_taste: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            playing_time: 0.4,
            weight: 0.4,
            suggested_players: 0.2,
            players_taste: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSettings {
    pub weights: SignalWeights,
    /// Raw value used for time/weight when only a weight target was requested
    pub fallback_score: f64,
    /// Raw value used when nobody voted on the group size
    pub suggestion_default: f64,
    /// Raw value used when no group member has an opinion on a game
    pub taste_default: f64,
    /// Largest weight difference that still earns points
    pub weight_max_delta: f64,
    /// Share the community rating takes next to a single group member
    pub average_rating_share: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            fallback_score: 0.5,
            suggestion_default: 0.6,
            taste_default: 0.5,
            weight_max_delta: 2.5,
            average_rating_share: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetcherSettings {
    pub collection_url: &'static str,
    pub boardgame_url: &'static str,
    pub user_agent: &'static str,
    pub request_delay_ms: u64,
    pub max_retries: u32,
    pub collection_timeout_secs: u64,
    pub games_timeout_secs: u64,
    pub games_batch_size: usize,
    pub min_votes_for_suggestion: u32,
    pub min_votes_for_rating: u32,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            collection_url: "https://boardgamegeek.com/xmlapi/collection",
            boardgame_url: "https://boardgamegeek.com/xmlapi/boardgame",
            user_agent: "BggSuggest/0.1",
            request_delay_ms: 2000,
            max_retries: 10,
            collection_timeout_secs: 5,
            games_timeout_secs: 30,
            games_batch_size: 20,
            min_votes_for_suggestion: 10,
            min_votes_for_rating: 100,
        }
    }
}

pub struct AppConfig {
    pub scoring: ScoringSettings,
    pub fetcher: FetcherSettings,
    pub cache_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        let cache_dir = std::env::var("BGG_SUGGEST_CACHE_DIR").unwrap_or_else(|_| "cache".to_string());

        Self {
            scoring: ScoringSettings::default(),
            fetcher: FetcherSettings::default(),
            cache_dir: PathBuf::from(cache_dir),
        }
    }
}
