use crate::api::parsers::{BoardgameParser, parse_collection};
use crate::api::provider::DataProvider;
use crate::config::FetcherSettings;
use crate::domain::{GameCollection, GameId, Player};
use crate::http::RateLimitedClient;
use crate::rate_limiter::RateLimiter;
use anyhow::Result;
use log::{debug, info};
use std::collections::BTreeSet;
use std::time::Duration;

/// BoardGameGeek XML API client
pub struct BggClient {
    client: RateLimitedClient,
    parser: BoardgameParser,
    settings: FetcherSettings,
}

impl BggClient {
    pub fn new(settings: FetcherSettings) -> Result<Self> {
        let rate_limiter = RateLimiter::new(settings.request_delay_ms, settings.max_retries);
        let client = RateLimitedClient::new(settings.user_agent, rate_limiter)?;
        let parser = BoardgameParser::new(&settings)?;

        Ok(Self {
            client,
            parser,
            settings,
        })
    }

    /// Fetch a user's collection
    pub async fn fetch_collection(&mut self, username: &str) -> Result<Option<Player>> {
        let url = self.build_collection_url(username);
        info!("Downloading data for player {} ..", username);

        let timeout = Duration::from_secs(self.settings.collection_timeout_secs);
        let xml = self.client.get_text(&url, timeout).await?;

        debug!("Parsing collection of {} ..", username);
        let stats = parse_collection(&xml)?;
        Ok(stats.map(|games_stats| Player::new(username, games_stats)))
    }

    /// Fetch metadata for the given games, a batch of ids per request
    pub async fn fetch_boardgames(&mut self, ids: &BTreeSet<GameId>) -> Result<Option<GameCollection>> {
        let ids: Vec<GameId> = ids.iter().copied().collect();
        let timeout = Duration::from_secs(self.settings.games_timeout_secs);
        let batch_size = self.settings.games_batch_size.max(1);
        let mut games = GameCollection::new();

        for (idx, batch) in ids.chunks(batch_size).enumerate() {
            info!(
                "  → Games batch {}/{}",
                idx + 1,
                ids.len().div_ceil(batch_size)
            );
            let url = self.build_boardgame_url(batch);
            let xml = self.client.get_text(&url, timeout).await?;

            match self.parser.parse(&xml) {
                Some(batch_games) => games.merge(batch_games),
                None => return Ok(None),
            }
        }

        Ok(Some(games))
    }

    // --- URL Building ---

    fn build_collection_url(&self, username: &str) -> String {
        format!(
            "{}/{}",
            self.settings.collection_url,
            Self::encode_username_for_url(username)
        )
    }

    fn build_boardgame_url(&self, ids: &[GameId]) -> String {
        let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        format!("{}/{}?stats=1", self.settings.boardgame_url, ids.join(","))
    }

    fn encode_username_for_url(username: &str) -> String {
        // quote_plus: spaces become '+'
        urlencoding::encode(username).replace("%20", "+")
    }
}

impl DataProvider for BggClient {
    async fn fetch_player(&mut self, username: &str) -> Result<Option<Player>> {
        self.fetch_collection(username).await
    }

    async fn fetch_games(&mut self, ids: &BTreeSet<GameId>) -> Result<Option<GameCollection>> {
        self.fetch_boardgames(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_quotes_username() {
        let client = BggClient::new(FetcherSettings::default()).unwrap();
        assert_eq!(
            client.build_collection_url("board gamer&co"),
            "https://boardgamegeek.com/xmlapi/collection/board+gamer%26co"
        );
    }

    #[test]
    fn test_boardgame_url_joins_ids() {
        let client = BggClient::new(FetcherSettings::default()).unwrap();
        assert_eq!(
            client.build_boardgame_url(&[13, 822]),
            "https://boardgamegeek.com/xmlapi/boardgame/13,822?stats=1"
        );
    }
}
