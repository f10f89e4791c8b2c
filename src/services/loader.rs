use anyhow::Result;
use log::{info, warn};
use std::collections::BTreeSet;

use crate::api::DataProvider;
use crate::cache::{Cache, SessionCache};
use crate::domain::{FetchProgress, GameCollection, GameId, Player};
use crate::errors::SuggestError;

/// Obtains players and games through the session memo, the file cache and finally the provider
pub struct CollectionLoader<P: DataProvider> {
    provider: P,
    cache: Cache,
    session: SessionCache,
    use_cache: bool,
}

impl<P: DataProvider> CollectionLoader<P> {
    /// With `use_cache` off the file cache is still written, never read
    pub fn new(provider: P, cache: Cache, use_cache: bool) -> Self {
        Self {
            provider,
            cache,
            session: SessionCache::new(),
            use_cache,
        }
    }

    pub async fn load_players(&mut self, usernames: &[String]) -> Result<Vec<Player>> {
        let mut progress = FetchProgress::new("Players", usernames.len());
        let mut players = Vec::with_capacity(usernames.len());

        for username in usernames {
            let (player, was_cached) = self.load_player(username).await?;
            if was_cached {
                progress.increment_cached();
            } else {
                progress.increment_fetched();
            }
            players.push(player);
        }

        Ok(players)
    }

    pub fn guests(count: usize) -> Vec<Player> {
        (0..count).map(Player::guest).collect()
    }

    /// Metadata for every game the owners have, cached games first
    pub async fn load_games(&mut self, owners: &[Player]) -> Result<GameCollection> {
        let owned: BTreeSet<GameId> = owners.iter().flat_map(Player::owned_game_ids).collect();
        if owned.is_empty() {
            return Err(SuggestError::NoOwnedGames.into());
        }

        let mut games = self.cached_games();
        let missing: BTreeSet<GameId> = owned
            .iter()
            .copied()
            .filter(|id| !games.contains(*id))
            .collect();
        info!(
            "{} owned games, {} already known, {} to download",
            owned.len(),
            owned.len() - missing.len(),
            missing.len()
        );

        if !missing.is_empty() {
            let fetched = self
                .provider
                .fetch_games(&missing)
                .await?
                .ok_or_else(|| SuggestError::unavailable("game data"))?;
            games.merge(fetched);
            self.save_games(&games);
        }

        if games.is_empty() {
            return Err(SuggestError::NoOwnedGames.into());
        }
        Ok(games)
    }

    // --- Players ---

    async fn load_player(&mut self, username: &str) -> Result<(Player, bool)> {
        if let Some(player) = self.session.get(username) {
            return Ok((player.clone(), true));
        }

        if let Some(player) = self.cached_player(username) {
            info!("Loaded player {} from cache", username);
            self.session.insert(player.clone());
            return Ok((player, true));
        }

        let player = self
            .provider
            .fetch_player(username)
            .await?
            .ok_or_else(|| SuggestError::unavailable(format!("player data for {}", username)))?;

        if let Err(e) = self.cache.save_player(username, &player) {
            warn!("Could not cache player {}: {:#}", username, e);
        }
        self.session.insert(player.clone());
        Ok((player, false))
    }

    fn cached_player(&self, username: &str) -> Option<Player> {
        if !self.use_cache {
            return None;
        }

        match self.cache.load_player::<Player>(username) {
            Ok(entry) => entry.map(|entry| entry.data),
            Err(e) => {
                warn!("Ignoring cached player {}: {:#}", username, e);
                None
            }
        }
    }

    // --- Games ---

    fn cached_games(&self) -> GameCollection {
        if !self.use_cache {
            return GameCollection::new();
        }

        match self.cache.load_games::<GameCollection>() {
            Ok(Some(entry)) => {
                info!(
                    "Loaded {} games from cache (downloaded {})",
                    entry.data.len(),
                    entry.fetched_at.format("%Y-%m-%d %H:%M")
                );
                entry.data
            }
            Ok(None) => GameCollection::new(),
            Err(e) => {
                warn!("Ignoring cached games: {:#}", e);
                GameCollection::new()
            }
        }
    }

    fn save_games(&self, games: &GameCollection) {
        if let Err(e) = self.cache.save_games(games) {
            warn!("Could not cache games: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Game, PlayerGameStat};
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    struct FakeProvider {
        players: HashMap<String, Player>,
        games: GameCollection,
        player_requests: Vec<String>,
        game_requests: Vec<BTreeSet<GameId>>,
    }

    impl DataProvider for FakeProvider {
        async fn fetch_player(&mut self, username: &str) -> Result<Option<Player>> {
            self.player_requests.push(username.to_string());
            Ok(self.players.get(username).cloned())
        }

        async fn fetch_games(&mut self, ids: &BTreeSet<GameId>) -> Result<Option<GameCollection>> {
            self.game_requests.push(ids.clone());
            Ok(Some(
                ids.iter()
                    .filter_map(|id| self.games.get(*id).cloned())
                    .collect(),
            ))
        }
    }

    fn owner(name: &str, ids: &[GameId]) -> Player {
        let stats = ids
            .iter()
            .map(|id| {
                let mut stat = PlayerGameStat::new(*id);
                stat.owned = true;
                (*id, stat)
            })
            .collect::<HashMap<_, _>>();
        Player::new(name, stats)
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bgg_suggest_test_loader_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn loader(dir: &Path, provider: FakeProvider, use_cache: bool) -> CollectionLoader<FakeProvider> {
        CollectionLoader::new(provider, Cache::new(dir).unwrap(), use_cache)
    }

    fn provider() -> FakeProvider {
        FakeProvider {
            players: HashMap::from([
                ("alice".to_string(), owner("alice", &[1, 2])),
                ("bob".to_string(), owner("bob", &[2, 3])),
            ]),
            games: [Game::new(1, "One"), Game::new(2, "Two"), Game::new(3, "Three")]
                .into_iter()
                .collect(),
            ..FakeProvider::default()
        }
    }

    #[tokio::test]
    async fn test_player_fetched_once_per_session() {
        let dir = temp_dir("session");
        let mut loader = loader(&dir, provider(), false);

        let group = loader.load_players(&["alice".to_string()]).await.unwrap();
        let owners = loader
            .load_players(&["alice".to_string(), "bob".to_string()])
            .await
            .unwrap();

        assert_eq!(group[0], owners[0]);
        assert_eq!(loader.provider.player_requests, vec!["alice", "bob"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_cached_player_skips_provider() {
        let dir = temp_dir("cached_player");
        let mut first = loader(&dir, provider(), true);
        first.load_players(&["alice".to_string()]).await.unwrap();

        let mut second = loader(&dir, provider(), true);
        let players = second.load_players(&["alice".to_string()]).await.unwrap();

        assert_eq!(players[0].username, "alice");
        assert!(second.provider.player_requests.is_empty());

        let mut forced = loader(&dir, provider(), false);
        forced.load_players(&["alice".to_string()]).await.unwrap();
        assert_eq!(forced.provider.player_requests, vec!["alice"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_unknown_player_is_fatal() {
        let dir = temp_dir("unknown_player");
        let mut loader = loader(&dir, provider(), false);

        let err = loader.load_players(&["nobody".to_string()]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SuggestError>(),
            Some(SuggestError::DataUnavailable { .. })
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_load_games_downloads_only_missing() {
        let dir = temp_dir("games");
        let owners = vec![owner("alice", &[1, 2])];
        let mut first = loader(&dir, provider(), true);
        let games = first.load_games(&owners).await.unwrap();
        assert_eq!(games.len(), 2);

        let owners = vec![owner("alice", &[1, 2]), owner("bob", &[2, 3])];
        let mut second = loader(&dir, provider(), true);
        let games = second.load_games(&owners).await.unwrap();

        assert_eq!(games.len(), 3);
        assert_eq!(second.provider.game_requests, vec![BTreeSet::from([3])]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_owners_without_games() {
        let dir = temp_dir("no_games");
        let mut loader = loader(&dir, provider(), false);

        let err = loader.load_games(&[owner("carol", &[])]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SuggestError>(),
            Some(SuggestError::NoOwnedGames)
        ));
        assert!(loader.provider.game_requests.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_guests() {
        let guests = CollectionLoader::<FakeProvider>::guests(2);
        assert_eq!(guests.len(), 2);
        assert!(guests.iter().all(|g| g.is_guest));
        assert_eq!(guests[1].username, "GUEST_1");
    }
}
