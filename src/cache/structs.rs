use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::cache_context;

const GAMES_KEY: &str = "collection";

/// A cached payload together with the moment it was downloaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry<T> {
    pub fetched_at: DateTime<Utc>,
    pub data: T,
}

impl<T> CachedEntry<T> {
    pub fn now(data: T) -> Self {
        Self {
            fetched_at: Utc::now(),
            data,
        }
    }
}

/// File-based JSON cache for player collections and game metadata
pub struct Cache {
    cache_dir: PathBuf,
    players_dir: PathBuf,
    games_dir: PathBuf,
}

impl Cache {
    /// Create a new cache instance
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        let players_dir = cache_dir.join("players");
        let games_dir = cache_dir.join("games");

        fs::create_dir_all(&players_dir).context("Failed to create players cache directory")?;
        fs::create_dir_all(&games_dir).context("Failed to create games cache directory")?;

        Ok(Self {
            cache_dir,
            players_dir,
            games_dir,
        })
    }

    /// Save a player's collection
    pub fn save_player<T: Serialize>(&self, username: &str, data: &T) -> Result<()> {
        let file_path = self.build_player_path(username);
        self.write_json(&file_path, &CachedEntry::now(data))
            .with_context(|| cache_context("write", username))?;
        info!("Saved player to cache: {}", file_path.display());
        Ok(())
    }

    /// Load a player's collection
    pub fn load_player<T: for<'de> Deserialize<'de>>(
        &self,
        username: &str,
    ) -> Result<Option<CachedEntry<T>>> {
        let file_path = self.build_player_path(username);
        self.read_json_opt(&file_path)
            .with_context(|| cache_context("read", username))
    }

    /// Save the merged game collection
    pub fn save_games<T: Serialize>(&self, data: &T) -> Result<()> {
        let file_path = self.build_games_path();
        self.write_json(&file_path, &CachedEntry::now(data))
            .with_context(|| cache_context("write", GAMES_KEY))?;
        info!("Saved games to cache: {}", file_path.display());
        Ok(())
    }

    /// Load the merged game collection
    pub fn load_games<T: for<'de> Deserialize<'de>>(&self) -> Result<Option<CachedEntry<T>>> {
        let file_path = self.build_games_path();
        self.read_json_opt(&file_path)
            .with_context(|| cache_context("read", GAMES_KEY))
    }

    /// Clear all cached data
    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.cache_dir).context("Failed to clear cache")?;

        fs::create_dir_all(&self.players_dir).context("Failed to recreate players cache directory")?;
        fs::create_dir_all(&self.games_dir).context("Failed to recreate games cache directory")?;

        info!("Cleared cache directory");
        Ok(())
    }

    // --- Helper Methods ---

    fn build_player_path(&self, username: &str) -> PathBuf {
        let file_name = urlencoding::encode(&username.to_lowercase()).into_owned();
        self.players_dir.join(format!("{}.json", file_name))
    }

    fn build_games_path(&self) -> PathBuf {
        self.games_dir.join(format!("{}.json", GAMES_KEY))
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).context("Failed to write cache file")?;
        Ok(())
    }

    fn read_json_opt<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                path,
                json.chars().take(200).collect::<String>()
            )
        })?;
        Ok(Some(data))
    }
}
