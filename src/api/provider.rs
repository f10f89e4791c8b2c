use anyhow::Result;
use std::collections::BTreeSet;

use crate::domain::{GameCollection, GameId, Player};

/// Source of player collections and game metadata.
///
/// `Ok(None)` means the source answered but had nothing usable; callers
/// decide whether that is fatal.
#[allow(async_fn_in_trait)]
pub trait DataProvider {
    async fn fetch_player(&mut self, username: &str) -> Result<Option<Player>>;

    async fn fetch_games(&mut self, ids: &BTreeSet<GameId>) -> Result<Option<GameCollection>>;
}
