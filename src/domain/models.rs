use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

use crate::errors::SuggestError;

/// BoardGameGeek object id
pub type GameId = u32;

/// Votes per category for one player count
pub type PlayerCountVotes = BTreeMap<VoteCategory, u32>;

/// What one player declared about one game in their collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameStat {
    pub game_id: GameId,
    pub owned: bool,
    /// Personal rating scaled from 1..10 down to 0..1
    pub rating: Option<f64>,
    pub play_count: u32,
    pub want_to_play: bool,
}

impl PlayerGameStat {
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            ..Self::default()
        }
    }

    /// Ratings of zero carry no opinion
    pub fn effective_rating(&self) -> Option<f64> {
        self.rating.filter(|r| *r > 0.0)
    }
}

/// A group member and/or collection owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub username: String,
    pub is_guest: bool,
    pub games_stats: HashMap<GameId, PlayerGameStat>,
}

impl Player {
    pub fn new(username: impl Into<String>, games_stats: HashMap<GameId, PlayerGameStat>) -> Self {
        Self {
            username: username.into(),
            is_guest: false,
            games_stats,
        }
    }

    /// Someone without a BoardGameGeek account; counts toward group size only
    pub fn guest(index: usize) -> Self {
        Self {
            username: format!("GUEST_{}", index),
            is_guest: true,
            games_stats: HashMap::new(),
        }
    }

    pub fn stat(&self, game_id: GameId) -> Option<&PlayerGameStat> {
        self.games_stats.get(&game_id)
    }

    pub fn owns(&self, game_id: GameId) -> bool {
        self.stat(game_id).is_some_and(|s| s.owned)
    }

    pub fn owned_game_ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.games_stats
            .values()
            .filter(|s| s.owned)
            .map(|s| s.game_id)
    }
}

/// Categories of the "suggested number of players" community poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VoteCategory {
    Best,
    Recommended,
    NotRecommended,
}

impl FromStr for VoteCategory {
    type Err = SuggestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Best" => Ok(VoteCategory::Best),
            "Recommended" => Ok(VoteCategory::Recommended),
            "Not Recommended" => Ok(VoteCategory::NotRecommended),
            other => Err(SuggestError::malformed("vote category", other)),
        }
    }
}

/// Game metadata from BoardGameGeek
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub player_min: Option<u32>,
    pub player_max: Option<u32>,
    /// Minutes
    pub playing_time: Option<u32>,
    pub is_expansion: bool,
    pub expansion_of: BTreeSet<GameId>,
    /// Community weight, 0..5
    pub average_weight: Option<f64>,
    /// Community rating scaled to 0..1, only when enough users rated it
    pub average_rating: Option<f64>,
    /// Only player counts with enough votes are kept
    pub suggested_players: Option<BTreeMap<u32, PlayerCountVotes>>,
}

impl Game {
    pub fn new(id: GameId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            player_min: None,
            player_max: None,
            playing_time: None,
            is_expansion: false,
            expansion_of: BTreeSet::new(),
            average_weight: None,
            average_rating: None,
            suggested_players: None,
        }
    }

    /// Only checked when both bounds are known
    pub fn supports_player_count(&self, players: usize) -> bool {
        match (self.player_min, self.player_max) {
            (Some(min), Some(max)) => (min as usize..=max as usize).contains(&players),
            _ => true,
        }
    }

    pub fn votes_for(&self, players: usize) -> Option<&PlayerCountVotes> {
        let players = u32::try_from(players).ok()?;
        self.suggested_players.as_ref()?.get(&players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_count_bounds() {
        let mut game = Game::new(1, "Catan");
        game.player_min = Some(2);
        game.player_max = Some(4);

        assert!(game.supports_player_count(2));
        assert!(game.supports_player_count(4));
        assert!(!game.supports_player_count(5));
        assert!(!game.supports_player_count(1));
    }

    #[test]
    fn test_missing_bound_accepts_any_group() {
        let mut game = Game::new(1, "Catan");
        game.player_min = Some(5);

        assert!(game.supports_player_count(2));
    }

    #[test]
    fn test_vote_category_parsing() {
        assert_eq!("Best".parse::<VoteCategory>().unwrap(), VoteCategory::Best);
        assert_eq!(
            "Not Recommended".parse::<VoteCategory>().unwrap(),
            VoteCategory::NotRecommended
        );
        assert!("Meh".parse::<VoteCategory>().is_err());
    }

    #[test]
    fn test_guest_has_no_stats() {
        let guest = Player::guest(2);
        assert_eq!(guest.username, "GUEST_2");
        assert!(guest.is_guest);
        assert!(guest.games_stats.is_empty());
    }

    #[test]
    fn test_owned_game_ids() {
        let mut owned = PlayerGameStat::new(10);
        owned.owned = true;
        let rated = PlayerGameStat {
            rating: Some(0.8),
            ..PlayerGameStat::new(11)
        };
        let player = Player::new("alice", HashMap::from([(10, owned), (11, rated)]));

        let ids: Vec<GameId> = player.owned_game_ids().collect();
        assert_eq!(ids, vec![10]);
        assert!(player.owns(10));
        assert!(!player.owns(11));
    }
}
