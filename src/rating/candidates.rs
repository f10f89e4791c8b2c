use log::{debug, info};
use std::collections::BTreeSet;

use crate::domain::{Game, GameCollection, GameId, Player};
use crate::errors::SuggestError;

/// Games the owners have on the shelf, and the subset the group can play
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates {
    pub available: BTreeSet<GameId>,
    pub possible: BTreeSet<GameId>,
}

/// Games of the collection owned by at least one owner.
///
/// The collection may hold games owned by other people (it is shared through the cache).
pub fn available_games(games: &GameCollection, owners: &[Player]) -> BTreeSet<GameId> {
    games
        .ids()
        .filter(|id| owners.iter().any(|owner| owner.owns(*id)))
        .collect()
}

pub fn select_candidates(
    games: &GameCollection,
    owners: &[Player],
    group_size: usize,
) -> Result<Candidates, SuggestError> {
    let available = available_games(games, owners);
    if available.is_empty() {
        return Err(SuggestError::NoOwnedGames);
    }

    let possible: BTreeSet<GameId> = available
        .iter()
        .copied()
        .filter(|id| {
            games
                .get(*id)
                .is_some_and(|game| is_playable(game, group_size, &available))
        })
        .collect();

    if possible.is_empty() {
        return Err(SuggestError::NoPlayableGames { group_size });
    }

    info!(
        "{} available games, {} playable by {} players",
        available.len(),
        possible.len(),
        group_size
    );
    Ok(Candidates {
        available,
        possible,
    })
}

fn is_playable(game: &Game, group_size: usize, available: &BTreeSet<GameId>) -> bool {
    if !game.supports_player_count(group_size) {
        debug!("{} does not support {} players", game.name, group_size);
        return false;
    }

    if game.is_expansion && !game.expansion_of.iter().any(|base| available.contains(base)) {
        debug!("{} is an expansion of games nobody owns", game.name);
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerGameStat;
    use std::collections::HashMap;

    fn game(id: GameId, min: u32, max: u32) -> Game {
        let mut game = Game::new(id, format!("Game {}", id));
        game.player_min = Some(min);
        game.player_max = Some(max);
        game
    }

    fn expansion(id: GameId, min: u32, max: u32, base: GameId) -> Game {
        let mut game = game(id, min, max);
        game.is_expansion = true;
        game.expansion_of = BTreeSet::from([base]);
        game
    }

    fn owner(ids: &[GameId]) -> Player {
        let stats = ids
            .iter()
            .map(|id| {
                let mut stat = PlayerGameStat::new(*id);
                stat.owned = true;
                (*id, stat)
            })
            .collect::<HashMap<_, _>>();
        Player::new("owner", stats)
    }

    #[test]
    fn test_player_count_bracket() {
        let games: GameCollection = [game(1, 2, 4), game(2, 5, 6)].into_iter().collect();
        let candidates = select_candidates(&games, &[owner(&[1, 2])], 4).unwrap();

        assert_eq!(candidates.available, BTreeSet::from([1, 2]));
        assert_eq!(candidates.possible, BTreeSet::from([1]));
    }

    #[test]
    fn test_only_owned_games_are_available() {
        let games: GameCollection = [game(1, 2, 4), game(2, 2, 4)].into_iter().collect();
        let mut lender = owner(&[1]);
        lender
            .games_stats
            .insert(2, PlayerGameStat { rating: Some(0.7), ..PlayerGameStat::new(2) });

        let candidates = select_candidates(&games, &[lender], 3).unwrap();
        assert_eq!(candidates.available, BTreeSet::from([1]));
    }

    #[test]
    fn test_expansion_needs_an_available_base() {
        let games: GameCollection = [game(1, 2, 4), expansion(10, 2, 4, 1), expansion(20, 2, 4, 99)]
            .into_iter()
            .collect();
        let candidates = select_candidates(&games, &[owner(&[1, 10, 20])], 3).unwrap();

        assert_eq!(candidates.possible, BTreeSet::from([1, 10]));
        assert!(candidates.possible.is_subset(&candidates.available));
    }

    #[test]
    fn test_expansion_base_may_not_fit_group() {
        let games: GameCollection = [game(1, 2, 4), expansion(10, 2, 5, 1)].into_iter().collect();
        let candidates = select_candidates(&games, &[owner(&[1, 10])], 5).unwrap();

        assert_eq!(candidates.possible, BTreeSet::from([10]));
    }

    #[test]
    fn test_no_owned_games() {
        let games: GameCollection = [game(1, 2, 4)].into_iter().collect();
        let err = select_candidates(&games, &[owner(&[])], 3).unwrap_err();
        assert!(matches!(err, SuggestError::NoOwnedGames));
    }

    #[test]
    fn test_no_playable_games() {
        let games: GameCollection = [game(1, 5, 6)].into_iter().collect();
        let err = select_candidates(&games, &[owner(&[1])], 2).unwrap_err();
        assert!(matches!(err, SuggestError::NoPlayableGames { group_size: 2 }));
    }
}
