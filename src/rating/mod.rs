mod candidates;
pub mod normalization;
mod scoring;
pub mod types;
pub mod weighting;

pub use candidates::{Candidates, available_games, select_candidates};
pub use scoring::GameScorer;
pub use types::{Breakdown, Evaluation, GameEvaluation, Signal, SubScore, Targets};

use log::{debug, info};

use crate::config::ScoringSettings;
use crate::domain::{GameCollection, Player};
use crate::errors::SuggestError;

/// Everything the ranking step needs from the scoring step
#[derive(Debug, Clone)]
pub struct RatingOutcome {
    pub candidates: Candidates,
    pub evaluation: Evaluation,
    pub group_size: usize,
}

/// Filter the owners' games down to what the group can play, then score each of them
pub fn rate(
    games: &GameCollection,
    group: &[Player],
    owners: &[Player],
    targets: Targets,
    settings: &ScoringSettings,
) -> Result<RatingOutcome, SuggestError> {
    let group_size = group.len();
    let candidates = select_candidates(games, owners, group_size)?;

    let scorer = GameScorer::new(settings, targets, group);
    let mut evaluation = Evaluation::new();
    for game_id in &candidates.possible {
        let Some(game) = games.get(*game_id) else {
            continue;
        };
        let game_evaluation = scorer.evaluate(game);
        log_breakdown(&game.name, &game_evaluation);
        evaluation.insert(game_evaluation);
    }

    info!("Scored {} games", evaluation.len());
    Ok(RatingOutcome {
        candidates,
        evaluation,
        group_size,
    })
}

fn log_breakdown(name: &str, evaluation: &GameEvaluation) {
    debug!("{} -> {:.4}", name, evaluation.score);
    for (signal, breakdown) in &evaluation.breakdown {
        debug!("  {}: {}", signal.as_str(), breakdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Game, GameId, PlayerGameStat};
    use std::collections::HashMap;

    fn game(id: GameId, min: u32, max: u32, minutes: u32) -> Game {
        let mut game = Game::new(id, format!("Game {}", id));
        game.player_min = Some(min);
        game.player_max = Some(max);
        game.playing_time = Some(minutes);
        game
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

    #[test]
    fn test_rate_scores_only_playable_games() {
        let games: GameCollection = [game(1, 2, 4, 60), game(2, 2, 4, 120), game(3, 5, 8, 60)]
            .into_iter()
            .collect();
        let alice = owner("alice", &[1, 2, 3]);
        let group = vec![alice.clone(), Player::guest(0), Player::guest(1)];
        let targets = Targets {
            playing_time: Some(60),
            weight: None,
        };

        let outcome = rate(&games, &group, &[alice], targets, &ScoringSettings::default()).unwrap();

        assert_eq!(outcome.group_size, 3);
        assert_eq!(outcome.evaluation.len(), 2);
        assert!(!outcome.evaluation.contains(3));
        assert!(outcome.evaluation.score(1).unwrap() > outcome.evaluation.score(2).unwrap());
        for evaluation in outcome.evaluation.iter() {
            assert!((0.0..=1.0).contains(&evaluation.score));
        }
    }

    #[test]
    fn test_rate_propagates_filter_errors() {
        let games: GameCollection = [game(1, 2, 4, 60)].into_iter().collect();
        let alice = owner("alice", &[1]);
        let group: Vec<Player> = (0..6).map(Player::guest).collect();

        let err = rate(&games, &group, &[alice], Targets::default(), &ScoringSettings::default())
            .unwrap_err();
        assert!(matches!(err, SuggestError::NoPlayableGames { group_size: 6 }));
    }
}
