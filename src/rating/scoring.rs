use std::collections::BTreeMap;

use super::normalization::{standardize, weighted_average};
use super::types::{Breakdown, GameEvaluation, Signal, SubScore, Targets};
use super::weighting::{play_count_decay, playing_time_curve, weight_curve};
use crate::config::ScoringSettings;
use crate::domain::{Game, Player, PlayerGameStat, VoteCategory};

const WANT_TO_PLAY_UNRATED: f64 = 0.9;
const WANT_TO_PLAY_BASE: f64 = 0.8;
const WANT_TO_PLAY_RATING_SHARE: f64 = 0.2;
const UNPLAYED_RATING_FACTOR: f64 = 0.8;

type Scored = (SubScore, Option<Breakdown>);

/// Scores candidate games for one group
pub struct GameScorer<'a> {
    settings: &'a ScoringSettings,
    targets: Targets,
    group: &'a [Player],
}

impl<'a> GameScorer<'a> {
    pub fn new(settings: &'a ScoringSettings, targets: Targets, group: &'a [Player]) -> Self {
        Self {
            settings,
            targets,
            group,
        }
    }

    pub fn evaluate(&self, game: &Game) -> GameEvaluation {
        let signals = [
            (Signal::PlayingTime, self.playing_time_score(game)),
            (Signal::Weight, self.weight_score(game)),
            (Signal::SuggestedPlayers, self.suggested_players_score(game)),
            (Signal::PlayersTaste, self.players_taste_score(game)),
        ];

        let mut breakdown = BTreeMap::new();
        let mut scores = Vec::with_capacity(signals.len());
        for (signal, (score, explanation)) in signals {
            if let Some(explanation) = explanation {
                breakdown.insert(signal, explanation);
            }
            scores.push(score);
        }

        GameEvaluation {
            game_id: game.id,
            score: standardize(weighted_average(&scores)),
            breakdown,
        }
    }

    // --- General Signals ---

    fn playing_time_score(&self, game: &Game) -> Scored {
        let weight = self.settings.weights.playing_time;

        match (self.targets.playing_time, game.playing_time) {
            (Some(target), Some(actual)) => {
                let delta = (f64::from(target) - f64::from(actual)).abs();
                Self::computed(playing_time_curve(delta, f64::from(target)), weight)
            }
            _ => self.weight_target_fallback(weight),
        }
    }

    fn weight_score(&self, game: &Game) -> Scored {
        let weight = self.settings.weights.weight;

        match (self.targets.weight, game.average_weight) {
            (Some(target), Some(actual)) => {
                let delta = (target - actual).abs();
                Self::computed(weight_curve(delta, self.settings.weight_max_delta), weight)
            }
            _ => self.weight_target_fallback(weight),
        }
    }

    /// Both time and weight fall back to a neutral value only when a weight target was given
    fn weight_target_fallback(&self, weight: f64) -> Scored {
        if self.targets.weight.is_none() {
            return (SubScore::IGNORED, None);
        }
        (
            SubScore::new(self.settings.fallback_score, weight),
            Some(Breakdown::Default { weight }),
        )
    }

    fn suggested_players_score(&self, game: &Game) -> Scored {
        let weight = self.settings.weights.suggested_players;
        let default = (
            SubScore::new(self.settings.suggestion_default, weight),
            Some(Breakdown::Default { weight }),
        );

        let Some(votes) = game.votes_for(self.group.len()) else {
            return default;
        };
        let total: u32 = votes.values().sum();
        if total == 0 {
            return default;
        }

        let total = f64::from(total);
        let share = |category: VoteCategory| f64::from(votes.get(&category).copied().unwrap_or(0)) / total;

        // Not Recommended is added and taken away again; it only counts through the total
        let mut raw = share(VoteCategory::NotRecommended) * 0.5;
        raw += share(VoteCategory::Best) * 1.0;
        raw += share(VoteCategory::Recommended) * 0.5;
        raw -= share(VoteCategory::NotRecommended) * 0.5;

        Self::computed(raw.max(0.0), weight)
    }

    // --- Personal Signals ---

    fn players_taste_score(&self, game: &Game) -> Scored {
        let weight = self.settings.weights.players_taste;
        let mut total = 0.0;
        let mut divide_by = 0.0;

        if let Some(average) = game.average_rating.filter(|r| *r > 0.0) {
            total = average * self.settings.average_rating_share;
            divide_by = self.settings.average_rating_share;
        }

        let mut contributions = Vec::new();
        for player in self.group.iter().filter(|p| !p.is_guest) {
            let Some(contribution) = player.stat(game.id).and_then(member_contribution) else {
                continue;
            };
            total += contribution;
            divide_by += 1.0;
            contributions.push((player.username.clone(), standardize(contribution)));
        }

        if divide_by <= 0.0 {
            return (
                SubScore::new(self.settings.taste_default, weight),
                Some(Breakdown::Default { weight }),
            );
        }

        let combined = SubScore::new(total / divide_by, weight);
        (
            combined,
            Some(Breakdown::Players {
                contributions,
                combined,
            }),
        )
    }

    fn computed(raw: f64, weight: f64) -> Scored {
        let score = SubScore::new(raw, weight);
        (score, Some(Breakdown::Computed(score)))
    }
}

/// `None` for members with neither a rating nor a wish to play
fn member_contribution(stat: &PlayerGameStat) -> Option<f64> {
    let rating = stat.effective_rating();

    if stat.want_to_play {
        return Some(match rating {
            Some(rating) => WANT_TO_PLAY_BASE + rating * WANT_TO_PLAY_RATING_SHARE,
            None => WANT_TO_PLAY_UNRATED,
        });
    }

    let rating = rating?;
    if stat.play_count > 0 {
        Some(play_count_decay(rating, stat.play_count) * rating)
    } else {
        Some(rating * UNPLAYED_RATING_FACTOR)
    }
}
