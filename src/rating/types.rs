use std::collections::BTreeMap;
use std::fmt;

use crate::domain::GameId;

/// What the group asked for; `None` means "no preference"
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Targets {
    /// Minutes
    pub playing_time: Option<u32>,
    /// 0.0..=5.0
    pub weight: Option<f64>,
}

/// The four signals combined into a game's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Signal {
    PlayingTime,
    Weight,
    SuggestedPlayers,
    PlayersTaste,
}

impl Signal {
    pub fn as_str(&self) -> &str {
        match self {
            Signal::PlayingTime => "playing_time",
            Signal::Weight => "weight",
            Signal::SuggestedPlayers => "suggested_players",
            Signal::PlayersTaste => "players_taste",
        }
    }
}

/// A raw value in 0..=1 and how much it counts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScore {
    pub raw: f64,
    pub weight: f64,
}

impl SubScore {
    /// Contributes nothing to the weighted average
    pub const IGNORED: SubScore = SubScore {
        raw: 0.0,
        weight: 0.0,
    };

    pub fn new(raw: f64, weight: f64) -> Self {
        Self { raw, weight }
    }
}

/// Per-signal explanation of a score
#[derive(Debug, Clone, PartialEq)]
pub enum Breakdown {
    /// The neutral default was used
    Default { weight: f64 },
    Computed(SubScore),
    /// Each member's standardized contribution and the combined value
    Players {
        contributions: Vec<(String, f64)>,
        combined: SubScore,
    },
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Breakdown::Default { weight } => write!(f, "default (weight {})", weight),
            Breakdown::Computed(score) => write!(f, "{:.4} (weight {})", score.raw, score.weight),
            Breakdown::Players {
                contributions,
                combined,
            } => {
                let members: Vec<String> = contributions
                    .iter()
                    .map(|(name, value)| format!("{}: {:.4}", name, value))
                    .collect();
                write!(
                    f,
                    "{:.4} (weight {}) [{}]",
                    combined.raw,
                    combined.weight,
                    members.join(", ")
                )
            }
        }
    }
}

/// Final score of one game with its explanation
#[derive(Debug, Clone, PartialEq)]
pub struct GameEvaluation {
    pub game_id: GameId,
    pub score: f64,
    pub breakdown: BTreeMap<Signal, Breakdown>,
}

/// Scores of every candidate game, ordered by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    games: BTreeMap<GameId, GameEvaluation>,
}

impl Evaluation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, evaluation: GameEvaluation) {
        self.games.insert(evaluation.game_id, evaluation);
    }

    pub fn get(&self, game_id: GameId) -> Option<&GameEvaluation> {
        self.games.get(&game_id)
    }

    pub fn score(&self, game_id: GameId) -> Option<f64> {
        self.get(game_id).map(|e| e.score)
    }

    pub fn contains(&self, game_id: GameId) -> bool {
        self.games.contains_key(&game_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvaluation> {
        self.games.values()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Highest score first; ties keep ascending id order
    pub fn ranked(&self) -> Vec<&GameEvaluation> {
        let mut ranked: Vec<&GameEvaluation> = self.games.values().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}
