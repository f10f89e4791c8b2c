use crate::domain::GameId;

/// Expansion listed under its base
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionScore {
    pub game_id: GameId,
    pub score: f64,
}

/// One line of the final ranking
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUnit {
    Single {
        game_id: GameId,
        score: f64,
    },
    /// `own_score` is `None` when the base alone does not fit the group
    Base {
        game_id: GameId,
        own_score: Option<f64>,
        display_score: f64,
        expansions: Vec<ExpansionScore>,
    },
}

impl DisplayUnit {
    pub fn game_id(&self) -> GameId {
        match self {
            DisplayUnit::Single { game_id, .. } | DisplayUnit::Base { game_id, .. } => *game_id,
        }
    }

    pub fn display_score(&self) -> f64 {
        match self {
            DisplayUnit::Single { score, .. } => *score,
            DisplayUnit::Base { display_score, .. } => *display_score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankOptions {
    pub limit: Option<usize>,
    pub separate_expansions: bool,
}
