use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::graph::ExpansionGraph;
use super::types::{DisplayUnit, ExpansionScore, RankOptions};
use crate::domain::{GameCollection, GameId};
use crate::rating::{Evaluation, RatingOutcome};

/// Turn the evaluation into the ordered list shown to the group
pub fn rank(games: &GameCollection, outcome: &RatingOutcome, options: RankOptions) -> Vec<DisplayUnit> {
    let mut units = if options.separate_expansions {
        flat_units(&outcome.evaluation)
    } else {
        collapsed_units(games, outcome)
    };

    units.sort_by(by_display_score);
    if let Some(limit) = options.limit {
        units.truncate(limit);
    }
    units
}

fn by_display_score(a: &DisplayUnit, b: &DisplayUnit) -> Ordering {
    b.display_score()
        .total_cmp(&a.display_score())
        .then_with(|| a.game_id().cmp(&b.game_id()))
}

fn flat_units(evaluation: &Evaluation) -> Vec<DisplayUnit> {
    evaluation
        .ranked()
        .into_iter()
        .map(|e| DisplayUnit::Single {
            game_id: e.game_id,
            score: e.score,
        })
        .collect()
}

// --- Collapsing ---

fn collapsed_units(games: &GameCollection, outcome: &RatingOutcome) -> Vec<DisplayUnit> {
    let graph = ExpansionGraph::build(games, &outcome.candidates);
    let evaluation = &outcome.evaluation;

    let mut units: Vec<DisplayUnit> = evaluation
        .iter()
        .filter(|e| !graph.contains(e.game_id))
        .map(|e| DisplayUnit::Single {
            game_id: e.game_id,
            score: e.score,
        })
        .collect();

    for base in graph.bases() {
        if let Some(unit) = base_unit(&graph, evaluation, base, outcome.group_size) {
            units.push(unit);
        }
    }

    units
}

fn base_unit(
    graph: &ExpansionGraph,
    evaluation: &Evaluation,
    base: GameId,
    group_size: usize,
) -> Option<DisplayUnit> {
    let own_score = evaluation.score(base);
    let paths = graph.feasible_paths(base, group_size);

    if paths.is_empty() {
        debug!("No expansion of game {} fits {} players", base, group_size);
        return own_score.map(|score| DisplayUnit::Single {
            game_id: base,
            score,
        });
    }

    let reachable: BTreeSet<GameId> = paths
        .iter()
        .flatten()
        .copied()
        .filter(|id| *id != base)
        .collect();

    let floor = own_score.unwrap_or(0.0);
    let mut expansions: Vec<ExpansionScore> = reachable
        .iter()
        .filter_map(|id| {
            evaluation.score(*id).map(|score| ExpansionScore {
                game_id: *id,
                score,
            })
        })
        .filter(|expansion| expansion.score >= floor)
        .collect();
    expansions.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.game_id.cmp(&b.game_id)));

    let display_score = expansions
        .iter()
        .map(|expansion| expansion.score)
        .fold(floor, f64::max);

    Some(DisplayUnit::Base {
        game_id: base,
        own_score,
        display_score,
        expansions,
    })
}
