use log::warn;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Game, GameCollection, GameId};
use crate::rating::Candidates;

/// Player-count bracket and role of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeInfo {
    pub player_min: Option<u32>,
    pub player_max: Option<u32>,
    pub is_base: bool,
}

impl NodeInfo {
    fn of(game: &Game) -> Self {
        Self {
            player_min: game.player_min,
            player_max: game.player_max,
            is_base: !game.is_expansion,
        }
    }
}

/// Directed base -> expansion edges between playable expansions and owned bases
#[derive(Debug, Clone, Default)]
pub struct ExpansionGraph {
    nodes: BTreeMap<GameId, NodeInfo>,
    edges: BTreeMap<GameId, BTreeSet<GameId>>,
}

impl ExpansionGraph {
    pub fn build(games: &GameCollection, candidates: &Candidates) -> Self {
        let mut graph = Self::default();

        for game_id in &candidates.possible {
            let Some(game) = games.get(*game_id) else {
                continue;
            };
            if game.expansion_of.is_empty() {
                continue;
            }

            graph.nodes.insert(game.id, NodeInfo::of(game));
            for base_id in &game.expansion_of {
                if !candidates.available.contains(base_id) {
                    continue;
                }
                let Some(base) = games.get(*base_id) else {
                    continue;
                };
                graph.nodes.insert(base.id, NodeInfo::of(base));
                graph.edges.entry(base.id).or_default().insert(game.id);
            }
        }

        graph
    }

    pub fn contains(&self, game_id: GameId) -> bool {
        self.nodes.contains_key(&game_id)
    }

    pub fn bases(&self) -> impl Iterator<Item = GameId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, info)| info.is_base)
            .map(|(id, _)| *id)
    }

    /// Every simple path from `base` ending on an expansion node
    pub fn paths_from(&self, base: GameId) -> Vec<Vec<GameId>> {
        let mut paths = Vec::new();
        let mut path = vec![base];
        self.walk(base, &mut path, &mut paths);
        paths
    }

    /// Paths from `base` whose combined bracket admits `group_size` players
    pub fn feasible_paths(&self, base: GameId, group_size: usize) -> Vec<Vec<GameId>> {
        self.paths_from(base)
            .into_iter()
            .filter(|path| self.path_fits(path, group_size))
            .collect()
    }

    /// Highest minimum and highest maximum over the path's known bounds
    pub fn path_bracket(&self, path: &[GameId]) -> (Option<u32>, Option<u32>) {
        let infos = || path.iter().filter_map(|id| self.nodes.get(id));
        let min = infos().filter_map(|info| info.player_min).max();
        let max = infos().filter_map(|info| info.player_max).max();
        (min, max)
    }

    pub fn path_fits(&self, path: &[GameId], group_size: usize) -> bool {
        match self.path_bracket(path) {
            (Some(min), Some(max)) => (min as usize..=max as usize).contains(&group_size),
            _ => false,
        }
    }

    // --- Traversal ---

    fn walk(&self, current: GameId, path: &mut Vec<GameId>, paths: &mut Vec<Vec<GameId>>) {
        let Some(children) = self.edges.get(&current) else {
            return;
        };

        for child in children {
            if path.contains(child) {
                warn!("Expansion cycle through game {}, skipping", child);
                continue;
            }

            path.push(*child);
            if self.nodes.get(child).is_some_and(|info| !info.is_base) {
                paths.push(path.clone());
            }
            self.walk(*child, path, paths);
            path.pop();
        }
    }
}
