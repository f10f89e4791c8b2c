use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::{Game, GameId};

/// Games indexed by BoardGameGeek id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCollection {
    games: HashMap<GameId, Game>,
}

impl GameCollection {
    pub fn new() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    pub fn add(&mut self, game: Game) {
        self.games.insert(game.id, game);
    }

    /// Entries of `other` replace entries with the same id
    pub fn merge(&mut self, other: GameCollection) {
        self.games.extend(other.games);
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, id: GameId) -> Option<&Game> {
        self.games.get(&id)
    }

    pub fn contains(&self, id: GameId) -> bool {
        self.games.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.games.keys().copied()
    }

    pub fn name_of(&self, id: GameId) -> String {
        self.get(id)
            .map(|g| g.name.clone())
            .unwrap_or_else(|| format!("#{}", id))
    }
}

impl FromIterator<Game> for GameCollection {
    fn from_iter<I: IntoIterator<Item = Game>>(iter: I) -> Self {
        let mut collection = Self::new();
        for game in iter {
            collection.add(game);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_replaces_same_id() {
        let mut collection: GameCollection =
            [Game::new(1, "Old name"), Game::new(2, "Carcassonne")].into_iter().collect();
        let update: GameCollection = [Game::new(1, "New name")].into_iter().collect();

        collection.merge(update);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.name_of(1), "New name");
        assert_eq!(collection.name_of(3), "#3");
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let collection: GameCollection = [Game::new(7, "Azul")].into_iter().collect();
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["7"]["name"], "Azul");
        let back: GameCollection = serde_json::from_value(json).unwrap();
        assert_eq!(back, collection);
    }
}
