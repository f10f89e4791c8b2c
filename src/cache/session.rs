use std::collections::HashMap;

use crate::domain::Player;

/// Players already obtained during this run, keyed by lowercase username
#[derive(Debug, Default)]
pub struct SessionCache {
    players: HashMap<String, Player>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, username: &str) -> Option<&Player> {
        self.players.get(&username.to_lowercase())
    }

    pub fn insert(&mut self, player: Player) {
        self.players.insert(player.username.to_lowercase(), player);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.players.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let mut session = SessionCache::new();
        session.insert(Player::new("Alice", HashMap::new()));

        assert!(session.get("alice").is_some());
        assert!(session.get("bob").is_none());
        assert_eq!(session.len(), 1);
    }
}
