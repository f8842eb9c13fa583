//! Room configuration.

use serde::{Deserialize, Serialize};

use crate::Role;

/// Settings shared by every room on a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Maximum users in a room, spectator included.
    pub max_users: usize,

    /// Minimum players (spectator excluded) needed to start a round.
    pub min_players: usize,

    /// Drawing turns each player gets per round before voting opens.
    pub turns_per_player: u32,

    /// Username reserved for the non-playing spectator.
    pub spectator_name: String,

    /// What the faker sees in place of the keyword.
    pub keyword_placeholder: String,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_users: 10,
            min_players: 1,
            turns_per_player: 2,
            spectator_name: "admin".to_string(),
            keyword_placeholder: "???".to_string(),
        }
    }
}

impl RoomConfig {
    /// The role a user with this name gets. The reserved spectator name is
    /// matched exactly.
    pub fn role_for(&self, name: &str) -> Role {
        if name == self.spectator_name {
            Role::Spectator
        } else {
            Role::Player
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.max_users, 10);
        assert_eq!(config.min_players, 1);
        assert_eq!(config.turns_per_player, 2);
        assert_eq!(config.spectator_name, "admin");
        assert_eq!(config.keyword_placeholder, "???");
    }

    #[test]
    fn test_room_config_deserializes_from_json() {
        let config: RoomConfig = serde_json::from_str(
            r#"{"max_users":6,"min_players":3,"turns_per_player":1,
                "spectator_name":"host","keyword_placeholder":"?"}"#,
        )
        .unwrap();
        assert_eq!(config.max_users, 6);
        assert_eq!(config.spectator_name, "host");
    }

    #[test]
    fn test_role_for_reserved_name_is_spectator() {
        let config = RoomConfig::default();
        assert_eq!(config.role_for("admin"), Role::Spectator);
        assert_eq!(config.role_for("Admin"), Role::Player);
        assert_eq!(config.role_for("ann"), Role::Player);
    }
}
