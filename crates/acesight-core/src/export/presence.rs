use std::fmt;

use serde::Serialize;

use crate::session::{GameState, StateSnapshot};

/// Two-line status text for a rich-presence style display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceText {
    pub details: String,
    pub state: String,
}

impl PresenceText {
    pub fn from_snapshot(snapshot: &StateSnapshot) -> Self {
        let details = match snapshot.game_state {
            GameState::InGame => format!("In-Game (Kills: {})", snapshot.stats.kills),
            GameState::InMenu => "In Main Menu".to_string(),
            GameState::NotInFocus => "Idle".to_string(),
            GameState::Unknown => "Unknown".to_string(),
            GameState::WaitingForProcess => "Waiting for process".to_string(),
        };

        let state = match &snapshot.last_event_description {
            Some(description)
                if snapshot.last_event_significant && snapshot.game_state != GameState::InMenu =>
            {
                description.clone()
            }
            _ => String::new(),
        };

        Self { details, state }
    }
}

impl fmt::Display for PresenceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.state.is_empty() {
            write!(f, "{}", self.details)
        } else {
            write!(f, "{}\n{}", self.details, self.state)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::analyze_event;
    use crate::config::MapConfigStore;
    use crate::logging::LogBuffer;
    use crate::session::{MapResolver, SessionStore};

    fn store_in(state: GameState) -> SessionStore {
        let resolver = MapResolver::new(Arc::new(MapConfigStore::builtin()), "Frozen Pass");
        let mut store = SessionStore::new(resolver, LogBuffer::new(10));
        store.state = state;
        store
    }

    #[test]
    fn test_in_game_shows_kills_and_event() {
        let mut store = store_in(GameState::InGame);
        let event = analyze_event("Enemy crew knocked out", &mut store.stats);
        store.last_event = Some(event);

        let presence = PresenceText::from_snapshot(&store.snapshot());
        assert_eq!(presence.details, "In-Game (Kills: 1)");
        assert_eq!(presence.state, "Enemy Crew knocked out");
        assert_eq!(
            presence.to_string(),
            "In-Game (Kills: 1)\nEnemy Crew knocked out"
        );
    }

    #[test]
    fn test_menu_hides_event() {
        let mut store = store_in(GameState::InMenu);
        let event = analyze_event("fire", &mut store.stats);
        store.last_event = Some(event);

        let presence = PresenceText::from_snapshot(&store.snapshot());
        assert_eq!(presence.details, "In Main Menu");
        assert!(presence.state.is_empty());
        assert_eq!(presence.to_string(), "In Main Menu");
    }

    #[test]
    fn test_insignificant_event_is_not_shown() {
        let mut store = store_in(GameState::InGame);
        let event = analyze_event("", &mut store.stats);
        store.last_event = Some(event);

        let presence = PresenceText::from_snapshot(&store.snapshot());
        assert!(presence.state.is_empty());
    }

    #[test]
    fn test_other_states() {
        for (state, details) in [
            (GameState::NotInFocus, "Idle"),
            (GameState::Unknown, "Unknown"),
            (GameState::WaitingForProcess, "Waiting for process"),
        ] {
            let presence = PresenceText::from_snapshot(&store_in(state).snapshot());
            assert_eq!(presence.details, details);
        }
    }
}
