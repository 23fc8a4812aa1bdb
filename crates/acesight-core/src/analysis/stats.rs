use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Identifies a single combat counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    Hits,
    Crits,
    Kills,
    Fires,
    Ricochets,
    NonPenetrations,
    AmmoExplosions,
    FuelExplosions,
    UnknownEvents,
}

impl StatKind {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Combat counters for the current session
///
/// Counters only grow while in combat; `reset_kills` is the only way down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatCounters {
    pub hits: u32,
    pub crits: u32,
    pub kills: u32,
    pub fires: u32,
    pub ricochets: u32,
    pub non_penetrations: u32,
    pub ammo_explosions: u32,
    pub fuel_explosions: u32,
    pub unknown_events: u32,
}

impl StatCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Hits => self.hits,
            StatKind::Crits => self.crits,
            StatKind::Kills => self.kills,
            StatKind::Fires => self.fires,
            StatKind::Ricochets => self.ricochets,
            StatKind::NonPenetrations => self.non_penetrations,
            StatKind::AmmoExplosions => self.ammo_explosions,
            StatKind::FuelExplosions => self.fuel_explosions,
            StatKind::UnknownEvents => self.unknown_events,
        }
    }

    pub fn increment(&mut self, kind: StatKind) {
        let counter = match kind {
            StatKind::Hits => &mut self.hits,
            StatKind::Crits => &mut self.crits,
            StatKind::Kills => &mut self.kills,
            StatKind::Fires => &mut self.fires,
            StatKind::Ricochets => &mut self.ricochets,
            StatKind::NonPenetrations => &mut self.non_penetrations,
            StatKind::AmmoExplosions => &mut self.ammo_explosions,
            StatKind::FuelExplosions => &mut self.fuel_explosions,
            StatKind::UnknownEvents => &mut self.unknown_events,
        };
        *counter = counter.saturating_add(1);
    }

    /// Reset the kill counter (entering the menu)
    pub fn reset_kills(&mut self) {
        self.kills = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// All counters with their names, in display order
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, u32)> + '_ {
        StatKind::iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Counters whose value differs from `previous`
    pub fn changed_since(&self, previous: &StatCounters) -> Vec<StatKind> {
        StatKind::iter()
            .filter(|kind| self.get(*kind) != previous.get(*kind))
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.iter().map(|(_, value)| value as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_get() {
        let mut stats = StatCounters::new();
        stats.increment(StatKind::Hits);
        stats.increment(StatKind::Hits);
        stats.increment(StatKind::FuelExplosions);

        assert_eq!(stats.hits, 2);
        assert_eq!(stats.get(StatKind::FuelExplosions), 1);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_reset_kills_keeps_other_counters() {
        let mut stats = StatCounters {
            kills: 5,
            hits: 7,
            ..Default::default()
        };
        stats.reset_kills();
        assert_eq!(stats.kills, 0);
        assert_eq!(stats.hits, 7);
    }

    #[test]
    fn test_changed_since() {
        let before = StatCounters {
            hits: 1,
            ..Default::default()
        };
        let mut after = before;
        after.increment(StatKind::Kills);
        after.increment(StatKind::Crits);

        assert_eq!(
            after.changed_since(&before),
            vec![StatKind::Crits, StatKind::Kills]
        );
        assert!(before.changed_since(&before).is_empty());
    }

    #[test]
    fn test_iter_order_and_names() {
        let names: Vec<&str> = StatCounters::new().iter().map(|(k, _)| k.name()).collect();
        assert_eq!(names.first(), Some(&"hits"));
        assert_eq!(names.last(), Some(&"unknown_events"));
        assert_eq!(names.len(), 9);
    }
}
