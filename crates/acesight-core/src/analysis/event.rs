use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::debug;

use super::stats::{StatCounters, StatKind};
use crate::signal::{EVENT_SIGNALS, EventSignal, MODULE_TAGS, ModuleTag};

pub const NO_SIGNIFICANT_EVENTS: &str = "No significant events detected";
pub const NO_SIGNIFICANT_MODULES: &str = "No significant modules detected";

/// Combat events reported in the hit/kill region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr)]
pub enum EventTag {
    #[strum(serialize = "Enemy set on fire")]
    EnemySetOnFire,
    #[strum(serialize = "Enemy Crew knocked out")]
    EnemyCrewKnockedOut,
    #[strum(serialize = "Enemy Critical Hit")]
    EnemyCritical,
    #[strum(serialize = "Enemy Hit")]
    EnemyHit,
    #[strum(serialize = "Ricochet")]
    Ricochet,
    #[strum(serialize = "Non-penetration")]
    NonPenetration,
    #[strum(serialize = "Enemy killed by ammunition and fuel explosion")]
    AmmoAndFuelExplosion,
    #[strum(serialize = "Enemy killed by ammunition explosion")]
    AmmoExplosion,
    #[strum(serialize = "Enemy killed by fuel explosion")]
    FuelExplosion,
    #[strum(serialize = "Enemy killed by unspecified explosion")]
    UnspecifiedExplosion,
}

impl EventTag {
    pub fn description(&self) -> &'static str {
        self.into()
    }

    /// Counters incremented when this event fires
    pub fn counters(&self) -> &'static [StatKind] {
        match self {
            EventTag::EnemySetOnFire => &[StatKind::Fires],
            EventTag::EnemyCrewKnockedOut => &[StatKind::Kills],
            EventTag::EnemyCritical => &[StatKind::Crits],
            EventTag::EnemyHit => &[StatKind::Hits],
            EventTag::Ricochet => &[StatKind::Ricochets],
            EventTag::NonPenetration => &[StatKind::NonPenetrations],
            EventTag::AmmoAndFuelExplosion => &[
                StatKind::AmmoExplosions,
                StatKind::FuelExplosions,
                StatKind::Kills,
            ],
            EventTag::AmmoExplosion => &[StatKind::AmmoExplosions, StatKind::Kills],
            EventTag::FuelExplosion => &[StatKind::FuelExplosions, StatKind::Kills],
            EventTag::UnspecifiedExplosion => &[StatKind::UnknownEvents],
        }
    }
}

/// Outcome of analysing one hit/kill region sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventResult {
    pub events: Vec<EventTag>,
    pub timestamp: DateTime<Utc>,
}

impl EventResult {
    /// `"; "`-joined event descriptions, or the "no significant events" sentinel
    pub fn description(&self) -> String {
        if self.events.is_empty() {
            return NO_SIGNIFICANT_EVENTS.to_string();
        }
        self.events
            .iter()
            .map(|e| e.description())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn is_significant(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Determine the events present in the text, in reporting order
///
/// Crit and generic hit are mutually exclusive, and an explosion resolves to
/// exactly one of four outcomes.
pub fn classify_events(text: &str) -> Vec<EventTag> {
    let signals = EVENT_SIGNALS.classify(text);
    let has = |signal: EventSignal| signals.contains(&signal);

    let mut events = Vec::new();
    if has(EventSignal::Fire) {
        events.push(EventTag::EnemySetOnFire);
    }
    if has(EventSignal::Crew) {
        events.push(EventTag::EnemyCrewKnockedOut);
    }
    if has(EventSignal::Crit) {
        events.push(EventTag::EnemyCritical);
    } else if has(EventSignal::Hit) {
        events.push(EventTag::EnemyHit);
    }
    if has(EventSignal::Ricochet) {
        events.push(EventTag::Ricochet);
    }
    if has(EventSignal::NonPenetration) {
        events.push(EventTag::NonPenetration);
    }
    if has(EventSignal::Explosion) {
        let outcome = match (has(EventSignal::Ammo), has(EventSignal::Fuel)) {
            (true, true) => EventTag::AmmoAndFuelExplosion,
            (true, false) => EventTag::AmmoExplosion,
            (false, true) => EventTag::FuelExplosion,
            (false, false) => EventTag::UnspecifiedExplosion,
        };
        events.push(outcome);
    }
    events
}

/// Analyse hit/kill text and update the counters
pub fn analyze_event(text: &str, stats: &mut StatCounters) -> EventResult {
    let events = classify_events(text);
    for event in &events {
        for kind in event.counters() {
            stats.increment(*kind);
        }
    }

    let result = EventResult {
        events,
        timestamp: Utc::now(),
    };
    if result.is_significant() {
        debug!(tag = "ANALYSIS", "{}", result.description());
    }
    result
}

/// Outcome of analysing one module region sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleResult {
    pub modules: Vec<ModuleTag>,
    pub timestamp: DateTime<Utc>,
}

impl ModuleResult {
    /// `"; "`-joined module labels, or the "no significant modules" sentinel
    pub fn description(&self) -> String {
        if self.modules.is_empty() {
            return NO_SIGNIFICANT_MODULES.to_string();
        }
        self.modules
            .iter()
            .map(|m| m.label())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn is_significant(&self) -> bool {
        !self.modules.is_empty()
    }
}

/// Detect damaged modules in the module region text
pub fn analyze_modules(text: &str) -> ModuleResult {
    let modules = MODULE_TAGS.classify(text);
    if !modules.is_empty() {
        debug!(tag = "MODULE", "detected {} module(s)", modules.len());
    }
    ModuleResult {
        modules,
        timestamp: Utc::now(),
    }
}
