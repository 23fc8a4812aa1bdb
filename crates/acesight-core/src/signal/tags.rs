//! Fragment tables for every text region.
//!
//! Fragments are deliberately short: OCR on the in-game HUD regularly drops
//! or garbles letters, so matching on partial words survives most misreads.

use std::sync::LazyLock;

use serde::Serialize;
use strum::{Display, IntoStaticStr};

use super::classifier::{FragmentTable, MatchPolicy};

/// Raw signals found in the hit/kill region text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSignal {
    Fire,
    Crew,
    Crit,
    Hit,
    Ricochet,
    NonPenetration,
    Explosion,
    Ammo,
    Fuel,
}

const EVENT_ENTRIES: &[(EventSignal, MatchPolicy, &[&str])] = &[
    (EventSignal::Fire, MatchPolicy::AnyOf, &["fire"]),
    (EventSignal::Crew, MatchPolicy::AnyOf, &["cre", "kno", "out"]),
    (EventSignal::Crit, MatchPolicy::AnyOf, &["crit"]),
    (EventSignal::Hit, MatchPolicy::AnyOf, &["hit"]),
    (EventSignal::Ricochet, MatchPolicy::AnyOf, &["rico", "rochet"]),
    (
        EventSignal::NonPenetration,
        MatchPolicy::AnyOf,
        &["non", "-", "penetrat"],
    ),
    (EventSignal::Explosion, MatchPolicy::AnyOf, &["explod", "explos"]),
    (EventSignal::Ammo, MatchPolicy::AnyOf, &["ammo", "amme", "amm"]),
    (EventSignal::Fuel, MatchPolicy::AnyOf, &["fuel"]),
];

/// Damaged modules listed in the module region
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, IntoStaticStr,
)]
pub enum ModuleTag {
    #[strum(serialize = "Track")]
    Track,
    #[strum(serialize = "Cannon barrel")]
    CannonBarrel,
    #[strum(serialize = "Horizontal turret drive")]
    HorizontalTurretDrive,
    #[strum(serialize = "Vertical turret drive")]
    VerticalTurretDrive,
    #[strum(serialize = "Driver")]
    Driver,
    #[strum(serialize = "Gunner")]
    Gunner,
    #[strum(serialize = "Commander")]
    Commander,
    #[strum(serialize = "Loader")]
    Loader,
    #[strum(serialize = "Machine gunner")]
    MachineGunner,
    #[strum(serialize = "Cannon breech")]
    CannonBreech,
    #[strum(serialize = "Fuel tank")]
    FuelTank,
    #[strum(serialize = "Engine")]
    Engine,
    #[strum(serialize = "Transmission")]
    Transmission,
    #[strum(serialize = "Radiator")]
    Radiator,
    #[strum(serialize = "Ammo")]
    Ammo,
    #[strum(serialize = "Autoloader")]
    Autoloader,
}

impl ModuleTag {
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

// Every module needs all of its fragments except `Ammo`, which matches on any.
const MODULE_ENTRIES: &[(ModuleTag, MatchPolicy, &[&str])] = &[
    (ModuleTag::Track, MatchPolicy::AllOf, &["track", "tra"]),
    (ModuleTag::CannonBarrel, MatchPolicy::AllOf, &["barrel", "barr"]),
    (
        ModuleTag::HorizontalTurretDrive,
        MatchPolicy::AllOf,
        &["hor", "horizontal", "tal"],
    ),
    (
        ModuleTag::VerticalTurretDrive,
        MatchPolicy::AllOf,
        &["ver", "vertical", "cal"],
    ),
    (ModuleTag::Driver, MatchPolicy::AllOf, &["driver", "driv"]),
    (ModuleTag::Gunner, MatchPolicy::AllOf, &["gunner", "ner"]),
    (ModuleTag::Commander, MatchPolicy::AllOf, &["comm", "ander"]),
    (ModuleTag::Loader, MatchPolicy::AllOf, &["loader", "load"]),
    (ModuleTag::MachineGunner, MatchPolicy::AllOf, &["mach", "ine"]),
    (ModuleTag::CannonBreech, MatchPolicy::AllOf, &["breech", "ee", "ech"]),
    (ModuleTag::FuelTank, MatchPolicy::AllOf, &["fuel", "tank"]),
    (ModuleTag::Engine, MatchPolicy::AllOf, &["engin", "eng"]),
    (ModuleTag::Transmission, MatchPolicy::AllOf, &["transmiss", "trans"]),
    (ModuleTag::Radiator, MatchPolicy::AllOf, &["radiat", "rad"]),
    (ModuleTag::Ammo, MatchPolicy::AnyOf, &["ammo"]),
    (ModuleTag::Autoloader, MatchPolicy::AllOf, &["auto"]),
];

/// HUD markers driving the session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudSignal {
    /// "To Battle!" button of the hangar
    BattleMarker,
    /// Gear / rpm / speed readout, present only while driving
    GearHeartbeat,
}

const HUD_ENTRIES: &[(HudSignal, MatchPolicy, &[&str])] = &[
    (HudSignal::BattleMarker, MatchPolicy::AnyOf, &["to battle"]),
    (
        HudSignal::GearHeartbeat,
        MatchPolicy::AnyOf,
        &["gear", "rpm", "spd", "km/h"],
    ),
];

/// Overlays during which map-name OCR is unreliable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlaySignal {
    Scoreboard,
    MainMenu,
}

const OVERLAY_ENTRIES: &[(OverlaySignal, MatchPolicy, &[&str])] = &[
    (
        OverlaySignal::Scoreboard,
        MatchPolicy::AnyOf,
        &["statistic", "scoreboard", "battle score"],
    ),
    (
        OverlaySignal::MainMenu,
        MatchPolicy::AnyOf,
        &["main menu", "leave battle", "return to hangar"],
    ),
];

fn build<T>(entries: &[(T, MatchPolicy, &[&str])]) -> FragmentTable<T>
where
    T: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    FragmentTable::from_entries(entries).expect("built-in fragment table is valid")
}

pub static EVENT_SIGNALS: LazyLock<FragmentTable<EventSignal>> =
    LazyLock::new(|| build(EVENT_ENTRIES));

pub static MODULE_TAGS: LazyLock<FragmentTable<ModuleTag>> =
    LazyLock::new(|| build(MODULE_ENTRIES));

pub static HUD_SIGNALS: LazyLock<FragmentTable<HudSignal>> =
    LazyLock::new(|| build(HUD_ENTRIES));

pub static OVERLAY_SIGNALS: LazyLock<FragmentTable<OverlaySignal>> =
    LazyLock::new(|| build(OVERLAY_ENTRIES));

/// Whether the battle-region text shows the "to battle" marker
pub fn has_battle_marker(text: &str) -> bool {
    HUD_SIGNALS.matches(HudSignal::BattleMarker, text)
}

/// Whether the gear-region text carries the driving-HUD heartbeat
pub fn has_gear_heartbeat(text: &str) -> bool {
    HUD_SIGNALS.matches(HudSignal::GearHeartbeat, text)
}
