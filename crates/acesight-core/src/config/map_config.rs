use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// Minimap calibration for a single map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapConfig {
    pub name: String,
    /// Pixel period of one minimap grid cell (interior plus border line)
    pub grid_cell_period_px: u32,
    /// Grid offset in pixels relative to the minimap region origin
    pub grid_offset: (i32, i32),
    /// Real-world edge length of one grid cell
    pub cell_size_m: f64,
}

impl MapConfig {
    pub fn new(
        name: impl Into<String>,
        grid_cell_period_px: u32,
        grid_offset: (i32, i32),
        cell_size_m: f64,
    ) -> Self {
        Self {
            name: name.into(),
            grid_cell_period_px,
            grid_offset,
            cell_size_m,
        }
    }

    /// Meters per minimap pixel
    pub fn conversion_factor(&self) -> f64 {
        self.cell_size_m / self.grid_cell_period_px as f64
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_map(&self.name, "map name is empty"));
        }
        if self.grid_cell_period_px == 0 {
            return Err(Error::invalid_map(
                &self.name,
                "grid_cell_period_px must be greater than zero",
            ));
        }
        if !self.cell_size_m.is_finite() || self.cell_size_m <= 0.0 {
            return Err(Error::invalid_map(
                &self.name,
                format!("cell_size_m must be positive, got {}", self.cell_size_m),
            ));
        }
        Ok(())
    }
}

/// On-disk shape of one map entry.
///
/// `cell_block` / `grid_size_m` are the key names used by older config files.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapConfigEntry {
    #[serde(alias = "cell_block")]
    grid_cell_period_px: u32,
    #[serde(alias = "grid_size_m")]
    cell_size_m: f64,
    offset: (i32, i32),
    /// Present in older files; the minimap region now lives in settings
    #[serde(default)]
    #[allow(dead_code)]
    grid_region: Option<(i32, i32, u32, u32)>,
}

/// Top-level `name → entry` pairs in file order, repeated names included
struct RawEntries(Vec<(String, JsonValue)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of map configs")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<RawEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, JsonValue>()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Immutable set of known map calibrations
#[derive(Debug, Clone, Default)]
pub struct MapConfigStore {
    by_name: HashMap<String, Arc<MapConfig>>,
    /// Longest name first so that a short name never wins over a longer one containing it
    match_order: Vec<Arc<MapConfig>>,
}

impl MapConfigStore {
    pub fn new(configs: Vec<MapConfig>) -> Result<Self> {
        let mut by_name = HashMap::new();
        for config in configs {
            config.validate()?;
            let name = config.name.clone();
            if by_name.insert(name.clone(), Arc::new(config)).is_some() {
                return Err(Error::invalid_map(name, "duplicate map name"));
            }
        }

        let mut match_order: Vec<Arc<MapConfig>> = by_name.values().cloned().collect();
        match_order.sort_by(|a, b| {
            b.name
                .chars()
                .count()
                .cmp(&a.name.chars().count())
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(Self {
            by_name,
            match_order,
        })
    }

    /// Load map configs from a JSON file
    ///
    /// Format: `{ "<map name>": { "grid_cell_period_px": 61, "cell_size_m": 150, "offset": [1, -3] } }`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse map configs from JSON content; a name given twice is rejected
    pub fn parse(content: &str) -> Result<Self> {
        let RawEntries(entries) = serde_json::from_str(content)
            .map_err(|e| Error::ConfigParseError(format!("map config: {e}")))?;

        let mut configs = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            let entry: MapConfigEntry = serde_json::from_value(value)
                .map_err(|e| Error::invalid_map(&name, e.to_string()))?;
            configs.push(MapConfig {
                name,
                grid_cell_period_px: entry.grid_cell_period_px,
                grid_offset: entry.offset,
                cell_size_m: entry.cell_size_m,
            });
        }

        Self::new(configs)
    }

    /// Calibrations shipped with the tool
    pub fn builtin() -> Self {
        Self::new(vec![
            MapConfig::new("Poland", 56, (0, 0), 350.0),
            MapConfig::new("Frozen Pass", 61, (1, -3), 150.0),
            MapConfig::new("Battle of Hürtgen Forest", 62, (-1, -5), 225.0),
        ])
        .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<MapConfig>> {
        self.by_name.get(name).cloned()
    }

    /// Find the map whose name appears in recognized text (case-insensitive, longest name first)
    pub fn find_in_text(&self, text: &str) -> Option<Arc<MapConfig>> {
        let text = text.to_lowercase();
        if text.trim().is_empty() {
            return None;
        }
        self.match_order
            .iter()
            .find(|config| text.contains(&config.name.to_lowercase()))
            .cloned()
    }

    /// Map names sorted alphabetically
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<MapConfig>> {
        self.match_order.iter()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_map_configs() {
        let content = r#"{
            "Frozen Pass": { "grid_cell_period_px": 61, "cell_size_m": 150, "offset": [1, -3] },
            "Poland": { "grid_cell_period_px": 56, "cell_size_m": 350.0, "offset": [0, 0] }
        }"#;
        let store = MapConfigStore::parse(content).unwrap();
        assert_eq!(store.len(), 2);

        let frozen = store.get("Frozen Pass").unwrap();
        assert_eq!(frozen.grid_cell_period_px, 61);
        assert_eq!(frozen.grid_offset, (1, -3));
        assert_eq!(frozen.cell_size_m, 150.0);
    }

    #[test]
    fn test_parse_legacy_keys() {
        let content = r#"{
            "Poland": { "grid_region": [1473, 637, 432, 432], "grid_size_m": 350, "cell_block": 56, "offset": [1, -3] }
        }"#;
        let store = MapConfigStore::parse(content).unwrap();
        let poland = store.get("Poland").unwrap();
        assert_eq!(poland.grid_cell_period_px, 56);
        assert_eq!(poland.cell_size_m, 350.0);
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let content = r#"{ "Poland": { "grid_cell_period_px": 56, "offset": [0, 0] } }"#;
        let err = MapConfigStore::parse(content).unwrap_err();
        match err {
            Error::InvalidMapConfig { map, message } => {
                assert_eq!(map, "Poland");
                assert!(message.contains("cell_size_m"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_period_rejected() {
        let content = r#"{ "Poland": { "grid_cell_period_px": 0, "cell_size_m": 350, "offset": [0, 0] } }"#;
        assert!(matches!(
            MapConfigStore::parse(content),
            Err(Error::InvalidMapConfig { .. })
        ));
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(matches!(
            MapConfigStore::parse("[1, 2, 3]"),
            Err(Error::ConfigParseError(_))
        ));
    }

    #[test]
    fn test_duplicate_name_in_file_rejected() {
        let content = r#"{
            "Poland": { "grid_cell_period_px": 56, "cell_size_m": 350, "offset": [0, 0] },
            "Poland": { "grid_cell_period_px": 60, "cell_size_m": 300, "offset": [1, 1] }
        }"#;
        match MapConfigStore::parse(content).unwrap_err() {
            Error::InvalidMapConfig { map, message } => {
                assert_eq!(map, "Poland");
                assert!(message.contains("duplicate"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            MapConfigStore::parse("{ \"Poland\": "),
            Err(Error::ConfigParseError(_))
        ));
    }

    #[test]
    fn test_conversion_factor() {
        let config = MapConfig::new("Frozen Pass", 61, (0, 0), 150.0);
        assert!((config.conversion_factor() - 150.0 / 61.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_in_text_prefers_longest_name() {
        let store = MapConfigStore::new(vec![
            MapConfig::new("Pass", 50, (0, 0), 200.0),
            MapConfig::new("Frozen Pass", 61, (0, 0), 150.0),
        ])
        .unwrap();

        let found = store.find_in_text("Loading: FROZEN PASS  [Ground]").unwrap();
        assert_eq!(found.name, "Frozen Pass");

        let found = store.find_in_text("mountain pass").unwrap();
        assert_eq!(found.name, "Pass");

        assert!(store.find_in_text("").is_none());
        assert!(store.find_in_text("Sinai").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = MapConfigStore::new(vec![
            MapConfig::new("Poland", 56, (0, 0), 350.0),
            MapConfig::new("Poland", 60, (0, 0), 300.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_builtin_store() {
        let store = MapConfigStore::builtin();
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.names(),
            vec!["Battle of Hürtgen Forest", "Frozen Pass", "Poland"]
        );
    }
}
