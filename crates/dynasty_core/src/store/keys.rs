//! Record key registry
//!
//! Every record that belongs to the active dynasty is either one of the fixed
//! [`RecordKey`]s or a member of a per-year [`RecordFamily`]. Export, restore
//! and corruption sweeps enumerate records through this registry instead of
//! guessing from key shapes.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::RecordStore;
use crate::models::{
    Award, CoachProfile, Game, Player, PlayerStatLine, Recruit, Transfer, Trophy, YearRecord,
};
use crate::ranking::Top25History;
use crate::stats::YearStats;

/// Launcher index of all save slots.
pub const DYNASTIES_KEY: &str = "dynasties";
/// Id of the dynasty currently loaded into the active keys.
pub const ACTIVE_DYNASTY_KEY: &str = "activeDynasty";
/// Prefix of saved per-slot snapshots.
pub const SAVED_DYNASTY_PREFIX: &str = "dynasty_";

pub fn saved_dynasty_key(id: Uuid) -> String {
    format!("{SAVED_DYNASTY_PREFIX}{id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    CoachProfile,
    CurrentYear,
    Players,
    PlayerStats,
    AllRecruits,
    AllTransfers,
    AllAwards,
    YearRecords,
    AllTrophies,
    Top25History,
}

static BY_NAME: Lazy<HashMap<&'static str, RecordKey>> =
    Lazy::new(|| RecordKey::ALL.iter().map(|key| (key.as_str(), *key)).collect());

impl RecordKey {
    pub const ALL: [RecordKey; 10] = [
        RecordKey::CoachProfile,
        RecordKey::CurrentYear,
        RecordKey::Players,
        RecordKey::PlayerStats,
        RecordKey::AllRecruits,
        RecordKey::AllTransfers,
        RecordKey::AllAwards,
        RecordKey::YearRecords,
        RecordKey::AllTrophies,
        RecordKey::Top25History,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKey::CoachProfile => "coachProfile",
            RecordKey::CurrentYear => "currentYear",
            RecordKey::Players => "players",
            RecordKey::PlayerStats => "playerStats",
            RecordKey::AllRecruits => "allRecruits",
            RecordKey::AllTransfers => "allTransfers",
            RecordKey::AllAwards => "allAwards",
            RecordKey::YearRecords => "yearRecords",
            RecordKey::AllTrophies => "allTrophies",
            RecordKey::Top25History => "top25History",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }

    /// Whether `raw` decodes as this record's value type.
    pub fn accepts(self, raw: &str) -> bool {
        match self {
            RecordKey::CoachProfile => decodes::<CoachProfile>(raw),
            RecordKey::CurrentYear => decodes::<i32>(raw),
            RecordKey::Players => decodes::<Vec<Player>>(raw),
            RecordKey::PlayerStats => decodes::<Vec<PlayerStatLine>>(raw),
            RecordKey::AllRecruits => decodes::<Vec<Recruit>>(raw),
            RecordKey::AllTransfers => decodes::<Vec<Transfer>>(raw),
            RecordKey::AllAwards => decodes::<Vec<Award>>(raw),
            RecordKey::YearRecords => decodes::<Vec<YearRecord>>(raw),
            RecordKey::AllTrophies => decodes::<Vec<Trophy>>(raw),
            RecordKey::Top25History => decodes::<Top25History>(raw),
        }
    }
}

/// A set of records keyed `<prefix><year>`, one per season.
pub struct RecordFamily {
    pub name: &'static str,
    pub prefix: &'static str,
    schema: fn() -> RootSchema,
    accepts: fn(&str) -> bool,
}

pub static SCHEDULE_FAMILY: RecordFamily = RecordFamily {
    name: "schedule",
    prefix: "schedule_",
    schema: schedule_schema,
    accepts: decodes::<Vec<Game>>,
};

pub static YEAR_STATS_FAMILY: RecordFamily = RecordFamily {
    name: "yearStats",
    prefix: "yearStats_",
    schema: year_stats_schema,
    accepts: decodes::<YearStats>,
};

pub static RECORD_FAMILIES: [&RecordFamily; 2] = [&SCHEDULE_FAMILY, &YEAR_STATS_FAMILY];

impl RecordFamily {
    pub fn key(&self, year: i32) -> String {
        format!("{}{}", self.prefix, year)
    }

    /// Year encoded in `key`, if the key belongs to this family.
    pub fn year_of(&self, key: &str) -> Option<i32> {
        key.strip_prefix(self.prefix)?.parse().ok()
    }

    pub fn schema(&self) -> RootSchema {
        (self.schema)()
    }

    pub fn accepts(&self, raw: &str) -> bool {
        (self.accepts)(raw)
    }

    /// Member keys present in `store`. Keys that share the prefix but carry no year are ignored.
    pub fn keys_in(&self, store: &impl RecordStore) -> Vec<String> {
        store
            .keys_with_prefix(self.prefix)
            .into_iter()
            .filter(|key| self.year_of(key).is_some())
            .collect()
    }

    pub fn for_key(key: &str) -> Option<&'static RecordFamily> {
        RECORD_FAMILIES.iter().copied().find(|family| family.year_of(key).is_some())
    }
}

pub fn schedule_key(year: i32) -> String {
    SCHEDULE_FAMILY.key(year)
}

pub fn year_stats_key(year: i32) -> String {
    YEAR_STATS_FAMILY.key(year)
}

/// True for fixed keys and family members; false for launcher keys and anything unknown.
pub fn is_dynasty_key(key: &str) -> bool {
    RecordKey::from_name(key).is_some() || RecordFamily::for_key(key).is_some()
}

/// Whether `raw` decodes as the registered type of `key`. Unknown keys are accepted as-is.
pub fn accepts(key: &str, raw: &str) -> bool {
    if let Some(record) = RecordKey::from_name(key) {
        return record.accepts(raw);
    }
    match RecordFamily::for_key(key) {
        Some(family) => family.accepts(raw),
        None => true,
    }
}

/// Every dynasty record present in `store`: fixed keys in registry order, then each family.
pub fn dynasty_keys(store: &impl RecordStore) -> Vec<String> {
    let mut keys: Vec<String> = RecordKey::ALL
        .iter()
        .map(|key| key.as_str())
        .filter(|key| store.contains(key))
        .map(str::to_string)
        .collect();

    for family in RECORD_FAMILIES {
        keys.extend(family.keys_in(store));
    }

    keys
}

fn schedule_schema() -> RootSchema {
    schema_for!(Vec<Game>)
}

fn year_stats_schema() -> RootSchema {
    schema_for!(YearStats)
}

fn decodes<T: DeserializeOwned>(raw: &str) -> bool {
    serde_json::from_str::<T>(raw).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_fixed_key_names_round_trip() {
        for key in RecordKey::ALL {
            assert_eq!(RecordKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(RecordKey::from_name("dynasties"), None);
    }

    #[test]
    fn test_family_year_parsing() {
        assert_eq!(SCHEDULE_FAMILY.year_of("schedule_2031"), Some(2031));
        assert_eq!(SCHEDULE_FAMILY.year_of("schedule_draft"), None);
        assert_eq!(YEAR_STATS_FAMILY.year_of("schedule_2031"), None);
        assert!(std::ptr::eq(
            RecordFamily::for_key("yearStats_2024").unwrap(),
            &YEAR_STATS_FAMILY
        ));
    }

    #[test]
    fn test_launcher_keys_are_not_dynasty_keys() {
        assert!(!is_dynasty_key(DYNASTIES_KEY));
        assert!(!is_dynasty_key(ACTIVE_DYNASTY_KEY));
        assert!(!is_dynasty_key(&saved_dynasty_key(Uuid::new_v4())));
        assert!(is_dynasty_key("top25History"));
        assert!(is_dynasty_key("schedule_2025"));
    }

    #[test]
    fn test_dynasty_keys_uses_range_per_family() {
        let mut store = MemoryStore::new();
        for key in ["schedule_2025", "schedule_2024", "schedule_notes", "yearStats_2024", "players"] {
            store.set_raw(key, "[]".to_string()).unwrap();
        }

        assert_eq!(
            dynasty_keys(&store),
            vec!["players", "schedule_2024", "schedule_2025", "yearStats_2024"]
        );
    }

    #[test]
    fn test_family_schema_describes_games() {
        let schema = serde_json::to_value(SCHEDULE_FAMILY.schema()).unwrap();
        assert_eq!(schema["type"], "array");
    }
}
