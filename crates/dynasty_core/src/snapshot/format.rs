use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DynastyError, DynastyResult};
use crate::models::{CoachProfile, YearRecord};
use crate::store::file::write_atomic;
use crate::store::keys::SAVED_DYNASTY_PREFIX;
use crate::store::RecordKey;

/// Format version written by this crate.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Versions `import` accepts.
pub const SUPPORTED_VERSIONS: &[&str] = &[SNAPSHOT_VERSION];

/// Self-contained export of one dynasty.
///
/// `dynasty_data` holds every dynasty record one level deep, keyed exactly as
/// in the store, with each value kept as the JSON document it was stored as.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DynastySnapshot {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub exported_at: DateTime<Utc>,

    #[serde(default)]
    pub dynasty_data: Map<String, Value>,
}

impl DynastySnapshot {
    pub fn new(dynasty_data: Map<String, Value>) -> Self {
        Self { version: SNAPSHOT_VERSION.to_string(), exported_at: Utc::now(), dynasty_data }
    }

    pub fn to_json_pretty(&self) -> DynastyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> DynastyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to_path(&self, path: &Path) -> DynastyResult<()> {
        let json = self.to_json_pretty()?;
        write_atomic(path, json.as_bytes())?;
        log::debug!("Wrote snapshot to {} ({} bytes)", path.display(), json.len());
        Ok(())
    }

    pub fn read_from_path(path: &Path) -> DynastyResult<Self> {
        if !path.exists() {
            return Err(DynastyError::FileNotFound { path: path.display().to_string() });
        }
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Typed view of one record. `None` if absent or of the wrong shape.
    pub fn record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.dynasty_data.get(key)?;
        T::deserialize(value).ok()
    }

    pub fn profile(&self) -> Option<CoachProfile> {
        self.record(RecordKey::CoachProfile.as_str())
    }

    pub fn current_year(&self) -> Option<i32> {
        self.record(RecordKey::CurrentYear.as_str())
    }

    pub fn year_records(&self) -> Vec<YearRecord> {
        self.record(RecordKey::YearRecords.as_str()).unwrap_or_default()
    }

    /// Structural checks run before any destructive import.
    ///
    /// Returns the coach profile the document resolves to.
    pub fn validate(&self) -> DynastyResult<CoachProfile> {
        check_version(&self.version)?;

        if self.dynasty_data.is_empty() {
            return Err(DynastyError::EmptyDynastyData);
        }

        if let Some(key) = self.dynasty_data.keys().find(|key| key.starts_with(SAVED_DYNASTY_PREFIX)) {
            log::warn!("Snapshot carries launcher record '{}', it will be ignored", key);
        }

        let Some(value) = self.dynasty_data.get(RecordKey::CoachProfile.as_str()) else {
            return Err(DynastyError::MissingIdentity { reason: "no coachProfile record".to_string() });
        };
        let profile = CoachProfile::deserialize(value).map_err(|e| DynastyError::MissingIdentity {
            reason: format!("coachProfile is unreadable: {e}"),
        })?;
        validator::Validate::validate(&profile).map_err(|e| DynastyError::MissingIdentity {
            reason: format!("coachProfile has no usable coach/school name: {e}"),
        })?;

        Ok(profile)
    }
}

fn check_version(version: &str) -> DynastyResult<()> {
    match version {
        v if SUPPORTED_VERSIONS.contains(&v) => Ok(()),
        v => Err(DynastyError::UnsupportedVersion {
            found: v.to_string(),
            supported: SUPPORTED_VERSIONS.join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn valid() -> DynastySnapshot {
        DynastySnapshot::new(data(json!({
            "coachProfile": {"coachName": "Kirby", "schoolName": "Georgia"},
            "currentYear": 2026
        })))
    }

    #[test]
    fn test_document_shape() {
        let json: Value = serde_json::from_str(&valid().to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["version"], "1.0");
        assert!(json["exportedAt"].is_string());
        assert_eq!(json["dynastyData"]["currentYear"], 2026);
    }

    #[test]
    fn test_validate_accepts_complete_document() {
        let profile = valid().validate().unwrap();
        assert_eq!(profile.school_name, "Georgia");
        assert_eq!(valid().current_year(), Some(2026));
    }

    #[test]
    fn test_validate_rejections() {
        let mut snapshot = valid();
        snapshot.version = "2.0".into();
        assert!(matches!(snapshot.validate(), Err(DynastyError::UnsupportedVersion { .. })));

        let empty = DynastySnapshot::new(Map::new());
        assert!(matches!(empty.validate(), Err(DynastyError::EmptyDynastyData)));

        let no_profile = DynastySnapshot::new(data(json!({"currentYear": 2026})));
        assert!(matches!(no_profile.validate(), Err(DynastyError::MissingIdentity { .. })));

        let blank_school = DynastySnapshot::new(data(json!({
            "coachProfile": {"coachName": "Kirby", "schoolName": " "}
        })));
        assert!(matches!(blank_school.validate(), Err(DynastyError::MissingIdentity { .. })));
    }

    #[test]
    fn test_missing_version_is_rejected() {
        let snapshot = DynastySnapshot::from_json(r#"{"dynastyData": {"currentYear": 2025}}"#).unwrap();
        assert_eq!(snapshot.version, "");
        assert!(matches!(snapshot.validate(), Err(DynastyError::UnsupportedVersion { .. })));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exports").join("georgia.json");

        let snapshot = valid();
        snapshot.write_to_path(&path).unwrap();

        assert_eq!(DynastySnapshot::read_from_path(&path).unwrap(), snapshot);
        assert!(matches!(
            DynastySnapshot::read_from_path(&dir.path().join("missing.json")),
            Err(DynastyError::FileNotFound { .. })
        ));
    }
}
