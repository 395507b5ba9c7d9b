//! Team directory and effective team identity
//!
//! Conference membership decides which games count toward the conference
//! record. A team's on-schedule name is first run through the coach's custom
//! replacements, then looked up in the directory.
//!
//! Replacements are applied at read time, so editing them changes the
//! conference split of already finalized seasons too when their stats are
//! recomputed. Ledger entries written at season end keep the split that was
//! current when they were written.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{DynastyError, DynastyResult};
use crate::models::{CoachProfile, TeamReplacement};

/// Stock conference alignment (compile-time embedded).
pub const TEAMS_YAML: &str = include_str!("../data/teams.yaml");

static BUILTIN: OnceLock<TeamDirectory> = OnceLock::new();

/// Name and conference after replacements are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamIdentity {
    pub name: String,
    pub conference: String,
}

impl TeamIdentity {
    pub fn new(name: impl Into<String>, conference: impl Into<String>) -> Self {
        Self { name: name.into(), conference: conference.into() }
    }

    /// Two teams play a conference game only when both sit in the same real conference.
    pub fn shares_conference(&self, other: &TeamIdentity) -> bool {
        let ours = self.conference.trim();
        !ours.is_empty()
            && !is_independent(ours)
            && ours.eq_ignore_ascii_case(other.conference.trim())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DirectoryFile {
    conferences: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    /// lowercase name → identity
    teams: HashMap<String, TeamIdentity>,
    /// lowercase on-schedule name → replacement identity
    replacements: HashMap<String, TeamIdentity>,
}

impl TeamDirectory {
    /// Directory parsed from the embedded YAML.
    ///
    /// # Panics
    ///
    /// Panics if the embedded YAML is invalid, which is a build defect.
    pub fn builtin() -> &'static TeamDirectory {
        BUILTIN.get_or_init(|| {
            TeamDirectory::from_yaml(TEAMS_YAML).expect("embedded teams.yaml invalid")
        })
    }

    pub fn from_yaml(yaml: &str) -> DynastyResult<Self> {
        let file: DirectoryFile = serde_yaml::from_str(yaml)
            .map_err(|e| DynastyError::Config(format!("invalid team directory: {e}")))?;
        Ok(Self::from_file(file))
    }

    pub fn from_json(json: &str) -> DynastyResult<Self> {
        let file: DirectoryFile = serde_json::from_str(json)?;
        Ok(Self::from_file(file))
    }

    /// Loads a directory file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> DynastyResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    fn from_file(file: DirectoryFile) -> Self {
        let teams = file
            .conferences
            .into_iter()
            .flat_map(|(conference, names)| {
                names.into_iter().map(move |name| {
                    (name.trim().to_lowercase(), TeamIdentity::new(name.trim(), conference.clone()))
                })
            })
            .collect();

        Self { teams, replacements: HashMap::new() }
    }

    /// Copy of this directory with `replacements` active. Replaces any earlier set.
    pub fn with_replacements(&self, replacements: &[TeamReplacement]) -> Self {
        let replacements = replacements
            .iter()
            .filter(|r| !r.replaces.trim().is_empty())
            .map(|r| {
                let name = if r.name.trim().is_empty() { &r.replaces } else { &r.name };
                (r.replaces.trim().to_lowercase(), TeamIdentity::new(name.trim(), r.conference.trim()))
            })
            .collect();

        Self { teams: self.teams.clone(), replacements }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Effective identity of `name`. Unknown teams resolve with an empty conference.
    pub fn resolve(&self, name: &str) -> TeamIdentity {
        let key = name.trim().to_lowercase();
        if let Some(replacement) = self.replacements.get(&key) {
            return replacement.clone();
        }
        self.teams.get(&key).cloned().unwrap_or_else(|| TeamIdentity::new(name.trim(), ""))
    }

    pub fn conference_of(&self, name: &str) -> Option<String> {
        let identity = self.resolve(name);
        (!identity.conference.is_empty()).then_some(identity.conference)
    }

    /// Identity of the coach's own school. The directory wins over the profile's conference.
    pub fn identity_for(&self, profile: &CoachProfile) -> TeamIdentity {
        let mut identity = self.resolve(&profile.school_name);
        if identity.conference.is_empty() {
            identity.conference = profile.conference.trim().to_string();
        }
        identity
    }
}

fn is_independent(conference: &str) -> bool {
    conference.to_lowercase().contains("independent")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_directory_loads() {
        let directory = TeamDirectory::builtin();
        assert!(!directory.is_empty());
        assert_eq!(directory.conference_of("texas a&m").as_deref(), Some("SEC"));
        assert_eq!(directory.conference_of("Nowhere Tech"), None);
    }

    #[test]
    fn test_replacement_overrides_stock_identity() {
        let replacements = vec![TeamReplacement {
            replaces: "Temple".into(),
            name: "Gotham Knights".into(),
            conference: "Big Ten".into(),
        }];
        let directory = TeamDirectory::builtin().with_replacements(&replacements);

        assert_eq!(directory.resolve("temple"), TeamIdentity::new("Gotham Knights", "Big Ten"));
        assert_eq!(TeamDirectory::builtin().resolve("Temple").conference, "American");
    }

    #[test]
    fn test_independents_never_share_a_conference() {
        let notre_dame = TeamIdentity::new("Notre Dame", "FBS Independents");
        let uconn = TeamIdentity::new("UConn", "FBS Independents");
        assert!(!notre_dame.shares_conference(&uconn));

        let unknown = TeamIdentity::new("Someone", "");
        assert!(!unknown.shares_conference(&unknown.clone()));
    }

    #[test]
    fn test_profile_conference_fills_unknown_school() {
        let profile = CoachProfile::new("Coach", "Custom U").with_conference("MAC");
        let identity = TeamDirectory::builtin().identity_for(&profile);
        assert_eq!(identity, TeamIdentity::new("Custom U", "MAC"));
    }

    #[test]
    fn test_json_directory() {
        let directory = TeamDirectory::from_json(r#"{"conferences":{"Ivy":["Yale","Harvard"]}}"#)
            .unwrap();
        assert_eq!(directory.len(), 2);
        assert!(directory.resolve("Yale").shares_conference(&directory.resolve("harvard")));
    }
}
