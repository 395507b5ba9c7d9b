use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A user-defined team that replaces a stock team wherever it appears on a schedule.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamReplacement {
    /// Name as it shows up on schedules and polls
    pub replaces: String,
    pub name: String,
    pub conference: String,
}

/// Coach and school identity of one dynasty.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CoachProfile {
    #[validate(custom = "not_blank")]
    pub coach_name: String,

    #[validate(custom = "not_blank")]
    pub school_name: String,

    /// Conference as chosen at creation; the team directory wins when it knows the school.
    pub conference: String,

    pub school_logo_url: Option<String>,

    pub custom_teams: Vec<TeamReplacement>,
}

impl CoachProfile {
    pub fn new(coach_name: impl Into<String>, school_name: impl Into<String>) -> Self {
        Self { coach_name: coach_name.into(), school_name: school_name.into(), ..Self::default() }
    }

    pub fn with_conference(mut self, conference: impl Into<String>) -> Self {
        self.conference = conference.into();
        self
    }

    /// Case- and whitespace-insensitive school comparison used for save-slot collisions.
    pub fn same_school(&self, school: &str) -> bool {
        self.school_name.trim().eq_ignore_ascii_case(school.trim())
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_identity_fails_validation() {
        assert!(CoachProfile::new("Coach Prime", "Colorado").validate().is_ok());
        assert!(CoachProfile::new("  ", "Colorado").validate().is_err());
        assert!(CoachProfile::new("Coach Prime", "").validate().is_err());
    }

    #[test]
    fn test_same_school_ignores_case() {
        let profile = CoachProfile::new("Coach", "Boise State");
        assert!(profile.same_school(" boise state"));
        assert!(!profile.same_school("Fresno State"));
    }
}
