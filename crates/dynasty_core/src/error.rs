use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DynastyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Store decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted store image")]
    Corrupted,

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Store image version mismatch: found {found}, expected {expected}")]
    StoreVersionMismatch { found: u32, expected: u32 },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unsupported snapshot version '{found}' (supported: {supported})")]
    UnsupportedVersion { found: String, supported: String },

    #[error("Snapshot contains no dynasty data")]
    EmptyDynastyData,

    #[error("Snapshot is missing the coach/school identity: {reason}")]
    MissingIdentity { reason: String },

    #[error("Invalid coach profile: {0}")]
    InvalidProfile(#[from] validator::ValidationErrors),

    #[error("A dynasty for '{school}' already exists")]
    DuplicateSchool { school: String },

    #[error("Snapshot belongs to '{found}', the active dynasty is '{active}'")]
    SchoolMismatch { active: String, found: String },

    #[error("Unknown dynasty: {id}")]
    UnknownDynasty { id: Uuid },

    #[error("Schedule must have {expected} weeks, found {found}")]
    InvalidScheduleLength { expected: usize, found: usize },

    #[error("Poll has {found} entries, at most {max} allowed")]
    PollTooLarge { found: usize, max: usize },

    #[error("Week {week} is out of range (0..={max})")]
    WeekOutOfRange { week: u8, max: u8 },

    #[error("Rank {rank} is out of range (1..={max})")]
    RankOutOfRange { rank: usize, max: usize },

    #[error("No active dynasty")]
    NoActiveDynasty,

    #[error("Season {year} is not the active season (current: {current})")]
    SeasonNotActive { year: i32, current: i32 },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DynastyError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            DynastyError::Io(_) => true,
            DynastyError::FileNotFound { .. } => true,
            DynastyError::UnknownDynasty { .. } => true,
            DynastyError::Corrupted => false,
            DynastyError::ChecksumMismatch => false,
            DynastyError::Decompression => false,
            // Rejected before any mutation happened
            DynastyError::UnsupportedVersion { .. }
            | DynastyError::EmptyDynastyData
            | DynastyError::MissingIdentity { .. }
            | DynastyError::InvalidProfile(_)
            | DynastyError::DuplicateSchool { .. }
            | DynastyError::SchoolMismatch { .. } => true,
            _ => false,
        }
    }
}

pub type DynastyResult<T> = std::result::Result<T, DynastyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_rejections_are_recoverable() {
        assert!(DynastyError::EmptyDynastyData.is_recoverable());
        assert!(DynastyError::DuplicateSchool { school: "Ohio State".into() }.is_recoverable());
        assert!(!DynastyError::ChecksumMismatch.is_recoverable());
    }

    #[test]
    fn test_error_messages_are_human_readable() {
        let err = DynastyError::UnsupportedVersion { found: "9.9".into(), supported: "1.0".into() };
        assert_eq!(err.to_string(), "Unsupported snapshot version '9.9' (supported: 1.0)");
    }
}
