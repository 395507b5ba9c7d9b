//! Persisted record types of a dynasty.

pub mod game;
pub mod profile;
pub mod roster;
pub mod year_record;

pub use game::{
    blank_schedule, normalize_schedule, parse_score, Game, GameResult, Location, SCHEDULE_WEEKS,
};
pub use profile::{CoachProfile, TeamReplacement};
pub use roster::{
    Award, DraftedPlayer, Player, PlayerStatLine, Recruit, Transfer, TransferDirection, Trophy,
};
pub use year_record::{parse_record, YearRecord};
