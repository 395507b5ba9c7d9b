//! # dynasty_core - Dynasty State & Persistence Engine
//!
//! Tracks a multi-season sports dynasty: per-year schedules and ledger
//! entries, schedule-derived stats, a sparse weekly Top 25 history, the
//! season rollover and a versioned snapshot export/restore.
//!
//! ## Features
//! - Stats are recomputed from the schedule on every read
//! - Polls are stored only for edited weeks and read with predecessor fallback
//! - One session context object instead of ambient global state
//! - Durable store image: MessagePack + LZ4 + SHA-256 with atomic writes
//!
//! ```no_run
//! use dynasty_core::{CoachProfile, DynastySession, MemoryStore, TeamDirectory};
//!
//! let mut session = DynastySession::open(MemoryStore::new(), TeamDirectory::builtin().clone())?;
//! session.create_dynasty(CoachProfile::new("Coach", "Georgia"), 2025)?;
//! let stats = session.live_stats(2025);
//! println!("{}", stats.overall_record());
//! # Ok::<(), dynasty_core::DynastyError>(())
//! ```

pub mod config;
pub mod error;
pub mod launcher;
pub mod ledger;
pub mod lifecycle;
pub mod models;
pub mod ranking;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod teams;

pub use config::{EngineConfig, CONFIG_PATH_ENV};
pub use error::{DynastyError, DynastyResult};
pub use launcher::DynastySummary;
pub use ledger::StatsCheck;
pub use lifecycle::{active_week, CareerTotals, SeasonPhase};
pub use models::{
    Award, CoachProfile, DraftedPlayer, Game, GameResult, Location, Player, PlayerStatLine,
    Recruit, TeamReplacement, Transfer, TransferDirection, Trophy, YearRecord, SCHEDULE_WEEKS,
};
pub use ranking::{Poll, RankMovement, RankedTeam, Top25History, MAX_POLL_WEEK, POLL_SIZE};
pub use session::DynastySession;
pub use snapshot::{DynastySnapshot, SNAPSHOT_VERSION};
pub use stats::{calculate_stats, YearStats};
pub use store::{FileStore, MemoryStore, RecordKey, RecordStore};
pub use teams::{TeamDirectory, TeamIdentity};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Opens a file-backed session as described by `config`.
pub fn open_session(config: &EngineConfig) -> DynastyResult<DynastySession<FileStore>> {
    config.validate()?;
    let path = config.store_path();
    let store = if config.deferred_writes {
        FileStore::open_deferred(path)?
    } else {
        FileStore::open(path)?
    };
    DynastySession::open(store, config.team_directory()?)
}
