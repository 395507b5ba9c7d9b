//! Dynasty session
//!
//! `DynastySession` is the context every engine operation runs against: the
//! record store, the team directory, the current-year pointer and the
//! in-memory ranking history. The pointer is set when a dynasty is loaded,
//! advanced only by `end_season`, and cleared on return to the launcher.
//!
//! Poll edits stay in memory until [`DynastySession::persist`] or an export
//! writes them to the store.

use uuid::Uuid;
use validator::Validate;

use crate::error::{DynastyError, DynastyResult};
use crate::models::CoachProfile;
use crate::ranking::{Poll, RankMovement, RankedTeam, Top25History};
use crate::store::keys::ACTIVE_DYNASTY_KEY;
use crate::store::{self, RecordKey, RecordStore};
use crate::teams::{TeamDirectory, TeamIdentity};

pub struct DynastySession<S: RecordStore> {
    pub(crate) store: S,
    pub(crate) teams: TeamDirectory,
    pub(crate) current_year: Option<i32>,
    pub(crate) active_id: Option<Uuid>,
    pub(crate) rankings: Top25History,
    pub(crate) rankings_dirty: bool,
}

impl<S: RecordStore> DynastySession<S> {
    /// Opens a session over `store`, resuming the active dynasty if the store holds one.
    ///
    /// Records that no longer decode as their registered type are dropped first.
    pub fn open(mut store: S, teams: TeamDirectory) -> DynastyResult<Self> {
        let dropped = store::sweep_corrupt(&mut store)?;
        if !dropped.is_empty() {
            store.flush()?;
        }

        let mut session = Self {
            store,
            teams,
            current_year: None,
            active_id: None,
            rankings: Top25History::new(),
            rankings_dirty: false,
        };
        session.reload();

        match session.current_year {
            Some(year) => log::info!("Resumed dynasty at season {}", year),
            None => log::debug!("Opened session at launcher"),
        }
        Ok(session)
    }

    /// Re-reads the session state that mirrors store records.
    pub(crate) fn reload(&mut self) {
        self.current_year = store::load(&self.store, RecordKey::CurrentYear.as_str());
        self.active_id = store::load(&self.store, ACTIVE_DYNASTY_KEY);
        self.rankings = store::load_or_default(&self.store, RecordKey::Top25History.as_str());
        self.rankings_dirty = false;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists pending state and hands the store back.
    pub fn close(mut self) -> DynastyResult<S> {
        self.persist()?;
        Ok(self.store)
    }

    pub fn current_year(&self) -> Option<i32> {
        self.current_year
    }

    pub fn require_year(&self) -> DynastyResult<i32> {
        self.current_year.ok_or(DynastyError::NoActiveDynasty)
    }

    pub fn active_dynasty(&self) -> Option<Uuid> {
        self.active_id
    }

    /// Writes in-memory state to the store and flushes it.
    pub fn persist(&mut self) -> DynastyResult<()> {
        if self.rankings_dirty {
            store::save(&mut self.store, RecordKey::Top25History.as_str(), &self.rankings)?;
            self.rankings_dirty = false;
        }
        self.store.flush()
    }

    pub(crate) fn set_current_year(&mut self, year: i32) -> DynastyResult<()> {
        store::save(&mut self.store, RecordKey::CurrentYear.as_str(), &year)?;
        self.current_year = Some(year);
        Ok(())
    }

    // ========================
    // Identity
    // ========================

    pub fn profile(&self) -> CoachProfile {
        store::load_or_default(&self.store, RecordKey::CoachProfile.as_str())
    }

    pub fn set_profile(&mut self, profile: &CoachProfile) -> DynastyResult<()> {
        profile.validate()?;
        store::save(&mut self.store, RecordKey::CoachProfile.as_str(), profile)
    }

    /// Stock directory with the profile's custom replacements applied.
    pub fn teams(&self) -> TeamDirectory {
        self.teams.with_replacements(&self.profile().custom_teams)
    }

    pub fn team_identity(&self) -> TeamIdentity {
        self.teams().identity_for(&self.profile())
    }

    // ========================
    // Rankings
    // ========================

    pub fn rankings(&self) -> &Top25History {
        &self.rankings
    }

    pub fn get_poll(&self, year: i32, week: u8) -> &Poll {
        self.rankings.get_poll(year, week)
    }

    pub fn set_poll(&mut self, year: i32, week: u8, poll: Poll) -> DynastyResult<()> {
        self.rankings.set_poll(year, week, poll)?;
        self.rankings_dirty = true;
        Ok(())
    }

    pub fn set_rank(&mut self, year: i32, week: u8, rank: usize, team: RankedTeam) -> DynastyResult<()> {
        self.rankings.set_rank(year, week, rank, team)?;
        self.rankings_dirty = true;
        Ok(())
    }

    pub fn rank_of(&self, team: &str, year: i32, week: u8) -> Option<usize> {
        self.rankings.rank_of(team, year, week)
    }

    pub fn movement(&self, team: &str, year: i32, week: u8) -> RankMovement {
        self.rankings.movement(team, year, week)
    }
}
