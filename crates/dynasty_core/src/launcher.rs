//! Save slots
//!
//! The launcher keeps every dynasty as a snapshot under `dynasty_<id>` and an
//! index of [`DynastySummary`] rows under `dynasties`. Only one dynasty at a
//! time occupies the active record keys. Summaries are always rebuilt from a
//! snapshot, never edited on their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DynastyError, DynastyResult};
use crate::lifecycle::CareerTotals;
use crate::models::{blank_schedule, CoachProfile};
use crate::ranking::Top25History;
use crate::session::DynastySession;
use crate::snapshot::DynastySnapshot;
use crate::stats::YearStats;
use crate::store::keys::{saved_dynasty_key, ACTIVE_DYNASTY_KEY, DYNASTIES_KEY};
use crate::store::{self, RecordStore};

/// One row of the save-slot list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DynastySummary {
    pub id: Uuid,
    pub coach_name: String,
    pub school_name: String,
    pub current_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub last_played: DateTime<Utc>,
    pub seasons_played: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub championships: u32,
}

impl DynastySummary {
    pub fn from_snapshot(id: Uuid, snapshot: &DynastySnapshot, created_at: DateTime<Utc>) -> Self {
        let profile = snapshot.profile().unwrap_or_default();
        let current_year = snapshot.current_year();
        let totals =
            CareerTotals::from_records(&snapshot.year_records(), &profile.school_name, current_year);

        Self {
            id,
            coach_name: profile.coach_name,
            school_name: profile.school_name,
            current_year,
            created_at,
            last_played: snapshot.exported_at,
            seasons_played: totals.seasons_played,
            total_wins: totals.total_wins,
            total_losses: totals.total_losses,
            championships: totals.championships,
        }
    }

    pub fn display_text(&self) -> String {
        let year = self.current_year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());
        let mut text = format!(
            "{} ({}) - {} | {} seasons, {}-{}",
            self.school_name,
            year,
            self.coach_name,
            self.seasons_played,
            self.total_wins,
            self.total_losses
        );
        if self.championships > 0 {
            text.push_str(&format!(", {} titles", self.championships));
        }
        text
    }
}

impl<S: RecordStore> DynastySession<S> {
    /// Saved dynasties, most recently played first.
    pub fn list_dynasties(&self) -> Vec<DynastySummary> {
        let mut summaries: Vec<DynastySummary> = store::load_or_default(&self.store, DYNASTIES_KEY);
        summaries.sort_by(|a, b| b.last_played.cmp(&a.last_played));
        summaries
    }

    fn put_summaries(&mut self, summaries: &[DynastySummary]) -> DynastyResult<()> {
        store::save(&mut self.store, DYNASTIES_KEY, summaries)
    }

    fn check_school_free(&self, profile: &CoachProfile) -> DynastyResult<()> {
        if self.list_dynasties().iter().any(|summary| profile.same_school(&summary.school_name)) {
            return Err(DynastyError::DuplicateSchool { school: profile.school_name.trim().to_string() });
        }
        Ok(())
    }

    /// Saves the loaded dynasty, if any, and clears the active keys.
    pub fn return_to_launch(&mut self) -> DynastyResult<()> {
        if self.active_id.is_some() {
            self.save_dynasty()?;
        }
        self.wipe_active()?;
        self.store.remove(ACTIVE_DYNASTY_KEY)?;
        self.reload();
        self.store.flush()
    }

    /// Starts a new dynasty at `start_year` and makes it the active one.
    pub fn create_dynasty(&mut self, profile: CoachProfile, start_year: i32) -> DynastyResult<Uuid> {
        profile.validate()?;
        self.check_school_free(&profile)?;
        self.return_to_launch()?;

        self.set_profile(&profile)?;
        self.set_current_year(start_year)?;
        self.set_schedule(start_year, blank_schedule())?;
        self.cache_year_stats(start_year, &YearStats::default())?;
        self.rankings = Top25History::new();
        self.rankings.seed_year(start_year);
        self.rankings_dirty = true;

        let id = Uuid::new_v4();
        self.activate(id)?;
        self.save_dynasty()?;

        log::info!("Created dynasty {} for {} at {}", id, profile.school_name, start_year);
        Ok(id)
    }

    fn activate(&mut self, id: Uuid) -> DynastyResult<()> {
        store::save(&mut self.store, ACTIVE_DYNASTY_KEY, &id)?;
        self.active_id = Some(id);
        Ok(())
    }

    /// Exports the active dynasty into its save slot and refreshes its summary.
    pub fn save_dynasty(&mut self) -> DynastyResult<DynastySummary> {
        let id = self.active_id.ok_or(DynastyError::NoActiveDynasty)?;
        let snapshot = self.export_snapshot()?;
        self.store_slot(id, &snapshot)
    }

    fn store_slot(&mut self, id: Uuid, snapshot: &DynastySnapshot) -> DynastyResult<DynastySummary> {
        let mut summaries = self.list_dynasties();
        let created_at = summaries
            .iter()
            .find(|summary| summary.id == id)
            .map(|summary| summary.created_at)
            .unwrap_or(snapshot.exported_at);
        let summary = DynastySummary::from_snapshot(id, snapshot, created_at);

        store::save(&mut self.store, &saved_dynasty_key(id), snapshot)?;
        summaries.retain(|existing| existing.id != id);
        summaries.push(summary.clone());
        self.put_summaries(&summaries)?;
        self.store.flush()?;

        log::debug!("Saved dynasty {} ({} records)", id, snapshot.dynasty_data.len());
        Ok(summary)
    }

    /// Saves the current dynasty and loads `id` into the active keys.
    pub fn load_dynasty(&mut self, id: Uuid) -> DynastyResult<()> {
        let snapshot: DynastySnapshot = store::load(&self.store, &saved_dynasty_key(id))
            .ok_or(DynastyError::UnknownDynasty { id })?;

        if self.active_id.is_some_and(|active| active != id) {
            self.save_dynasty()?;
        }

        self.restore_from_snapshot(snapshot)?;
        self.activate(id)?;
        self.save_dynasty()?;

        log::info!("Loaded dynasty {}", id);
        Ok(())
    }

    pub fn delete_dynasty(&mut self, id: Uuid) -> DynastyResult<()> {
        let mut summaries = self.list_dynasties();
        let before = summaries.len();
        summaries.retain(|summary| summary.id != id);
        if summaries.len() == before && !self.store.contains(&saved_dynasty_key(id)) {
            return Err(DynastyError::UnknownDynasty { id });
        }

        if self.active_id == Some(id) {
            self.wipe_active()?;
            self.store.remove(ACTIVE_DYNASTY_KEY)?;
            self.reload();
        }

        self.store.remove(&saved_dynasty_key(id))?;
        self.put_summaries(&summaries)?;
        self.store.flush()?;

        log::info!("Deleted dynasty {}", id);
        Ok(())
    }

    /// Rolls the active dynasty back to `snapshot` and refreshes its save slot.
    ///
    /// The document must validate and belong to the active dynasty's school.
    /// A different school goes through [`Self::import_dynasty`] instead.
    pub fn restore_active(&mut self, snapshot: DynastySnapshot) -> DynastyResult<DynastySummary> {
        let id = self.active_id.ok_or(DynastyError::NoActiveDynasty)?;
        let incoming = self.validate_import(&snapshot)?;
        let active = self.profile();
        if !incoming.same_school(&active.school_name) {
            return Err(DynastyError::SchoolMismatch {
                active: active.school_name,
                found: incoming.school_name,
            });
        }

        self.restore_from_snapshot(snapshot)?;
        let summary = self.save_dynasty()?;

        log::info!("Restored dynasty {} from snapshot", id);
        Ok(summary)
    }

    /// Adds `snapshot` as a new save slot and makes it the active dynasty.
    ///
    /// Nothing is written unless the document validates and its school has
    /// no save slot yet.
    pub fn import_dynasty(&mut self, snapshot: DynastySnapshot) -> DynastyResult<Uuid> {
        let profile = self.validate_import(&snapshot)?;
        self.check_school_free(&profile)?;

        if self.active_id.is_some() {
            self.save_dynasty()?;
        }

        let id = Uuid::new_v4();
        self.store_slot(id, &snapshot)?;
        self.restore_from_snapshot(snapshot)?;
        self.activate(id)?;
        self.store.flush()?;

        log::info!("Imported dynasty {} for {}", id, profile.school_name);
        Ok(id)
    }
}
