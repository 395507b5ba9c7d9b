//! Season lifecycle
//!
//! A year is `Active` while it is the session's current year and `Finalized`
//! once `end_season` has moved past it. Finalization is one-way.

use crate::error::{DynastyError, DynastyResult};
use crate::models::{blank_schedule, Game, GameResult, YearRecord, SCHEDULE_WEEKS};
use crate::session::DynastySession;
use crate::stats::{calculate_stats, YearStats};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonPhase {
    /// Current year: schedule mutable, stats always live
    Active,
    /// Past year: ledger entry frozen at season end
    Finalized,
}

/// Next week to be played: one past the last week with any result.
pub fn active_week(schedule: &[Game]) -> u8 {
    schedule
        .iter()
        .rev()
        .find(|game| game.result != GameResult::NotPlayed)
        .map(|game| (usize::from(game.week) + 1).min(SCHEDULE_WEEKS) as u8)
        .unwrap_or(0)
}

/// Career totals over finalized seasons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CareerTotals {
    pub seasons_played: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub championships: u32,
}

impl CareerTotals {
    /// Totals `records` that precede `current_year`; with no current year every record counts.
    pub fn from_records(records: &[YearRecord], school: &str, current_year: Option<i32>) -> Self {
        records
            .iter()
            .filter(|record| current_year.map_or(true, |current| record.year < current))
            .fold(Self::default(), |mut totals, record| {
                totals.seasons_played += 1;
                if let Some((wins, losses)) = record.record() {
                    totals.total_wins += wins;
                    totals.total_losses += losses;
                }
                if record.won_title(school) {
                    totals.championships += 1;
                }
                totals
            })
    }
}

impl<S: RecordStore> DynastySession<S> {
    /// `None` before a dynasty is loaded and for years after the current one.
    pub fn season_phase(&self, year: i32) -> Option<SeasonPhase> {
        let current = self.current_year?;
        match year.cmp(&current) {
            std::cmp::Ordering::Equal => Some(SeasonPhase::Active),
            std::cmp::Ordering::Less => Some(SeasonPhase::Finalized),
            std::cmp::Ordering::Greater => None,
        }
    }

    /// Active week of the current season.
    pub fn current_week(&self) -> DynastyResult<u8> {
        let year = self.require_year()?;
        Ok(active_week(&self.get_schedule(year)))
    }

    /// Finalizes `year` and advances the dynasty to `year + 1`.
    ///
    /// The ledger entry gets the live stats, the final schedule and copies of
    /// the year's recruits, transfers and awards. Postseason fields already
    /// entered by the user are kept.
    pub fn end_season(&mut self, year: i32) -> DynastyResult<YearRecord> {
        let current = self.require_year()?;
        if year != current {
            return Err(DynastyError::SeasonNotActive { year, current });
        }

        let schedule = self.get_schedule(year);
        let stats = calculate_stats(&schedule, &self.team_identity(), &self.teams());

        let record = YearRecord {
            year,
            overall_record: stats.overall_record(),
            conference_record: stats.conference_record(),
            points_for: stats.points_scored,
            points_against: stats.points_against,
            schedule,
            recruits: self.recruits().into_iter().filter(|r| r.recruited_year == year).collect(),
            transfers: self.transfers().into_iter().filter(|t| t.transfer_year == year).collect(),
            awards: self.awards().into_iter().filter(|a| a.year == year).collect(),
            ..self.get_year_record(year)
        };
        self.set_year_record(year, record.clone())?;
        self.cache_year_stats(year, &stats)?;

        let next = year + 1;
        self.set_schedule(next, blank_schedule())?;
        self.cache_year_stats(next, &YearStats::default())?;
        self.rankings.seed_year(next);
        self.rankings_dirty = true;

        self.set_current_year(next)?;
        self.persist()?;

        log::info!("Season {} finalized at {}, now in {}", year, record.overall_record, next);
        Ok(record)
    }

    /// Totals over the finalized seasons of the loaded dynasty.
    pub fn career_totals(&self) -> CareerTotals {
        CareerTotals::from_records(
            &self.all_year_records(),
            &self.profile().school_name,
            self.current_year,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoachProfile, Location, Recruit};
    use crate::store::MemoryStore;
    use crate::teams::TeamDirectory;

    fn session_at(year: i32) -> DynastySession<MemoryStore> {
        let mut session =
            DynastySession::open(MemoryStore::new(), TeamDirectory::builtin().clone()).unwrap();
        session.set_profile(&CoachProfile::new("Coach", "Georgia")).unwrap();
        session.set_current_year(year).unwrap();
        session
    }

    #[test]
    fn test_active_week() {
        let mut schedule = blank_schedule();
        assert_eq!(active_week(&schedule), 0);

        schedule[0].result = GameResult::Win;
        schedule[3].result = GameResult::Bye;
        assert_eq!(active_week(&schedule), 4);

        schedule[20].result = GameResult::Loss;
        assert_eq!(active_week(&schedule), 21);
    }

    #[test]
    fn test_season_phase() {
        let session = session_at(2026);
        assert_eq!(session.season_phase(2026), Some(SeasonPhase::Active));
        assert_eq!(session.season_phase(2025), Some(SeasonPhase::Finalized));
        assert_eq!(session.season_phase(2027), None);
    }

    #[test]
    fn test_end_season_rejects_other_years() {
        let mut session = session_at(2025);
        assert!(matches!(
            session.end_season(2024),
            Err(DynastyError::SeasonNotActive { year: 2024, current: 2025 })
        ));
    }

    #[test]
    fn test_end_season_freezes_year_slices() {
        let mut session = session_at(2025);
        session
            .set_game(2025, Game::new(0, Location::Home, "Alabama", GameResult::Win, "27-24"))
            .unwrap();
        session.add_recruit(Recruit { name: "A".into(), recruited_year: 2025, ..Default::default() }).unwrap();
        session.add_recruit(Recruit { name: "B".into(), recruited_year: 2026, ..Default::default() }).unwrap();

        let mut entered = YearRecord::new(2025);
        entered.bowl_game = "Sugar Bowl".into();
        session.set_year_record(2025, entered).unwrap();

        let record = session.end_season(2025).unwrap();

        assert_eq!(record.overall_record, "1-0");
        assert_eq!(record.conference_record, "1-0");
        assert_eq!(record.bowl_game, "Sugar Bowl");
        assert_eq!(record.recruits.len(), 1);
        assert_eq!(session.current_year(), Some(2026));
        assert_eq!(session.cached_year_stats(2026), Some(YearStats::default()));
        assert!(session.rankings().has_year(2026));

        session.add_recruit(Recruit { name: "C".into(), recruited_year: 2025, ..Default::default() }).unwrap();
        assert_eq!(session.get_year_record(2025).recruits.len(), 1);
    }

    #[test]
    fn test_career_totals_skip_active_year() {
        let mut session = session_at(2027);
        for (year, record, champion) in [(2025, "12-1", "Georgia"), (2026, "10-3", "Michigan"), (2027, "3-0", "")] {
            let mut entry = YearRecord::new(year);
            entry.overall_record = record.into();
            entry.national_champion = champion.into();
            session.set_year_record(year, entry).unwrap();
        }

        let totals = session.career_totals();
        assert_eq!(
            totals,
            CareerTotals { seasons_played: 2, total_wins: 22, total_losses: 4, championships: 1 }
        );
    }
}
