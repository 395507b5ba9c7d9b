//! Season ledger and per-year records
//!
//! Schedules live under `schedule_<year>`, the ledger under `yearRecords`
//! and the stats cache under `yearStats_<year>`. Every read applies its own
//! lazy default, so a year that was never touched reads as blank.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DynastyError, DynastyResult};
use crate::models::{
    blank_schedule, normalize_schedule, Award, Game, Player, PlayerStatLine, Recruit, Transfer,
    Trophy, YearRecord, SCHEDULE_WEEKS,
};
use crate::lifecycle::SeasonPhase;
use crate::session::DynastySession;
use crate::stats::{calculate_stats, YearStats};
use crate::store::keys::{schedule_key, year_stats_key};
use crate::store::{self, RecordKey, RecordStore};

/// Cached stats of one year next to a fresh recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsCheck {
    pub year: i32,
    pub cached: Option<YearStats>,
    pub live: YearStats,
}

impl StatsCheck {
    /// True when a cache exists and differs from the schedule.
    pub fn drifted(&self) -> bool {
        self.cached.is_some_and(|cached| cached != self.live)
    }
}

impl<S: RecordStore> DynastySession<S> {
    // ========================
    // Schedules
    // ========================

    /// Schedule of `year`, or a blank one if none is stored.
    pub fn get_schedule(&self, year: i32) -> Vec<Game> {
        let key = schedule_key(year);
        match store::load::<Vec<Game>>(&self.store, &key) {
            Some(games) if games.len() == SCHEDULE_WEEKS => games,
            Some(games) => {
                log::warn!("Schedule '{}' has {} weeks, using a blank schedule", key, games.len());
                blank_schedule()
            }
            None => blank_schedule(),
        }
    }

    pub fn set_schedule(&mut self, year: i32, games: Vec<Game>) -> DynastyResult<()> {
        let games = normalize_schedule(games)?;
        store::save(&mut self.store, &schedule_key(year), &games)
    }

    /// Replaces the slot at `game.week`.
    pub fn set_game(&mut self, year: i32, game: Game) -> DynastyResult<()> {
        let last_week = (SCHEDULE_WEEKS - 1) as u8;
        if game.week > last_week {
            return Err(DynastyError::WeekOutOfRange { week: game.week, max: last_week });
        }

        let mut schedule = self.get_schedule(year);
        let week = usize::from(game.week);
        schedule[week] = game;
        self.set_schedule(year, schedule)
    }

    // ========================
    // Year records
    // ========================

    /// All ledger entries, ascending by year.
    pub fn all_year_records(&self) -> Vec<YearRecord> {
        let mut records: Vec<YearRecord> =
            store::load_or_default(&self.store, RecordKey::YearRecords.as_str());
        records.sort_by_key(|record| record.year);
        records
    }

    /// Ledger entry for `year`, defaulted if the year has none yet.
    pub fn get_year_record(&self, year: i32) -> YearRecord {
        let records: Vec<YearRecord> =
            store::load_or_default(&self.store, RecordKey::YearRecords.as_str());
        records
            .into_iter()
            .find(|record| record.year == year)
            .unwrap_or_else(|| YearRecord::new(year))
    }

    /// Inserts or replaces the entry for `year`. The record's own `year` is overwritten.
    pub fn set_year_record(&mut self, year: i32, mut record: YearRecord) -> DynastyResult<()> {
        record.year = year;

        let mut records: Vec<YearRecord> =
            store::load_or_default(&self.store, RecordKey::YearRecords.as_str());
        match records.iter_mut().find(|existing| existing.year == year) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        store::save(&mut self.store, RecordKey::YearRecords.as_str(), &records)
    }

    // ========================
    // Stats
    // ========================

    /// Stats of `year` recomputed from its schedule with the current team mapping.
    pub fn live_stats(&self, year: i32) -> YearStats {
        calculate_stats(&self.get_schedule(year), &self.team_identity(), &self.teams())
    }

    pub fn cached_year_stats(&self, year: i32) -> Option<YearStats> {
        store::load(&self.store, &year_stats_key(year))
    }

    /// Cached stats of a finalized year when present. Any other year is live.
    pub fn year_stats(&self, year: i32) -> YearStats {
        match self.season_phase(year) {
            Some(SeasonPhase::Finalized) => {
                self.cached_year_stats(year).unwrap_or_else(|| self.live_stats(year))
            }
            _ => self.live_stats(year),
        }
    }

    pub(crate) fn cache_year_stats(&mut self, year: i32, stats: &YearStats) -> DynastyResult<()> {
        store::save(&mut self.store, &year_stats_key(year), stats)
    }

    pub fn verify_year_stats(&self, year: i32) -> StatsCheck {
        let check = StatsCheck { year, cached: self.cached_year_stats(year), live: self.live_stats(year) };
        if check.drifted() {
            log::warn!("Cached stats for {} differ from the schedule", year);
        }
        check
    }

    // ========================
    // Roster and logs
    // ========================

    fn list<T: DeserializeOwned>(&self, key: RecordKey) -> Vec<T> {
        store::load_or_default(&self.store, key.as_str())
    }

    fn set_list<T: Serialize>(&mut self, key: RecordKey, items: &[T]) -> DynastyResult<()> {
        store::save(&mut self.store, key.as_str(), items)
    }

    fn push<T: Serialize + DeserializeOwned>(&mut self, key: RecordKey, item: T) -> DynastyResult<()> {
        let mut items: Vec<T> = self.list(key);
        items.push(item);
        self.set_list(key, &items)
    }

    pub fn players(&self) -> Vec<Player> {
        self.list(RecordKey::Players)
    }

    pub fn set_players(&mut self, players: &[Player]) -> DynastyResult<()> {
        self.set_list(RecordKey::Players, players)
    }

    pub fn add_player(&mut self, player: Player) -> DynastyResult<()> {
        self.push(RecordKey::Players, player)
    }

    pub fn player_stats(&self) -> Vec<PlayerStatLine> {
        self.list(RecordKey::PlayerStats)
    }

    pub fn set_player_stats(&mut self, lines: &[PlayerStatLine]) -> DynastyResult<()> {
        self.set_list(RecordKey::PlayerStats, lines)
    }

    pub fn recruits(&self) -> Vec<Recruit> {
        self.list(RecordKey::AllRecruits)
    }

    pub fn set_recruits(&mut self, recruits: &[Recruit]) -> DynastyResult<()> {
        self.set_list(RecordKey::AllRecruits, recruits)
    }

    pub fn add_recruit(&mut self, recruit: Recruit) -> DynastyResult<()> {
        self.push(RecordKey::AllRecruits, recruit)
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        self.list(RecordKey::AllTransfers)
    }

    pub fn set_transfers(&mut self, transfers: &[Transfer]) -> DynastyResult<()> {
        self.set_list(RecordKey::AllTransfers, transfers)
    }

    pub fn add_transfer(&mut self, transfer: Transfer) -> DynastyResult<()> {
        self.push(RecordKey::AllTransfers, transfer)
    }

    pub fn awards(&self) -> Vec<Award> {
        self.list(RecordKey::AllAwards)
    }

    pub fn set_awards(&mut self, awards: &[Award]) -> DynastyResult<()> {
        self.set_list(RecordKey::AllAwards, awards)
    }

    pub fn add_award(&mut self, award: Award) -> DynastyResult<()> {
        self.push(RecordKey::AllAwards, award)
    }

    pub fn trophies(&self) -> Vec<Trophy> {
        self.list(RecordKey::AllTrophies)
    }

    pub fn add_trophy(&mut self, trophy: Trophy) -> DynastyResult<()> {
        self.push(RecordKey::AllTrophies, trophy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoachProfile, GameResult, Location};
    use crate::store::MemoryStore;
    use crate::teams::TeamDirectory;

    fn session() -> DynastySession<MemoryStore> {
        let mut session =
            DynastySession::open(MemoryStore::new(), TeamDirectory::builtin().clone()).unwrap();
        session.set_profile(&CoachProfile::new("Coach", "Ohio State")).unwrap();
        session
    }

    #[test]
    fn test_missing_schedule_reads_blank() {
        let session = session();
        let schedule = session.get_schedule(2025);
        assert_eq!(schedule.len(), SCHEDULE_WEEKS);
        assert!(schedule.iter().all(|game| game.result == GameResult::NotPlayed));
        assert!(!session.store().contains("schedule_2025"));
    }

    #[test]
    fn test_set_game_keeps_week_index() {
        let mut session = session();
        session
            .set_game(2025, Game::new(4, Location::Away, "Michigan", GameResult::Win, "17-30"))
            .unwrap();

        let schedule = session.get_schedule(2025);
        assert_eq!(schedule[4].opponent, "Michigan");
        assert!(schedule.iter().enumerate().all(|(idx, game)| usize::from(game.week) == idx));

        assert!(matches!(
            session.set_game(2025, Game::unplayed(21)),
            Err(DynastyError::WeekOutOfRange { week: 21, max: 20 })
        ));
    }

    #[test]
    fn test_short_schedule_rejected() {
        let mut session = session();
        let err = session.set_schedule(2025, vec![Game::unplayed(0)]).unwrap_err();
        assert!(matches!(err, DynastyError::InvalidScheduleLength { found: 1, .. }));
    }

    #[test]
    fn test_year_record_upsert() {
        let mut session = session();
        assert_eq!(session.get_year_record(2024), YearRecord::new(2024));

        let mut record = YearRecord::new(0);
        record.bowl_game = "Rose Bowl".into();
        session.set_year_record(2024, record.clone()).unwrap();
        record.bowl_result = "W 28-14".into();
        session.set_year_record(2024, record).unwrap();
        session.set_year_record(2023, YearRecord::new(2023)).unwrap();

        let all = session.all_year_records();
        assert_eq!(all.iter().map(|r| r.year).collect::<Vec<_>>(), vec![2023, 2024]);
        assert_eq!(all[1].bowl_result, "W 28-14");
        assert_eq!(session.get_year_record(2024).bowl_game, "Rose Bowl");
    }

    #[test]
    fn test_stats_cache_drift_is_reported() {
        let mut session = session();
        session
            .set_game(2025, Game::new(0, Location::Home, "Michigan", GameResult::Win, "42-3"))
            .unwrap();
        assert_eq!(session.verify_year_stats(2025).cached, None);

        session.cache_year_stats(2025, &YearStats::default()).unwrap();

        let check = session.verify_year_stats(2025);
        assert!(check.drifted());
        assert_eq!(check.live.conference_wins, 1);
        assert_eq!(session.year_stats(2025), check.live);
    }

    #[test]
    fn test_active_year_stats_ignore_zeroed_cache() {
        let mut session = session();
        session.set_current_year(2026).unwrap();
        session.cache_year_stats(2025, &YearStats { wins: 9, ..Default::default() }).unwrap();
        session.cache_year_stats(2026, &YearStats::default()).unwrap();
        session
            .set_game(2026, Game::new(0, Location::Home, "Michigan", GameResult::Win, "35-3"))
            .unwrap();

        let active = session.year_stats(2026);
        assert_eq!((active.wins, active.points_scored, active.points_against), (1, 35, 3));
        assert_eq!(session.year_stats(2025).wins, 9);
    }

    #[test]
    fn test_list_accessors() {
        let mut session = session();
        session.add_recruit(Recruit { name: "QB One".into(), recruited_year: 2025, ..Default::default() }).unwrap();
        session.add_recruit(Recruit { name: "WR Two".into(), recruited_year: 2025, ..Default::default() }).unwrap();
        session.add_trophy(Trophy { name: "Big Ten Champions".into(), year: 2025, ..Default::default() }).unwrap();

        assert_eq!(session.recruits().len(), 2);
        assert_eq!(session.trophies()[0].name, "Big Ten Champions");
        assert!(session.players().is_empty());
    }
}
