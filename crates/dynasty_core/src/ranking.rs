//! Week-indexed Top 25 history
//!
//! Polls are stored sparsely: a week only has an entry when the user changed
//! the poll that week. A missing `(year, week)` means "unchanged since the
//! latest earlier week with an entry", so reads fall back to the nearest
//! predecessor through an ordered range query.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{DynastyError, DynastyResult};

pub const POLL_SIZE: usize = 25;

/// Highest poll week: 0 is preseason, 21 the final poll after the bowls.
pub const MAX_POLL_WEEK: u8 = 21;

static EMPTY_POLL: Lazy<Poll> = Lazy::new(Poll::empty);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RankedTeam {
    /// Empty name marks an unranked slot
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
}

impl RankedTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), record: None }
    }

    pub fn with_record(mut self, record: impl Into<String>) -> Self {
        self.record = Some(record.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// One weekly ranking. Rank = position + 1.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Poll(Vec<RankedTeam>);

impl Default for Poll {
    fn default() -> Self {
        Self::empty()
    }
}

impl Poll {
    /// All 25 slots unranked.
    pub fn empty() -> Self {
        Self(vec![RankedTeam::default(); POLL_SIZE])
    }

    /// Builds a poll from the top down, padding the tail with unranked slots.
    pub fn new(teams: Vec<RankedTeam>) -> DynastyResult<Self> {
        if teams.len() > POLL_SIZE {
            return Err(DynastyError::PollTooLarge { found: teams.len(), max: POLL_SIZE });
        }
        let mut teams = teams;
        teams.resize(POLL_SIZE, RankedTeam::default());
        Ok(Self(teams))
    }

    pub fn from_names<I, S>(names: I) -> DynastyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(RankedTeam::new).collect())
    }

    pub fn teams(&self) -> &[RankedTeam] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(RankedTeam::is_empty)
    }

    /// 1-based rank of the first slot naming `team`.
    pub fn rank_of(&self, team: &str) -> Option<usize> {
        let team = team.trim();
        if team.is_empty() {
            return None;
        }
        self.0.iter().position(|slot| slot.name.trim().eq_ignore_ascii_case(team)).map(|idx| idx + 1)
    }

    pub fn at(&self, rank: usize) -> Option<&RankedTeam> {
        rank.checked_sub(1).and_then(|idx| self.0.get(idx))
    }

    /// Ranked slots as `(rank, team)`.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &RankedTeam)> {
        self.0.iter().enumerate().filter(|(_, team)| !team.is_empty()).map(|(idx, team)| (idx + 1, team))
    }

    pub fn set(&mut self, rank: usize, team: RankedTeam) -> DynastyResult<()> {
        if rank == 0 || rank > self.0.len() {
            return Err(DynastyError::RankOutOfRange { rank, max: POLL_SIZE });
        }
        self.0[rank - 1] = team;
        Ok(())
    }
}

/// Week-over-week change of one team's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMovement {
    /// Ranked this week, not the week before
    Entered,
    Up(usize),
    Down(usize),
    Unchanged,
    DroppedOut,
    Unranked,
}

/// Sparse `year → week → poll` map.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Top25History {
    years: BTreeMap<i32, BTreeMap<u8, Poll>>,
}

impl Top25History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective poll at `week`: the entry at `week` or the latest earlier one,
    /// or the all-empty poll when the year has nothing up to that week.
    pub fn get_poll(&self, year: i32, week: u8) -> &Poll {
        self.years
            .get(&year)
            .and_then(|weeks| weeks.range(..=week).next_back())
            .map(|(_, poll)| poll)
            .unwrap_or(&*EMPTY_POLL)
    }

    /// Overwrites exactly the `(year, week)` entry.
    ///
    /// Not a merge: to change one slot, read the effective poll, edit it and
    /// write the whole poll back (see [`Top25History::set_rank`]).
    pub fn set_poll(&mut self, year: i32, week: u8, poll: Poll) -> DynastyResult<()> {
        check_week(week)?;
        self.years.entry(year).or_default().insert(week, poll);
        Ok(())
    }

    /// Puts `team` at `rank` in the effective poll of `(year, week)` and stores the result there.
    pub fn set_rank(&mut self, year: i32, week: u8, rank: usize, team: RankedTeam) -> DynastyResult<()> {
        check_week(week)?;
        let mut poll = self.get_poll(year, week).clone();
        poll.set(rank, team)?;
        self.set_poll(year, week, poll)
    }

    pub fn rank_of(&self, team: &str, year: i32, week: u8) -> Option<usize> {
        self.get_poll(year, week).rank_of(team)
    }

    pub fn movement(&self, team: &str, year: i32, week: u8) -> RankMovement {
        let current = self.rank_of(team, year, week);
        let previous = week.checked_sub(1).and_then(|prev| self.rank_of(team, year, prev));

        match (current, previous) {
            (Some(_), None) => RankMovement::Entered,
            (Some(now), Some(before)) if now < before => RankMovement::Up(before - now),
            (Some(now), Some(before)) if now > before => RankMovement::Down(now - before),
            (Some(_), Some(_)) => RankMovement::Unchanged,
            (None, Some(_)) => RankMovement::DroppedOut,
            (None, None) => RankMovement::Unranked,
        }
    }

    /// Starts a season's history with an empty preseason poll. Existing entries are kept.
    pub fn seed_year(&mut self, year: i32) {
        self.years.entry(year).or_default().entry(0).or_insert_with(Poll::empty);
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// Weeks of `year` that carry an explicit entry.
    pub fn weeks(&self, year: i32) -> Vec<u8> {
        self.years.get(&year).map(|weeks| weeks.keys().copied().collect()).unwrap_or_default()
    }
}

fn check_week(week: u8) -> DynastyResult<()> {
    if week > MAX_POLL_WEEK {
        return Err(DynastyError::WeekOutOfRange { week, max: MAX_POLL_WEEK });
    }
    Ok(())
}
