use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DynastyError, DynastyResult};

/// Regular season, conference championship and bowl slots.
pub const SCHEDULE_WEEKS: usize = 21;

/// Opponent sentinel some schedules use instead of an empty slot.
pub const BYE_OPPONENT: &str = "BYE";

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Location {
    #[default]
    Home,
    Away,
    Neutral,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
    #[serde(rename = "T")]
    Tie,
    #[serde(rename = "Bye")]
    Bye,
    #[default]
    #[serde(rename = "N/A")]
    NotPlayed,
}

/// One weekly slot of a season schedule.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Game {
    pub id: Uuid,
    pub week: u8,
    pub location: Location,
    pub opponent: String,
    pub result: GameResult,
    /// "A-B" as typed by the user, may be empty
    pub score: String,
}

impl Game {
    pub fn unplayed(week: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            week,
            location: Location::Home,
            opponent: String::new(),
            result: GameResult::NotPlayed,
            score: String::new(),
        }
    }

    pub fn new(
        week: u8,
        location: Location,
        opponent: impl Into<String>,
        result: GameResult,
        score: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            week,
            location,
            opponent: opponent.into(),
            result,
            score: score.into(),
        }
    }

    pub fn has_opponent(&self) -> bool {
        let opponent = self.opponent.trim();
        !opponent.is_empty() && !opponent.eq_ignore_ascii_case(BYE_OPPONENT)
    }

    /// True when the game contributes to any derived counter.
    pub fn counts(&self) -> bool {
        self.has_opponent() && !matches!(self.result, GameResult::NotPlayed | GameResult::Bye)
    }

    /// Returns `(own, opponent)` points, or `None` when the score is missing or malformed.
    ///
    /// Away scores are written opponent first. When that orientation contradicts
    /// the recorded result the pair is swapped, so a loss never shows more points
    /// scored than allowed.
    pub fn points(&self) -> Option<(u32, u32)> {
        let (first, second) = parse_score(&self.score)?;
        let (own, opp) = match self.location {
            Location::Away => (second, first),
            Location::Home | Location::Neutral => (first, second),
        };

        let contradicts = match self.result {
            GameResult::Win => own < opp,
            GameResult::Loss => own > opp,
            _ => false,
        };

        Some(if contradicts { (opp, own) } else { (own, opp) })
    }
}

/// Parses an `"A-B"` score. Whitespace around either number is ignored.
pub fn parse_score(score: &str) -> Option<(u32, u32)> {
    let (a, b) = score.trim().split_once('-')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

/// A fresh season: every week unplayed, no opponents.
pub fn blank_schedule() -> Vec<Game> {
    (0..SCHEDULE_WEEKS as u8).map(Game::unplayed).collect()
}

/// Re-indexes weeks by position and clears results of empty slots.
pub fn normalize_schedule(mut games: Vec<Game>) -> DynastyResult<Vec<Game>> {
    if games.len() != SCHEDULE_WEEKS {
        return Err(DynastyError::InvalidScheduleLength {
            expected: SCHEDULE_WEEKS,
            found: games.len(),
        });
    }

    for (idx, game) in games.iter_mut().enumerate() {
        game.week = idx as u8;
        if game.opponent.trim().is_empty() {
            game.result = GameResult::NotPlayed;
        }
        if game.id.is_nil() {
            game.id = Uuid::new_v4();
        }
    }

    Ok(games)
}
