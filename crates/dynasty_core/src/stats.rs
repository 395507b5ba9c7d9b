//! Schedule-derived season statistics
//!
//! Stats are always recomputed from the schedule. A stored [`YearStats`] is a
//! cache and is never trusted over a fresh [`calculate_stats`] call.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{Game, GameResult};
use crate::teams::{TeamDirectory, TeamIdentity};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct YearStats {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub conference_wins: u32,
    pub conference_losses: u32,
    pub conference_ties: u32,
    pub points_scored: u32,
    pub points_against: u32,
    pub games_played: u32,
}

impl YearStats {
    /// "W-L", with "-T" appended only when ties happened.
    pub fn overall_record(&self) -> String {
        format_record(self.wins, self.losses, self.ties)
    }

    pub fn conference_record(&self) -> String {
        format_record(self.conference_wins, self.conference_losses, self.conference_ties)
    }

    pub fn point_differential(&self) -> i64 {
        i64::from(self.points_scored) - i64::from(self.points_against)
    }
}

fn format_record(wins: u32, losses: u32, ties: u32) -> String {
    if ties > 0 {
        format!("{wins}-{losses}-{ties}")
    } else {
        format!("{wins}-{losses}")
    }
}

/// Win/loss, conference split and points for `team` over `schedule`.
///
/// Games without an opponent, against the BYE sentinel, or marked bye /
/// not played are skipped. Conference membership of both sides goes through
/// `teams`, so custom replacements decide what counts as a conference game.
/// Missing or malformed scores add no points and never abort the pass.
pub fn calculate_stats(schedule: &[Game], team: &TeamIdentity, teams: &TeamDirectory) -> YearStats {
    let mut stats = YearStats::default();

    for game in schedule.iter().filter(|game| game.counts()) {
        let conference_game = team.shares_conference(&teams.resolve(&game.opponent));

        match game.result {
            GameResult::Win => {
                stats.wins += 1;
                if conference_game {
                    stats.conference_wins += 1;
                }
            }
            GameResult::Loss => {
                stats.losses += 1;
                if conference_game {
                    stats.conference_losses += 1;
                }
            }
            GameResult::Tie => {
                stats.ties += 1;
                if conference_game {
                    stats.conference_ties += 1;
                }
            }
            GameResult::Bye | GameResult::NotPlayed => continue,
        }
        stats.games_played += 1;

        if let Some((own, opp)) = game.points() {
            stats.points_scored = stats.points_scored.saturating_add(own);
            stats.points_against = stats.points_against.saturating_add(opp);
        }
    }

    stats
}
