use serde::{Deserialize, Serialize};

use super::game::Game;
use super::roster::{Award, DraftedPlayer, Recruit, Transfer};

/// Ledger entry for one season-year.
///
/// Lists are copies taken when the season was finalized, so later edits to
/// the dynasty-wide recruiting or transfer logs never reach back into it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct YearRecord {
    pub year: i32,
    /// "W-L"
    pub overall_record: String,
    pub conference_record: String,
    pub points_for: u32,
    pub points_against: u32,
    pub schedule: Vec<Game>,
    pub bowl_game: String,
    pub bowl_result: String,
    pub national_champion: String,
    pub heisman: String,
    pub recruiting_class_rank: String,
    pub final_ranking: String,
    pub conference_finish: String,
    pub players_drafted: Vec<DraftedPlayer>,
    pub recruits: Vec<Recruit>,
    pub transfers: Vec<Transfer>,
    pub awards: Vec<Award>,
}

impl YearRecord {
    pub fn new(year: i32) -> Self {
        Self { year, ..Self::default() }
    }

    /// Wins and losses parsed from `overall_record`.
    pub fn record(&self) -> Option<(u32, u32)> {
        parse_record(&self.overall_record)
    }

    pub fn won_title(&self, school: &str) -> bool {
        let champion = self.national_champion.trim();
        !champion.is_empty() && champion.eq_ignore_ascii_case(school.trim())
    }
}

/// Parses "W-L" or "W-L-T"; ties are ignored.
pub fn parse_record(record: &str) -> Option<(u32, u32)> {
    let mut parts = record.trim().split('-');
    let wins = parts.next()?.trim().parse().ok()?;
    let losses = parts.next()?.trim().parse().ok()?;
    Some((wins, losses))
}
