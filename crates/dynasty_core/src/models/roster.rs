//! Roster and off-field lists kept by UI collaborators.
//!
//! The engine only needs the season tag on recruits, transfers and awards so
//! it can freeze a year's slice into the ledger at season end. The rest of each
//! record is carried verbatim.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    /// FR, SO, JR, SR, with an RS prefix for redshirts
    pub class_year: String,
    pub jersey_number: Option<u8>,
    pub overall: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStatLine {
    pub player_id: Uuid,
    pub year: i32,
    pub games_played: u32,
    pub passing_yards: u32,
    pub rushing_yards: u32,
    pub receiving_yards: u32,
    pub touchdowns: u32,
    pub tackles: u32,
    pub interceptions: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Recruit {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub stars: u8,
    pub state: String,
    pub recruited_year: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferDirection {
    #[default]
    Incoming,
    Outgoing,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Transfer {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub stars: u8,
    pub direction: TransferDirection,
    /// Other school in the move
    pub school: String,
    pub transfer_year: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Award {
    pub id: Uuid,
    pub player_name: String,
    pub award: String,
    pub year: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Trophy {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftedPlayer {
    pub player_name: String,
    pub position: String,
    pub round: u8,
    pub pick: Option<u16>,
    pub nfl_team: String,
}
