#![allow(dead_code)]

use dynasty_core::{
    Award, CoachProfile, DynastySession, Game, GameResult, Location, MemoryStore, Poll,
    RankedTeam, Recruit, TeamDirectory, Transfer, TransferDirection, YearRecord,
};

pub const SCHOOL: &str = "Oregon";
pub const START_YEAR: i32 = 2025;

pub fn new_session() -> DynastySession<MemoryStore> {
    DynastySession::open(MemoryStore::new(), TeamDirectory::builtin().clone())
        .expect("empty store opens")
}

/// A dynasty one season in: a finalized 2025 with a played schedule, polls
/// for two weeks, and recruiting and transfer entries.
pub fn populated_session() -> DynastySession<MemoryStore> {
    let mut session = new_session();
    session
        .create_dynasty(CoachProfile::new("Dan Lanning", SCHOOL).with_conference("Big Ten"), START_YEAR)
        .expect("dynasty created");

    let games = [
        Game::new(0, Location::Home, "Idaho", GameResult::Win, "24-14"),
        Game::new(1, Location::Home, "Boise State", GameResult::Win, "37-34"),
        Game::new(2, Location::Away, "Oregon State", GameResult::Win, "7-49"),
        Game::new(3, Location::Home, "", GameResult::Bye, ""),
        Game::new(4, Location::Away, "UCLA", GameResult::Win, "13-34"),
        Game::new(5, Location::Home, "Ohio State", GameResult::Loss, "31-32"),
    ];
    for game in games {
        session.set_game(START_YEAR, game).expect("game stored");
    }

    session
        .set_poll(START_YEAR, 0, Poll::from_names(["Georgia", "Ohio State", "Oregon"]).unwrap())
        .unwrap();
    session
        .set_rank(START_YEAR, 6, 3, RankedTeam::new(SCHOOL).with_record("5-1"))
        .unwrap();

    session
        .add_recruit(Recruit {
            name: "Five Star QB".into(),
            position: "QB".into(),
            stars: 5,
            recruited_year: START_YEAR,
            ..Default::default()
        })
        .unwrap();
    session
        .add_transfer(Transfer {
            name: "Portal WR".into(),
            position: "WR".into(),
            direction: TransferDirection::Incoming,
            school: "Washington".into(),
            transfer_year: START_YEAR,
            ..Default::default()
        })
        .unwrap();
    session
        .add_award(Award { player_name: "Five Star QB".into(), award: "Freshman AA".into(), year: START_YEAR, ..Default::default() })
        .unwrap();

    let mut record = YearRecord::new(START_YEAR);
    record.bowl_game = "Rose Bowl".into();
    session.set_year_record(START_YEAR, record).unwrap();

    session
}
