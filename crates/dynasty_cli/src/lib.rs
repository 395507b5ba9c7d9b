//! Dynasty CLI Library
//!
//! Config resolution, session opening and plain-text rendering used by the
//! `dynasty` binary.

use std::path::Path;

use anyhow::{bail, Context, Result};
use dynasty_core::store::StoreImageInfo;
use dynasty_core::{
    open_session, DynastySession, DynastySnapshot, DynastySummary, EngineConfig, FileStore, Game,
    GameResult, Location, Poll, RankMovement, RankedTeam, Top25History, YearStats,
};

pub type Session = DynastySession<FileStore>;

/// `--config` wins over `DYNASTY_CONFIG_PATH`; neither means defaults.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => EngineConfig::from_env().context("Failed to load config from environment"),
    }
}

pub fn open(config: &EngineConfig) -> Result<Session> {
    open_session(config)
        .with_context(|| format!("Failed to open store: {}", config.store_path().display()))
}

/// Parses a comma-separated top-down list. `Team (5-1)` carries a record.
pub fn parse_poll(teams: &str) -> Result<Poll> {
    let ranked: Vec<RankedTeam> = teams
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.strip_suffix(')').and_then(|rest| rest.rsplit_once('(')) {
            Some((name, record)) => RankedTeam::new(name.trim()).with_record(record.trim()),
            None => RankedTeam::new(entry),
        })
        .collect();

    Ok(Poll::new(ranked)?)
}

pub fn parse_location(location: &str) -> Result<Location> {
    Ok(match location.trim().to_ascii_lowercase().as_str() {
        "home" | "h" => Location::Home,
        "away" | "a" | "@" => Location::Away,
        "neutral" | "n" => Location::Neutral,
        other => bail!("Unknown location '{other}' (home, away, neutral)"),
    })
}

/// Accepts the stored result codes (`W`, `L`, `T`, `Bye`, `N/A`) or their names.
pub fn parse_result(result: &str) -> Result<GameResult> {
    Ok(match result.trim().to_ascii_lowercase().as_str() {
        "w" | "win" => GameResult::Win,
        "l" | "loss" => GameResult::Loss,
        "t" | "tie" => GameResult::Tie,
        "bye" => GameResult::Bye,
        "n/a" | "na" | "none" => GameResult::NotPlayed,
        other => bail!("Unknown result '{other}' (W, L, T, Bye, N/A)"),
    })
}

pub fn parse_game(week: u8, opponent: &str, location: &str, result: &str, score: &str) -> Result<Game> {
    Ok(Game::new(week, parse_location(location)?, opponent.trim(), parse_result(result)?, score.trim()))
}

pub fn format_stats(year: i32, stats: &YearStats) -> String {
    format!(
        "{year}: {} ({} conf), {} played, PF {} PA {} ({:+})",
        stats.overall_record(),
        stats.conference_record(),
        stats.games_played,
        stats.points_scored,
        stats.points_against,
        stats.point_differential()
    )
}

fn movement_label(movement: RankMovement) -> String {
    match movement {
        RankMovement::Entered => "new".to_string(),
        RankMovement::Up(n) => format!("+{n}"),
        RankMovement::Down(n) => format!("-{n}"),
        RankMovement::Unchanged => "=".to_string(),
        RankMovement::DroppedOut | RankMovement::Unranked => String::new(),
    }
}

/// Effective poll for `(year, week)` with week-over-week movement.
pub fn format_poll(history: &Top25History, year: i32, week: u8) -> Vec<String> {
    history
        .get_poll(year, week)
        .ranked()
        .map(|(rank, team)| {
            let record = team.record.as_deref().map(|r| format!(" ({r})")).unwrap_or_default();
            let movement = movement_label(history.movement(&team.name, year, week));
            format!("{rank:>2}. {}{record} {movement}", team.name).trim_end().to_string()
        })
        .collect()
}

pub fn format_summaries(summaries: &[DynastySummary]) -> Vec<String> {
    summaries
        .iter()
        .map(|summary| format!("{}  {}", summary.id, summary.display_text()))
        .collect()
}

pub fn format_store_info(info: &StoreImageInfo) -> Vec<String> {
    vec![
        format!("Store:    {}", info.path.display()),
        format!("Version:  {}", info.version),
        format!("Saved:    {}", info.saved_at.to_rfc3339()),
        format!("Records:  {}", info.record_count),
        format!("Size:     {} bytes ({:.2} KB)", info.image_size, info.image_size as f64 / 1024.0),
        format!("Checksum: {}", info.checksum),
    ]
}

pub fn export_to(session: &mut Session, path: &Path) -> Result<usize> {
    let snapshot = session.export_snapshot().context("Export failed")?;
    snapshot
        .write_to_path(path)
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
    Ok(snapshot.dynasty_data.len())
}

/// Rolls the active dynasty back to the snapshot at `path`.
pub fn restore_from(session: &mut Session, path: &Path) -> Result<DynastySummary> {
    let snapshot = read_snapshot(path)?;
    session.restore_active(snapshot).context("Restore rejected")
}

pub fn read_snapshot(path: &Path) -> Result<DynastySnapshot> {
    DynastySnapshot::read_from_path(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))
}

/// Number of dynasty records the store holds.
pub fn record_count(session: &Session) -> usize {
    dynasty_core::store::keys::dynasty_keys(session.store()).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynasty_core::CoachProfile;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> EngineConfig {
        EngineConfig { data_dir: dir.path().to_path_buf(), ..EngineConfig::default() }
    }

    #[test]
    fn test_parse_poll_with_records() {
        let poll = parse_poll("Georgia (12-1), Ohio State, , Texas(11-2)").unwrap();
        assert_eq!(poll.rank_of("Ohio State"), Some(2));
        assert_eq!(poll.at(1).and_then(|t| t.record.clone()).as_deref(), Some("12-1"));
        assert_eq!(poll.at(3).map(|t| t.name.as_str()), Some("Texas"));
        assert!(parse_poll(&vec!["X"; 26].join(",")).is_err());
    }

    #[test]
    fn test_format_poll_shows_movement() {
        let mut history = Top25History::new();
        history.set_poll(2025, 0, parse_poll("A, B").unwrap()).unwrap();
        history.set_poll(2025, 1, parse_poll("B (2-0), A, C").unwrap()).unwrap();

        assert_eq!(format_poll(&history, 2025, 1), vec![" 1. B (2-0) +1", " 2. A -1", " 3. C new"]);
        assert_eq!(format_poll(&history, 2025, 2), vec![" 1. B (2-0) =", " 2. A =", " 3. C ="]);
    }

    #[test]
    fn test_format_stats() {
        let stats = YearStats { wins: 10, losses: 2, points_scored: 400, points_against: 200, games_played: 12, ..Default::default() };
        assert_eq!(format_stats(2025, &stats), "2025: 10-2 (0-0 conf), 12 played, PF 400 PA 200 (+200)");
    }

    #[test]
    fn test_parse_game_arguments() {
        let game = parse_game(3, " Rice ", "away", "W", "10-31").unwrap();
        assert_eq!((game.week, game.location, game.result), (3, Location::Away, GameResult::Win));
        assert_eq!(game.opponent, "Rice");
        assert_eq!(game.points(), Some((31, 10)));

        assert_eq!(parse_result("n/a").unwrap(), GameResult::NotPlayed);
        assert!(parse_location("road").is_err());
        assert!(parse_result("X").is_err());
    }

    #[test]
    fn test_set_game_feeds_stats() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&config_in(&dir)).unwrap();
        session.create_dynasty(CoachProfile::new("Coach", "Tulane"), 2025).unwrap();

        session.set_game(2025, parse_game(0, "Rice", "home", "W", "35-3").unwrap()).unwrap();

        let stats = session.year_stats(2025);
        assert_eq!(format_stats(2025, &stats), "2025: 1-0 (1-0 conf), 1 played, PF 35 PA 3 (+32)");
    }

    #[test]
    fn test_export_then_restore_through_files() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let mut session = open(&config).unwrap();
        let id = session.create_dynasty(CoachProfile::new("Coach", "Tulane"), 2025).unwrap();

        let path = dir.path().join("tulane.json");
        let exported = export_to(&mut session, &path).unwrap();
        assert!(exported > 0);

        session.set_game(2025, parse_game(0, "Rice", "home", "W", "35-3").unwrap()).unwrap();

        let summary = restore_from(&mut session, &path).unwrap();
        assert_eq!(summary.id, id);
        assert_eq!(record_count(&session), exported);
        assert_eq!(session.live_stats(2025).wins, 0);
    }

    #[test]
    fn test_restore_of_other_school_keeps_slot() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&config_in(&dir)).unwrap();
        session.create_dynasty(CoachProfile::new("Coach", "Oregon"), 2025).unwrap();
        let path = dir.path().join("oregon.json");
        export_to(&mut session, &path).unwrap();

        let clemson = session.create_dynasty(CoachProfile::new("Dabo", "Clemson"), 2025).unwrap();
        assert!(restore_from(&mut session, &path).is_err());

        session.return_to_launch().unwrap();
        let slot = session.list_dynasties().into_iter().find(|s| s.id == clemson).unwrap();
        assert_eq!(slot.school_name, "Clemson");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.yaml"))).is_err());
    }
}
