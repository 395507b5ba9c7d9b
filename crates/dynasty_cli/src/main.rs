//! Dynasty CLI
//!
//! Drives the dynasty engine against the file-backed store named by the
//! configuration.

#[cfg(feature = "cli")]
use anyhow::{bail, Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "dynasty")]
#[command(about = "Track a college football dynasty season by season", long_about = None)]
struct Cli {
    /// Config file (YAML or JSON); overrides DYNASTY_CONFIG_PATH
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Start a new dynasty and make it active
    Init {
        #[arg(long)]
        coach: String,

        #[arg(long)]
        school: String,

        #[arg(long)]
        conference: Option<String>,

        /// First season
        #[arg(long)]
        year: i32,
    },

    /// List saved dynasties
    List,

    /// Load a saved dynasty into the active slot
    Load {
        id: uuid::Uuid,
    },

    /// Show live stats of a season (current season by default)
    Stats {
        #[arg(long)]
        year: Option<i32>,

        /// Also compare against the cached stats
        #[arg(long, default_value = "false")]
        verify: bool,
    },

    /// Show the effective poll of a week
    Poll {
        #[arg(long)]
        week: u8,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Replace the poll of one week
    SetPoll {
        #[arg(long)]
        week: u8,

        #[arg(long)]
        year: Option<i32>,

        /// Comma-separated, top first, e.g. "Georgia (12-1), Texas"
        #[arg(long)]
        teams: String,
    },

    /// Enter or edit one game of a season schedule
    SetGame {
        #[arg(long)]
        week: u8,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        opponent: String,

        /// home, away or neutral
        #[arg(long, default_value = "home")]
        location: String,

        /// W, L, T, Bye or N/A
        #[arg(long)]
        result: String,

        /// "A-B"; away games are written opponent first
        #[arg(long, default_value = "")]
        score: String,
    },

    /// Finalize the current season and advance to the next
    EndSeason {
        /// Required; the transition cannot be undone
        #[arg(long, default_value = "false")]
        confirm: bool,
    },

    /// Write the active dynasty to a snapshot file
    Export {
        out: PathBuf,
    },

    /// Add a snapshot file as a new dynasty
    Import {
        file: PathBuf,
    },

    /// Replace the active dynasty with a snapshot file
    Restore {
        file: PathBuf,
    },

    /// Show store image metadata
    Info,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = dynasty_cli::load_config(cli.config.as_deref())?;
    log::debug!("Using store {}", config.store_path().display());
    let mut session = dynasty_cli::open(&config)?;

    match cli.command {
        Commands::Init { coach, school, conference, year } => {
            let mut profile = dynasty_core::CoachProfile::new(coach, school);
            if let Some(conference) = conference {
                profile = profile.with_conference(conference);
            }
            let id = session.create_dynasty(profile, year).context("Failed to create dynasty")?;
            println!("Created dynasty {id}");
        }

        Commands::List => {
            let summaries = session.list_dynasties();
            if summaries.is_empty() {
                println!("No saved dynasties");
            }
            for line in dynasty_cli::format_summaries(&summaries) {
                println!("{line}");
            }
        }

        Commands::Load { id } => {
            session.load_dynasty(id).with_context(|| format!("Failed to load dynasty {id}"))?;
            println!("Loaded {}", session.profile().school_name);
        }

        Commands::Stats { year, verify } => {
            let year = resolve_year(&session, year)?;
            println!("{}", dynasty_cli::format_stats(year, &session.live_stats(year)));

            if verify {
                let check = session.verify_year_stats(year);
                match check.cached {
                    None => println!("No cached stats for {year}"),
                    Some(_) if check.drifted() => println!("Cached stats for {year} are stale"),
                    Some(_) => println!("Cached stats for {year} match"),
                }
            }
        }

        Commands::Poll { week, year } => {
            let year = resolve_year(&session, year)?;
            let lines = dynasty_cli::format_poll(session.rankings(), year, week);
            if lines.is_empty() {
                println!("No poll for {year} week {week}");
            }
            for line in lines {
                println!("{line}");
            }
        }

        Commands::SetPoll { week, year, teams } => {
            let year = resolve_year(&session, year)?;
            let poll = dynasty_cli::parse_poll(&teams)?;
            session.set_poll(year, week, poll)?;
            println!("Set {year} week {week} poll");
        }

        Commands::SetGame { week, year, opponent, location, result, score } => {
            let year = resolve_year(&session, year)?;
            let game = dynasty_cli::parse_game(week, &opponent, &location, &result, &score)?;
            session.set_game(year, game)?;
            println!("{}", dynasty_cli::format_stats(year, &session.year_stats(year)));
        }

        Commands::EndSeason { confirm } => {
            let year = session.require_year()?;
            if !confirm {
                bail!("Ending season {year} cannot be undone; pass --confirm");
            }
            let record = session.end_season(year)?;
            println!("Season {year} finalized: {} ({} conf)", record.overall_record, record.conference_record);
        }

        Commands::Export { out } => {
            let count = dynasty_cli::export_to(&mut session, &out)?;
            println!("Exported {count} records to {}", out.display());
        }

        Commands::Import { file } => {
            let snapshot = dynasty_cli::read_snapshot(&file)?;
            let id = session.import_dynasty(snapshot).context("Import rejected")?;
            println!("Imported dynasty {id}");
        }

        Commands::Restore { file } => {
            let summary = dynasty_cli::restore_from(&mut session, &file)?;
            println!("Restored {} records into {}", dynasty_cli::record_count(&session), summary.id);
        }

        Commands::Info => {
            session.persist()?;
            for line in dynasty_cli::format_store_info(&session.store().image_info()?) {
                println!("{line}");
            }
        }
    }

    session.close().context("Failed to save")?;
    Ok(())
}

#[cfg(feature = "cli")]
fn resolve_year(session: &dynasty_cli::Session, year: Option<i32>) -> Result<i32> {
    match year {
        Some(year) => Ok(year),
        None => Ok(session.require_year()?),
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("dynasty CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
