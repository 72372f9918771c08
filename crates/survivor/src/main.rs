//! Survivor save tool
//!
//! Creates, inspects and deletes campaign saves and prints the cross-campaign
//! hiscore and hint progress files.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::error;
use strum::IntoEnumIterator;

use sv_core::campaign::{RaidType, UniqueActorKind, UniqueItemKind, UniqueMapKind};
use sv_core::{AdvisorHint, CampaignState, DistrictPos, GameMode, HiScoreTable, SurvivorConfig};
use sv_save::{SavePaths, Session, delete_save, load_hiscores, load_hints_or_default, peek_header};

/// Survival campaign save tool
#[derive(Parser, Debug)]
#[command(name = "survivor")]
#[command(author, version, about = "Inspect and manage survival campaign saves", long_about = None)]
struct Args {
    /// Directory holding save files (overrides SURVIVOR_SAVE_DIR)
    #[arg(long = "save-dir")]
    save_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a fresh campaign and save it
    New {
        #[arg(short = 'm', long = "mode", value_enum, default_value_t = ModeArg::Standard)]
        mode: ModeArg,
    },
    /// Show what the campaign save holds
    Info,
    /// Show the hiscore table
    Scores {
        /// Replace every entry with a placeholder
        #[arg(long)]
        clear: bool,
    },
    /// Show tutorial hint progress
    Hints {
        /// Mark every hint unseen
        #[arg(long)]
        reset: bool,
    },
    /// Delete the campaign save
    Delete,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Standard,
    Infection,
    Vintage,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Standard => GameMode::Standard,
            ModeArg::Infection => GameMode::CorpsesAndInfection,
            ModeArg::Vintage => GameMode::Vintage,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("survivor: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => SurvivorConfig::load(path)?,
        None => SurvivorConfig::from_env(),
    };
    if let Some(dir) = args.save_dir {
        config.save_dir = dir;
    }
    config.validate()?;

    let mut session = Session::new(config);
    let paths = session.paths();

    match args.command {
        Command::New { mode } => {
            let interval = session.config().autosave_interval_turns;
            let state = session.start_new(mode.into());
            state.schedule_next_autosave(interval);
            let seed = state.seed();
            session.save(&paths.campaign)?;
            println!(
                "New {} campaign (seed {}) saved to {}",
                GameMode::from(mode).name(),
                seed,
                paths.campaign.display()
            );
        }
        Command::Info => show_info(&mut session, &paths)?,
        Command::Scores { clear } => show_scores(session.config(), &paths, clear)?,
        Command::Hints { reset } => show_hints(&paths, reset)?,
        Command::Delete => {
            if delete_save(&paths.campaign) {
                println!("Campaign save deleted");
            } else {
                println!("No campaign save deleted at {}", paths.campaign.display());
            }
        }
    }
    Ok(())
}

fn show_info(session: &mut Session, paths: &SavePaths) -> Result<(), Box<dyn Error>> {
    let header = peek_header(&paths.campaign)?;
    println!("File:    {}", paths.campaign.display());
    println!(
        "Format:  {} v{} ({} bytes)",
        header.type_tag, header.schema_version, header.payload_len
    );

    let state = session.load(&paths.campaign)?;
    print_campaign(state);
    Ok(())
}

fn print_campaign(state: &CampaignState) {
    let size = state.city_size();
    println!("Mode:    {}", state.game_mode().name());
    println!("Seed:    {}", state.seed());
    println!("Time:    {} (turn {})", state.world_time, state.world_time.turn());
    println!("City:    {}x{}, {} maps", size, size, state.world.maps().count());
    if let Some(map) = state.current_map() {
        println!("Map:     {}", map.name);
    }
    println!(
        "Score:   {} ({}% difficulty)",
        state.scoring.total_points(),
        state.scoring.difficulty_percent()
    );

    let raids = state.raid_timeline();
    for raid in RaidType::iter() {
        let hit = (0..size as i32)
            .flat_map(|x| (0..size as i32).map(move |y| (x, y)))
            .filter(|&(x, y)| raids.has_raid_happened(raid, DistrictPos::new(x, y)))
            .count();
        if hit > 0 {
            println!("Raid:    {} hit {} district(s)", raid, hit);
        }
    }

    let actors = UniqueActorKind::iter().filter(|k| state.unique_actors.is_spawned(*k));
    let items = UniqueItemKind::iter().filter(|k| state.unique_items.is_spawned(*k));
    let maps = UniqueMapKind::iter().filter(|k| state.unique_maps.is_spawned(*k));
    println!(
        "Uniques: {} actors, {} items, {} maps spawned",
        actors.count(),
        items.count(),
        maps.count()
    );
    println!("Flags:   {:?}", state.flags);
    println!("Autosave at turn {}", state.next_autosave_deadline());
}

fn show_scores(config: &SurvivorConfig, paths: &SavePaths, clear: bool) -> Result<(), Box<dyn Error>> {
    if clear {
        let table = HiScoreTable::cleared(config.max_hiscores);
        sv_save::save_hiscores(&table, &paths.hiscores)?;
        println!("Hiscores cleared");
        return Ok(());
    }

    let Some(table) = load_hiscores(&paths.hiscores) else {
        println!("No hiscores yet");
        return Ok(());
    };
    println!("{:>3}  {:<20} {:>8} {:>6}  Death", "#", "Name", "Points", "Turns");
    for (rank, entry) in table.iter().enumerate() {
        println!(
            "{:>3}  {:<20} {:>8} {:>6}  {}",
            rank + 1,
            entry.name,
            entry.total_points,
            entry.turns_survived,
            entry.death_description
        );
    }
    Ok(())
}

fn show_hints(paths: &SavePaths, reset: bool) -> Result<(), Box<dyn Error>> {
    let mut hints = load_hints_or_default(&paths.hints);
    if reset {
        hints.reset_all();
        sv_save::save_hints(&hints, &paths.hints)?;
    }

    println!(
        "Hints seen: {}/{}",
        hints.count_given(),
        AdvisorHint::iter().count()
    );
    match hints.next_unseen() {
        Some(hint) => println!("Next hint: {}", hint),
        None => println!("All hints seen"),
    }
    Ok(())
}
