//! Tilequest - Entry Point
//!
//! Loads a config, starts or restores a game, then runs either a scripted
//! command list or an interactive prompt. Every command is one turn.

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use tilequest::actions::Intent;
use tilequest::core::config::GameConfig;
use tilequest::core::error::Result;
use tilequest::player::resources::Resource;
use tilequest::simulation::session::Session;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tilequest")]
#[command(about = "Turn-stepped tile-grid adventure simulation")]
struct Args {
    /// Seed for the session RNG (movement, combat rolls, loot, spawns)
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// World seed; drawn from the session RNG when omitted
    #[arg(long)]
    world_seed: Option<u32>,

    /// TOML file overriding the default balancing table
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML file replacing the crafting catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Restore a saved game instead of starting a new one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the game here when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// Comma-separated commands to run headlessly, e.g. "n,n,chop,attack"
    #[arg(long)]
    script: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tilequest=info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(path) = &args.catalog {
        config = config.with_catalog_file(path)?;
    }

    let mut session = match (&args.load, args.world_seed) {
        (Some(path), _) => Session::load(path, config, args.seed)?,
        (None, Some(world_seed)) => Session::with_world_seed(config, world_seed, args.seed),
        (None, None) => Session::new(config, args.seed),
    };
    tracing::info!(seed = session.state.seed, "tilequest starting");

    match &args.script {
        Some(script) => run_script(&mut session, script),
        None => run_interactive(&mut session)?,
    }

    if let Some(path) = &args.save {
        session.save(path)?;
    }
    Ok(())
}

fn run_script(session: &mut Session, script: &str) {
    for cmd in script.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        match cmd.parse::<Intent>() {
            Ok(intent) => {
                let ok = session.take_turn(intent);
                println!("> {} ({})", cmd, if ok { "ok" } else { "refused" });
                print_summary(session);
            }
            Err(e) => println!("Skipping '{}': {}", cmd, e),
        }
    }
}

fn run_interactive(session: &mut Session) -> Result<()> {
    println!("\n=== TILEQUEST ===");
    println!("Commands:");
    println!("  n / s / e / w        - Move");
    println!("  chop, quarry, hunt   - Gather");
    println!("  fish, build, talk    - Fish, build a house, talk to a villager");
    println!("  craft <item>         - Craft an item (e.g. craft axe)");
    println!("  use <item>           - Use a consumable (e.g. use potion)");
    println!("  portal               - Teleport home");
    println!("  attack / defend / run - Combat turn");
    println!("  quit / q             - Exit");
    println!();
    print_summary(session);

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        match input.parse::<Intent>() {
            Ok(intent) => {
                if !session.take_turn(intent) {
                    println!("(refused)");
                }
                print_summary(session);
            }
            Err(e) => println!("{}", e),
        }
    }

    println!(
        "\nGoodbye! Day {}, {} HP, {} gold.",
        session.state.calendar.day(),
        session.state.player.hp,
        session.state.player.resources.get(Resource::Gold)
    );
    Ok(())
}

fn print_summary(session: &Session) {
    let state = &session.state;
    let p = &state.player;
    let tile = state.player_tile().map(|t| t.to_string()).unwrap_or_default();
    println!(
        "Day {} step {} ({}) | {} {} | HP {}/{}",
        state.calendar.day(),
        state.calendar.step(),
        state.calendar.phase().name(),
        p.pos,
        tile,
        p.hp,
        p.max_hp
    );
    let resources: Vec<String> = Resource::ALL
        .iter()
        .map(|r| format!("{}{}", r.icon(), p.resources.get(*r)))
        .collect();
    println!("  {}", resources.join(" "));
    if !p.items.is_empty() {
        let items: Vec<String> = p.items.iter().map(|i| i.to_string()).collect();
        println!("  Items: {}", items.join(" "));
    }
    if state.in_combat() {
        if let Some(line) = state.combat_log.latest() {
            println!("  ⚔️ {}", line);
        }
    } else if let Some(entry) = state.history.latest() {
        println!("  {} {} {}", entry.actor, entry.gained, entry.description);
    }
}
