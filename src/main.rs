//! Binary entrypoint for the Crypto Realm CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `play --name <name> --class <class>` - run an automated session: PvE fights,
//!   an optional arena match and craft, then quest claims and a summary
//! - `leaderboard` - print the current season and the ranked board
//! - `catalog` - list classes, enemies, arena opponents and recipes
//!
//! See the library crate docs for module-level details: `crypto_realm::`.
use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use crypto_realm::config::Config;
use crypto_realm::realm::{
    cancel_pair, format_inventory, format_leaderboard_row, format_quest_status, format_token_delta, format_tokens,
    paced_craft, paced_opponent_turn, reward_for_rank, ActionReport, BattleOutcome, GameStore, PaceToken, Paced,
    Pacing, RealmRng, SeededRng, TurnResult,
};

#[derive(Parser)]
#[command(name = "realm")]
#[command(about = "Crypto Realm session simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Play an automated session
    Play(PlayArgs),
    /// Show the season leaderboard
    Leaderboard {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List classes, enemies, arena opponents and recipes
    Catalog,
}

#[derive(Args)]
struct PlayArgs {
    /// Character name
    #[arg(short, long)]
    name: String,
    /// Class id (warrior, mage, ranger)
    #[arg(long, default_value = "warrior")]
    class: String,
    /// PvE enemy id to hunt
    #[arg(short, long, default_value = "forest_wolf")]
    enemy: String,
    /// Number of PvE battles
    #[arg(short, long, default_value_t = 3)]
    battles: u32,
    /// Arena opponent id for one PvP match after the hunt
    #[arg(long)]
    opponent: Option<String>,
    /// Wager for the arena match; must be one of `battle.wager_options`
    #[arg(long, default_value_t = 50)]
    wager: u64,
    /// Recipe id to craft at the end
    #[arg(long)]
    craft: Option<String>,
    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Skip presentation delays
    #[arg(long)]
    fast: bool,
    /// Print the final session snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init writes the config, so it cannot read one first
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => match Config::load(&cli.config).await {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                eprintln!("{} (using defaults)", e);
                None
            }
        },
    };
    init_logging(&pre_config, cli.verbose);
    let config = pre_config.unwrap_or_default();

    match cli.command {
        Commands::Init => {
            info!("Initializing new Crypto Realm configuration");
            if std::path::Path::new(&cli.config).exists() {
                return Err(anyhow!("{} already exists; refusing to overwrite", cli.config));
            }
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Play(args) => run_play(&config, args).await?,
        Commands::Leaderboard { json } => {
            let clock = config.season_clock()?;
            let today = chrono::Utc::now().date_naive();
            let store = GameStore::seeded(0);
            let board = store.leaderboard();
            if json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else {
                println!(
                    "Season {} - {} days remaining",
                    clock.season_number(today),
                    clock.days_remaining(today)
                );
                for entry in &board {
                    println!("{}", format_leaderboard_row(entry));
                }
            }
        }
        Commands::Catalog => print_catalog(),
    }

    Ok(())
}

async fn run_play(config: &Config, args: PlayArgs) -> Result<()> {
    let seed = args.seed.or(config.session.seed);
    let mut store = GameStore::new(SeededRng::from_optional_seed(seed), config.battle_rules()?)
        .with_starting_tokens(config.session.starting_tokens);
    let pacing = if args.fast { Pacing::immediate() } else { config.pacing() };

    let character = store.create_character(&args.name, &args.class)?;
    println!("{} the {} enters the realm", character.name, character.class_name);

    let (canceller, mut token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    for round in 1..=args.battles {
        if token.is_cancelled() {
            break;
        }
        store.start_battle(&args.enemy)?;
        println!("-- battle {} vs {} --", round, args.enemy);
        if !fight(&mut store, &pacing, &mut token).await? {
            println!("session interrupted");
            break;
        }
        store.leave_battle();
    }

    if let Some(opponent) = args.opponent.as_deref() {
        if let Err(e) = config.check_wager(args.wager) {
            warn!("arena match refused: {}", e);
            println!("arena match refused: {}", e);
        } else if !token.is_cancelled() {
            store.select_opponent(opponent)?;
            match store.start_pvp(args.wager) {
                Ok(_) => {
                    println!("-- arena vs {} for {} --", opponent, format_tokens(args.wager));
                    fight(&mut store, &pacing, &mut token).await?;
                    store.leave_battle();
                }
                Err(e) => {
                    warn!("arena match refused: {}", e);
                    println!("arena match refused: {}", e);
                    store.leave_battle();
                }
            }
        }
    }

    if let Some(recipe_id) = args.craft.as_deref() {
        match paced_craft(&mut store, recipe_id, &pacing, &mut token).await {
            Ok(Paced::Done(item)) => println!("crafted {}", item.name),
            Ok(Paced::Cancelled) => println!("crafting cancelled"),
            Err(e) => println!("craft {} rejected: {}", recipe_id, e),
        }
    }

    let ready: Vec<String> = store
        .quests()
        .iter()
        .filter(|q| q.is_claimable())
        .map(|q| q.id.clone())
        .collect();
    for quest_id in ready {
        let reward = store.claim_quest(&quest_id)?;
        println!("quest {} claimed: {} +{} xp", quest_id, format_token_delta(reward.tokens as i64), reward.xp);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
    } else {
        print_summary(&store);
    }
    Ok(())
}

/// Fight until the battle ends. Returns `false` if interrupted.
async fn fight<R: RealmRng>(store: &mut GameStore<R>, pacing: &Pacing, token: &mut PaceToken) -> Result<bool> {
    loop {
        let battle = store.battle().ok_or_else(|| anyhow!("no active battle"))?;
        let player = battle.player();
        let low_health = player.hp * 10 < player.max_hp * 3;

        let next = if low_health {
            TurnResult::OpponentTurn(store.defend()?)
        } else {
            let report = store.attack()?;
            if let Some(outcome) = report_action(store, &report) {
                print_outcome(&outcome);
                return Ok(true);
            }
            report.next
        };

        if let TurnResult::OpponentTurn(ticket) = next {
            match paced_opponent_turn(store, ticket, pacing, token).await? {
                Paced::Done(report) => {
                    if let Some(outcome) = report_action(store, &report) {
                        print_outcome(&outcome);
                        return Ok(true);
                    }
                }
                Paced::Cancelled => return Ok(false),
            }
        }
    }
}

fn report_action<R: RealmRng>(store: &GameStore<R>, report: &ActionReport) -> Option<BattleOutcome> {
    if let Some(battle) = store.battle() {
        if let Some(line) = battle.log().last() {
            println!("  {}", line);
        }
        if report.outcome.is_none() {
            println!(
                "  [{} {}/{} | {} {}/{}]",
                battle.player().name,
                battle.player().hp,
                battle.player().max_hp,
                battle.opponent().name,
                battle.opponent().hp,
                battle.opponent().max_hp
            );
        }
    }
    report.outcome.clone()
}

fn print_outcome(outcome: &BattleOutcome) {
    match (&outcome.reward, outcome.victory) {
        (Some(reward), true) => {
            let drops: Vec<&str> = reward.loot.iter().map(|i| i.name.as_str()).collect();
            println!(
                "  victory: {} +{} xp, loot: {}",
                format_token_delta(reward.tokens as i64),
                reward.xp,
                if drops.is_empty() { "none".to_string() } else { drops.join(", ") }
            );
            if outcome.levels_gained > 0 {
                println!("  level up x{}", outcome.levels_gained);
            }
        }
        _ => println!("  defeat"),
    }
    for id in &outcome.unlocked {
        println!("  achievement unlocked: {}", id);
    }
}

fn print_summary<R: RealmRng>(store: &GameStore<R>) {
    if let Some(c) = store.character() {
        println!(
            "\n{} - {} level {} ({}/{} xp)",
            c.name, c.class_name, c.level, c.xp, c.xp_to_next
        );
        println!(
            "STR {} INT {} DEX {} HP {}",
            c.stats.str, c.stats.int, c.stats.dex, c.stats.hp
        );
    }
    println!("Balance: {}", format_tokens(store.balance()));
    let counters = store.counters();
    println!(
        "Wins: {} PvE, {} PvP, {} defeats, {} crafts",
        counters.battle_wins, counters.pvp_wins, counters.defeats, counters.craft_count
    );
    println!("\nInventory:");
    for line in format_inventory(store.inventory()) {
        println!("  {}", line);
    }
    println!("\nQuests:");
    for quest in store.quests() {
        println!("  {}", format_quest_status(quest));
    }
    let board = store.leaderboard();
    if let Some(me) = board.iter().find(|e| e.is_player) {
        let tier = reward_for_rank(me.rank).map(|r| r.tier).unwrap_or("unranked");
        println!("\nSeason rank #{} ({})", me.rank, tier);
    }
}

fn print_catalog() {
    let store = GameStore::seeded(0);
    let catalog = store.catalog();
    println!("Classes:");
    for class in &catalog.classes {
        println!(
            "  {:<8} STR {:>2} INT {:>2} DEX {:>2} HP {:>2}  {}",
            class.id, class.stats.str, class.stats.int, class.stats.dex, class.stats.hp, class.description
        );
    }
    println!("Enemies:");
    for enemy in &catalog.enemies {
        println!(
            "  {:<14} {} HP {:>3} ATK {:>2} DEF {:>2} ({:?})",
            enemy.id,
            enemy.icon,
            enemy.max_hp,
            enemy.atk,
            enemy.def,
            enemy.difficulty()
        );
    }
    println!("Arena:");
    for opp in &catalog.opponents {
        println!(
            "  {:<13} L{:<2} {:<7} HP {:>3} ATK {:>2} DEF {:>2}",
            opp.id, opp.level, opp.class_name, opp.max_hp, opp.atk, opp.def
        );
    }
    println!("Recipes:");
    for recipe in &catalog.recipes {
        let mats: Vec<String> = recipe
            .materials
            .iter()
            .map(|m| format!("{}x {}", m.qty, catalog.item_name(&m.item_id)))
            .collect();
        println!("  {} {} <- {}", recipe.id, recipe.result.name, mats.join(" + "));
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Warn),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let file = config.as_ref().and_then(|cfg| cfg.logging.file.clone());
    let sink = file.and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    if let Some(f) = sink {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Foreground runs also echo to the console
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
