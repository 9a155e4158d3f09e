use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use drop_four::config::AppConfig;
use drop_four::game::{GameDriver, Outcome, SessionStats};

/// Run agent-only matches headlessly and report the results.
#[derive(Parser)]
#[command(name = "simulate", about = "Simulate drop-piece matches between random agents")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "drop_four.toml")]
    config: PathBuf,

    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Override number of players (all of them agents)
    #[arg(long)]
    players: Option<usize>,

    /// Seed agents and starting-player selection
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation tick in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Give up on a game after this many simulated seconds
    #[arg(long, default_value_t = 600.0)]
    max_game_secs: f32,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, serde::Serialize)]
struct Summary {
    games: usize,
    wins: Vec<usize>,
    ties: usize,
    shared_wins: usize,
    unfinished: usize,
    placements: Totals,
    simulated_secs: f32,
}

#[derive(Debug, Default, serde::Serialize)]
struct Totals {
    accepted: usize,
    rejected: usize,
    missed: usize,
    cancelled: usize,
}

impl Totals {
    fn add(&mut self, stats: SessionStats) {
        self.accepted += stats.accepted;
        self.rejected += stats.rejected;
        self.missed += stats.missed;
        self.cancelled += stats.cancelled;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if cli.dt <= 0.0 {
        bail!("--dt must be > 0");
    }
    if cli.games == 0 {
        bail!("--games must be > 0");
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(players) = cli.players {
        config.players.num_players = players;
    }
    config.players.num_agents = config.players.num_players;
    if cli.seed.is_some() {
        config.players.seed = cli.seed;
    }

    let num_players = config.players.num_players;
    let mut driver = GameDriver::from_config(config).context("starting simulation")?;
    let mut summary = Summary {
        wins: vec![0; num_players],
        ..Summary::default()
    };

    for game in 0..cli.games {
        if game > 0 {
            driver.new_session();
        }
        let mut elapsed = 0.0;
        while !driver.is_over() && elapsed < cli.max_game_secs {
            driver
                .advance(cli.dt)
                .with_context(|| format!("advancing game {}", game + 1))?;
            elapsed += cli.dt;
        }
        summary.simulated_secs += elapsed;
        summary.placements.add(driver.session().stats());

        match driver.outcome() {
            Some(Outcome::Win(winners)) => {
                if winners.len() > 1 {
                    summary.shared_wins += 1;
                }
                for winner in winners {
                    summary.wins[winner.index()] += 1;
                }
            }
            Some(Outcome::Tie) => summary.ties += 1,
            None => {
                tracing::warn!(game = game + 1, "game did not finish in time");
                summary.unfinished += 1;
            }
        }
        summary.games += 1;

        if !cli.json && (game + 1) % 10 == 0 {
            eprintln!("{}/{} games", game + 1, cli.games);
        }
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serializing summary")?
        );
    } else {
        print_summary(&driver, &summary);
    }
    Ok(())
}

fn print_summary(driver: &GameDriver, summary: &Summary) {
    println!("Games played: {}", summary.games);
    for (info, wins) in driver.players().zip(&summary.wins) {
        let rate = *wins as f32 / summary.games.max(1) as f32 * 100.0;
        println!("  {:<10} {:>5} wins ({rate:.1}%)", info.name, wins);
    }
    println!("  Ties:       {:>5}", summary.ties);
    println!("  Shared:     {:>5}", summary.shared_wins);
    println!("  Unfinished: {:>5}", summary.unfinished);
    println!(
        "Placements: {} accepted, {} rejected, {} missed, {} cancelled",
        summary.placements.accepted,
        summary.placements.rejected,
        summary.placements.missed,
        summary.placements.cancelled
    );
    println!("Simulated time: {:.1}s", summary.simulated_secs);
}
