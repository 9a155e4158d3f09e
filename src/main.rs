use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use drop_four::config::AppConfig;
use drop_four::game::GameDriver;
use drop_four::ui::App;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Play the physics drop-piece game in the terminal.
#[derive(Parser)]
#[command(name = "drop_four", about = "Physics-based drop-piece game")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "drop_four.toml")]
    config: PathBuf,

    /// Override number of players
    #[arg(long)]
    players: Option<usize>,

    /// Override number of random agents (they take the first seats)
    #[arg(long)]
    agents: Option<usize>,

    /// Seed agents and starting-player selection
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write logs; the terminal is reserved for the game
    #[arg(long, default_value = "drop_four.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file);

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(players) = cli.players {
        config.players.num_players = players;
    }
    if let Some(agents) = cli.agents {
        config.players.num_agents = agents;
    }
    if cli.seed.is_some() {
        config.players.seed = cli.seed;
    }

    let driver = GameDriver::from_config(config).context("starting game")?;
    run(App::new(driver)).context("running terminal UI")
}

fn init_tracing(log_file: &Path) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
        }
        // No logs rather than corrupting the TUI.
        Err(_) => tracing_subscriber::registry().with(env_filter).init(),
    }
}

fn run(mut app: App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
