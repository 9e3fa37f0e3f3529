//! Idle Tycoon - Terminal front-end

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tycoon_core::catalog::{Catalog, Feature};
use tycoon_core::prelude::{EngineConfig, ManualClock, Session, SystemClock};
use tycoon_tools::console::{Console, ConsoleLine, BANNER};
use tycoon_tools::error::Result;
use tycoon_tools::repl;
use tycoon_tools::script::run_script;

#[derive(Parser)]
#[command(name = "tycoon")]
#[command(about = "Idle tycoon progression engine")]
struct Cli {
    /// Engine configuration file (RON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug commands (reset, addmoney)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively on standard input
    Play,
    /// Run a script of console commands against a manual clock
    Run {
        /// Path to the script
        script: PathBuf,
    },
    /// Print the built-in catalog as RON
    Catalog,
    /// Validate a catalog file
    Validate {
        /// Path to the catalog
        path: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref(), cli.debug).and_then(|config| {
        match cli.command {
            Commands::Play => play(config),
            Commands::Run { script } => run(config, &script),
            Commands::Catalog => print_catalog(),
            Commands::Validate { path } => validate(&path),
            Commands::Config => print_config(&config),
        }
    });

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>, debug: bool) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.debug_commands |= debug;
    Ok(config)
}

fn print_lines(lines: &[ConsoleLine], colored: bool) {
    for line in lines {
        if colored {
            println!("{}", line.colored());
        } else {
            println!("{line}");
        }
    }
}

fn play(config: EngineConfig) -> Result<()> {
    let session = Session::from_config(config, SystemClock)?;
    let mut console = Console::new(session);
    println!("{BANNER}");

    let input = repl::spawn_stdin_reader();
    prompt();
    repl::run(&mut console, &input, |console, lines, typed| {
        if !typed {
            println!();
        }
        print_lines(lines, console.state().has_feature(Feature::ColorOutput));
        prompt();
    });
    Ok(())
}

fn prompt() {
    print!("$ ");
    if let Err(e) = io::stdout().flush() {
        tracing::warn!("Failed to flush output: {e}");
    }
}

fn run(config: EngineConfig, script: &Path) -> Result<()> {
    let text = std::fs::read_to_string(script)?;
    tracing::info!("Running script: {}", script.display());
    let session = Session::new(&config.load_catalog()?, config, ManualClock::new(0))?;
    let mut console = Console::new(session);
    let lines = run_script(&mut console, &text);
    print_lines(&lines, false);
    let state = console.state();
    tracing::info!(
        era = ?state.stage,
        money = %tycoon_core::math::format_money(state.money),
        "Script finished"
    );
    Ok(())
}

fn print_catalog() -> Result<()> {
    println!("{}", Catalog::standard().to_ron_string()?);
    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    tracing::info!("Validating catalog: {}", path.display());
    let catalog = Catalog::load(path)?;
    tracing::info!(
        upgrades = catalog.upgrades.len(),
        research = catalog.research.len(),
        goals = catalog.goals.len(),
        "Validation passed"
    );
    Ok(())
}

fn print_config(config: &EngineConfig) -> Result<()> {
    let text = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())?;
    println!("{text}");
    Ok(())
}
