use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deskcalc::calculator::{Calculator, DisplaySlots};
use deskcalc::config::Config;
use deskcalc::history::{HistoryStore, MemoryHistory, SqliteHistory};
use deskcalc::keypad::Key;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "deskcalc", version, about = "Decimal calculator with a history log")]
struct Cli {
    /// Config file (defaults to ~/.config/deskcalc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History database file, overriding the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Keep history in memory only
    #[arg(long)]
    no_history: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive keypad (default)
    Run,
    /// Print the most recent computations
    History {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete every recorded computation
    ClearHistory,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    deskcalc::logging::init(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let store: Box<dyn HistoryStore> = if cli.no_history {
                Box::new(MemoryHistory::new())
            } else {
                Box::new(open_history(&config, cli.db)?)
            };
            run_keypad(&config, store)
        }
        Command::History { limit } => {
            let store = open_history(&config, cli.db)?;
            let limit = limit.unwrap_or(config.history.recent_limit);
            for record in store.try_get_last_records(limit)? {
                println!("{record}");
            }
            Ok(())
        }
        Command::ClearHistory => {
            let store = open_history(&config, cli.db)?;
            let removed = store.try_delete_all_records()?;
            println!("Deleted {removed} records");
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path.cloned().or_else(Config::default_path) else {
        return Ok(Config::default());
    };
    Config::load(&path).with_context(|| format!("Failed to load {}", path.display()))
}

fn open_history(config: &Config, db: Option<PathBuf>) -> Result<SqliteHistory> {
    let path = db
        .or_else(|| config.history_path())
        .context("No data directory found. Pass --db PATH.")?;
    let store = SqliteHistory::open(&path)
        .with_context(|| format!("Failed to open history at {}", path.display()))?;
    store.create_table();
    Ok(store)
}

fn run_keypad(config: &Config, store: Box<dyn HistoryStore>) -> Result<()> {
    let engine = config.build_engine()?;
    let recent_limit = config.history.recent_limit;
    let mut calc = Calculator::new(engine, store);

    info!("Keys: 0-9 . + - * / % = | D delete | C clear | H history | Q quit");
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            calc.evaluate();
        }

        for c in line.chars().filter(|c| !c.is_whitespace()) {
            match c {
                'q' | 'Q' => return Ok(()),
                'h' | 'H' => {
                    for record in calc.history().get_last_records(recent_limit) {
                        writeln!(stdout, "  {record}")?;
                    }
                }
                _ => match Key::from_char(c) {
                    Some(key) => key.press(&mut calc),
                    None => warn!("Unknown key '{c}'"),
                },
            }
        }

        writeln!(stdout, "{}", render(&calc.display()))?;
        stdout.flush()?;
    }

    Ok(())
}

fn render(display: &DisplaySlots) -> String {
    let equation = [
        display.operand_1.as_str(),
        display.operator.as_str(),
        display.operand_2.as_str(),
    ]
    .into_iter()
    .filter(|slot| !slot.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    if display.result.is_empty() {
        equation
    } else {
        format!("{equation:<30} = {}", display.result)
    }
}
