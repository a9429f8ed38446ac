use anyhow::Result;
use clap::{Parser, Subcommand};
use rps_arena::commands::{describe, play, presets, PlayParams};
use rps_arena::{parse_seed, random_seed};

#[derive(Parser, Debug)]
#[command(name = "rps-arena")]
#[command(about = "Play Rock-Paper-Scissors agents against each other locally")]
struct Cli {
    /// Log every turn's strategy label
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the named presets
    Presets,
    /// Describe a preset or strategy file
    Describe {
        strategy: String,
    },
    /// Run a match and print the result as JSON
    Play {
        /// Preset name or strategy JSON file for player A
        #[arg(long)]
        a: String,
        /// Preset name or strategy JSON file for player B
        #[arg(long)]
        b: String,
        /// Turns to play (default: 1000, the harness episode length)
        #[arg(long)]
        rounds: Option<u32>,
        /// Hex seed, random when omitted
        #[arg(long)]
        seed: Option<String>,
        /// Print every round, not just the summary
        #[arg(long)]
        log: bool,
    },
}

fn main() -> Result<()> {
    let Cli { verbose, command } = Cli::parse();

    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match command {
        Commands::Presets => {
            println!("{}", serde_json::to_string_pretty(&presets()?)?);
        }
        Commands::Describe { strategy } => {
            println!("{}", describe(&strategy)?);
        }
        Commands::Play { a, b, rounds, seed, log } => {
            let seed = match seed {
                Some(hex) => parse_seed(&hex)?,
                None => random_seed(),
            };
            let report = play(&PlayParams { a, b, rounds, seed, full_log: log })?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
