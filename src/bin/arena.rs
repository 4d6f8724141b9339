use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use connect_four::ai::{EngineMode, DEFAULT_SEARCH_DEPTH};
use connect_four::arena::run_match;
use connect_four::config::MAX_SEARCH_DEPTH;

/// Play engine modes against each other.
#[derive(Parser)]
#[command(name = "arena", about = "Play Connect Four engine modes against each other")]
struct Cli {
    /// Mode of the first contender
    #[arg(long, default_value = "minimax")]
    first: EngineMode,

    /// Mode of the second contender
    #[arg(long, default_value = "random")]
    second: EngineMode,

    /// Number of games; the first move alternates between contenders
    #[arg(long, default_value_t = 20)]
    games: usize,

    /// Minimax search depth for both contenders
    #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
    depth: usize,

    /// Seed for the random fallback
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if cli.games == 0 {
        bail!("--games must be at least 1");
    }
    if !(1..=MAX_SEARCH_DEPTH).contains(&cli.depth) {
        bail!("--depth must be in 1..={MAX_SEARCH_DEPTH}");
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let report = run_match(cli.first, cli.second, cli.games, cli.depth, &mut rng)
        .with_context(|| format!("playing {} vs {}", cli.first, cli.second))?;
    println!("{report}");
    Ok(())
}
