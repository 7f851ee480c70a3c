use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;

use commands::build::BuildOptions;
use error::CliResult;

#[derive(Parser)]
#[command(name = "giveaway")]
#[command(about = "Giveaway CLI - Merkle roots and claim proofs for multi-token giveaways")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a claim set into a root hash file and a proof file
    Build {
        /// Claim set (JSON array, or CSV with a `.csv` extension)
        claims: PathBuf,

        /// Giveaway name, used in artifact file names
        #[arg(short, long)]
        giveaway: Option<String>,

        /// Network name, used as the artifact subdirectory
        #[arg(short, long)]
        network: Option<String>,

        #[arg(long)]
        chain_id: Option<u64>,

        /// Production network: draw salts from the OS random number generator
        #[arg(long)]
        live: bool,

        /// Seed for derived salts on test networks (32 bytes of hex)
        #[arg(long)]
        seed: Option<String>,

        /// Giveaway configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for artifacts
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Merge or keep repeated recipient/token entries instead of rejecting them
        #[arg(long)]
        allow_duplicates: bool,

        /// Include left/right bits with every proof
        #[arg(long)]
        positional: bool,
    },

    /// Check every proof in a proof file against a root hash file
    Verify {
        /// Proof file written by `build`
        proofs: PathBuf,

        /// Root hash file written by `build`
        root: PathBuf,
    },

    /// Generate a deterministic claims CSV for testing
    GenerateFixtures {
        /// Number of claims to generate
        #[arg(short, long)]
        count: u64,

        /// Seed for deterministic generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output file path
        #[arg(short, long, default_value = "fixtures.csv")]
        output: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            claims,
            giveaway,
            network,
            chain_id,
            live,
            seed,
            config,
            out_dir,
            allow_duplicates,
            positional,
        } => {
            commands::build::execute(BuildOptions {
                claims,
                giveaway,
                network,
                chain_id,
                live,
                seed,
                config,
                out_dir,
                allow_duplicates,
                positional,
            })?;
            Ok(())
        }

        Commands::Verify { proofs, root } => {
            commands::verify::execute(proofs, root)?;
            Ok(())
        }

        Commands::GenerateFixtures {
            count,
            seed,
            output,
        } => commands::generate_fixtures::execute(count, seed, output),
    }
}
