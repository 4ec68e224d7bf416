use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use topoforge::{generate, GeneratorConfig};

#[derive(Parser)]
#[command(name = "topoforge")]
#[command(about = "Synthetic multi-tier ISP backbone topology generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sites.json and links.json
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "data")]
        outdir: PathBuf,

        /// Global random seed; identical seeds reproduce identical output
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Sites per ordinary city
        #[arg(long, default_value = "30")]
        sites_per_city: usize,

        /// Sites per hot (high-density) city
        #[arg(long, default_value = "80")]
        hot_multiplier: usize,

        /// Worker threads for tier synthesis (0 = rayon default)
        #[arg(short, long, default_value = "0")]
        threads: usize,

        /// Skip the tier/category compatibility policy
        #[arg(long)]
        no_policy: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            outdir,
            seed,
            sites_per_city,
            hot_multiplier,
            threads,
            no_policy,
        } => {
            if threads > 0 {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .context("Failed to size the rayon thread pool")?;
            }

            let config = GeneratorConfig {
                seed,
                sites_per_city,
                hot_city_multiplier: hot_multiplier,
                enforce_policy: !no_policy,
                timestamp: None,
            };

            println!("Generating topology (seed {})...", seed);
            let start = Instant::now();
            let topology = generate(&config)?;
            println!(
                "Synthesis took {:.2}s: {} sites, {} links",
                start.elapsed().as_secs_f64(),
                topology.sites.len(),
                topology.links.len()
            );

            std::fs::create_dir_all(&outdir)
                .with_context(|| format!("Failed to create {}", outdir.display()))?;
            let sites_path = outdir.join("sites.json");
            let links_path = outdir.join("links.json");
            serde_json::to_writer_pretty(
                BufWriter::new(File::create(&sites_path)?),
                &topology.sites,
            )?;
            serde_json::to_writer_pretty(
                BufWriter::new(File::create(&links_path)?),
                &topology.links,
            )?;
            println!(
                "Wrote {} and {}",
                sites_path.display(),
                links_path.display()
            );
        }
    }
    Ok(())
}
