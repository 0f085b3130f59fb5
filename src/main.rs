use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use spheregen::{Biome, ExportWriter, PresetLoader, WorldGenerator};

#[derive(Debug, Parser)]
#[command(author, version, about = "Spherical world generator")]
struct Cli {
    /// Path to the preset YAML file
    #[arg(long, default_value = "presets/standard.yaml")]
    preset: PathBuf,

    /// Override the preset's detail factor
    #[arg(long)]
    detail_factor: Option<u32>,

    /// Override the starting biome (e.g. meadow, desert)
    #[arg(long)]
    biome: Option<Biome>,

    /// Fix the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the facet count (3 to 5)
    #[arg(long)]
    facets: Option<u32>,

    /// Write world.json and metadata.json under this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = PresetLoader::new(".");
    let mut config = loader.load(&cli.preset)?;
    if let Some(detail_factor) = cli.detail_factor {
        config.detail_factor = detail_factor;
    }
    if let Some(biome) = cli.biome {
        config.starting_biome = biome;
    }
    if let Some(facets) = cli.facets {
        config.facets = facets;
    }
    config.seed = cli.seed.or(config.seed);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let generator = WorldGenerator::new(config).context("Invalid generation settings")?;
    let (world, reports) = generator
        .generate_with_report()
        .context("World generation failed")?;

    println!(
        "World '{}' (seed {}): {} tiles, detail factor {}, land fraction {:.3}",
        world.name(),
        world.seed(),
        world.tile_count(),
        world.detail_factor(),
        world.land_fraction()
    );
    for (biome, count) in world.biome_census() {
        println!("  {biome:<10} {count}");
    }
    println!(
        "{} {} capitals: {}",
        world.capitals().len(),
        world.starting_biome(),
        world
            .capitals()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );
    for report in &reports {
        println!("  {:<10} {:>9.3} ms", report.name, report.duration_ms);
    }

    if let Some(dir) = cli.export_dir {
        let path = ExportWriter::new(&dir)
            .write(&world)
            .with_context(|| format!("Failed to export world to {}", dir.display()))?;
        println!("Exported to {}", path.display());
    }
    Ok(())
}
