use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tileworld::algorithms::Algorithm;
use tileworld::ascii::AsciiRenderer;
use tileworld::config::{Preset, WorldConfig};
use tileworld::export::{self, ImageRenderer};
use tileworld::heightmap::NoiseSettings;
use tileworld::render::{NullRenderer, TileRenderer};
use tileworld::world::Layer;

#[derive(Parser, Debug)]
#[command(name = "tileworld")]
#[command(about = "Generate procedural tile maps from layered algorithm pipelines")]
struct Args {
    /// Width of the map in tiles (overrides the config file)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the map in tiles (overrides the config file)
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Load the world description from a JSON file
    #[arg(long)]
    config: Option<String>,

    /// Built-in pipeline when no config is given: island, drunken_island, random
    #[arg(short, long, default_value = "island")]
    preset: String,

    /// Print the map as ASCII to stdout
    #[arg(long)]
    ascii: bool,

    /// Write the ASCII map plus a legend to a text file
    #[arg(long)]
    ascii_file: Option<String>,

    /// Export the map to PNG (specify output path)
    #[arg(long)]
    png: Option<String>,

    /// Pixels per tile for PNG export
    #[arg(long, default_value = "4")]
    scale: u32,

    /// Export the terrain heightmap to PNG (specify output path)
    #[arg(long)]
    heightmap_png: Option<String>,

    /// Write the resolved world config as JSON (e.g., "world.json")
    #[arg(long)]
    dump_config: Option<String>,
}

/// Forwards every refresh to each attached renderer.
struct Fanout<'a>(Vec<&'a mut dyn TileRenderer>);

impl TileRenderer for Fanout<'_> {
    fn refresh_all(&mut self, layer: Layer, grid: &tileworld::Grid) {
        for renderer in self.0.iter_mut() {
            renderer.refresh_all(layer, grid);
        }
    }

    fn refresh_tiles(&mut self, layer: Layer, grid: &tileworld::Grid, cells: &[tileworld::Coord]) {
        for renderer in self.0.iter_mut() {
            renderer.refresh_tiles(layer, grid, cells);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match args.config {
        Some(ref path) => {
            println!("Loading world config from {}", path);
            WorldConfig::load(path)?
        }
        None => {
            let preset = Preset::from_name(&args.preset).ok_or_else(|| {
                let names: Vec<&str> = Preset::all().iter().map(|p| p.name()).collect();
                format!("unknown preset '{}' (expected one of: {})", args.preset, names.join(", "))
            })?;
            preset.config(128, 64, 0)
        }
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    // An explicit seed wins; a preset without one gets a random seed
    config.seed = match (args.seed, args.config.is_some()) {
        (Some(seed), _) => seed,
        (None, true) => config.seed,
        (None, false) => rand::random(),
    };

    println!("Generating world with seed: {}", config.seed);
    println!("Map size: {}x{}", config.width, config.height);

    if let Some(ref path) = args.dump_config {
        config.save(path)?;
        println!("Config saved to: {}", path);
    }

    let mut world = config.build()?;
    let mut ascii = AsciiRenderer::default();
    let mut image = ImageRenderer::new(export::default_palette(), args.scale);
    let mut null = NullRenderer;

    let report = {
        let mut targets: Vec<&mut dyn TileRenderer> = Vec::new();
        if args.ascii || args.ascii_file.is_some() {
            targets.push(&mut ascii);
        }
        if args.png.is_some() {
            targets.push(&mut image);
        }
        if targets.is_empty() {
            targets.push(&mut null);
        }
        world.generate(&mut Fanout(targets))
    };

    for stage in &report.stages {
        println!("  [{}] {}: {:?}", stage.layer.name(), stage.algorithm, stage.outcome);
    }
    let (requested, placed) = report.rivers();
    if requested > 0 {
        println!("Rivers: {} of {} placed", placed, requested);
    }
    let features = report.features_placed();
    if features > 0 {
        println!("Features placed: {}", features);
    }

    if args.ascii {
        print!("{}", ascii.render());
    }

    if let Some(ref path) = args.ascii_file {
        ascii.export(path)?;
        println!("ASCII map saved to: {}", path);
    }

    if let Some(ref path) = args.png {
        let (width, height) = image.save(path)?;
        println!("Map saved to: {} ({}x{} pixels)", path, width, height);
    }

    if let Some(ref path) = args.heightmap_png {
        // Use the terrain noise of the first classifier stage, if any
        let (noise, island) = config
            .ground
            .iter()
            .find_map(|stage| match stage {
                Algorithm::NoiseClassifier(c) => Some((c.noise.clone(), c.apply_island_mask)),
                _ => None,
            })
            .unwrap_or_else(|| (NoiseSettings::default(), false));
        let heightmap = noise.heightmap(config.width, config.height, config.seed, island);
        export::export_heightmap(&heightmap, path)?;
        println!("Heightmap saved to: {}", path);
    }

    Ok(())
}
