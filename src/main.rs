use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use landmass_generator::config::{GenerationMode, GeneratorConfig};
use landmass_generator::{generate, postprocess};

#[derive(Parser, Debug)]
#[command(name = "landmass_generator")]
#[command(about = "Grow organic landmasses and fill them with elevation")]
struct Args {
    /// Seed text (random seed if not specified)
    #[arg(short, long)]
    seed: Option<String>,

    /// Side of the square map, a power of two
    #[arg(long)]
    size: Option<usize>,

    /// Number of landmasses to grow
    #[arg(long)]
    shapes: Option<usize>,

    /// Target land coverage of the placement grid (0-1)
    #[arg(long)]
    coverage: Option<f32>,

    /// Generation mode
    #[arg(long, value_enum)]
    mode: Option<GenerationMode>,

    /// Load settings from a JSON file; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip normalization and smoothing
    #[arg(long)]
    raw: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl Args {
    fn to_config(&self) -> Result<GeneratorConfig, landmass_generator::ConfigError> {
        let mut cfg = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(seed) = &self.seed {
            cfg.seed = seed.clone();
        }
        if let Some(size) = self.size {
            cfg.map_size = size;
        }
        if let Some(shapes) = self.shapes {
            cfg.shape_count = shapes;
        }
        if let Some(coverage) = self.coverage {
            cfg.coverage = coverage;
        }
        if let Some(mode) = self.mode {
            cfg.mode = mode;
        }
        Ok(cfg)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = match args.to_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Map size: {}x{}", cfg.map_size, cfg.map_size);
    println!("Mode: {}", cfg.mode);

    let mut map = match generate(&cfg) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("Seed: {}", map.seed.master);

    if cfg.mode == GenerationMode::Shaped {
        println!(
            "Built {} of {} landmasses ({} dropped, {} empty fills)",
            map.shapes.len(),
            cfg.shape_count,
            map.dropped,
            map.failed_fills
        );
        for shape in &map.shapes {
            println!(
                "  #{:<2} box ({}, {})-({}, {})  {} coast points{}  {} land cells",
                shape.id,
                shape.rect.start.x,
                shape.rect.start.y,
                shape.rect.end.x,
                shape.rect.end.y,
                shape.contour.len(),
                if shape.contour_closed { "" } else { " (open)" },
                shape.land_cells()
            );
        }
    }
    println!("Land: {:.1}% of the map", 100.0 * map.land_fraction());

    let summary = map.summary();
    if !args.raw {
        postprocess::apply(&mut map.heights, &cfg);
    }
    let (min_h, max_h) = map.heights.min_max();
    println!("Elevation range: {:.3} to {:.3}", min_h, max_h);

    if let Some(path) = &args.summary {
        let written = serde_json::to_string_pretty(&summary)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("Summary written to: {}", path.display()),
            Err(e) => {
                eprintln!("Failed to write summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
