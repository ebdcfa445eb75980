use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::SceneDescription;
use lumen_renderer::{render, render_parallel, render_to_sink, PpmSink, World, DEFAULT_BUCKET_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Render a scene of spheres with a Monte Carlo path tracer.
#[derive(Parser, Debug)]
#[command(name = "lumen", version, about)]
struct Args {
    /// Scene description (JSON). Renders the built-in showcase when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Output image, `.ppm` or `.png`. Use `-` to stream PPM to stdout.
    #[arg(short, long, default_value = "output.ppm")]
    output: PathBuf,

    /// Override the image width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Override the samples per pixel.
    #[arg(long)]
    samples: Option<u32>,

    /// Override the maximum bounce depth.
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seed for the random number generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Render buckets in parallel on all cores.
    #[arg(long)]
    parallel: bool,

    /// Bucket edge length in pixels for parallel rendering.
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,
}

impl Args {
    fn load_scene(&self) -> Result<SceneDescription> {
        let mut scene = match &self.scene {
            Some(path) => SceneDescription::load(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?,
            None => {
                log::info!("No scene given, using the built-in showcase");
                SceneDescription::showcase()
            }
        };

        if let Some(width) = self.width {
            scene.camera.image_width = width;
        }
        if let Some(samples) = self.samples {
            scene.camera.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            scene.camera.max_depth = max_depth;
        }
        Ok(scene)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let scene = args.load_scene()?;
    anyhow::ensure!(scene.camera.image_width > 0, "image width must be positive");
    anyhow::ensure!(
        scene.camera.samples_per_pixel > 0,
        "samples per pixel must be positive"
    );

    let start = Instant::now();
    let World {
        mut camera,
        objects,
    } = World::from_description(&scene).context("Failed to build scene")?;
    log::info!("Scene built in {:?} ({} objects)", start.elapsed(), objects.len());

    let start = Instant::now();
    if args.output.as_os_str() == "-" {
        anyhow::ensure!(!args.parallel, "--parallel cannot stream to stdout");
        let mut rng = StdRng::seed_from_u64(args.seed);
        let mut sink = PpmSink::new(BufWriter::new(io::stdout().lock()));
        render_to_sink(&mut camera, &objects, &mut rng, &mut sink)
            .context("Failed to write image to stdout")?;
        log::info!("Rendered in {:?}", start.elapsed());
        return Ok(());
    }

    let image = if args.parallel {
        render_parallel(&mut camera, &objects, args.seed, args.bucket_size)
    } else {
        let mut rng = StdRng::seed_from_u64(args.seed);
        render(&mut camera, &objects, &mut rng)
    };
    log::info!("Rendered in {:?}", start.elapsed());

    image
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply_to_showcase() {
        let args = Args::parse_from([
            "lumen",
            "--width",
            "64",
            "--samples",
            "3",
            "--max-depth",
            "4",
        ]);
        let scene = args.load_scene().unwrap();
        assert_eq!(scene.camera.image_width, 64);
        assert_eq!(scene.camera.samples_per_pixel, 3);
        assert_eq!(scene.camera.max_depth, 4);
        assert_eq!(scene.spheres.len(), 6);
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["lumen"]);
        assert_eq!(args.output, PathBuf::from("output.ppm"));
        assert_eq!(args.seed, 42);
        assert!(!args.parallel);
        assert_eq!(args.bucket_size, DEFAULT_BUCKET_SIZE);
    }

    #[test]
    fn test_missing_scene_file_is_an_error() {
        let args = Args::parse_from(["lumen", "--scene", "/nonexistent/scene.json"]);
        assert!(args.load_scene().is_err());
    }
}
