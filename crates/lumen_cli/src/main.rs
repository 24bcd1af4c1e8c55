//! `lumen [CONFIG.json] [OUTPUT.png]`
//!
//! Renders the built-in Cornell box demo. Settings come from an optional
//! JSON file; missing fields use their defaults.

mod demo;

use anyhow::{Context, Result};
use lumen_renderer::{render_parallel, Integrator, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Command-line configuration: image size plus the render settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Config {
    width: u32,
    height: u32,
    output: PathBuf,
    /// Seeds both the BVH build and the per-tile generators; random when absent
    seed: Option<u64>,
    #[serde(flatten)]
    render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            output: PathBuf::from("lumen.png"),
            seed: None,
            render: RenderConfig::default(),
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Lumen");

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => Config::default(),
    };
    if let Some(output) = args.next() {
        config.output = PathBuf::from(output);
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    config.seed = Some(seed);
    log::info!("Config: {:?}", config);

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(seed);
    let scene = demo::cornell_scene(config.render.background, &mut rng)
        .context("Failed to build demo scene")?;
    let camera = demo::cornell_camera(config.width, config.height);
    log::info!("Scene built in {:?}", start.elapsed());

    let start = Instant::now();
    let integrator = Integrator::new(&scene);
    let image = render_parallel(&camera, &integrator, &config.render, seed);
    log::info!("Rendered in {:?}", start.elapsed());

    image
        .save_png(&config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    log::info!("Saved to {}", config.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_and_flatten() {
        let json = r#"{ "width": 32, "seed": 9, "samples_per_pixel": 4 }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.width, 32);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.height, 600);
        assert_eq!(config.render.samples_per_pixel, 4);
        assert_eq!(config.render.max_depth, RenderConfig::default().max_depth);
        assert_eq!(config.output, PathBuf::from("lumen.png"));
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/lumen.json")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config"));
    }
}
