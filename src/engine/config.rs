//! Runtime settings shared by every exercise binary: window, GL version,
//! asset root, log filter and the scene tuning constants.
//!
//! Defaults live in code; a JSON file may override any subset and the
//! command line overrides both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::engine::utils::glsl::GlVersion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            resizable: false,
            vsync: true,
        }
    }
}

impl WindowConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Degrees per second.
    pub spin_speed: f32,
    /// World units per second.
    pub light_speed: f32,
    pub camera_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            spin_speed: 30.0,
            light_speed: 3.0,
            camera_speed: 3.0,
            mouse_sensitivity: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseConfig {
    pub window: WindowConfig,
    pub gl: GlVersion,
    pub assets: PathBuf,
    pub logging: Option<String>,
    pub scene: SceneConfig,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            gl: GlVersion::default(),
            assets: PathBuf::from("assets"),
            logging: None,
            scene: SceneConfig::default(),
        }
    }
}

impl ExerciseConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid exercise config")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Defaults, then the `--config` file, then the remaining flags.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(assets) = &cli.assets {
            config.assets = assets.clone();
        }
        if let Some(filter) = &cli.log {
            config.logging = Some(filter.clone());
        }
        Ok(config)
    }
}

/// Command line shared by the exercise binaries.
#[derive(Parser, Debug, Default)]
#[command(about = "OpenGL exercise")]
pub struct Cli {
    /// JSON settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding `shaders/` and `models/`
    #[arg(short, long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `gl_exercises=trace`
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}
