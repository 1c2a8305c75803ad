//! Application configuration.
//!
//! Lookup order: `--config <path>`, then `config.json` in the platform
//! config directory, then built-in defaults. Command-line flags override
//! whatever the file said.

use std::path::{Path, PathBuf};

use clap::Parser;
use directories::ProjectDirs;
use glyphtess_core::{GlyphError, RenderState};
use glyphtess_fonts::FONT_SLOTS;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            title: "glyphtess".to_string(),
        }
    }
}

/// Raw selector values applied before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialState {
    pub scene: u8,
    pub style: u8,
    pub font: u8,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            scene: 1,
            style: 1,
            font: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// String laid out in the glyph scene.
    pub text: String,
    /// Up to three font files, one per font slot.
    pub fonts: Vec<PathBuf>,
    /// Directory holding `patch.wgsl` and `plain.wgsl`. Embedded shaders
    /// are used when unset.
    pub shader_dir: Option<PathBuf>,
    pub window: WindowConfig,
    /// Upper bound on glyph patches per string.
    pub max_patches: usize,
    pub clear_color: [f32; 4],
    /// Marker size in pixels.
    pub point_size: f32,
    pub initial: InitialState,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            text: "Petras".to_string(),
            fonts: vec![
                PathBuf::from("Lora-Regular.ttf"),
                PathBuf::from("SourceSansPro-Regular.otf"),
                PathBuf::from("Inconsolata.otf"),
            ],
            shader_dir: None,
            window: WindowConfig::default(),
            max_patches: 8192,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            point_size: 4.0,
            initial: InitialState::default(),
        }
    }
}

/// Command line.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "glyphtess", about = "Draws font outlines as tessellated curves")]
pub struct Cli {
    /// Read configuration from this file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Text shown in the glyph scene.
    #[arg(long)]
    pub text: Option<String>,

    /// Font file; repeat up to three times.
    #[arg(long = "font", value_name = "PATH")]
    pub fonts: Vec<PathBuf>,

    #[arg(long, value_name = "DIR")]
    pub shader_dir: Option<PathBuf>,

    #[arg(long)]
    pub max_patches: Option<usize>,
}

fn invalid(msg: impl Into<String>) -> GlyphError {
    GlyphError::InitializationFailure(msg.into())
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, GlyphError> {
        serde_json::from_str(json).map_err(|e| invalid(format!("bad config: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self, GlyphError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// `config.json` in the platform config directory, if there is one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "glyphtess").map(|d| d.config_dir().join(CONFIG_FILE))
    }

    /// Resolve the configuration for `cli`: pick the file, apply flag
    /// overrides, validate.
    pub fn load(cli: &Cli) -> Result<Self, GlyphError> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::info!(path = %path.display(), "using config file");
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };
        let config = base.merge(cli);
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn merge(mut self, cli: &Cli) -> Self {
        if let Some(text) = &cli.text {
            self.text = text.clone();
        }
        if !cli.fonts.is_empty() {
            self.fonts = cli.fonts.clone();
        }
        if let Some(dir) = &cli.shader_dir {
            self.shader_dir = Some(dir.clone());
        }
        if let Some(n) = cli.max_patches {
            self.max_patches = n;
        }
        self
    }

    pub fn validate(&self) -> Result<(), GlyphError> {
        if self.fonts.len() > FONT_SLOTS {
            return Err(invalid(format!(
                "{} fonts configured, at most {} supported",
                self.fonts.len(),
                FONT_SLOTS
            )));
        }
        if self.max_patches == 0 {
            return Err(invalid("max_patches must be at least 1"));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window size must be non-zero"));
        }
        if self.point_size.is_nan() || self.point_size <= 0.0 {
            return Err(invalid("point_size must be positive"));
        }
        self.initial_state()?;
        Ok(())
    }

    pub fn initial_state(&self) -> Result<RenderState, GlyphError> {
        let i = self.initial;
        RenderState::from_values(i.scene, i.style, i.font)
            .map_err(|e| invalid(format!("initial state: {e}")))
    }
}
