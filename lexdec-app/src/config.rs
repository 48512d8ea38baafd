use anyhow::{Context, Result};
use lexdec_experiment::RunnerConfig;
use lexdec_render::DEFAULT_FONT_PATH;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub runner: RunnerConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub font: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn font_path(&self) -> PathBuf {
        self.display
            .font
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH))
    }
}
