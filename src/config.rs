use clap::Parser;
use eframe::egui::{Vec2, vec2};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::AlgorithmId;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the clustering API, without trailing slash.
    pub api_url: String,
    pub timeout_secs: u64,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub default_algorithm: AlgorithmId,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5001/api".to_string(),
            timeout_secs: 10,
            canvas_width: 500.0,
            canvas_height: 400.0,
            default_algorithm: AlgorithmId::Agglomerative,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read `path`, or `dashboard.json` if none was given. A missing
    /// default file is not an error; any other failure is logged and
    /// the defaults are used.
    pub fn load(path: Option<&Path>) -> Self {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !explicit && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}. Using default configuration.");
                Self::default()
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn canvas_size(&self) -> Vec2 {
        vec2(self.canvas_width.max(1.0), self.canvas_height.max(1.0))
    }
}

/// Interactive explorer for customer segmentation models.
#[derive(Debug, Parser)]
#[command(name = "cluster-dashboard", version, about)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the clustering API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Algorithm selected at startup (agglomerative, divisive, dbscan)
    #[arg(long)]
    pub algorithm: Option<AlgorithmId>,

    /// Log filter, e.g. `debug` or `cluster_dashboard=trace`
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Flags take precedence over values from the file.
    pub fn apply(&self, mut config: DashboardConfig) -> DashboardConfig {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(algorithm) = self.algorithm {
            config.default_algorithm = algorithm;
        }
        config
    }

    pub fn resolve(&self) -> DashboardConfig {
        self.apply(DashboardConfig::load(self.config.as_deref()))
    }
}
