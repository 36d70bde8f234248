use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Configuration and CLI
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "rusty-portboard")]
#[command(about = "Generates a static dashboard of the services exposed by local containers")]
pub struct Args {
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Where the generated dashboard is written
    #[arg(short, long, default_value = "index.html")]
    pub output: PathBuf,

    /// Also publish the dashboard here as docker-dashboard.html, when the directory exists
    #[arg(long, default_value = "/srv/http")]
    pub web_root: PathBuf,

    /// Seconds between dashboard updates
    #[arg(short, long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    #[arg(short = 'p', long, default_value_t = 8080)]
    pub web_port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Serve the dashboard and a refresh endpoint over HTTP
    #[arg(short = 'w', long)]
    pub enable_web: bool,

    /// Update once and exit
    #[arg(long)]
    pub once: bool,

    /// Container runtime CLI to query (docker or podman)
    #[arg(long, default_value = "docker")]
    pub runtime: String,

    /// Seconds to wait for the runtime's container listing
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub runtime_timeout: u64,

    /// Only list running containers
    #[arg(long)]
    pub running_only: bool,

    #[arg(short, long, default_value = "logs")]
    pub log_dir: PathBuf,

    #[arg(short = 'v', long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Informational only: links are emitted as http and toggled in the browser.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_hostname() -> String {
    "localhost".to_string()
}
fn default_protocol() -> String {
    "http".to_string()
}
fn default_description() -> String {
    "Container Dashboard Configuration".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            protocol: default_protocol(),
            description: default_description(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads the config, writing a default one first if the file is absent.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }

        let config = Self::default();
        let content =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write default config: {}", path.display()))?;

        Ok(config)
    }
}
