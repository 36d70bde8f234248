use crate::catalog::build_catalog;
use crate::cli_config::Config;
use crate::render::render_dashboard;
use crate::runtime::ContainerRuntime;

use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

// =============================================================================
// Dashboard Generation
// =============================================================================

/// File name used when publishing into the web root.
pub const WEB_ROOT_FILE: &str = "docker-dashboard.html";

#[derive(Debug)]
pub struct RefreshReport {
    pub services: usize,
    pub written: Vec<PathBuf>,
}

/// Everything a refresh needs. Immutable, so the update loop and the HTTP
/// handlers can share one instance; they only meet on disk.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config_path: PathBuf,
    output: PathBuf,
    web_root: PathBuf,
    runtime: ContainerRuntime,
    all_containers: bool,
}

impl Dashboard {
    pub fn new(
        config_path: PathBuf,
        output: PathBuf,
        web_root: PathBuf,
        runtime: ContainerRuntime,
        all_containers: bool,
    ) -> Self {
        Self {
            config_path,
            output,
            web_root,
            runtime,
            all_containers,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    fn load_config(&self) -> Config {
        match Config::load_or_create(&self.config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default configuration: {:#}", e);
                Config::default()
            }
        }
    }

    /// One full pipeline run: list, build, render, write.
    pub async fn refresh(&self) -> Result<RefreshReport> {
        let config = self.load_config();

        let records = self.runtime.list_containers(self.all_containers).await;
        let services = build_catalog(&records);
        debug!(
            "{} of {} containers expose services",
            services.len(),
            records.len()
        );

        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let html = render_dashboard(&services, &config, &generated_at);

        let mut written = Vec::new();
        write_html(&self.output, &html).await?;
        written.push(self.output.clone());

        if fs::metadata(&self.web_root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            let published = self.web_root.join(WEB_ROOT_FILE);
            write_html(&published, &html).await?;
            written.push(published);
        }

        info!(
            "Dashboard generated with {} services: {}",
            services.len(),
            written
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(RefreshReport {
            services: services.len(),
            written,
        })
    }
}

async fn write_html(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, html)
        .await
        .with_context(|| format!("Failed to write dashboard: {}", path.display()))
}
