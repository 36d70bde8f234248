use crate::dashboard::Dashboard;
use crate::server;

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

// =============================================================================
// Update Loop
// =============================================================================

#[derive(Debug, Clone)]
pub struct WebSettings {
    pub bind: String,
    pub port: u16,
}

/// Refresh outcomes over one run of the loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateStats {
    pub succeeded: u32,
    pub failed: u32,
}

pub struct DashboardUpdater {
    dashboard: Arc<Dashboard>,
    update_interval: Duration,
    web: Option<WebSettings>,
}

impl DashboardUpdater {
    pub fn new(dashboard: Dashboard, update_interval: Duration, web: Option<WebSettings>) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
            update_interval,
            web,
        }
    }

    async fn update_dashboard(&self) -> bool {
        info!("Updating dashboard");
        match self.dashboard.refresh().await {
            Ok(_) => true,
            Err(e) => {
                error!("Dashboard update failed: {:#}", e);
                false
            }
        }
    }

    /// Single generation for `--once`; failures are returned to the caller.
    pub async fn run_once(&self) -> Result<()> {
        let report = self.dashboard.refresh().await?;
        info!(
            "Dashboard updated once ({} services, {} files written)",
            report.services,
            report.written.len()
        );
        Ok(())
    }

    /// Refreshes until Ctrl+C or SIGTERM.
    pub async fn run(&self) -> UpdateStats {
        self.run_until(shutdown_signal()).await
    }

    /// Refreshes on every tick, the first one immediately, until `shutdown`
    /// resolves. A failed refresh or an unavailable web server never ends it.
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> UpdateStats {
        info!(
            "Update interval: {}s, web server: {}",
            self.update_interval.as_secs(),
            match &self.web {
                Some(web) => format!("{}:{}", web.bind, web.port),
                None => "disabled".to_string(),
            }
        );

        let web_task = self.web.clone().map(|web| {
            let dashboard = Arc::clone(&self.dashboard);
            tokio::spawn(async move {
                if let Err(e) = server::serve(dashboard, &web.bind, web.port).await {
                    error!("Web server unavailable: {:#}", e);
                }
            })
        });

        // First tick fires immediately, giving the initial update.
        let mut update_interval = interval(self.update_interval);
        update_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);
        let mut stats = UpdateStats::default();

        loop {
            tokio::select! {
                _ = update_interval.tick() => {
                    if self.update_dashboard().await {
                        stats.succeeded += 1;
                    } else {
                        stats.failed += 1;
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping updates");
                    break;
                }
            }
        }

        if let Some(task) = web_task {
            task.abort();
        }

        info!(
            "Dashboard updater stopped ({} updates, {} failed)",
            stats.succeeded, stats.failed
        );
        stats
    }
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ContainerRuntime;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use tokio::sync::oneshot;
    use tokio::time::sleep;

    fn dashboard(dir: &Path, output: PathBuf) -> Dashboard {
        Dashboard::new(
            dir.join("config.json"),
            output,
            dir.join("no-web-root"),
            ContainerRuntime::new("definitely-not-a-container-runtime-xyz"),
            true,
        )
    }

    fn updater(dir: &Path, output: PathBuf) -> DashboardUpdater {
        DashboardUpdater::new(dashboard(dir, output), Duration::from_secs(300), None)
    }

    /// Shutdown future fired by the returned sender.
    fn shutdown_channel() -> (oneshot::Sender<()>, impl Future<Output = ()>) {
        let (tx, rx) = oneshot::channel::<()>();
        (tx, async move {
            let _ = rx.await;
        })
    }

    #[tokio::test]
    async fn test_run_once_generates_dashboard() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("index.html");

        updater(dir.path(), output.clone()).run_once().await.unwrap();
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_failed_update_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("index.html");
        std::fs::create_dir(&output).unwrap();

        let updater = updater(dir.path(), output);
        assert!(!updater.update_dashboard().await);
        assert!(updater.run_once().await.is_err());
    }

    #[tokio::test]
    async fn test_loop_refreshes_immediately() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("index.html");
        let updater = updater(dir.path(), output.clone());

        let (tx, shutdown) = shutdown_channel();
        let stop = tokio::spawn(async move {
            sleep(Duration::from_millis(100)).await;
            let _ = tx.send(());
        });

        let stats = updater.run_until(shutdown).await;
        stop.await.unwrap();

        assert_eq!(stats, UpdateStats { succeeded: 1, failed: 0 });
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_loop_keeps_ticking() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("index.html");
        let updater = DashboardUpdater::new(
            dashboard(dir.path(), output.clone()),
            Duration::from_millis(10),
            None,
        );

        let (tx, shutdown) = shutdown_channel();
        let stop = tokio::spawn(async move {
            sleep(Duration::from_millis(200)).await;
            let _ = tx.send(());
        });

        let stats = updater.run_until(shutdown).await;
        stop.await.unwrap();

        assert!(stats.succeeded >= 2, "only {:?}", stats);
        assert_eq!(stats.failed, 0);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_loop_recovers_after_failed_refresh() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("index.html");
        // A directory in the output's place makes every write fail.
        std::fs::create_dir(&output).unwrap();

        let updater = DashboardUpdater::new(
            dashboard(dir.path(), output.clone()),
            Duration::from_millis(10),
            None,
        );

        let (tx, shutdown) = shutdown_channel();
        let blocker = output.clone();
        let stop = tokio::spawn(async move {
            sleep(Duration::from_millis(80)).await;
            std::fs::remove_dir(&blocker).unwrap();
            sleep(Duration::from_millis(200)).await;
            let _ = tx.send(());
        });

        let stats = updater.run_until(shutdown).await;
        stop.await.unwrap();

        assert!(stats.failed >= 1, "no failures in {:?}", stats);
        assert!(stats.succeeded >= 1, "never recovered: {:?}", stats);
        assert!(output.is_file());
    }

    #[tokio::test]
    async fn test_loop_survives_taken_web_port() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("index.html");
        let updater = DashboardUpdater::new(
            dashboard(dir.path(), output.clone()),
            Duration::from_millis(10),
            Some(WebSettings {
                bind: "127.0.0.1".to_string(),
                port,
            }),
        );

        let (tx, shutdown) = shutdown_channel();
        let stop = tokio::spawn(async move {
            sleep(Duration::from_millis(200)).await;
            let _ = tx.send(());
        });

        let stats = updater.run_until(shutdown).await;
        stop.await.unwrap();
        drop(taken);

        assert!(stats.succeeded >= 2, "only {:?}", stats);
        assert!(output.exists());
    }
}
