use std::io::ErrorKind;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, warn};

// =============================================================================
// External Command Interface
// =============================================================================

const LIST_FORMAT: &str = "{{.Names}}|{{.Image}}|{{.Status}}|{{.Ports}}";
const FIELD_DELIMITER: char = '|';

/// How long `ps` may take before the run gives up on it.
pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// One line of `ps` output, kept as the runtime printed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    pub name: String,
    pub image: String,
    pub status: String,
    pub ports: String,
}

#[derive(Debug, Clone)]
pub struct ContainerRuntime {
    binary: String,
    list_timeout: Duration,
}

impl ContainerRuntime {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            list_timeout: DEFAULT_LIST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, list_timeout: Duration) -> Self {
        self.list_timeout = list_timeout;
        self
    }

    /// Never fails: a missing binary, a failing command or one that outlives
    /// the timeout yields no containers.
    pub async fn list_containers(&self, all_containers: bool) -> Vec<ContainerRecord> {
        let mut args = vec!["ps"];
        if all_containers {
            args.push("-a");
        }
        args.extend(["--format", LIST_FORMAT]);

        let mut command = Command::new(&self.binary);
        // The child is killed if the timeout drops its future.
        command.args(&args).kill_on_drop(true);

        let output = match timeout(self.list_timeout, command.output()).await {
            Err(_) => {
                error!(
                    "'{} ps' did not finish within {}s",
                    self.binary,
                    self.list_timeout.as_secs_f32()
                );
                return Vec::new();
            }
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "'{}' not found, is the container runtime installed?",
                    self.binary
                );
                return Vec::new();
            }
            Ok(Err(e)) => {
                error!("Failed to execute '{} ps': {}", self.binary, e);
                return Vec::new();
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                "{} ps failed ({}): {}",
                self.binary,
                output.status,
                stderr.trim()
            );
            return Vec::new();
        }

        let records = parse_list_output(&String::from_utf8_lossy(&output.stdout));
        debug!("{} ps returned {} containers", self.binary, records.len());
        records
    }
}

/// Splits `ps --format` output into records, skipping lines without all four fields.
pub fn parse_list_output(stdout: &str) -> Vec<ContainerRecord> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.split(FIELD_DELIMITER);
            let record = ContainerRecord {
                name: fields.next()?.to_string(),
                image: fields.next()?.to_string(),
                status: fields.next()?.to_string(),
                ports: fields.next()?.to_string(),
            };
            Some(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_output_fields() {
        let stdout = "web|nginx:alpine|Up 2 hours|0.0.0.0:8080->80/tcp\n\
                      pg|postgres:15|Exited (0) 3 days ago|\n";
        let records = parse_list_output(stdout);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "web");
        assert_eq!(records[0].image, "nginx:alpine");
        assert_eq!(records[0].status, "Up 2 hours");
        assert_eq!(records[0].ports, "0.0.0.0:8080->80/tcp");
        assert_eq!(records[1].ports, "");
    }

    #[test]
    fn test_parse_list_output_skips_short_and_blank_lines() {
        let stdout = "\n   \nbroken|line\nok|img|Up|\n";
        let records = parse_list_output(stdout);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ok");
    }

    #[test]
    fn test_parse_list_output_ignores_extra_fields() {
        let records = parse_list_output("a|b|c|d|e");
        assert_eq!(records[0].ports, "d");
    }

    #[tokio::test]
    async fn test_missing_binary_yields_empty_list() {
        let runtime = ContainerRuntime::new("definitely-not-a-container-runtime-xyz");
        assert!(runtime.list_containers(true).await.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_yields_empty_list() {
        let runtime = ContainerRuntime::new("false");
        assert!(runtime.list_containers(false).await.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_runtime_times_out_with_empty_list() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("hung-runtime");
        std::fs::write(&script, "#!/bin/sh\nsleep 30\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runtime = ContainerRuntime::new(script.to_string_lossy())
            .with_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        assert!(runtime.list_containers(true).await.is_empty());
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
