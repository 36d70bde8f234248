use crate::classify::is_infrastructure;
use crate::naming::display_name;
use crate::ports::{PortMapping, parse_ports};
use crate::runtime::ContainerRecord;
use tracing::debug;

// =============================================================================
// Service Catalog
// =============================================================================

/// Every service lands in this category; nothing assigns another one yet.
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub display_name: String,
    pub image: String,
    pub status: String,
    pub ports: Vec<PortMapping>,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Running,
    Unhealthy,
    Stopped,
}

impl ServiceState {
    pub fn css_class(self) -> &'static str {
        match self {
            ServiceState::Running => "status-running",
            ServiceState::Unhealthy => "status-unhealthy",
            ServiceState::Stopped => "status-stopped",
        }
    }
}

impl ServiceRecord {
    /// Host port of the first mapping; the one the dashboard links to.
    pub fn primary_port(&self) -> Option<&str> {
        self.ports.first().map(|p| p.host_port.as_str())
    }

    pub fn is_up(&self) -> bool {
        self.status.contains("Up")
    }

    pub fn is_stopped(&self) -> bool {
        self.status.contains("Exited") || self.status.contains("Created")
    }

    pub fn state(&self) -> ServiceState {
        if !self.is_up() {
            ServiceState::Stopped
        } else if self.status.to_lowercase().contains("unhealthy") {
            ServiceState::Unhealthy
        } else {
            ServiceState::Running
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogSummary {
    pub running: usize,
    pub stopped: usize,
    pub total: usize,
}

impl CatalogSummary {
    /// Restarting or paused-looking statuses may fall in neither bucket.
    pub fn of(services: &[ServiceRecord]) -> Self {
        Self {
            running: services.iter().filter(|s| s.is_up()).count(),
            stopped: services.iter().filter(|s| s.is_stopped()).count(),
            total: services.len(),
        }
    }
}

/// Drops infrastructure and unpublished containers, then sorts by display
/// name case-insensitively. The sort is stable, so ties keep listing order.
pub fn build_catalog(records: &[ContainerRecord]) -> Vec<ServiceRecord> {
    let mut services: Vec<ServiceRecord> = records
        .iter()
        .filter_map(|record| {
            if is_infrastructure(&record.name, &record.image) {
                debug!("Skipping {} - infrastructure container", record.name);
                return None;
            }

            let ports = parse_ports(&record.ports);
            if ports.is_empty() {
                debug!("Skipping {} - no published ports", record.name);
                return None;
            }

            Some(ServiceRecord {
                display_name: display_name(&record.name, &record.image),
                image: record.image.clone(),
                status: record.status.clone(),
                ports,
                category: DEFAULT_CATEGORY.to_string(),
            })
        })
        .collect();

    services.sort_by_cached_key(|service| service.display_name.to_lowercase());
    services
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::parse_list_output;

    fn record(name: &str, image: &str, status: &str, ports: &str) -> ContainerRecord {
        ContainerRecord {
            name: name.to_string(),
            image: image.to_string(),
            status: status.to_string(),
            ports: ports.to_string(),
        }
    }

    fn service(name: &str, status: &str) -> ServiceRecord {
        ServiceRecord {
            display_name: name.to_string(),
            image: "img".to_string(),
            status: status.to_string(),
            ports: parse_ports("0.0.0.0:80->80/tcp"),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    #[test]
    fn test_filters_infrastructure_and_portless() {
        let records = vec![
            record("pg", "postgres:15", "Up 1 hour", "0.0.0.0:5432->5432/tcp"),
            record("worker-queue", "myorg/queue:1", "Up 1 hour", ""),
            record("gitea", "gitea/gitea:1.21", "Up 1 hour", "0.0.0.0:3000->3000/tcp"),
        ];

        let catalog = build_catalog(&records);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].display_name, "Gitea");
        assert_eq!(catalog[0].ports.len(), 1);
        assert_eq!(catalog[0].category, "Other");
        assert_eq!(catalog[0].primary_port(), Some("3000"));
    }

    #[test]
    fn test_blank_name_and_image_still_get_a_label() {
        let records = parse_list_output("||Up 1 minute|0.0.0.0:80->80/tcp\n");
        let catalog = build_catalog(&records);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].display_name, "Unknown");
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let records = vec![
            record("Zeta", "a/zeta", "Up", "0.0.0.0:1->1/tcp"),
            record("alpha", "a/alpha", "Up", "0.0.0.0:2->2/tcp"),
            record("Beta", "a/beta", "Up", "0.0.0.0:3->3/tcp"),
        ];

        let names: Vec<String> = build_catalog(&records)
            .into_iter()
            .map(|s| s.display_name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_names() {
        let records = vec![
            record("whoami-1", "traefik/whoami", "Up", "0.0.0.0:81->80/tcp"),
            record("whoami-2", "traefik/whoami", "Up", "0.0.0.0:82->80/tcp"),
        ];

        let catalog = build_catalog(&records);
        assert_eq!(catalog[0].display_name, catalog[1].display_name);
        assert_eq!(catalog[0].primary_port(), Some("81"));
        assert_eq!(catalog[1].primary_port(), Some("82"));
    }

    #[test]
    fn test_identical_input_identical_catalog() {
        let records = vec![
            record("grafana", "grafana/grafana", "Up", "0.0.0.0:3000->3000/tcp"),
            record("uptime-kuma", "louislam/uptime-kuma:1", "Up", "0.0.0.0:3001->3001/tcp"),
        ];
        assert_eq!(build_catalog(&records), build_catalog(&records));
    }

    #[test]
    fn test_state_from_status() {
        assert_eq!(service("a", "Up 3 hours").state(), ServiceState::Running);
        assert_eq!(
            service("a", "Up 3 hours (unhealthy)").state(),
            ServiceState::Unhealthy
        );
        assert_eq!(
            service("a", "Exited (1) 2 days ago").state(),
            ServiceState::Stopped
        );
    }

    #[test]
    fn test_summary_counts() {
        let services = vec![
            service("a", "Up 1 minute"),
            service("b", "Up 2 minutes (unhealthy)"),
            service("c", "Exited (0) 1 day ago"),
            service("d", "Created"),
            service("e", "Restarting (1) 5 seconds ago"),
        ];

        let summary = CatalogSummary::of(&services);
        assert_eq!(summary.running, 2);
        assert_eq!(summary.stopped, 2);
        assert_eq!(summary.total, 5);
    }
}
