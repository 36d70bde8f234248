use regex::Regex;
use std::sync::LazyLock;

// =============================================================================
// Port Mapping Parser
// =============================================================================

/// Host port is the digit run after the last colon, so IPv6 interfaces such
/// as `[::1]` or `[fe80::2]` never leak into it.
static HOST_PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*:(\d+)").expect("host port pattern is valid"));
static CONTAINER_PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("container port pattern is valid"));

/// A published port. Both sides are always digit strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host_port: String,
    pub container_port: String,
}

impl PortMapping {
    fn new(host_port: &str, container_port: &str) -> Self {
        Self {
            host_port: host_port.to_string(),
            container_port: container_port.to_string(),
        }
    }
}

/// Parses a runtime port column such as `0.0.0.0:8080->80/tcp, [::]:8080->80/tcp`.
/// Clauses that do not yield both ports are skipped.
pub fn parse_ports(ports: &str) -> Vec<PortMapping> {
    ports
        .split(',')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .filter_map(parse_clause)
        .collect()
}

fn parse_clause(clause: &str) -> Option<PortMapping> {
    if clause.contains("->") {
        let parts: Vec<&str> = clause.split("->").collect();
        let [host_part, container_part] = parts.as_slice() else {
            return None;
        };

        let host_port = HOST_PORT.captures(host_part.trim())?.get(1)?.as_str();
        let container_port = CONTAINER_PORT
            .captures(container_part.trim())?
            .get(1)?
            .as_str();
        return Some(PortMapping::new(host_port, container_port));
    }

    // Shorthand "8080:80/tcp"; a leading "::" is a bare IPv6 address.
    if clause.contains(':') && !clause.starts_with("::") {
        let (host_port, rest) = clause.split_once(':')?;
        let host_port = host_port.trim();
        let container_port = rest.trim().split('/').next()?.trim();

        if is_port_digits(host_port) && is_port_digits(container_port) {
            return Some(PortMapping::new(host_port, container_port));
        }
    }

    None
}

fn is_port_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
