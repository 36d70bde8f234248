use regex::Regex;
use std::sync::LazyLock;

// =============================================================================
// Display Name Normalizer
// =============================================================================

const SEPARATORS: [char; 4] = ['-', '_', '.', ' '];

/// Minimum length, in characters, of a cleaned name before the image is used instead.
const MIN_NAME_LEN: usize = 3;

/// Label for a container whose name and image are both blank.
const UNKNOWN_NAME: &str = "Unknown";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("token separator pattern is valid"));

/// Words that say nothing about which service a container is. Stripped in
/// this order, so overlapping terms must stay where they are.
const GENERIC_TERMS: &[&str] = &[
    "frontend", "backend", "server", "docker", "app", "web", "api",
    "service", "container", "instance", "main", "primary", "default",
    "prod", "production", "dev", "development", "test", "testing",
    "staging", "preview", "demo", "example", "sample", "temp", "tmp",
    "nginx", "proxy", "gateway", "router", "loadbalancer", "lb",
    "cache", "redis", "db", "database", "sql", "nosql", "storage",
    "file", "files", "upload", "download", "static", "assets",
    "media", "image", "images", "video", "audio", "music", "photo",
    "admin", "management", "dashboard", "panel", "control", "config",
    "setup", "install", "init", "bootstrap", "startup", "launcher",
    "runner", "executor", "worker", "processor", "handler", "manager",
    "controller", "monitor", "watcher", "observer", "listener",
    "receiver", "sender", "publisher", "subscriber", "consumer",
    "producer", "generator", "creator", "builder", "compiler",
    "transformer", "converter", "parser", "analyzer", "scanner",
    "crawler", "spider", "bot", "agent", "daemon", "process",
    "thread", "task", "job", "work", "operation", "function",
    "module", "component", "part", "piece", "unit", "element",
    "item", "object", "entity", "record", "entry", "row", "line",
    "node", "point", "spot", "place", "location", "position",
    "site", "area", "zone", "region", "section", "segment",
    "chunk", "block", "fragment", "portion", "bit", "part",
    "webservice", "webserver", "webui", "web-ui", "ui", "interface",
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "0",
    "-1", "-2", "-3", "-4", "-5", "-6", "-7", "-8", "-9", "-0",
];

/// Repository name without registry, namespace, tag or digest.
pub fn base_image(image: &str) -> &str {
    let last_segment = image.rsplit('/').next().unwrap_or(image);
    let untagged = last_segment.split(':').next().unwrap_or(last_segment);
    untagged.split('@').next().unwrap_or(untagged)
}

/// Turns a noisy container name into a title-cased label, e.g.
/// `immich_server` with image `ghcr.io/immich-app/immich-server:release`
/// becomes `Immich`.
pub fn display_name(name: &str, image: &str) -> String {
    let cleaned = tokens(strip_generic_terms(&name.to_lowercase()).trim_matches(SEPARATORS));

    let label = if cleaned.chars().count() >= MIN_NAME_LEN {
        cleaned
    } else {
        let base = base_image(image);
        if !base.is_empty() {
            base.to_string()
        } else if !cleaned.is_empty() {
            cleaned
        } else if !name.trim().is_empty() {
            name.trim().to_string()
        } else {
            UNKNOWN_NAME.to_string()
        }
    };

    label
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_generic_terms(name: &str) -> String {
    let mut cleaned = name.to_string();

    for term in GENERIC_TERMS {
        for separator in SEPARATORS {
            let surrounded = format!("{separator}{term}{separator}");
            cleaned = cleaned.replace(&surrounded, &separator.to_string());

            let leading = format!("{term}{separator}");
            if let Some(rest) = cleaned.strip_prefix(&leading) {
                cleaned = rest.to_string();
            }

            let trailing = format!("{separator}{term}");
            if let Some(rest) = cleaned.strip_suffix(&trailing) {
                cleaned = rest.to_string();
            }
        }
    }

    cleaned
}

/// Alphanumeric runs, deduplicated case-insensitively in first-seen order.
fn tokens(name: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for word in NON_ALPHANUMERIC.split(name) {
        if !word.is_empty() && !seen.iter().any(|w| w.eq_ignore_ascii_case(word)) {
            seen.push(word);
        }
    }
    seen.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut word: String = first.to_uppercase().collect();
            word.push_str(&chars.as_str().to_lowercase());
            word
        }
        None => String::new(),
    }
}
