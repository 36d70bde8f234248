// =============================================================================
// Infrastructure Classifier
// =============================================================================

/// Substrings marking a container as a database or storage backend.
const INFRASTRUCTURE_KEYWORDS: &[&str] = &[
    "mysql",
    "postgres",
    "postgresql",
    "mongo",
    "mongodb",
    "redis",
    "database",
    "db",
    "sql",
    "nosql",
    "mariadb",
    "sqlite",
    "cassandra",
    "elasticsearch",
    "influxdb",
    "couchdb",
    "neo4j",
    "orientdb",
    "couchbase",
    "dynamodb",
    "firebase",
    "rethinkdb",
    "arangodb",
    "timescaledb",
    "clickhouse",
    "questdb",
    "quest",
    "supabase",
    "planetscale",
    "neon",
    "railway",
    "vercel",
    "supabase",
    "db-",
    "-db",
    "_db",
    "db_",
    "database-",
    "-database",
    "_database",
];

/// True when either the container name or its image looks like infrastructure.
pub fn is_infrastructure(name: &str, image: &str) -> bool {
    let name = name.to_lowercase();
    let image = image.to_lowercase();

    INFRASTRUCTURE_KEYWORDS
        .iter()
        .any(|keyword| name.contains(keyword) || image.contains(keyword))
}
