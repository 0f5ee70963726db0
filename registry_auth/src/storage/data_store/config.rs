//! Database connection and table configuration

use std::{env, str::FromStr, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::DataStore;

static REGISTRY_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("REGISTRY_DATA_STORE_TYPE").unwrap_or_else(|_| "sqlite".to_string())
});

static REGISTRY_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("REGISTRY_DATA_STORE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
});

pub(crate) static GENERIC_DATA_STORE: LazyLock<Mutex<DataStore>> = LazyLock::new(|| {
    let store_type = REGISTRY_DATA_STORE_TYPE.as_str();
    let store_url = REGISTRY_DATA_STORE_URL.as_str();

    tracing::info!(
        "Initializing data store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store = match store_type {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .expect("Failed to parse SQLite connection string")
                .create_if_missing(true);

            // A single connection keeps ":memory:" databases alive for the
            // whole process and serializes writes against file databases.
            let pool = sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(1)
                .connect_lazy_with(opts);

            DataStore::Sqlite(pool)
        }
        "postgres" => DataStore::Postgres(
            sqlx::PgPool::connect_lazy(store_url).expect("Failed to create Postgres pool"),
        ),
        t => panic!(
            "Unsupported store type: {}. Supported types are 'sqlite' and 'postgres'",
            t
        ),
    };

    Mutex::new(store)
});

/// Table prefix from environment variable
static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "registry_".to_string()));

pub(crate) static DB_TABLE_USERS: LazyLock<String> =
    LazyLock::new(|| format!("{}users", DB_TABLE_PREFIX.as_str()));

#[cfg(test)]
mod tests {
    use std::env;

    #[test]
    fn test_table_prefix_default() {
        // Test the parsing logic directly; the LazyLock may already be
        // initialized by another test.
        let prefix = env::var("DB_TABLE_PREFIX_UNSET").unwrap_or_else(|_| "registry_".to_string());
        assert_eq!(format!("{prefix}users"), "registry_users");
    }
}
