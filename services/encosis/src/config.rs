//! Service configuration.
//!
//! # Purpose
//! Reads the listener addresses, storage backend, MySQL connection settings
//! and store policies from the environment, then applies an optional YAML
//! override file named by `ENCOSIS_CONFIG`.
use crate::store::{DeletePolicy, DuplicateEnrollmentPolicy, StoreConfig};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9090";
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_USER: &str = "root";
pub const DEFAULT_DB_NAME: &str = "encosis2025";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StorageBackend {
    Memory,
    Mysql,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "mysql" => Ok(Self::Mysql),
            other => bail!("unknown storage backend: {other}"),
        }
    }
}

impl TryFrom<String> for StorageBackend {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Connection settings for the MySQL pool.
///
/// Credentials end up here; never log this struct.
#[derive(Clone, PartialEq, Eq)]
pub struct MysqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

impl std::fmt::Debug for MysqlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_ms", &self.acquire_timeout_ms)
            .finish()
    }
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            user: DEFAULT_DB_USER.to_string(),
            password: String::new(),
            database: DEFAULT_DB_NAME.to_string(),
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            acquire_timeout_ms: DEFAULT_DB_ACQUIRE_TIMEOUT_MS,
        }
    }
}

// Service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct EncosisConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub mysql: MysqlConfig,
    pub duplicate_enrollments: DuplicateEnrollmentPolicy,
    pub delete_policy: DeletePolicy,
}

#[derive(Debug, Deserialize)]
struct EncosisConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<StorageBackend>,
    mysql: Option<MysqlConfigOverride>,
    duplicate_enrollments: Option<DuplicateEnrollmentPolicy>,
    delete_policy: Option<DeletePolicy>,
}

#[derive(Debug, Deserialize)]
struct MysqlConfigOverride {
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    password: Option<String>,
    database: Option<String>,
    max_connections: Option<u32>,
    acquire_timeout_ms: Option<u64>,
}

impl EncosisConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("ENCOSIS_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read ENCOSIS_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            duplicate_enrollments: self.duplicate_enrollments,
            delete_policy: self.delete_policy,
        }
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // A bare `PORT` still works when no explicit bind is set.
        let bind_addr: SocketAddr = match (lookup("ENCOSIS_BIND"), lookup("PORT")) {
            (Some(bind), _) => bind,
            (None, Some(port)) => format!("0.0.0.0:{port}"),
            (None, None) => DEFAULT_BIND.to_string(),
        }
        .parse()
        .with_context(|| "parse ENCOSIS_BIND")?;
        let metrics_bind: SocketAddr = lookup("ENCOSIS_METRICS_BIND")
            .unwrap_or_else(|| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse ENCOSIS_METRICS_BIND")?;
        let storage = lookup("ENCOSIS_STORAGE_BACKEND")
            .map(|value| value.parse::<StorageBackend>())
            .transpose()
            .with_context(|| "parse ENCOSIS_STORAGE_BACKEND")?
            .unwrap_or(StorageBackend::Mysql);

        let defaults = MysqlConfig::default();
        let mysql = MysqlConfig {
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: parse_or("DB_PORT", lookup("DB_PORT"), defaults.port)?,
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            database: lookup("DB_NAME").unwrap_or(defaults.database),
            max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                lookup("DB_MAX_CONNECTIONS"),
                defaults.max_connections,
            )?,
            acquire_timeout_ms: parse_or(
                "DB_ACQUIRE_TIMEOUT_MS",
                lookup("DB_ACQUIRE_TIMEOUT_MS"),
                defaults.acquire_timeout_ms,
            )?,
        };

        let duplicate_enrollments = lookup("ENCOSIS_DUPLICATE_ENROLLMENTS")
            .map(|value| value.parse::<DuplicateEnrollmentPolicy>())
            .transpose()
            .map_err(anyhow::Error::msg)
            .with_context(|| "parse ENCOSIS_DUPLICATE_ENROLLMENTS")?
            .unwrap_or_default();
        let delete_policy = lookup("ENCOSIS_DELETE_POLICY")
            .map(|value| value.parse::<DeletePolicy>())
            .transpose()
            .map_err(anyhow::Error::msg)
            .with_context(|| "parse ENCOSIS_DELETE_POLICY")?
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            mysql,
            duplicate_enrollments,
            delete_policy,
        })
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: EncosisConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse encosis config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value;
        }
        if let Some(value) = override_cfg.duplicate_enrollments {
            self.duplicate_enrollments = value;
        }
        if let Some(value) = override_cfg.delete_policy {
            self.delete_policy = value;
        }
        if let Some(mysql) = override_cfg.mysql {
            if let Some(value) = mysql.host {
                self.mysql.host = value;
            }
            if let Some(value) = mysql.port {
                self.mysql.port = value;
            }
            if let Some(value) = mysql.user {
                self.mysql.user = value;
            }
            if let Some(value) = mysql.password {
                self.mysql.password = value;
            }
            if let Some(value) = mysql.database {
                self.mysql.database = value;
            }
            if let Some(value) = mysql.max_connections {
                self.mysql.max_connections = value;
            }
            if let Some(value) = mysql.acquire_timeout_ms {
                self.mysql.acquire_timeout_ms = value;
            }
        }
        Ok(())
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw.trim().parse().with_context(|| format!("parse {key}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_event_database() {
        let config = EncosisConfig::from_lookup(lookup_from(&[])).expect("config");
        assert_eq!(config.bind_addr, DEFAULT_BIND.parse().expect("bind"));
        assert_eq!(config.storage, StorageBackend::Mysql);
        assert_eq!(config.mysql, MysqlConfig::default());
        assert_eq!(config.mysql.database, "encosis2025");
        assert_eq!(config.mysql.max_connections, 10);
        assert_eq!(config.store_config(), StoreConfig::default());
    }

    #[test]
    fn port_is_used_when_bind_is_missing() {
        let config = EncosisConfig::from_lookup(lookup_from(&[("PORT", "8081")])).expect("config");
        assert_eq!(config.bind_addr.port(), 8081);

        let config = EncosisConfig::from_lookup(lookup_from(&[
            ("PORT", "8081"),
            ("ENCOSIS_BIND", "127.0.0.1:9000"),
        ]))
        .expect("config");
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().expect("bind"));
    }

    #[test]
    fn env_overrides_backend_database_and_policies() {
        let config = EncosisConfig::from_lookup(lookup_from(&[
            ("ENCOSIS_STORAGE_BACKEND", "memory"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "3307"),
            ("DB_PASSWORD", "secret"),
            ("DB_MAX_CONNECTIONS", "25"),
            ("ENCOSIS_DUPLICATE_ENROLLMENTS", "allow"),
            ("ENCOSIS_DELETE_POLICY", "reject"),
        ]))
        .expect("config");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.mysql.host, "db.internal");
        assert_eq!(config.mysql.port, 3307);
        assert_eq!(config.mysql.max_connections, 25);
        assert_eq!(
            config.duplicate_enrollments,
            DuplicateEnrollmentPolicy::Allow
        );
        assert_eq!(config.delete_policy, DeletePolicy::Reject);
        assert!(!format!("{:?}", config.mysql).contains("secret"));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = EncosisConfig::from_lookup(lookup_from(&[("DB_PORT", "not-a-port")]))
            .expect_err("port");
        assert!(err.to_string().contains("DB_PORT"));

        let err = EncosisConfig::from_lookup(lookup_from(&[("ENCOSIS_DELETE_POLICY", "maybe")]))
            .expect_err("policy");
        assert!(err.to_string().contains("ENCOSIS_DELETE_POLICY"));

        let err = EncosisConfig::from_lookup(lookup_from(&[("ENCOSIS_STORAGE_BACKEND", "redis")]))
            .expect_err("backend");
        assert!(err.to_string().contains("ENCOSIS_STORAGE_BACKEND"));
    }

    #[test]
    fn yaml_overrides_individual_fields() {
        let mut config = EncosisConfig::from_lookup(lookup_from(&[])).expect("config");
        config
            .apply_yaml(
                r#"
bind_addr: "127.0.0.1:4000"
storage: Memory
delete_policy: REJECT
duplicate_enrollments: " Allow "
mysql:
  host: mysql.local
  max_connections: 4
"#,
            )
            .expect("yaml");
        assert_eq!(config.bind_addr, "127.0.0.1:4000".parse().expect("bind"));
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.delete_policy, DeletePolicy::Reject);
        assert_eq!(
            config.duplicate_enrollments,
            DuplicateEnrollmentPolicy::Allow
        );
        assert_eq!(config.mysql.host, "mysql.local");
        assert_eq!(config.mysql.max_connections, 4);
        assert_eq!(config.mysql.user, DEFAULT_DB_USER);
    }

    #[test]
    fn yaml_rejects_unknown_policy_values() {
        let mut config = EncosisConfig::from_lookup(lookup_from(&[])).expect("config");
        let err = config
            .apply_yaml("delete_policy: sometimes\n")
            .expect_err("policy");
        assert!(format!("{err:#}").contains("unknown delete policy"));
    }

    #[test]
    #[serial]
    fn from_env_or_yaml_reads_the_named_file() {
        let path = std::env::temp_dir().join(format!("encosis-config-{}.yaml", std::process::id()));
        fs::write(&path, "metrics_bind: \"127.0.0.1:9191\"\n").expect("write yaml");
        let prev = std::env::var("ENCOSIS_CONFIG").ok();
        unsafe {
            std::env::set_var("ENCOSIS_CONFIG", &path);
        }

        let result = EncosisConfig::from_env_or_yaml();

        match prev {
            Some(value) => unsafe { std::env::set_var("ENCOSIS_CONFIG", value) },
            None => unsafe { std::env::remove_var("ENCOSIS_CONFIG") },
        }
        let _ = fs::remove_file(&path);
        let config = result.expect("config");
        assert_eq!(config.metrics_bind, "127.0.0.1:9191".parse().expect("metrics"));
    }
}
