use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::types::Field;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_DATA_PATH: &str = "app/data.csv";
pub const DEFAULT_DELIMITER: char = ';';
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300; // 5 minutes
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1024;
pub const DEFAULT_CONFIG_FILE: &str = "timetable.toml";

/// Top-level config (timetable.toml + TIMETABLE_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Where the schedule table lives and how its columns are named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_data_path")]
    pub path: String,
    /// Single ASCII field separator.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub columns: ColumnsConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: DEFAULT_DELIMITER,
            columns: ColumnsConfig::default(),
        }
    }
}

/// Header names of the typed columns. Defaults match the university
/// timetable export the dashboard was built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_category_column")]
    pub category: String,
    #[serde(default = "default_teacher_column")]
    pub teacher: String,
    #[serde(default = "default_building_column")]
    pub building: String,
    #[serde(default = "default_date_column")]
    pub date: String,
    #[serde(default = "default_start_time_column")]
    pub start_time: String,
    #[serde(default = "default_end_time_column")]
    pub end_time: String,
}

impl ColumnsConfig {
    /// Header name configured for a typed field.
    pub fn name_of(&self, field: Field) -> &str {
        match field {
            Field::Category => &self.category,
            Field::Teacher => &self.teacher,
            Field::Building => &self.building,
            Field::Date => &self.date,
            Field::StartTime => &self.start_time,
            Field::EndTime => &self.end_time,
        }
    }
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            category: default_category_column(),
            teacher: default_teacher_column(),
            building: default_building_column(),
            date: default_date_column(),
            start_time: default_start_time_column(),
            end_time: default_end_time_column(),
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// When false every request recomputes its payload.
    #[serde(default = "bool_true")]
    pub enabled: bool,
    /// Entries expire this many seconds after insertion.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_data_path() -> String {
    DEFAULT_DATA_PATH.to_string()
}
fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}
fn default_cache_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}
fn default_cache_max_entries() -> usize {
    DEFAULT_CACHE_MAX_ENTRIES
}
fn default_category_column() -> String {
    "КатегорияВремени".to_string()
}
fn default_teacher_column() -> String {
    "ФИО_полн".to_string()
}
fn default_building_column() -> String {
    "Корпус".to_string()
}
fn default_date_column() -> String {
    "Дата".to_string()
}
fn default_start_time_column() -> String {
    "ВремяНачала".to_string()
}
fn default_end_time_column() -> String {
    "ВремяОкончания".to_string()
}

impl TimetableConfig {
    /// Load config from a TOML file with TIMETABLE_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./timetable.toml
    ///
    /// A missing file is not an error; every key has a default. Nested keys
    /// are addressed with a double underscore, e.g. `TIMETABLE_CACHE__TTL_SECS`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_FILE);

        let config: TimetableConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TIMETABLE_").split("__"))
            .extract()
            .map_err(|e| crate::error::TimetableError::Config(e.to_string()))?;

        tracing::debug!(path, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = TimetableConfig::load(Some("does-not-exist.toml")).expect("load failed");
            assert_eq!(config.gateway.port, DEFAULT_PORT);
            assert_eq!(config.dataset.delimiter, ';');
            assert_eq!(config.dataset.columns.teacher, "ФИО_полн");
            assert_eq!(config.cache.ttl_secs, 300);
            assert!(config.cache.enabled);
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "timetable.toml",
                r#"
                [gateway]
                port = 9100

                [dataset]
                path = "data/schedule.csv"
                delimiter = ","

                [dataset.columns]
                category = "kind"

                [cache]
                ttl_secs = 60
                "#,
            )?;
            let config = TimetableConfig::load(None).expect("load failed");
            assert_eq!(config.gateway.port, 9100);
            assert_eq!(config.gateway.bind, DEFAULT_BIND);
            assert_eq!(config.dataset.path, "data/schedule.csv");
            assert_eq!(config.dataset.delimiter, ',');
            assert_eq!(config.dataset.columns.category, "kind");
            assert_eq!(config.dataset.columns.building, "Корпус");
            assert_eq!(config.cache.ttl_secs, 60);
            assert_eq!(config.cache.max_entries, DEFAULT_CACHE_MAX_ENTRIES);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("timetable.toml", "[cache]\nttl_secs = 60\n")?;
            jail.set_env("TIMETABLE_CACHE__TTL_SECS", "5");
            jail.set_env("TIMETABLE_GATEWAY__PORT", "8081");
            let config = TimetableConfig::load(None).expect("load failed");
            assert_eq!(config.cache.ttl_secs, 5);
            assert_eq!(config.gateway.port, 8081);
            Ok(())
        });
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        Jail::expect_with(|jail| {
            jail.create_file("timetable.toml", "[gateway]\nport = \"not a port\"\n")?;
            let err = TimetableConfig::load(None).unwrap_err();
            assert_eq!(err.code(), "CONFIG_ERROR");
            Ok(())
        });
    }

    #[test]
    fn columns_resolve_by_field() {
        let columns = ColumnsConfig::default();
        assert_eq!(columns.name_of(Field::Date), "Дата");
        assert_eq!(columns.name_of(Field::EndTime), "ВремяОкончания");
    }
}
