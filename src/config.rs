use crate::aggregation::reports::DateRange;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "AGGREPORT_CONFIG";
pub const MONGODB_URI_ENV: &str = "AGGREPORT_MONGODB_URI";
pub const DATABASE_ENV: &str = "AGGREPORT_DATABASE";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mongodb_uri: String,
    pub database: String,
    pub app_name: String,
    pub collections: CollectionsConfig,
    pub reports: ReportsConfig,
}

/// Collection names inside `database` that each report reads from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionsConfig {
    pub blog_entries: String,
    pub orders: String,
    pub transactions: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Day covered by the daily sales report.
    #[serde(deserialize_with = "de_date")]
    pub sales_day: NaiveDate,
    /// Inclusive range covered by the filtered daily sales report.
    pub sales_range: DateRange,
    /// Days whose total is below this are dropped from the filtered report.
    pub min_daily_total: i64,
    pub author: Option<String>,
}

/// Values given on the command line; set fields replace whatever was loaded.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub uri: Option<String>,
    pub database: Option<String>,
    pub author: Option<String>,
    pub min_total: Option<i64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Default to Mongo's standard port locally
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database: "blogs".to_string(),
            app_name: "aggreport".to_string(),
            collections: CollectionsConfig::default(),
            reports: ReportsConfig::default(),
        }
    }
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            blog_entries: "blog_entries".to_string(),
            orders: "orders".to_string(),
            transactions: "transactions".to_string(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            sales_day: ymd(2023, 9, 30),
            sales_range: DateRange::new(ymd(2023, 9, 1), ymd(2023, 9, 30)),
            min_daily_total: 100,
            author: None,
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Accept both a native TOML date (`2023-09-30`) and a quoted one (`"2023-09-30"`).
pub(crate) fn de_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match toml::Value::deserialize(deserializer)? {
        toml::Value::Datetime(dt) => match (dt.date, dt.time, dt.offset) {
            (Some(d), None, None) => {
                NaiveDate::from_ymd_opt(d.year.into(), d.month.into(), d.day.into())
                    .ok_or_else(|| D::Error::custom(format!("invalid date {dt}")))
            }
            _ => Err(D::Error::custom(format!("expected a date without time, got {dt}"))),
        },
        toml::Value::String(s) => s
            .parse::<NaiveDate>()
            .map_err(|e| D::Error::custom(format!("invalid date {s:?}: {e}"))),
        other => Err(D::Error::custom(format!(
            "expected a date, got {}",
            other.type_str()
        ))),
    }
}

/// Read a file that may legitimately be absent. Any other failure is an error.
fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Config(format!("cannot read {}: {}", path.display(), e))),
    }
}

impl Config {
    /// Priority: explicit file (argument or AGGREPORT_CONFIG) or ./config.toml → env → defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit, Path::new("config.toml"), |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with the implicit path and the environment supplied.
    ///
    /// An explicit path must exist; the implicit one is optional.
    pub fn load_with<F>(explicit: Option<&Path>, implicit: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit: Option<PathBuf> = explicit
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_ENV).map(PathBuf::from));

        let mut cfg = match &explicit {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&contents, path)?
            }
            None => match read_optional(implicit)? {
                Some(contents) => Self::from_toml(&contents, implicit)?,
                None => Config::default(),
            },
        };

        cfg.apply_overrides(lookup);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml(contents: &str, origin: &Path) -> Result<Self> {
        toml::from_str::<Config>(contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", origin.display(), e)))
    }

    /// Apply environment style overrides on top of file values.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup(MONGODB_URI_ENV) {
            self.mongodb_uri = uri;
        }
        if let Some(db) = lookup(DATABASE_ENV) {
            self.database = db;
        }
    }

    /// Command line flags go last and win over file and environment.
    pub fn apply_cli(&mut self, cli: CliOverrides) -> Result<()> {
        if let Some(uri) = cli.uri {
            self.mongodb_uri = uri;
        }
        if let Some(db) = cli.database {
            self.database = db;
        }
        if let Some(author) = cli.author {
            self.reports.author = Some(author);
        }
        if let Some(min) = cli.min_total {
            self.reports.min_daily_total = min;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.mongodb_uri.trim().is_empty() {
            return Err(Error::Config("mongodb_uri must not be empty".into()));
        }
        if self.database.trim().is_empty() {
            return Err(Error::Config("database must not be empty".into()));
        }
        let range = &self.reports.sales_range;
        if range.start > range.end {
            return Err(Error::Config(format!(
                "sales_range starts after it ends ({} > {})",
                range.start, range.end
            )));
        }
        Ok(())
    }
}
