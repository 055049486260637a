// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use highlights_app::CsvDialect;
use highlights_options::OptionsSource;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_OPTIONS_TIMEOUT: &str = "5s";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_FILE_NAME: &str = "highlights.log";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub csv: Csv,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            options: Options::default(),
            csv: Csv::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Options {
    pub source: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            source: None,
            timeout: Some(DEFAULT_OPTIONS_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Csv {
    pub dialect: Option<CsvDialect>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("HIGHLIGHTS_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set HIGHLIGHTS_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(highlights_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` and put values under [storage], [options], [csv], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| {
                format!(
                    "decode config {}; check value types ([csv] dialect is \"naive\" or \"quoted\")",
                    path.display()
                )
            })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            highlights_db::validate_db_path(db_path)?;
        }

        if let Some(source) = &self.options.source {
            OptionsSource::parse(source)
                .with_context(|| format!("invalid options.source in {}", path.display()))?;
        }

        if let Some(timeout) = &self.options.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "options.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level in {} is not a valid filter (try \"info\" or \"debug\"), got {:?}",
                    path.display(),
                    level
                )
            })?;
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => highlights_db::default_db_path(),
        }
    }

    pub fn options_source(&self) -> Result<Option<OptionsSource>> {
        self.options
            .source
            .as_deref()
            .map(OptionsSource::parse)
            .transpose()
    }

    pub fn options_timeout(&self) -> Result<Duration> {
        parse_duration(
            self.options
                .timeout
                .as_deref()
                .unwrap_or(DEFAULT_OPTIONS_TIMEOUT),
        )
    }

    pub fn csv_dialect(&self) -> CsvDialect {
        self.csv.dialect.unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log.file {
            return Ok(PathBuf::from(path));
        }

        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log] file to a writable path")
        })?;
        Ok(data_root.join(highlights_db::APP_NAME).join(LOG_FILE_NAME))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# highlights config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/highlights/highlights.db)\n# db_path = \"/absolute/path/to/highlights.db\"\n\n[options]\n# Optional. A local path or an http(s) URL to a `type,value` CSV.\n# source = \"database/options.csv\"\ntimeout = \"{}\"\n\n[csv]\n# \"naive\" (plain comma join) or \"quoted\" (RFC 4180 quoting)\ndialect = \"{}\"\n\n[log]\nlevel = \"{}\"\n# file = \"/absolute/path/to/highlights.log\"\n",
            path.display(),
            DEFAULT_OPTIONS_TIMEOUT,
            CsvDialect::default().as_str(),
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
