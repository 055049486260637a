// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "HIGHLIGHTS_LOG";

/// Sends log output to `path`; the terminal belongs to the UI.
pub fn init(level: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- set [log] file to a writable path",
                path.display()
            )
        })?;

    let filter = build_filter(level, env::var(LOG_ENV).ok().as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

fn build_filter(level: &str, env_directives: Option<&str>) -> Result<EnvFilter> {
    match env_directives.map(str::trim) {
        Some(directives) if !directives.is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV} value {directives:?}")),
        _ => EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::build_filter;
    use anyhow::Result;

    #[test]
    fn env_directives_override_config_level() -> Result<()> {
        let filter = build_filter("info", Some("highlights_db=trace"))?;
        assert!(filter.to_string().contains("highlights_db=trace"));
        Ok(())
    }

    #[test]
    fn blank_env_falls_back_to_config_level() -> Result<()> {
        let filter = build_filter("debug", Some("  "))?;
        assert!(filter.to_string().contains("debug"));
        assert!(build_filter("warn", None)?.to_string().contains("warn"));
        Ok(())
    }

    #[test]
    fn invalid_env_directives_name_the_variable() {
        let error = build_filter("info", Some("foo=notalevel")).expect_err("should fail");
        assert!(error.to_string().contains("HIGHLIGHTS_LOG"));
    }
}
