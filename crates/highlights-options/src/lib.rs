// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Loads the `type,value` options file that feeds the categorical form
//! fields.

use anyhow::{Context, Result, anyhow, bail};
use highlights_app::{OptionKind, OptionLists};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsSource {
    File(PathBuf),
    Url(Url),
}

impl OptionsSource {
    /// Interprets `raw` as an `http(s)://` URL, a `file://` URL, or a plain
    /// filesystem path.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            bail!("options source must not be empty");
        }

        let Ok(url) = Url::parse(trimmed) else {
            return Ok(Self::File(PathBuf::from(trimmed)));
        };

        match url.scheme() {
            "http" | "https" => Ok(Self::Url(url)),
            "file" => url.to_file_path().map(Self::File).map_err(|()| {
                anyhow!("options source {trimmed:?} is not a local file URL; use a plain path")
            }),
            // drive letters such as `C:\options.csv`
            scheme if scheme.len() == 1 => Ok(Self::File(PathBuf::from(trimmed))),
            scheme => bail!(
                "options source scheme `{scheme}` is unsupported; use a file path or an http(s) URL"
            ),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

impl fmt::Display for OptionsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Splits options text into buckets.
///
/// The first line is a header and is skipped. Each remaining line is
/// `type,value`; lines with an unknown type or a blank value are ignored.
pub fn parse_options(text: &str) -> OptionLists {
    let mut options = OptionLists::default();
    for line in text.trim().lines().skip(1) {
        let mut columns = line.split(',');
        let Some(kind) = columns
            .next()
            .and_then(|kind| OptionKind::parse(&kind.trim().to_lowercase()))
        else {
            continue;
        };
        let value = columns.next().map(str::trim).unwrap_or_default();
        if value.is_empty() {
            continue;
        }
        options.push(kind, value);
    }
    options
}

pub fn load(source: &OptionsSource, timeout: Duration) -> Result<OptionLists> {
    let text = match source {
        OptionsSource::File(path) => fs::read_to_string(path).with_context(|| {
            format!(
                "read options file {} -- check the [options] source path",
                path.display()
            )
        })?,
        OptionsSource::Url(url) => fetch(url, timeout)?,
    };
    let options = parse_options(&text);
    tracing::debug!(%source, total = options.total(), "loaded options");
    Ok(options)
}

/// Like [`load`], but any failure yields empty option lists and a warning.
pub fn load_or_empty(source: &OptionsSource, timeout: Duration) -> OptionLists {
    match load(source, timeout) {
        Ok(options) => options,
        Err(error) => {
            let detail = format!("{error:#}");
            tracing::warn!(%source, error = detail.as_str(), "options unavailable; form choices are empty");
            OptionLists::default()
        }
    }
}

fn fetch(url: &Url, timeout: Duration) -> Result<String> {
    let http = HttpClient::builder()
        .timeout(timeout)
        .build()
        .context("build HTTP client")?;

    let response = http
        .get(url.clone())
        .send()
        .map_err(|error| connection_error(url, error))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(clean_error_response(url, status, &body));
    }

    response
        .text()
        .with_context(|| format!("read options response body from {url}"))
}

fn connection_error(url: &Url, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("options fetch from {url} timed out -- raise [options] timeout or check the server");
    }
    anyhow!("cannot reach {url} -- check the [options] source URL ({error})")
}

fn clean_error_response(url: &Url, status: StatusCode, body: &str) -> anyhow::Error {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return anyhow!("options fetch from {url} failed ({})", status.as_u16());
    }
    let snippet: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    anyhow!(
        "options fetch from {url} failed ({}): {snippet}",
        status.as_u16()
    )
}
