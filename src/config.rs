//! Adapter configuration: `key = value` file plus command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use diva_storage::db::{DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_MAX_CONNECTIONS};
use diva_storage::http::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS};
use url::Url;

/// Settings as written in a config file or given on the command line.
/// Every field is optional; unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub fedora_base_url: Option<String>,
    pub database_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub db_max_connections: Option<u32>,
    pub db_busy_timeout_ms: Option<u32>,
}

impl FileConfig {
    /// Returns `self` with unset fields taken from `base`.
    #[must_use]
    pub fn layered_over(self, base: Self) -> Self {
        Self {
            fedora_base_url: self.fedora_base_url.or(base.fedora_base_url),
            database_url: self.database_url.or(base.database_url),
            connect_timeout_secs: self.connect_timeout_secs.or(base.connect_timeout_secs),
            read_timeout_secs: self.read_timeout_secs.or(base.read_timeout_secs),
            db_max_connections: self.db_max_connections.or(base.db_max_connections),
            db_busy_timeout_ms: self.db_busy_timeout_ms.or(base.db_busy_timeout_ms),
        }
    }

    /// Validates set values against their allowed ranges.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        if let Some(value) = self.db_max_connections
            && !(1..=20).contains(&value)
        {
            bail!("Invalid config value for `db_max_connections`: {value}. Expected range: 1..=20");
        }
        if let Some(value) = self.db_busy_timeout_ms
            && value > 120_000
        {
            bail!("Invalid config value for `db_busy_timeout_ms`: {value}. Expected range: 0..=120000");
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    match value {
        Some(value) if !(1..=3600).contains(&value) => {
            bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600")
        }
        _ => Ok(()),
    }
}

/// Fully resolved adapter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Fedora base URL, always ending in `/`.
    pub fedora_base_url: Option<String>,
    pub database_url: Option<String>,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_busy_timeout_ms: u32,
}

impl AdapterConfig {
    /// Layers command-line values over file values over defaults.
    pub fn resolve(cli: FileConfig, file: FileConfig) -> Result<Self> {
        let merged = cli.layered_over(file);
        merged.validate()?;
        let fedora_base_url = merged
            .fedora_base_url
            .as_deref()
            .map(normalize_base_url)
            .transpose()?;
        Ok(Self {
            fedora_base_url,
            database_url: merged.database_url,
            connect_timeout_secs: merged
                .connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout_secs: merged.read_timeout_secs.unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
            db_max_connections: merged.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
            db_busy_timeout_ms: merged.db_busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        })
    }
}

/// Checks that `raw` is an absolute http(s) URL and appends a trailing `/`.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).with_context(|| format!("Invalid Fedora base URL '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "Invalid Fedora base URL '{raw}': expected http or https, got {}",
            url.scheme()
        );
    }
    let mut normalized = url.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}

/// Reads and parses a config file.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (index, raw_line) in raw.lines().enumerate() {
        let line_number = index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_number}: expected key = value");
        };
        let key = key.trim();
        let value = value.trim();
        let on_line = || format!("Invalid `{key}` value on line {line_number}");

        match key {
            "fedora_base_url" => {
                cfg.fedora_base_url = Some(parse_string_literal(value).with_context(on_line)?);
            }
            "database_url" => {
                cfg.database_url = Some(parse_string_literal(value).with_context(on_line)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer(value).with_context(on_line)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer(value).with_context(on_line)?);
            }
            "db_max_connections" => {
                cfg.db_max_connections = Some(parse_integer(value).with_context(on_line)?);
            }
            "db_busy_timeout_ms" => {
                cfg.db_busy_timeout_ms = Some(parse_integer(value).with_context(on_line)?);
            }
            unknown => bail!("Unknown configuration key: '{unknown}' on line {line_number}"),
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut quoted = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '#' if !quoted => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(value: &str) -> Result<String> {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Expected double-quoted string"))
}

fn parse_integer<T>(value: &str) -> Result<T>
where
    T: TryFrom<u64>,
{
    if value.is_empty() {
        bail!("Expected integer value");
    }
    let parsed: u64 = value
        .parse()
        .with_context(|| format!("Expected non-negative integer, got '{value}'"))?;
    T::try_from(parsed).map_err(|_| anyhow!("Integer value {parsed} out of range"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
# adapter settings
fedora_base_url = "http://alvin-cora-fedora:8088/fedora/"
database_url = "sqlite:diva.db" # local copy
connect_timeout_secs = 5
read_timeout_secs = 60
db_max_connections = 2
db_busy_timeout_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.fedora_base_url.as_deref(),
            Some("http://alvin-cora-fedora:8088/fedora/")
        );
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite:diva.db"));
        assert_eq!(cfg.connect_timeout_secs, Some(5));
        assert_eq!(cfg.read_timeout_secs, Some(60));
        assert_eq!(cfg.db_max_connections, Some(2));
        assert_eq!(cfg.db_busy_timeout_ms, Some(0));
    }

    #[test]
    fn test_parse_config_keeps_hash_inside_quotes() {
        let cfg = parse_config_str(r#"database_url = "sqlite:a#b.db""#).unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite:a#b.db"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_key() {
        let err = parse_config_str("concurrency = 4").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key: 'concurrency' on line 1"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("\nfedora_base_url").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("database_url = sqlite:diva.db").unwrap_err();
        assert!(err.to_string().contains("database_url"));
    }

    #[test]
    fn test_parse_config_rejects_negative_and_trailing_tokens() {
        assert!(parse_config_str("read_timeout_secs = -1").is_err());
        assert!(parse_config_str("read_timeout_secs = 4 seconds").is_err());
    }

    #[test]
    fn test_parse_config_rejects_out_of_range_values() {
        let err = parse_config_str("connect_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("connect_timeout_secs"));
        let err = parse_config_str("db_max_connections = 21").unwrap_err();
        assert!(err.to_string().contains("db_max_connections"));
        let err = parse_config_str("db_busy_timeout_ms = 120001").unwrap_err();
        assert!(err.to_string().contains("db_busy_timeout_ms"));
        assert!(parse_config_str("db_max_connections = 4294967296").is_err());
    }

    #[test]
    fn test_resolve_uses_defaults() {
        let config = AdapterConfig::resolve(FileConfig::default(), FileConfig::default()).unwrap();
        assert_eq!(config.fedora_base_url, None);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.read_timeout_secs, 30);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_busy_timeout_ms, 5000);
    }

    #[test]
    fn test_resolve_cli_overrides_file() {
        let file = FileConfig {
            fedora_base_url: Some("http://file-host/fedora".to_string()),
            read_timeout_secs: Some(90),
            ..FileConfig::default()
        };
        let cli = FileConfig {
            fedora_base_url: Some("http://cli-host:8088/fedora".to_string()),
            ..FileConfig::default()
        };
        let config = AdapterConfig::resolve(cli, file).unwrap();
        assert_eq!(
            config.fedora_base_url.as_deref(),
            Some("http://cli-host:8088/fedora/")
        );
        assert_eq!(config.read_timeout_secs, 90);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://alvin-cora-fedora:8088/fedora/").unwrap(),
            "http://alvin-cora-fedora:8088/fedora/"
        );
        assert_eq!(normalize_base_url("https://host/fedora").unwrap(), "https://host/fedora/");
        assert_eq!(normalize_base_url("http://host").unwrap(), "http://host/");
    }

    #[test]
    fn test_normalize_base_url_rejects_relative_and_other_schemes() {
        assert!(normalize_base_url("fedora/").is_err());
        let err = normalize_base_url("ftp://host/fedora/").unwrap_err();
        assert!(err.to_string().contains("expected http or https"));
    }

    #[test]
    fn test_load_file_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diva.conf");
        fs::write(&path, "read_timeout_secs = nope\n").unwrap();

        let err = load_file_config(&path).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("diva.conf"), "{chain}");
        assert!(chain.contains("read_timeout_secs"), "{chain}");
    }

    #[test]
    fn test_load_file_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file_config(&dir.path().join("absent.conf")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
