use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// Error raised while loading the configuration file or the access token
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error in configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("configuration file {} does not list any domains", .path.display())]
    NoDomains { path: PathBuf },
    #[error("domain {domain} does not list any records")]
    NoRecords { domain: String },
    #[error("could not read personal access token file {}: {source}", .path.display())]
    TokenRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("personal access token file {} is empty", .path.display())]
    TokenEmpty { path: PathBuf },
}

/// The configuration file contents.
///
/// JSON, pointing at the token and log files and listing every record to
/// keep updated:
///
/// ```json
/// {
///     "personal_access_token_file": "/usr/local/etc/updatedns-token",
///     "public_ip_address_log_file": "/var/log/updatedns.log",
///     "domains": [
///         {
///             "name": "example.com",
///             "records": [
///                 { "name": "www.example.com", "type": "A" },
///                 { "name": "*.example.com", "type": "A" }
///             ]
///         }
///     ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// File holding the DigitalOcean personal access token
    pub personal_access_token_file: PathBuf,
    /// File recording every applied address change
    pub public_ip_address_log_file: PathBuf,
    /// Domains and their records, updated in this order
    pub domains: Vec<DomainConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DomainConfig {
    pub name: String,
    pub records: Vec<RecordConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RecordConfig {
    /// Matched verbatim against the provider-side record name
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
}

impl Config {
    /// Load and validate the configuration from `path`.
    ///
    /// Missing required fields, unparseable JSON, and empty domain or
    /// record lists are all fatal here, before any network traffic.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_owned(),
            source: e,
        })?;
        let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })?;

        if config.domains.is_empty() {
            return Err(ConfigError::NoDomains {
                path: path.to_owned(),
            });
        }
        if let Some(domain) = config.domains.iter().find(|d| d.records.is_empty()) {
            return Err(ConfigError::NoRecords {
                domain: domain.name.to_owned(),
            });
        }
        Ok(config)
    }
}

/// Read the personal access token from `path`.
///
/// The token is the last whitespace-separated word of the last non-blank
/// line, so the file may carry comments or an `export TOKEN=...`-style
/// prefix above or before the token itself.
pub fn read_access_token(path: &Path) -> Result<String, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::TokenRead {
        path: path.to_owned(),
        source: e,
    })?;

    contents
        .lines()
        .rev()
        .find_map(|line| line.split_whitespace().last())
        .map(|token| token.to_string())
        .ok_or_else(|| ConfigError::TokenEmpty {
            path: path.to_owned(),
        })
}
