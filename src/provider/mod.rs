mod digitalocean;

// Re-exports for convenience
pub use self::digitalocean::{DigitalOceanProvider, DigitalOceanProviderConfig};

use std::{fmt::Display, net::Ipv4Addr};

#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Error returned by a provider action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be reached, rejected the call, or answered
    /// with something we could not parse
    #[error("provider request failed: {0}")]
    Unavailable(String),
    /// No record at the provider matches the configured name and type
    #[error("no {record_type} record named {name} in domain {domain}")]
    RecordNotFound {
        domain: String,
        name: String,
        record_type: String,
    },
}

/// A single DNS record as the provider reports it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderRecord {
    /// Provider-assigned identifier, opaque to us
    pub id: String,
    /// The record's name field, matched verbatim against the configuration
    pub name: String,
    /// The record type, e.g. `A`
    pub record_type: String,
}

impl Display for ProviderRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} (id {})", self.record_type, self.name, self.id)
    }
}

/// A provider is any DNS service provider, such as DigitalOcean, Cloudflare, etc...
/// They implement a few basic methods to read and rewrite the records of a domain
#[cfg_attr(test, automock)]
pub trait DnsProvider {
    /// Get all records currently registered with the provider for `domain`
    fn records(&self, domain: &str) -> Result<Vec<ProviderRecord>, ProviderError>;

    /// Point the record at `address` by rewriting its data field
    fn update_record(
        &self,
        domain: &str,
        record_id: &str,
        address: Ipv4Addr,
    ) -> Result<(), ProviderError>;

    /// Find the provider-side id of the record matching `name` and `record_type`.
    ///
    /// Matching is exact string equality on both fields; a configured name of
    /// `*.example.com` matches only a record literally named `*.example.com`.
    /// The first match wins should the provider report duplicates.
    fn resolve_record_id(
        &self,
        domain: &str,
        name: &str,
        record_type: &str,
    ) -> Result<String, ProviderError> {
        self.records(domain)?
            .into_iter()
            .find(|r| r.name == name && r.record_type == record_type)
            .map(|r| r.id)
            .ok_or_else(|| ProviderError::RecordNotFound {
                domain: domain.to_string(),
                name: name.to_string(),
                record_type: record_type.to_string(),
            })
    }
}
