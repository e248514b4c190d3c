mod echo;
mod fixed;

pub use echo::{DnsEchoConfig, DnsEchoSource};
pub use fixed::FixedSource;

use std::net::Ipv4Addr;

use thiserror::Error;

/// Error returned when a source fails to produce a public IPv4 address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("could not look up the public IPv4 address: {0}")]
    Lookup(String),
    #[error("lookup for {0} did not return an IPv4 address")]
    NoAnswer(String),
    #[error("invalid public IPv4 address: {0}")]
    InvalidAddress(String),
}

/// An `Ipv4Source` can be used to retrieve the public IPv4 address of this host
pub trait Ipv4Source {
    fn addr(&self) -> Result<Ipv4Addr, SourceError>;
}

/// Parse a dotted-quad IPv4 address from text.
///
/// Stricter than [`Ipv4Addr::from_str`]: exactly four dot-separated
/// segments, every segment made of ASCII digits only (no signs, no empty
/// segments), and every octet range-checked to 0-255 on its own. Strings
/// that merely look like an address (`192.168.1.500`) are rejected.
pub fn parse_dotted_quad(text: &str) -> Result<Ipv4Addr, SourceError> {
    let invalid = || SourceError::InvalidAddress(text.to_string());

    let octets = text.split('.').collect::<Vec<_>>();
    if octets.len() != 4 {
        return Err(invalid());
    }

    let mut parsed = [0u8; 4];
    for (i, octet) in octets.iter().enumerate() {
        if octet.is_empty() || !octet.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u32 = octet.parse().map_err(|_| invalid())?;
        if value > 255 {
            return Err(invalid());
        }
        parsed[i] = value as u8;
    }
    Ok(Ipv4Addr::new(parsed[0], parsed[1], parsed[2], parsed[3]))
}
