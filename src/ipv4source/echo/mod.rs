use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use dnsclient::{sync::DNSClient, UpstreamServer};

use super::{Ipv4Source, SourceError};

/// The echo hostname whose A record answers with the address of whoever asks.
pub const DEFAULT_ECHO_HOSTNAME: &str = "myip.opendns.com";

// The OpenDNS anycast resolvers. Only they answer myip.opendns.com truthfully.
const OPENDNS_RESOLVERS: [Ipv4Addr; 2] = [
    Ipv4Addr::new(208, 67, 222, 222),
    Ipv4Addr::new(208, 67, 220, 220),
];

/// An [`Ipv4Source`] that asks a DNS echo service for our externally visible address.
///
/// The source issues a single A query for the configured hostname against the
/// configured resolvers and returns the first answer. Every call to
/// [`Ipv4Source::addr()`] queries again; nothing is cached and nothing is
/// retried, so one failed query fails the whole run.
///
/// To create a new source, use the [`DnsEchoSource::from_config()`] function
#[derive(Debug)]
#[non_exhaustive]
pub struct DnsEchoSource {
    hostname: String,
    client: DNSClient,
}

/// Configuration for [`DnsEchoSource`]. Must be supplied when creating a [`DnsEchoSource`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsEchoConfig {
    /// The echo hostname to look up
    pub hostname: String,
    /// A list of DNS server addresses (IP address + Port number) to send the query to.
    pub servers: Vec<SocketAddr>,
}

impl Default for DnsEchoConfig {
    fn default() -> Self {
        DnsEchoConfig {
            hostname: DEFAULT_ECHO_HOSTNAME.to_string(),
            servers: OPENDNS_RESOLVERS
                .iter()
                .map(|ip| SocketAddr::new(IpAddr::V4(*ip), 53))
                .collect(),
        }
    }
}

impl Ipv4Source for DnsEchoSource {
    fn addr(&self) -> Result<Ipv4Addr, SourceError> {
        match self.client.query_a(&self.hostname) {
            Ok(addrs) => match addrs.first() {
                Some(a) => Ok(a.to_owned()),
                None => Err(SourceError::NoAnswer(self.hostname.to_owned())),
            },
            Err(e) => Err(SourceError::Lookup(e.to_string())),
        }
    }
}

impl DnsEchoSource {
    /// Create a new [`DnsEchoSource`] with the supplied configuration.
    ///
    /// Construction does not touch the network; the first query happens on
    /// [`Ipv4Source::addr()`].
    pub fn from_config(config: &DnsEchoConfig) -> Box<dyn Ipv4Source> {
        let client = DNSClient::new(
            config
                .servers
                .iter()
                .copied()
                .map(UpstreamServer::new)
                .collect(),
        );
        Box::new(DnsEchoSource {
            hostname: config.hostname.to_owned(),
            client,
        })
    }
}
