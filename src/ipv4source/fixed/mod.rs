use std::net::Ipv4Addr;

use super::{Ipv4Source, SourceError};

/// An [`Ipv4Source`] that always returns the same address.
///
/// Useful when the public address is known out-of-band, and for exercising
/// the updater without a network.
pub struct FixedSource {
    addr: Ipv4Addr,
}

impl Ipv4Source for FixedSource {
    fn addr(&self) -> Result<Ipv4Addr, SourceError> {
        Ok(self.addr)
    }
}

impl FixedSource {
    pub fn create(address: Ipv4Addr) -> Box<dyn Ipv4Source> {
        Box::new(FixedSource { addr: address })
    }
}
