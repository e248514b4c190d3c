mod wrapper;

use std::net::Ipv4Addr;

use log::{debug, trace};
use mockall_double::double;

#[double]
use self::wrapper::DoApi;
use self::wrapper::DomainRecord;
use super::{DnsProvider, ProviderError, ProviderRecord};

const DIGITALOCEAN_RECORD_PAGE_SIZE: u32 = 200;

/// A [`DnsProvider`] connecting to the DigitalOcean v2 API for listing and
/// updating DNS records.
///
/// To create a provider, use the [`DigitalOceanProvider::from_config()`] function.
#[non_exhaustive]
pub struct DigitalOceanProvider {
    api: DoApi,
}

/// Configuration object for a [`DigitalOceanProvider`]. Must be supplied when creating a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigitalOceanProviderConfig<'a> {
    /// The personal access token to authenticate with
    pub api_token: &'a str,
}

impl DigitalOceanProvider {
    pub fn from_config(
        config: &DigitalOceanProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, ProviderError> {
        let api = DoApi::try_new(config.api_token)?;
        Ok(Box::new(DigitalOceanProvider { api }))
    }
}

impl From<&DomainRecord> for ProviderRecord {
    fn from(r: &DomainRecord) -> Self {
        ProviderRecord {
            // DigitalOcean ids are numeric; they stay opaque strings on our side
            id: r.id.to_string(),
            name: r.name.to_owned(),
            record_type: r.kind.to_owned(),
        }
    }
}

impl DnsProvider for DigitalOceanProvider {
    fn records(&self, domain: &str) -> Result<Vec<ProviderRecord>, ProviderError> {
        debug!("Reading records for {} from the DigitalOcean API", domain);

        // The API caps per_page; keep requesting pages for as long as they come back full
        let mut records: Vec<ProviderRecord> = Vec::new();
        let mut page = 1;
        loop {
            let batch = self
                .api
                .list_records(domain, page, DIGITALOCEAN_RECORD_PAGE_SIZE)?
                .domain_records;
            let full_page = batch.len() >= DIGITALOCEAN_RECORD_PAGE_SIZE as usize;
            records.extend(batch.iter().map(ProviderRecord::from));
            if !full_page {
                break;
            }
            page += 1;
        }
        trace!("Collected records: {:?}", records);
        Ok(records)
    }

    fn update_record(
        &self,
        domain: &str,
        record_id: &str,
        address: Ipv4Addr,
    ) -> Result<(), ProviderError> {
        let updated = self
            .api
            .update_record(domain, record_id, &address.to_string())?;
        debug!(
            "Updated record {} in {} to {}",
            ProviderRecord::from(&updated.domain_record),
            domain,
            address
        );
        Ok(())
    }
}
