#![cfg_attr(test, allow(dead_code))]

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::provider::ProviderError;

const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com/v2";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One DNS record as the DigitalOcean API reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub data: String,
    #[serde(default)]
    pub ttl: u32,
}

/// One page of a record listing
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsPage {
    pub domain_records: Vec<DomainRecord>,
}

/// Response body of a record update
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResponse {
    pub domain_record: DomainRecord,
}

/// Internal wrapper around the DigitalOcean v2 API. Keeps authentication and
/// response decoding in one place so the provider on top stays mockable.
pub struct DoApi {
    client: Client,
    token: String,
}

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
impl DoApi {
    pub fn try_new(api_token: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(DoApi {
            client,
            token: api_token.to_string(),
        })
    }

    pub fn list_records(
        &self,
        domain: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RecordsPage, ProviderError> {
        let response = self
            .client
            .get(format!(
                "{}/domains/{}/records",
                DIGITALOCEAN_API_BASE, domain
            ))
            .query(&[("page", page), ("per_page", per_page)])
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        decode(response)
    }

    pub fn update_record(
        &self,
        domain: &str,
        record_id: &str,
        data: &str,
    ) -> Result<UpdateResponse, ProviderError> {
        let response = self
            .client
            .put(format!(
                "{}/domains/{}/records/{}",
                DIGITALOCEAN_API_BASE, domain, record_id
            ))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "data": data }))
            .send()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        decode(response)
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let status = response.status();
    let text = response
        .text()
        .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

    if !status.is_success() {
        return Err(ProviderError::Unavailable(format!(
            "[{}] {}",
            status,
            text.trim()
        )));
    }
    serde_json::from_str(&text).map_err(|e| {
        ProviderError::Unavailable(format!("could not parse response: {}. Response: {}", e, text))
    })
}
