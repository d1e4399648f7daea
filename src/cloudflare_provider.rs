use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api_client::ApiClient;
use crate::config::Config;
use crate::dns_provider::{DnsProvider, DnsRecord, RecordBody, Zone};
use crate::errors::DnsError;

/// Zone as returned by `GET /zones`; the id may come back null.
#[derive(Debug, Deserialize)]
struct ZoneEntry {
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

pub struct CloudflareProvider {
    api: ApiClient,
}

impl CloudflareProvider {
    pub fn new(config: &Config) -> Result<Self, DnsError> {
        Ok(Self {
            api: ApiClient::new(&config.api_url, &config.api_token)?,
        })
    }

    fn records_path(zone_id: &str) -> String {
        format!("/zones/{}/dns_records", zone_id)
    }
}

impl DnsProvider for CloudflareProvider {
    async fn find_zone(&self, name: &str) -> Result<Zone, DnsError> {
        debug!("Looking up zone for: {}", name);
        let zones: Option<Vec<ZoneEntry>> = self
            .api
            .request(Method::GET, "/zones", &[("name", name.to_string())], None)
            .await?
            .into_result()?;
        let zones = zones.unwrap_or_default();

        if zones.len() > 1 {
            warn!("{} zones named {}, using the first one", zones.len(), name);
        }
        let zone = zones
            .into_iter()
            .next()
            .and_then(|zone| zone.id.map(|id| (id, zone.name)))
            .map(|(id, zone_name)| Zone {
                id,
                name: zone_name.unwrap_or_else(|| name.to_string()),
            })
            .ok_or_else(|| DnsError::NotFound(format!("Domain {}", name)))?;

        debug!("Found zone ID: {}", zone.id);
        Ok(zone)
    }

    async fn list_records(
        &self,
        zone_id: &str,
        record_type: Option<&str>,
    ) -> Result<Vec<DnsRecord>, DnsError> {
        let query: Vec<(&str, String)> = record_type
            .map(|t| vec![("type", t.to_string())])
            .unwrap_or_default();
        self.api.list_all(&Self::records_path(zone_id), &query).await
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        body: &RecordBody,
    ) -> Result<DnsRecord, DnsError> {
        let path = format!("{}/{}", Self::records_path(zone_id), record_id);
        let payload = serde_json::to_value(body).map_err(|source| DnsError::Decode {
            source,
            raw: String::new(),
        })?;
        let envelope = self
            .api
            .request(Method::PUT, &path, &[], Some(&payload))
            .await?
            .ensure_success()?;

        // The envelope already reported success, a missing or short result only
        // means we echo back what was sent.
        let record = serde_json::from_value::<DnsRecord>(envelope.result).unwrap_or_else(|err| {
            debug!("Update result for {} not a full record: {}", record_id, err);
            DnsRecord {
                id: record_id.to_string(),
                record_type: body.record_type.clone(),
                name: body.name.clone(),
                content: body.content.clone(),
                ttl: body.ttl,
                proxied: body.proxied,
            }
        });
        info!("Updated record {} ({})", record.name, record_id);
        Ok(record)
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), DnsError> {
        let path = format!("{}/{}", Self::records_path(zone_id), record_id);
        self.api
            .request(Method::DELETE, &path, &[], None)
            .await?
            .ensure_success()?;
        info!("Deleted record {}", record_id);
        Ok(())
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<(), DnsError> {
        self.api
            .request(Method::DELETE, &format!("/zones/{}", zone_id), &[], None)
            .await?
            .ensure_success()?;
        info!("Deleted zone {}", zone_id);
        Ok(())
    }
}
