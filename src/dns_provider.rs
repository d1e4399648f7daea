use serde::{Deserialize, Serialize};

use crate::errors::DnsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
}

/// Full body for a PUT to `dns_records/{id}`. The type always echoes the
/// record being replaced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordBody {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

impl DnsRecord {
    pub fn is_address(&self) -> bool {
        matches!(self.record_type.as_str(), "A" | "AAAA")
    }

    pub fn to_body(&self) -> RecordBody {
        RecordBody {
            record_type: self.record_type.clone(),
            name: self.name.clone(),
            content: self.content.clone(),
            ttl: self.ttl,
            proxied: self.proxied,
        }
    }

    pub fn without_proxy(&self) -> RecordBody {
        RecordBody {
            proxied: false,
            ..self.to_body()
        }
    }
}

/// Record repository for a single provider account.
pub trait DnsProvider {
    /// Resolves a domain name to its zone, picking the first match.
    async fn find_zone(&self, name: &str) -> Result<Zone, DnsError>;

    async fn list_records(
        &self,
        zone_id: &str,
        record_type: Option<&str>,
    ) -> Result<Vec<DnsRecord>, DnsError>;

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        body: &RecordBody,
    ) -> Result<DnsRecord, DnsError>;

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), DnsError>;

    async fn delete_zone(&self, zone_id: &str) -> Result<(), DnsError>;
}
