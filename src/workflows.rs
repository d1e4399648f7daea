//! The operations behind each menu entry.
//!
//! Each workflow fetches fresh data at the start, talks to the operator
//! through a [`Prompter`] and returns what it did so the menu can move on.
//! Nothing here is cached between runs.

use tracing::{info, warn};

use crate::dns_provider::{DnsProvider, DnsRecord, RecordBody, Zone};
use crate::errors::DnsError;
use crate::prompter::Prompter;
use crate::session::Session;

/// TTL written on every CNAME rename.
pub const CNAME_TTL: u32 = 3600;
pub const CONFIRM_TOKEN: &str = "yes";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, result: Result<(), DnsError>, record_id: &str) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(err) => {
                warn!("Record {} failed: {}", record_id, err);
                if let Some(raw) = err.raw_response() {
                    warn!("Response: {}", raw);
                }
                self.failed += 1;
            }
        }
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} succeeded, {} failed", self.succeeded, self.failed)
    }
}

pub async fn lookup_zone<T: DnsProvider, P: Prompter>(
    api: &T,
    session: &mut Session,
    prompter: &mut P,
) -> Result<Zone, DnsError> {
    let domain = prompter.text("Domain name:")?.trim().to_string();
    session.clear_zone();
    if domain.is_empty() {
        return Err(DnsError::InvalidInput("domain name is empty".to_string()));
    }

    let zone = api.find_zone(&domain).await?;
    println!("Selected zone {} ({})", zone.name, zone.id);
    session.select_zone(zone.clone());
    Ok(zone)
}

/// Returns the updated record, or `None` when the zone has no CNAME records.
pub async fn rename_cname<T: DnsProvider, P: Prompter>(
    api: &T,
    session: &Session,
    prompter: &mut P,
) -> Result<Option<DnsRecord>, DnsError> {
    let zone = session.require_zone()?;
    let records = api.list_records(&zone.id, Some("CNAME")).await?;
    if records.is_empty() {
        println!("No CNAME records in {}", zone.name);
        return Ok(None);
    }

    for record in &records {
        println!("{:<34} {} -> {}", record.id, record.name, record.content);
    }

    let id = prompter.text("Record ID to edit:")?;
    let record = records
        .iter()
        .find(|r| r.id == id.trim())
        .ok_or_else(|| DnsError::InvalidInput(format!("no CNAME record with ID {:?}", id.trim())))?;

    let name = keep_if_empty(
        prompter.text(&format!("New name (empty keeps {}):", record.name))?,
        &record.name,
    );
    let content = keep_if_empty(
        prompter.text(&format!("New target (empty keeps {}):", record.content))?,
        &record.content,
    );

    let body = RecordBody {
        record_type: "CNAME".to_string(),
        name,
        content,
        ttl: CNAME_TTL,
        proxied: record.proxied,
    };
    let updated = api.update_record(&zone.id, &record.id, &body).await?;
    println!("Updated {} -> {}", updated.name, updated.content);
    Ok(Some(updated))
}

fn keep_if_empty(input: String, current: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        current.to_string()
    } else {
        input.to_string()
    }
}

pub async fn disable_proxy_all<T: DnsProvider>(
    api: &T,
    session: &Session,
) -> Result<BatchSummary, DnsError> {
    let zone = session.require_zone()?;
    let records = api.list_records(&zone.id, None).await?;
    info!("Disabling proxy on {} records in {}", records.len(), zone.name);

    let mut summary = BatchSummary::default();
    for record in &records {
        let result = api
            .update_record(&zone.id, &record.id, &record.without_proxy())
            .await
            .map(|_| ());
        summary.record(result, &record.id);
    }

    println!("Proxy disabled: {}", summary);
    Ok(summary)
}

/// Returns `None` when the operator backs out at the confirmation.
pub async fn delete_all_records<T: DnsProvider, P: Prompter>(
    api: &T,
    session: &Session,
    prompter: &mut P,
    confirm: bool,
) -> Result<Option<BatchSummary>, DnsError> {
    let zone = session.require_zone()?;
    let records = api.list_records(&zone.id, None).await?;
    if records.is_empty() {
        println!("No records in {}", zone.name);
        return Ok(Some(BatchSummary::default()));
    }

    if confirm {
        let answer = prompter.text(&format!(
            "Delete all {} records in {}? Type '{}' to confirm:",
            records.len(),
            zone.name,
            CONFIRM_TOKEN
        ))?;
        if answer != CONFIRM_TOKEN {
            println!("Cancelled");
            return Ok(None);
        }
    }

    let mut summary = BatchSummary::default();
    for record in &records {
        let result = api.delete_record(&zone.id, &record.id).await;
        summary.record(result, &record.id);
    }

    println!("Deleted records: {}", summary);
    Ok(Some(summary))
}

/// Returns whether the zone was deleted.
pub async fn delete_zone<T: DnsProvider, P: Prompter>(
    api: &T,
    session: &mut Session,
    prompter: &mut P,
) -> Result<bool, DnsError> {
    let zone = session.require_zone()?.clone();
    let answer = prompter.text(&format!(
        "Delete zone {} ({})? Type '{}' to confirm:",
        zone.name, zone.id, CONFIRM_TOKEN
    ))?;
    if answer != CONFIRM_TOKEN {
        println!("Cancelled");
        return Ok(false);
    }

    api.delete_zone(&zone.id).await?;
    session.clear_zone();
    println!("Deleted zone {}", zone.name);
    Ok(true)
}

/// Returns the updated record, or `None` if nothing was changed.
pub async fn edit_address_record<T: DnsProvider, P: Prompter>(
    api: &T,
    session: &Session,
    prompter: &mut P,
) -> Result<Option<DnsRecord>, DnsError> {
    let zone = session.require_zone()?;
    let records: Vec<DnsRecord> = api
        .list_records(&zone.id, None)
        .await?
        .into_iter()
        .filter(DnsRecord::is_address)
        .collect();
    if records.is_empty() {
        println!("No A or AAAA records in {}", zone.name);
        return Ok(None);
    }

    for (index, record) in records.iter().enumerate() {
        println!(
            "{:>3}. {:<4} {:<34} {} -> {} (proxied: {})",
            index + 1,
            record.record_type,
            record.id,
            record.name,
            record.content,
            record.proxied
        );
    }

    let input = prompter.text("Record number:")?;
    let record = input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=records.len()).contains(n))
        .map(|n| &records[n - 1])
        .ok_or_else(|| {
            DnsError::InvalidInput(format!(
                "{:?} is not a number between 1 and {}",
                input.trim(),
                records.len()
            ))
        })?;

    println!(
        "{} {} -> {} (proxied: {})",
        record.record_type, record.name, record.content, record.proxied
    );
    println!("1) Disable proxy");
    println!("2) Cancel");
    if prompter.text("Choice:")?.trim() != "1" {
        println!("Cancelled");
        return Ok(None);
    }

    let updated = api
        .update_record(&zone.id, &record.id, &record.without_proxy())
        .await?;
    println!("Proxy disabled for {}", updated.name);
    Ok(Some(updated))
}
