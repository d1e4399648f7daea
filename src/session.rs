use crate::dns_provider::Zone;
use crate::errors::DnsError;

/// State carried between workflows for one run of the menu.
#[derive(Debug, Default)]
pub struct Session {
    zone: Option<Zone>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    pub fn require_zone(&self) -> Result<&Zone, DnsError> {
        self.zone.as_ref().ok_or(DnsError::NoZoneSelected)
    }

    pub fn select_zone(&mut self, zone: Zone) {
        self.zone = Some(zone);
    }

    pub fn clear_zone(&mut self) {
        self.zone = None;
    }
}
