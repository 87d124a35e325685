//! Service record: a microservice known to the hub.
//!
//! Records are looked up by name; a missing record is how callers learn that
//! a service does not exist.

use serde::{Deserialize, Serialize};

/// Registration details of a running service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub protocol: String,
    pub address: String,
    pub port: u16,
}

impl ServiceRecord {
    /// Base URL the service listens on.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.address, self.port)
    }
}
