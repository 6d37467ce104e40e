//! Contract configuration.
//!
//! Supplied by the hosting runtime when the chaincode is instantiated. The
//! contract itself reads no environment variables or files.

use crate::domain::policy::{msp_ids, AccessPolicy, StatusUpdatePolicy};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Report contract configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// MSP id of the organization that submits reports.
    pub submitter_msp: String,

    /// MSP id of the organization that assigns agencies.
    pub coordinator_msp: String,

    /// Who may call `UpdateStatus`.
    pub status_update_policy: StatusUpdatePolicy,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            submitter_msp: msp_ids::SUBMITTER.to_string(),
            coordinator_msp: msp_ids::COORDINATOR.to_string(),
            status_update_policy: StatusUpdatePolicy::Unrestricted,
        }
    }
}

impl ContractConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    ///
    /// ```json
    /// { "submitter_msp": "CitizenMSP", "status_update_policy": "coordinator_only" }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty MSP ids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.submitter_msp.is_empty() {
            return Err(ConfigError::EmptyField("submitter_msp"));
        }
        if self.coordinator_msp.is_empty() {
            return Err(ConfigError::EmptyField("coordinator_msp"));
        }
        Ok(())
    }

    /// The access policy these settings describe.
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy {
            submitter_msp: self.submitter_msp.clone(),
            coordinator_msp: self.coordinator_msp.clone(),
            status_updates: self.status_update_policy,
        }
    }
}
