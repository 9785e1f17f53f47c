//! Fatal error taxonomy
//!
//! Only failures that stop the run, or a whole report category, are typed
//! here. Scope-level failures become [`crate::inventory::ScopeWarning`]s and
//! detail lookups become [`crate::resource::Detail`] values.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    /// The compartment subtree under the tenancy could not be listed
    #[error("Failed to list compartments under {root_id}")]
    ScopeEnumeration {
        root_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// The tenancy (root compartment) itself could not be read
    #[error("Failed to read root compartment {root_id}")]
    RootScope {
        root_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// Object storage namespace lookup failed; aborts the bucket category only
    #[error("Failed to resolve object storage namespace")]
    Namespace {
        #[source]
        source: anyhow::Error,
    },

    /// Availability domains could not be listed; aborts the volume category only
    #[error("Failed to list availability domains")]
    AvailabilityDomains {
        #[source]
        source: anyhow::Error,
    },
}

impl InventoryError {
    /// Whether the whole run must stop, rather than a single category
    pub fn is_run_fatal(&self) -> bool {
        matches!(
            self,
            InventoryError::ScopeEnumeration { .. } | InventoryError::RootScope { .. }
        )
    }

    /// The provider error underneath, for user-facing formatting
    pub fn provider_error(&self) -> &anyhow::Error {
        match self {
            InventoryError::ScopeEnumeration { source, .. }
            | InventoryError::RootScope { source, .. }
            | InventoryError::Namespace { source }
            | InventoryError::AvailabilityDomains { source } => source,
        }
    }
}
