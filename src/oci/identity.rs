//! OCI Identity
//!
//! Compartment listing and availability domains.

use super::client::{decode, decode_list, OciClient};
use crate::resource::{IdentityFetcher, Scope};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

const ACTIVE: &str = "ACTIVE";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompartmentWire {
    id: String,
    name: String,
    #[serde(default)]
    lifecycle_state: String,
}

impl From<CompartmentWire> for Scope {
    fn from(wire: CompartmentWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            lifecycle_state: wire.lifecycle_state,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AvailabilityDomainWire {
    name: String,
}

/// Identity fetcher over the OCI REST API
#[derive(Clone)]
pub struct OciIdentity {
    client: OciClient,
}

impl OciIdentity {
    pub fn new(client: OciClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityFetcher for OciIdentity {
    async fn list_scopes(&self, root_id: &str) -> Result<Vec<Scope>> {
        let url = self.client.identity_url(
            "compartments",
            &[
                ("compartmentId", root_id),
                ("compartmentIdInSubtree", "true"),
                ("lifecycleState", ACTIVE),
            ],
        )?;
        let compartments: Vec<CompartmentWire> = decode_list(self.client.get_all(&url).await?)?;

        Ok(compartments
            .into_iter()
            .filter(|c| c.lifecycle_state.is_empty() || c.lifecycle_state == ACTIVE)
            .map(Scope::from)
            .collect())
    }

    async fn get_scope(&self, scope_id: &str) -> Result<Scope> {
        let url = self
            .client
            .identity_url(&format!("compartments/{}", scope_id), &[])?;
        let compartment: CompartmentWire = decode(self.client.get(&url).await?)?;
        Ok(compartment.into())
    }

    async fn list_availability_domains(&self, root_id: &str) -> Result<Vec<String>> {
        let url = self
            .client
            .identity_url("availabilityDomains", &[("compartmentId", root_id)])?;
        let domains: Vec<AvailabilityDomainWire> = decode_list(self.client.get_all(&url).await?)?;
        Ok(domains.into_iter().map(|d| d.name).collect())
    }
}
