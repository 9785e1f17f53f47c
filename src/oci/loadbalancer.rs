//! OCI Load Balancing
//!
//! Load balancers, backend sets and backends.

use super::client::{decode_list, OciClient};
use crate::resource::{Backend, BackendSet, LoadBalancer, LoadBalancerFetcher};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpAddressWire {
    #[serde(default)]
    ip_address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadBalancerWire {
    id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    compartment_id: String,
    #[serde(default)]
    lifecycle_state: String,
    #[serde(default)]
    shape_name: Option<String>,
    #[serde(default)]
    ip_addresses: Vec<IpAddressWire>,
    #[serde(default)]
    is_private: bool,
}

#[derive(Debug, Deserialize)]
struct BackendSetWire {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendWire {
    #[serde(default)]
    name: String,
    #[serde(default)]
    target_id: Option<String>,
    #[serde(default)]
    ip_address: Option<String>,
}

/// Load balancer fetcher over the OCI REST API
#[derive(Clone)]
pub struct OciLoadBalancer {
    client: OciClient,
}

impl OciLoadBalancer {
    pub fn new(client: OciClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LoadBalancerFetcher for OciLoadBalancer {
    async fn list_load_balancers(&self, scope_id: &str) -> Result<Vec<LoadBalancer>> {
        let url = self
            .client
            .load_balancer_url("loadBalancers", &[("compartmentId", scope_id)])?;
        let lbs: Vec<LoadBalancerWire> = decode_list(self.client.get_all(&url).await?)?;

        Ok(lbs
            .into_iter()
            .map(|lb| LoadBalancer {
                id: lb.id,
                name: lb.display_name,
                scope_id: lb.compartment_id,
                lifecycle_state: lb.lifecycle_state,
                shape_name: lb.shape_name.filter(|s| !s.is_empty()),
                // Addresses without a value render as "-"
                ip_addresses: lb
                    .ip_addresses
                    .into_iter()
                    .map(|ip| ip.ip_address.unwrap_or_else(|| "-".to_string()))
                    .collect(),
                is_private: lb.is_private,
            })
            .collect())
    }

    async fn list_backend_sets(&self, load_balancer_id: &str) -> Result<Vec<BackendSet>> {
        let url = self.client.load_balancer_url(
            &format!("loadBalancers/{}/backendSets", load_balancer_id),
            &[],
        )?;
        let sets: Vec<BackendSetWire> = decode_list(self.client.get_all(&url).await?)?;
        Ok(sets.into_iter().map(|s| BackendSet { name: s.name }).collect())
    }

    async fn list_backends(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
    ) -> Result<Vec<Backend>> {
        let url = self.client.load_balancer_url(
            &format!(
                "loadBalancers/{}/backendSets/{}/backends",
                load_balancer_id,
                urlencoding::encode(backend_set_name)
            ),
            &[],
        )?;
        let backends: Vec<BackendWire> = decode_list(self.client.get_all(&url).await?)?;

        Ok(backends
            .into_iter()
            .map(|b| Backend {
                name: b.name,
                target_id: b.target_id.filter(|s| !s.is_empty()),
                ip_address: b.ip_address.filter(|s| !s.is_empty()),
            })
            .collect())
    }
}
