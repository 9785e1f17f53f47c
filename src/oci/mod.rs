//! OCI API interaction module
//!
//! This module provides the provider side of the inventory: API-key
//! authentication, a signing HTTP client, and one fetcher per resource
//! category implementing the traits in [`crate::resource::fetcher`].
//!
//! # Module Structure
//!
//! - [`auth`] - Config-file profiles and HTTP request signing
//! - [`client`] - Regional endpoints, URL building, list pagination
//! - [`http`] - Signed GET requests and API error mapping
//! - [`identity`], [`compute`], [`network`], [`storage`], [`loadbalancer`],
//!   [`objectstorage`] - Per-category fetchers
//!
//! # Example
//!
//! ```ignore
//! use ocinfo::oci::{self, auth::OciProfile, client::OciClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let profile = OciProfile::load(&oci::auth::default_config_path(), "DEFAULT")?;
//!     let client = OciClient::new(&profile)?;
//!     let fetchers = oci::fetchers(&client);
//!     let scopes = fetchers.identity.list_scopes(&client.tenancy_id).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod compute;
pub mod http;
pub mod identity;
pub mod loadbalancer;
pub mod network;
pub mod objectstorage;
pub mod storage;

use crate::resource::Fetchers;
use client::OciClient;
use std::sync::Arc;

/// Build every category fetcher over one client
pub fn fetchers(client: &OciClient) -> Fetchers {
    Fetchers {
        identity: Arc::new(identity::OciIdentity::new(client.clone())),
        compute: Arc::new(compute::OciCompute::new(client.clone())),
        network: Arc::new(network::OciNetwork::new(client.clone())),
        storage: Arc::new(storage::OciStorage::new(client.clone())),
        load_balancer: Arc::new(loadbalancer::OciLoadBalancer::new(client.clone())),
        object_storage: Arc::new(objectstorage::OciObjectStorage::new(client.clone())),
    }
}
