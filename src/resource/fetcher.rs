//! Resource Fetchers
//!
//! One trait per resource category, mirroring the provider's own call
//! granularity: a listing per scope plus the detail calls the correlator
//! needs. Implementations take their execution context (credentials,
//! endpoints) at construction; the OCI ones live in [`crate::oci`], tests
//! substitute in-memory fakes.

use super::model::*;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Compartment hierarchy and tenancy-wide metadata
#[async_trait]
pub trait IdentityFetcher: Send + Sync {
    /// All ACTIVE compartments anywhere under `root_id` (the root itself excluded)
    async fn list_scopes(&self, root_id: &str) -> Result<Vec<Scope>>;

    /// Detail of a single compartment; used for the tenancy root
    async fn get_scope(&self, scope_id: &str) -> Result<Scope>;

    /// Availability domain names of the tenancy
    async fn list_availability_domains(&self, root_id: &str) -> Result<Vec<String>>;
}

#[async_trait]
pub trait ComputeFetcher: Send + Sync {
    async fn list_instances(&self, scope_id: &str) -> Result<Vec<ComputeInstance>>;

    async fn get_instance(&self, instance_id: &str) -> Result<InstanceDetail>;

    async fn list_network_attachments(
        &self,
        scope_id: &str,
        instance_id: &str,
    ) -> Result<Vec<NetworkAttachment>>;

    /// Yields only [`VolumeAttachment::Boot`] values
    async fn list_boot_volume_attachments(
        &self,
        query: &BootAttachmentQuery,
    ) -> Result<Vec<VolumeAttachment>>;

    /// May yield both kinds; callers keep the [`VolumeAttachment::Block`] ones
    async fn list_volume_attachments(
        &self,
        query: &VolumeAttachmentQuery,
    ) -> Result<Vec<VolumeAttachment>>;
}

#[async_trait]
pub trait NetworkFetcher: Send + Sync {
    async fn get_network_interface(&self, interface_id: &str) -> Result<NetworkInterface>;

    async fn get_subnet(&self, subnet_id: &str) -> Result<Subnet>;

    async fn get_security_group(&self, group_id: &str) -> Result<SecurityGroup>;

    async fn list_security_groups(&self, scope_id: &str) -> Result<Vec<SecurityGroup>>;

    async fn list_security_rules(&self, group_id: &str) -> Result<Vec<SecurityRule>>;
}

#[async_trait]
pub trait StorageFetcher: Send + Sync {
    async fn list_boot_volumes(
        &self,
        scope_id: &str,
        availability_domain: &str,
    ) -> Result<Vec<Volume>>;

    async fn list_block_volumes(&self, scope_id: &str) -> Result<Vec<Volume>>;

    async fn get_boot_volume(&self, volume_id: &str) -> Result<Volume>;

    async fn get_block_volume(&self, volume_id: &str) -> Result<Volume>;
}

#[async_trait]
pub trait LoadBalancerFetcher: Send + Sync {
    async fn list_load_balancers(&self, scope_id: &str) -> Result<Vec<LoadBalancer>>;

    async fn list_backend_sets(&self, load_balancer_id: &str) -> Result<Vec<BackendSet>>;

    async fn list_backends(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
    ) -> Result<Vec<Backend>>;
}

#[async_trait]
pub trait ObjectStorageFetcher: Send + Sync {
    async fn get_namespace(&self) -> Result<String>;

    async fn list_buckets(&self, namespace: &str, scope_id: &str) -> Result<Vec<BucketSummary>>;

    async fn get_bucket(&self, namespace: &str, bucket: &str) -> Result<BucketDetail>;

    /// One page of the object listing; never follows the cursor itself
    async fn list_objects(
        &self,
        namespace: &str,
        bucket: &str,
        request: &ObjectPageRequest,
    ) -> Result<ObjectPage>;
}

/// The full set of fetchers an inventory run works with
#[derive(Clone)]
pub struct Fetchers {
    pub identity: Arc<dyn IdentityFetcher>,
    pub compute: Arc<dyn ComputeFetcher>,
    pub network: Arc<dyn NetworkFetcher>,
    pub storage: Arc<dyn StorageFetcher>,
    pub load_balancer: Arc<dyn LoadBalancerFetcher>,
    pub object_storage: Arc<dyn ObjectStorageFetcher>,
}
