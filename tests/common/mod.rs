//! In-memory OCI tenancy for driving the inventory engine in tests
//!
//! `FakeCloud` implements every fetcher trait over plain collections.
//! Any call can be made to fail with [`FakeCloud::fail`], and every call is
//! counted so tests can assert on what the engine asked for.

#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use ocinfo::resource::*;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const TENANCY: &str = "ocid1.tenancy.oc1..root";

#[derive(Default)]
pub struct FakeCloud {
    pub root: Option<Scope>,
    pub scopes: Vec<Scope>,
    pub availability_domains: Vec<String>,

    pub instances: Vec<ComputeInstance>,
    pub instance_details: HashMap<String, InstanceDetail>,
    pub network_attachments: Vec<NetworkAttachment>,
    pub interfaces: HashMap<String, NetworkInterface>,
    pub subnets: HashMap<String, Subnet>,
    pub security_groups: Vec<SecurityGroup>,
    pub security_rules: HashMap<String, Vec<SecurityRule>>,

    pub boot_volumes: Vec<Volume>,
    pub block_volumes: Vec<Volume>,
    pub boot_attachments: Vec<VolumeAttachment>,
    pub volume_attachments: Vec<VolumeAttachment>,

    pub load_balancers: Vec<LoadBalancer>,
    pub backend_sets: HashMap<String, Vec<BackendSet>>,
    pub backends: HashMap<(String, String), Vec<Backend>>,

    pub namespace: Option<String>,
    pub buckets: Vec<BucketSummary>,
    pub bucket_details: HashMap<String, BucketDetail>,
    /// Object sizes per bucket; object names are `obj-NNNNNN` by index
    pub objects: HashMap<String, Vec<u64>>,

    failures: HashSet<(String, String)>,
    calls: Mutex<HashMap<(String, String), usize>>,
}

impl FakeCloud {
    /// A tenancy named `acme` with no compartments below it
    pub fn new() -> Self {
        Self {
            root: Some(scope(TENANCY, "acme")),
            availability_domains: vec!["AD-1".to_string()],
            namespace: Some("acmens".to_string()),
            ..Self::default()
        }
    }

    /// Make `op` fail for `key` (a scope id, resource id or bucket name)
    pub fn fail(&mut self, op: &str, key: &str) {
        self.failures.insert((op.to_string(), key.to_string()));
    }

    /// Calls made to `op`, over all keys
    pub fn calls(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|((name, _), _)| name == op)
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn calls_for(&self, op: &str, key: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&(op.to_string(), key.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn check(&self, op: &str, key: &str) -> Result<()> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry((op.to_string(), key.to_string()))
            .or_insert(0) += 1;
        if self.failures.contains(&(op.to_string(), key.to_string())) {
            bail!("injected failure: {} {}", op, key);
        }
        Ok(())
    }

    pub fn into_fetchers(self) -> (Arc<FakeCloud>, Fetchers) {
        let cloud = Arc::new(self);
        let fetchers = Fetchers {
            identity: cloud.clone(),
            compute: cloud.clone(),
            network: cloud.clone(),
            storage: cloud.clone(),
            load_balancer: cloud.clone(),
            object_storage: cloud.clone(),
        };
        (cloud, fetchers)
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn scope(id: &str, name: &str) -> Scope {
    Scope {
        id: id.to_string(),
        name: name.to_string(),
        lifecycle_state: "ACTIVE".to_string(),
    }
}

pub fn instance(id: &str, name: &str, scope_id: &str, state: &str) -> ComputeInstance {
    ComputeInstance {
        id: id.to_string(),
        name: name.to_string(),
        scope_id: scope_id.to_string(),
        lifecycle_state: state.to_string(),
        shape: "VM.Standard.E4.Flex".to_string(),
        availability_domain: "AD-1".to_string(),
    }
}

pub fn volume(id: &str, name: &str, kind: VolumeKind, scope_id: &str, size_gb: u64) -> Volume {
    Volume {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        scope_id: scope_id.to_string(),
        availability_domain: "AD-1".to_string(),
        size_gb: Some(size_gb),
        lifecycle_state: "AVAILABLE".to_string(),
    }
}

pub fn boot_attachment(instance_id: &str, volume_id: &str, state: &str) -> VolumeAttachment {
    VolumeAttachment::Boot {
        instance_id: instance_id.to_string(),
        volume_id: volume_id.to_string(),
        lifecycle_state: state.to_string(),
    }
}

pub fn block_attachment(instance_id: &str, volume_id: &str, state: &str) -> VolumeAttachment {
    VolumeAttachment::Block {
        instance_id: instance_id.to_string(),
        volume_id: volume_id.to_string(),
        lifecycle_state: state.to_string(),
    }
}

pub fn load_balancer(id: &str, name: &str, scope_id: &str) -> LoadBalancer {
    LoadBalancer {
        id: id.to_string(),
        name: name.to_string(),
        scope_id: scope_id.to_string(),
        lifecycle_state: "ACTIVE".to_string(),
        shape_name: Some("flexible".to_string()),
        ip_addresses: vec!["129.146.0.10".to_string()],
        is_private: false,
    }
}

pub fn bucket(name: &str, scope_id: &str) -> BucketSummary {
    BucketSummary {
        name: name.to_string(),
        scope_id: scope_id.to_string(),
    }
}

pub fn object_name(index: usize) -> String {
    format!("obj-{:06}", index)
}

fn object_index(cursor: &str) -> Result<usize> {
    cursor
        .strip_prefix("obj-")
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| anyhow!("bad cursor {}", cursor))
}

// =============================================================================
// Fetcher implementations
// =============================================================================

#[async_trait]
impl IdentityFetcher for FakeCloud {
    async fn list_scopes(&self, root_id: &str) -> Result<Vec<Scope>> {
        self.check("list_scopes", root_id)?;
        Ok(self.scopes.clone())
    }

    async fn get_scope(&self, scope_id: &str) -> Result<Scope> {
        self.check("get_scope", scope_id)?;
        self.root
            .clone()
            .filter(|root| root.id == scope_id)
            .ok_or_else(|| anyhow!("no scope {}", scope_id))
    }

    async fn list_availability_domains(&self, root_id: &str) -> Result<Vec<String>> {
        self.check("list_availability_domains", root_id)?;
        Ok(self.availability_domains.clone())
    }
}

#[async_trait]
impl ComputeFetcher for FakeCloud {
    async fn list_instances(&self, scope_id: &str) -> Result<Vec<ComputeInstance>> {
        self.check("list_instances", scope_id)?;
        Ok(self
            .instances
            .iter()
            .filter(|i| i.scope_id == scope_id)
            .cloned()
            .collect())
    }

    async fn get_instance(&self, instance_id: &str) -> Result<InstanceDetail> {
        self.check("get_instance", instance_id)?;
        self.instance_details
            .get(instance_id)
            .cloned()
            .ok_or_else(|| anyhow!("no instance {}", instance_id))
    }

    async fn list_network_attachments(
        &self,
        _scope_id: &str,
        instance_id: &str,
    ) -> Result<Vec<NetworkAttachment>> {
        self.check("list_network_attachments", instance_id)?;
        Ok(self
            .network_attachments
            .iter()
            .filter(|a| a.instance_id == instance_id)
            .cloned()
            .collect())
    }

    async fn list_boot_volume_attachments(
        &self,
        query: &BootAttachmentQuery,
    ) -> Result<Vec<VolumeAttachment>> {
        let key = query
            .instance_id
            .clone()
            .or_else(|| query.boot_volume_id.clone())
            .unwrap_or_default();
        self.check("list_boot_volume_attachments", &key)?;
        Ok(self
            .boot_attachments
            .iter()
            .filter(|a| query.instance_id.as_deref().map_or(true, |id| a.instance_id() == id))
            .filter(|a| {
                query
                    .boot_volume_id
                    .as_deref()
                    .map_or(true, |id| a.volume_id() == id)
            })
            .cloned()
            .collect())
    }

    async fn list_volume_attachments(
        &self,
        query: &VolumeAttachmentQuery,
    ) -> Result<Vec<VolumeAttachment>> {
        let key = query
            .instance_id
            .clone()
            .or_else(|| query.volume_id.clone())
            .unwrap_or_default();
        self.check("list_volume_attachments", &key)?;
        Ok(self
            .volume_attachments
            .iter()
            .filter(|a| query.instance_id.as_deref().map_or(true, |id| a.instance_id() == id))
            .filter(|a| query.volume_id.as_deref().map_or(true, |id| a.volume_id() == id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NetworkFetcher for FakeCloud {
    async fn get_network_interface(&self, interface_id: &str) -> Result<NetworkInterface> {
        self.check("get_network_interface", interface_id)?;
        self.interfaces
            .get(interface_id)
            .cloned()
            .ok_or_else(|| anyhow!("no vnic {}", interface_id))
    }

    async fn get_subnet(&self, subnet_id: &str) -> Result<Subnet> {
        self.check("get_subnet", subnet_id)?;
        self.subnets
            .get(subnet_id)
            .cloned()
            .ok_or_else(|| anyhow!("no subnet {}", subnet_id))
    }

    async fn get_security_group(&self, group_id: &str) -> Result<SecurityGroup> {
        self.check("get_security_group", group_id)?;
        self.security_groups
            .iter()
            .find(|g| g.id == group_id)
            .cloned()
            .ok_or_else(|| anyhow!("no nsg {}", group_id))
    }

    async fn list_security_groups(&self, scope_id: &str) -> Result<Vec<SecurityGroup>> {
        self.check("list_security_groups", scope_id)?;
        Ok(self
            .security_groups
            .iter()
            .filter(|g| g.scope_id == scope_id)
            .cloned()
            .collect())
    }

    async fn list_security_rules(&self, group_id: &str) -> Result<Vec<SecurityRule>> {
        self.check("list_security_rules", group_id)?;
        Ok(self.security_rules.get(group_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl StorageFetcher for FakeCloud {
    async fn list_boot_volumes(
        &self,
        scope_id: &str,
        availability_domain: &str,
    ) -> Result<Vec<Volume>> {
        self.check("list_boot_volumes", scope_id)?;
        Ok(self
            .boot_volumes
            .iter()
            .filter(|v| v.scope_id == scope_id && v.availability_domain == availability_domain)
            .cloned()
            .collect())
    }

    async fn list_block_volumes(&self, scope_id: &str) -> Result<Vec<Volume>> {
        self.check("list_block_volumes", scope_id)?;
        Ok(self
            .block_volumes
            .iter()
            .filter(|v| v.scope_id == scope_id)
            .cloned()
            .collect())
    }

    async fn get_boot_volume(&self, volume_id: &str) -> Result<Volume> {
        self.check("get_boot_volume", volume_id)?;
        self.boot_volumes
            .iter()
            .find(|v| v.id == volume_id)
            .cloned()
            .ok_or_else(|| anyhow!("no boot volume {}", volume_id))
    }

    async fn get_block_volume(&self, volume_id: &str) -> Result<Volume> {
        self.check("get_block_volume", volume_id)?;
        self.block_volumes
            .iter()
            .find(|v| v.id == volume_id)
            .cloned()
            .ok_or_else(|| anyhow!("no block volume {}", volume_id))
    }
}

#[async_trait]
impl LoadBalancerFetcher for FakeCloud {
    async fn list_load_balancers(&self, scope_id: &str) -> Result<Vec<LoadBalancer>> {
        self.check("list_load_balancers", scope_id)?;
        Ok(self
            .load_balancers
            .iter()
            .filter(|lb| lb.scope_id == scope_id)
            .cloned()
            .collect())
    }

    async fn list_backend_sets(&self, load_balancer_id: &str) -> Result<Vec<BackendSet>> {
        self.check("list_backend_sets", load_balancer_id)?;
        Ok(self
            .backend_sets
            .get(load_balancer_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_backends(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
    ) -> Result<Vec<Backend>> {
        self.check("list_backends", backend_set_name)?;
        Ok(self
            .backends
            .get(&(load_balancer_id.to_string(), backend_set_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ObjectStorageFetcher for FakeCloud {
    async fn get_namespace(&self) -> Result<String> {
        self.check("get_namespace", "")?;
        self.namespace.clone().ok_or_else(|| anyhow!("no namespace"))
    }

    async fn list_buckets(&self, _namespace: &str, scope_id: &str) -> Result<Vec<BucketSummary>> {
        self.check("list_buckets", scope_id)?;
        Ok(self
            .buckets
            .iter()
            .filter(|b| b.scope_id == scope_id)
            .cloned()
            .collect())
    }

    async fn get_bucket(&self, _namespace: &str, bucket: &str) -> Result<BucketDetail> {
        self.check("get_bucket", bucket)?;
        self.bucket_details
            .get(bucket)
            .cloned()
            .ok_or_else(|| anyhow!("no bucket {}", bucket))
    }

    async fn list_objects(
        &self,
        _namespace: &str,
        bucket: &str,
        request: &ObjectPageRequest,
    ) -> Result<ObjectPage> {
        let start = match &request.start {
            Some(cursor) => object_index(cursor)?,
            None => 0,
        };
        self.check("list_objects", bucket)?;
        if let Some(cursor) = &request.start {
            self.check("list_objects_from", &format!("{}@{}", bucket, cursor))?;
        }

        let sizes = self.objects.get(bucket).cloned().unwrap_or_default();
        let end = (start + request.limit as usize).min(sizes.len());
        let page = sizes.get(start..end).map(|s| s.to_vec()).unwrap_or_default();
        let next_start = (end < sizes.len()).then(|| object_name(end));

        Ok(ObjectPage {
            sizes: page,
            next_start,
        })
    }
}
