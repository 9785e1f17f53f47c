//! Correlator
//!
//! Resolves the cross-references of each listed resource into [`Detail`]
//! values. Nothing here fails: every lookup outcome is carried to the
//! report assembler, which picks the placeholder to show.

use crate::resource::{
    Backend, BootAttachmentQuery, BucketDetail, BucketSummary, ComputeInstance, Detail, Fetchers,
    InstanceDetail, LoadBalancer, RuleDirection, Scope, SecurityGroup, SecurityRule, Volume,
    VolumeAttachment, VolumeAttachmentQuery, VolumeKind,
};

use super::aggregate::{aggregate_objects, BucketTotals};

/// Network view of an instance's primary interface
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSummary {
    pub private_ip: Option<String>,
    pub public_ip: Option<String>,
    pub subnet: Detail<String>,
    /// One entry per attached NSG, in attachment order
    pub security_groups: Vec<Detail<String>>,
}

#[derive(Debug, Clone)]
pub struct CorrelatedInstance {
    pub scope_name: String,
    pub instance: ComputeInstance,
    pub shape: Detail<InstanceDetail>,
    pub network: Detail<NetworkSummary>,
    pub boot_volume_gb: Detail<u64>,
    /// Outer detail is the attachment listing, inner ones the volume lookups
    pub block_volumes_gb: Detail<Vec<Detail<u64>>>,
}

#[derive(Debug, Clone)]
pub struct CorrelatedBackendSet {
    pub name: String,
    pub backends: Detail<Vec<Backend>>,
}

#[derive(Debug, Clone)]
pub struct CorrelatedLoadBalancer {
    pub scope_name: String,
    pub load_balancer: LoadBalancer,
    pub backend_sets: Detail<Vec<CorrelatedBackendSet>>,
}

#[derive(Debug, Clone)]
pub struct CorrelatedSecurityGroup {
    pub scope_name: String,
    pub group: SecurityGroup,
    /// Ingress rules only
    pub ingress_rules: Detail<Vec<SecurityRule>>,
}

#[derive(Debug, Clone)]
pub struct CorrelatedVolume {
    pub scope_name: String,
    pub volume: Volume,
    /// Instance name, or its raw id when the instance lookup failed
    pub attached_instance: Detail<String>,
}

#[derive(Debug, Clone)]
pub struct CorrelatedBucket {
    pub scope_name: String,
    pub bucket: BucketSummary,
    pub detail: Detail<BucketDetail>,
    pub totals: BucketTotals,
}

fn volume_size(volume: Volume) -> Detail<u64> {
    volume.size_gb.map_or(Detail::Missing, Detail::Resolved)
}

// =============================================================================
// Instances
// =============================================================================

pub async fn correlate_instance(
    fetchers: &Fetchers,
    scope: &Scope,
    instance: ComputeInstance,
) -> CorrelatedInstance {
    let shape = Detail::from_result(fetchers.compute.get_instance(&instance.id).await, "instance");
    let network = resolve_network(fetchers, &scope.id, &instance.id).await;
    let boot_volume_gb = resolve_boot_volume(fetchers, &scope.id, &instance).await;
    let block_volumes_gb = resolve_block_volumes(fetchers, &scope.id, &instance.id).await;

    CorrelatedInstance {
        scope_name: scope.name.clone(),
        instance,
        shape,
        network,
        boot_volume_gb,
        block_volumes_gb,
    }
}

/// Only the first network attachment is reported
async fn resolve_network(
    fetchers: &Fetchers,
    scope_id: &str,
    instance_id: &str,
) -> Detail<NetworkSummary> {
    let attachments = match fetchers
        .compute
        .list_network_attachments(scope_id, instance_id)
        .await
    {
        Ok(attachments) => attachments,
        Err(e) => {
            tracing::debug!("VNIC attachment listing failed for {}: {:#}", instance_id, e);
            return Detail::Failed;
        }
    };

    let Some(primary) = attachments.into_iter().next() else {
        return Detail::Missing;
    };

    let vnic = match fetchers
        .network
        .get_network_interface(&primary.interface_id)
        .await
    {
        Ok(vnic) => vnic,
        Err(e) => {
            tracing::debug!("VNIC lookup failed for {}: {:#}", primary.interface_id, e);
            return Detail::Failed;
        }
    };

    let subnet = if vnic.subnet_id.is_empty() {
        Detail::Missing
    } else {
        Detail::from_result(
            fetchers.network.get_subnet(&vnic.subnet_id).await.map(|s| s.name),
            "subnet",
        )
    };

    let mut security_groups = Vec::with_capacity(vnic.security_group_ids.len());
    for group_id in &vnic.security_group_ids {
        let name = fetchers
            .network
            .get_security_group(group_id)
            .await
            .map(|g| g.name);
        security_groups.push(Detail::from_result(name, "NSG"));
    }

    Detail::Resolved(NetworkSummary {
        private_ip: vnic.private_ip,
        public_ip: vnic.public_ip,
        subnet,
        security_groups,
    })
}

async fn resolve_boot_volume(
    fetchers: &Fetchers,
    scope_id: &str,
    instance: &ComputeInstance,
) -> Detail<u64> {
    let query = BootAttachmentQuery {
        scope_id: scope_id.to_string(),
        availability_domain: instance.availability_domain.clone(),
        instance_id: Some(instance.id.clone()),
        boot_volume_id: None,
    };

    let attachments = match fetchers.compute.list_boot_volume_attachments(&query).await {
        Ok(attachments) => attachments,
        Err(e) => {
            tracing::debug!("Boot attachment listing failed for {}: {:#}", instance.id, e);
            return Detail::Failed;
        }
    };

    let Some(attachment) = attachments.into_iter().find(|a| !a.is_detached()) else {
        return Detail::Missing;
    };

    Detail::from_result(
        fetchers.storage.get_boot_volume(attachment.volume_id()).await,
        "boot volume",
    )
    .and_then(volume_size)
}

async fn resolve_block_volumes(
    fetchers: &Fetchers,
    scope_id: &str,
    instance_id: &str,
) -> Detail<Vec<Detail<u64>>> {
    let query = VolumeAttachmentQuery {
        scope_id: scope_id.to_string(),
        instance_id: Some(instance_id.to_string()),
        volume_id: None,
    };

    let attachments = match fetchers.compute.list_volume_attachments(&query).await {
        Ok(attachments) => attachments,
        Err(e) => {
            tracing::debug!("Volume attachment listing failed for {}: {:#}", instance_id, e);
            return Detail::Failed;
        }
    };

    let mut sizes = Vec::new();
    for attachment in attachments
        .iter()
        .filter(|a| matches!(a, VolumeAttachment::Block { .. }) && !a.is_detached())
    {
        let size = Detail::from_result(
            fetchers.storage.get_block_volume(attachment.volume_id()).await,
            "block volume",
        )
        .and_then(volume_size);
        sizes.push(size);
    }

    if sizes.is_empty() {
        Detail::Missing
    } else {
        Detail::Resolved(sizes)
    }
}

// =============================================================================
// Load balancers
// =============================================================================

pub async fn correlate_load_balancer(
    fetchers: &Fetchers,
    scope: &Scope,
    load_balancer: LoadBalancer,
) -> CorrelatedLoadBalancer {
    let backend_sets = match fetchers
        .load_balancer
        .list_backend_sets(&load_balancer.id)
        .await
    {
        Ok(sets) => {
            let mut correlated = Vec::with_capacity(sets.len());
            for set in sets {
                let backends = Detail::from_result(
                    fetchers
                        .load_balancer
                        .list_backends(&load_balancer.id, &set.name)
                        .await,
                    "backend",
                );
                correlated.push(CorrelatedBackendSet {
                    name: set.name,
                    backends,
                });
            }
            Detail::Resolved(correlated)
        }
        Err(e) => {
            tracing::debug!("Backend set listing failed for {}: {:#}", load_balancer.id, e);
            Detail::Failed
        }
    };

    CorrelatedLoadBalancer {
        scope_name: scope.name.clone(),
        load_balancer,
        backend_sets,
    }
}

// =============================================================================
// Network security groups
// =============================================================================

pub async fn correlate_security_group(
    fetchers: &Fetchers,
    scope: &Scope,
    group: SecurityGroup,
) -> CorrelatedSecurityGroup {
    let ingress_rules = Detail::from_result(
        fetchers.network.list_security_rules(&group.id).await,
        "security rule",
    )
    .map(|rules| {
        rules
            .into_iter()
            .filter(|rule| rule.direction == RuleDirection::Ingress)
            .collect()
    });

    CorrelatedSecurityGroup {
        scope_name: scope.name.clone(),
        group,
        ingress_rules,
    }
}

// =============================================================================
// Volumes
// =============================================================================

pub async fn correlate_volume(
    fetchers: &Fetchers,
    scope: &Scope,
    volume: Volume,
) -> CorrelatedVolume {
    let attached_instance = resolve_attached_instance(fetchers, &scope.id, &volume).await;

    CorrelatedVolume {
        scope_name: scope.name.clone(),
        volume,
        attached_instance,
    }
}

async fn resolve_attached_instance(
    fetchers: &Fetchers,
    scope_id: &str,
    volume: &Volume,
) -> Detail<String> {
    let listing = match volume.kind {
        VolumeKind::Boot => {
            let query = BootAttachmentQuery {
                scope_id: scope_id.to_string(),
                availability_domain: volume.availability_domain.clone(),
                instance_id: None,
                boot_volume_id: Some(volume.id.clone()),
            };
            fetchers.compute.list_boot_volume_attachments(&query).await
        }
        VolumeKind::Block => {
            let query = VolumeAttachmentQuery {
                scope_id: scope_id.to_string(),
                instance_id: None,
                volume_id: Some(volume.id.clone()),
            };
            fetchers.compute.list_volume_attachments(&query).await
        }
    };

    let attachments = match listing {
        Ok(attachments) => attachments,
        Err(e) => {
            tracing::debug!("Attachment listing failed for volume {}: {:#}", volume.id, e);
            return Detail::Failed;
        }
    };

    let Some(attachment) = attachments
        .into_iter()
        .find(|a| a.volume_id() == volume.id && !a.is_detached())
    else {
        return Detail::Missing;
    };

    let instance_id = attachment.instance_id().to_string();
    match fetchers.compute.get_instance(&instance_id).await {
        Ok(detail) => Detail::Resolved(detail.name),
        Err(e) => {
            tracing::debug!("Instance lookup failed for {}: {:#}", instance_id, e);
            Detail::Resolved(instance_id)
        }
    }
}

// =============================================================================
// Buckets
// =============================================================================

pub async fn correlate_bucket(
    fetchers: &Fetchers,
    scope: &Scope,
    namespace: &str,
    bucket: BucketSummary,
) -> CorrelatedBucket {
    let detail = Detail::from_result(
        fetchers.object_storage.get_bucket(namespace, &bucket.name).await,
        "bucket",
    );
    let totals = aggregate_objects(fetchers.object_storage.as_ref(), namespace, &bucket.name).await;

    CorrelatedBucket {
        scope_name: scope.name.clone(),
        bucket,
        detail,
        totals,
    }
}
