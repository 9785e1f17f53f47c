//! Resource Model
//!
//! Provider-neutral views of the OCI resources the report correlates. The
//! fetchers in [`crate::oci`] translate wire responses into these types.

use serde::Serialize;

/// Lifecycle state shared by instances and volumes that are gone for good
pub const TERMINATED: &str = "TERMINATED";

/// Attachment lifecycle state that no longer binds a volume to an instance
pub const DETACHED: &str = "DETACHED";

/// A compartment (or the tenancy itself) that resources are listed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub id: String,
    pub name: String,
    pub lifecycle_state: String,
}

/// Compute instance as returned by the instance listing
#[derive(Debug, Clone)]
pub struct ComputeInstance {
    pub id: String,
    pub name: String,
    pub scope_id: String,
    pub lifecycle_state: String,
    pub shape: String,
    pub availability_domain: String,
}

impl ComputeInstance {
    pub fn is_terminated(&self) -> bool {
        self.lifecycle_state == TERMINATED
    }
}

/// Per-instance data only available from the instance detail call
#[derive(Debug, Clone, Default)]
pub struct InstanceDetail {
    pub name: String,
    pub ocpus: Option<f64>,
    pub memory_in_gbs: Option<f64>,
}

/// Link between an instance and one of its network interfaces
#[derive(Debug, Clone)]
pub struct NetworkAttachment {
    pub instance_id: String,
    pub interface_id: String,
}

/// Network interface (VNIC) detail
#[derive(Debug, Clone, Default)]
pub struct NetworkInterface {
    pub id: String,
    pub private_ip: Option<String>,
    pub public_ip: Option<String>,
    pub subnet_id: String,
    pub security_group_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Subnet {
    pub id: String,
    pub name: String,
}

/// Network security group
#[derive(Debug, Clone)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
    pub scope_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDirection {
    Ingress,
    Egress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

/// A single stateful/stateless rule of a security group
#[derive(Debug, Clone)]
pub struct SecurityRule {
    pub direction: RuleDirection,
    /// Raw IANA protocol number, or `all`
    pub protocol: String,
    pub port_range: Option<PortRange>,
    pub source: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolumeKind {
    Boot,
    Block,
}

impl VolumeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeKind::Boot => "Boot",
            VolumeKind::Block => "Block",
        }
    }
}

/// Boot or block volume
#[derive(Debug, Clone)]
pub struct Volume {
    pub id: String,
    pub name: String,
    pub kind: VolumeKind,
    pub scope_id: String,
    pub availability_domain: String,
    pub size_gb: Option<u64>,
    pub lifecycle_state: String,
}

impl Volume {
    pub fn is_terminated(&self) -> bool {
        self.lifecycle_state == TERMINATED
    }
}

/// Volume attachment, tagged at the fetcher boundary with the kind of
/// listing it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeAttachment {
    Boot {
        instance_id: String,
        volume_id: String,
        lifecycle_state: String,
    },
    Block {
        instance_id: String,
        volume_id: String,
        lifecycle_state: String,
    },
}

impl VolumeAttachment {
    pub fn instance_id(&self) -> &str {
        match self {
            VolumeAttachment::Boot { instance_id, .. } | VolumeAttachment::Block { instance_id, .. } => {
                instance_id
            }
        }
    }

    pub fn volume_id(&self) -> &str {
        match self {
            VolumeAttachment::Boot { volume_id, .. } | VolumeAttachment::Block { volume_id, .. } => {
                volume_id
            }
        }
    }

    pub fn is_detached(&self) -> bool {
        match self {
            VolumeAttachment::Boot { lifecycle_state, .. }
            | VolumeAttachment::Block { lifecycle_state, .. } => lifecycle_state == DETACHED,
        }
    }
}

/// Which boot volume attachments to list
#[derive(Debug, Clone, Default)]
pub struct BootAttachmentQuery {
    pub scope_id: String,
    pub availability_domain: String,
    pub instance_id: Option<String>,
    pub boot_volume_id: Option<String>,
}

/// Which block volume attachments to list
#[derive(Debug, Clone, Default)]
pub struct VolumeAttachmentQuery {
    pub scope_id: String,
    pub instance_id: Option<String>,
    pub volume_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    pub scope_id: String,
    pub lifecycle_state: String,
    pub shape_name: Option<String>,
    pub ip_addresses: Vec<String>,
    pub is_private: bool,
}

#[derive(Debug, Clone)]
pub struct BackendSet {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Backend {
    pub name: String,
    pub target_id: Option<String>,
    pub ip_address: Option<String>,
}

impl Backend {
    /// Target id, else IP address, else the backend's own name
    pub fn target(&self) -> &str {
        self.target_id
            .as_deref()
            .or(self.ip_address.as_deref())
            .unwrap_or(&self.name)
    }
}

/// Bucket as returned by the bucket listing
#[derive(Debug, Clone)]
pub struct BucketSummary {
    pub name: String,
    pub scope_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct BucketDetail {
    pub public_access_type: String,
    pub storage_tier: String,
}

/// Cursor-bounded request for one page of bucket objects
#[derive(Debug, Clone)]
pub struct ObjectPageRequest {
    pub limit: u32,
    pub start: Option<String>,
}

/// One page of a bucket object listing, reduced to what aggregation needs
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    pub sizes: Vec<u64>,
    pub next_start: Option<String>,
}
