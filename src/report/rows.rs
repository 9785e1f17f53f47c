//! Report Assembler
//!
//! Flattens correlated resources into the per-category row schemas and
//! renders every unresolved lookup as its placeholder. Rows come out
//! sorted and ready for grouping.

use crate::inventory::correlate::{
    CorrelatedBucket, CorrelatedInstance, CorrelatedLoadBalancer, CorrelatedSecurityGroup,
    CorrelatedVolume,
};
use crate::inventory::filter::{sort_rows, ScopedRow};
use crate::resource::{Detail, InstanceDetail, PortRange, SecurityRule};
use serde::Serialize;

pub const PLACEHOLDER: &str = "-";
pub const UNKNOWN_NSG: &str = "Unknown-NSG";
pub const UNKNOWN_VOLUME: &str = "Unknown-Volume";
pub const NO_BACKEND_SETS: &str = "(No Backend Sets)";
pub const NO_BACKENDS: &str = "(No Backends)";
pub const NO_INGRESS_RULES: &str = "(No Ingress Rules)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceRow {
    pub compartment: String,
    pub name: String,
    pub state: String,
    pub subnet: String,
    pub nsg: String,
    pub private_ip: String,
    pub public_ip: String,
    pub shape: String,
    pub vcpus: String,
    pub memory_gb: String,
    pub boot_volume: String,
    pub block_volumes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadBalancerRow {
    pub compartment: String,
    pub name: String,
    pub state: String,
    pub ip_addresses: String,
    pub shape: String,
    #[serde(rename = "type")]
    pub lb_type: String,
    pub backend_set: String,
    pub backend_target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityRuleRow {
    pub compartment: String,
    pub nsg: String,
    pub description: String,
    pub protocol: String,
    pub port_range: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeRow {
    pub compartment: String,
    pub name: String,
    pub kind: String,
    pub state: String,
    pub size: String,
    pub availability_domain: String,
    pub attached_instance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketRow {
    pub compartment: String,
    pub name: String,
    pub public_access: String,
    pub storage_tier: String,
    pub object_count: u64,
    pub size: String,
}

impl ScopedRow for InstanceRow {
    fn scope_name(&self) -> &str {
        &self.compartment
    }

    fn sort_key(&self) -> Vec<&str> {
        vec![self.compartment.as_str(), self.name.as_str()]
    }
}

impl ScopedRow for LoadBalancerRow {
    fn scope_name(&self) -> &str {
        &self.compartment
    }

    fn sort_key(&self) -> Vec<&str> {
        vec![self.compartment.as_str(), self.name.as_str(), self.backend_set.as_str()]
    }
}

impl ScopedRow for SecurityRuleRow {
    fn scope_name(&self) -> &str {
        &self.compartment
    }

    fn sort_key(&self) -> Vec<&str> {
        vec![self.compartment.as_str(), self.nsg.as_str()]
    }
}

impl ScopedRow for VolumeRow {
    fn scope_name(&self) -> &str {
        &self.compartment
    }

    fn sort_key(&self) -> Vec<&str> {
        vec![self.compartment.as_str(), self.name.as_str()]
    }
}

impl ScopedRow for BucketRow {
    fn scope_name(&self) -> &str {
        &self.compartment
    }

    fn sort_key(&self) -> Vec<&str> {
        vec![self.compartment.as_str(), self.name.as_str()]
    }
}

fn gb(size: u64) -> String {
    format!("{}GB", size)
}

/// Render a float without a trailing `.0` for whole numbers
fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn join_or_placeholder(items: Vec<String>) -> String {
    if items.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        items.join(", ")
    }
}

// =============================================================================
// Instances
// =============================================================================

pub fn instance_rows(instances: Vec<CorrelatedInstance>) -> Vec<InstanceRow> {
    let mut rows: Vec<InstanceRow> = instances.into_iter().map(instance_row).collect();
    sort_rows(&mut rows);
    rows
}

fn instance_row(item: CorrelatedInstance) -> InstanceRow {
    // Memory is only reported alongside an OCPU count
    let (vcpus, memory_gb) = match &item.shape {
        Detail::Resolved(InstanceDetail {
            ocpus: Some(ocpus),
            memory_in_gbs,
            ..
        }) => (
            ((ocpus * 2.0).trunc() as i64).to_string(),
            memory_in_gbs
                .map(number)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        ),
        _ => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
    };

    let (subnet, nsg, private_ip, public_ip) = match item.network {
        Detail::Resolved(network) => (
            network.subnet.display(),
            join_or_placeholder(
                network
                    .security_groups
                    .iter()
                    .map(|group| group.display_or(PLACEHOLDER, UNKNOWN_NSG))
                    .collect(),
            ),
            network.private_ip.unwrap_or_else(|| PLACEHOLDER.to_string()),
            network.public_ip.unwrap_or_else(|| PLACEHOLDER.to_string()),
        ),
        _ => (
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
        ),
    };

    let block_volumes = match item.block_volumes_gb {
        Detail::Resolved(sizes) => join_or_placeholder(
            sizes
                .into_iter()
                .map(|size| size.map(gb).display_or(PLACEHOLDER, UNKNOWN_VOLUME))
                .collect(),
        ),
        _ => PLACEHOLDER.to_string(),
    };

    InstanceRow {
        compartment: item.scope_name,
        name: item.instance.name,
        state: item.instance.lifecycle_state,
        subnet,
        nsg,
        private_ip,
        public_ip,
        shape: item.instance.shape,
        vcpus,
        memory_gb,
        boot_volume: item.boot_volume_gb.map(gb).display(),
        block_volumes,
    }
}

// =============================================================================
// Load balancers
// =============================================================================

/// One row per (load balancer, backend set, backend), with sentinel rows
/// for empty or unreadable levels
pub fn load_balancer_rows(load_balancers: Vec<CorrelatedLoadBalancer>) -> Vec<LoadBalancerRow> {
    let mut rows = Vec::new();

    for item in load_balancers {
        let lb = &item.load_balancer;
        let base = LoadBalancerRow {
            compartment: item.scope_name.clone(),
            name: lb.name.clone(),
            state: lb.lifecycle_state.clone(),
            ip_addresses: join_or_placeholder(lb.ip_addresses.clone()),
            shape: lb
                .shape_name
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            lb_type: if lb.is_private { "PRIVATE" } else { "PUBLIC" }.to_string(),
            backend_set: PLACEHOLDER.to_string(),
            backend_target: PLACEHOLDER.to_string(),
        };
        let row = |backend_set: &str, backend_target: &str| LoadBalancerRow {
            backend_set: backend_set.to_string(),
            backend_target: backend_target.to_string(),
            ..base.clone()
        };

        match &item.backend_sets {
            Detail::Resolved(sets) if sets.is_empty() => {
                rows.push(row(NO_BACKEND_SETS, PLACEHOLDER));
            }
            Detail::Resolved(sets) => {
                for set in sets {
                    match &set.backends {
                        Detail::Resolved(backends) if backends.is_empty() => {
                            rows.push(row(&set.name, NO_BACKENDS));
                        }
                        Detail::Resolved(backends) => {
                            for backend in backends {
                                rows.push(row(&set.name, backend.target()));
                            }
                        }
                        _ => rows.push(row(&set.name, PLACEHOLDER)),
                    }
                }
            }
            _ => rows.push(row(PLACEHOLDER, PLACEHOLDER)),
        }
    }

    sort_rows(&mut rows);
    rows
}

// =============================================================================
// Network security groups
// =============================================================================

pub fn protocol_name(protocol: &str) -> String {
    match protocol {
        "6" => "TCP".to_string(),
        "17" => "UDP".to_string(),
        "1" => "ICMP".to_string(),
        other => other.to_string(),
    }
}

fn port_range(range: Option<PortRange>) -> String {
    match range {
        Some(range) => format!("{}-{}", range.min, range.max),
        None => PLACEHOLDER.to_string(),
    }
}

fn rule_row(scope: &str, nsg: &str, rule: &SecurityRule) -> SecurityRuleRow {
    SecurityRuleRow {
        compartment: scope.to_string(),
        nsg: nsg.to_string(),
        description: rule
            .description
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        protocol: protocol_name(&rule.protocol),
        port_range: port_range(rule.port_range),
        source: rule.source.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

/// One row per ingress rule, one sentinel row for a group without any
pub fn security_rule_rows(groups: Vec<CorrelatedSecurityGroup>) -> Vec<SecurityRuleRow> {
    let mut rows = Vec::new();

    for item in groups {
        let scope = item.scope_name.as_str();
        let nsg = item.group.name.as_str();
        let placeholder_row = |description: &str| SecurityRuleRow {
            compartment: scope.to_string(),
            nsg: nsg.to_string(),
            description: description.to_string(),
            protocol: PLACEHOLDER.to_string(),
            port_range: PLACEHOLDER.to_string(),
            source: PLACEHOLDER.to_string(),
        };

        match &item.ingress_rules {
            Detail::Resolved(rules) if rules.is_empty() => {
                rows.push(placeholder_row(NO_INGRESS_RULES));
            }
            Detail::Resolved(rules) => {
                rows.extend(rules.iter().map(|rule| rule_row(scope, nsg, rule)));
            }
            _ => rows.push(placeholder_row(PLACEHOLDER)),
        }
    }

    sort_rows(&mut rows);
    rows
}

// =============================================================================
// Volumes
// =============================================================================

pub fn volume_rows(volumes: Vec<CorrelatedVolume>) -> Vec<VolumeRow> {
    let mut rows: Vec<VolumeRow> = volumes
        .into_iter()
        .map(|item| VolumeRow {
            compartment: item.scope_name,
            name: item.volume.name,
            kind: item.volume.kind.as_str().to_string(),
            state: item.volume.lifecycle_state,
            size: item
                .volume
                .size_gb
                .map(gb)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            availability_domain: if item.volume.availability_domain.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                item.volume.availability_domain
            },
            attached_instance: item.attached_instance.display(),
        })
        .collect();
    sort_rows(&mut rows);
    rows
}

// =============================================================================
// Buckets
// =============================================================================

pub fn bucket_rows(buckets: Vec<CorrelatedBucket>) -> Vec<BucketRow> {
    let mut rows: Vec<BucketRow> = buckets
        .into_iter()
        .map(|item| {
            let (public_access, storage_tier) = match item.detail {
                Detail::Resolved(detail) => (detail.public_access_type, detail.storage_tier),
                _ => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
            };
            BucketRow {
                compartment: item.scope_name,
                name: item.bucket.name,
                public_access,
                storage_tier,
                object_count: item.totals.object_count,
                size: item.totals.size_gb(),
            }
        })
        .collect();
    sort_rows(&mut rows);
    rows
}
