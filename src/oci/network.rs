//! OCI Virtual Network
//!
//! VNICs, subnets, network security groups and their rules.

use super::client::{decode, decode_list, OciClient};
use crate::resource::{
    NetworkFetcher, NetworkInterface, PortRange, RuleDirection, SecurityGroup, SecurityRule,
    Subnet,
};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VnicWire {
    id: String,
    #[serde(default)]
    private_ip: Option<String>,
    #[serde(default)]
    public_ip: Option<String>,
    #[serde(default)]
    subnet_id: String,
    #[serde(default)]
    nsg_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubnetWire {
    id: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NsgWire {
    id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    compartment_id: String,
}

impl From<NsgWire> for SecurityGroup {
    fn from(wire: NsgWire) -> Self {
        Self {
            id: wire.id,
            name: wire.display_name,
            scope_id: wire.compartment_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PortRangeWire {
    min: u16,
    max: u16,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortOptionsWire {
    #[serde(default)]
    destination_port_range: Option<PortRangeWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecurityRuleWire {
    direction: String,
    #[serde(default)]
    protocol: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tcp_options: Option<PortOptionsWire>,
    #[serde(default)]
    udp_options: Option<PortOptionsWire>,
}

impl From<SecurityRuleWire> for SecurityRule {
    fn from(wire: SecurityRuleWire) -> Self {
        let direction = if wire.direction.eq_ignore_ascii_case("INGRESS") {
            RuleDirection::Ingress
        } else {
            RuleDirection::Egress
        };

        // TCP options win over UDP options when both are present
        let port_range = [wire.tcp_options, wire.udp_options]
            .into_iter()
            .flatten()
            .find_map(|o| o.destination_port_range)
            .map(|r| PortRange { min: r.min, max: r.max });

        Self {
            direction,
            protocol: wire.protocol,
            port_range,
            source: wire.source.filter(|s| !s.is_empty()),
            description: wire.description.filter(|s| !s.is_empty()),
        }
    }
}

/// Network fetcher over the OCI REST API
#[derive(Clone)]
pub struct OciNetwork {
    client: OciClient,
}

impl OciNetwork {
    pub fn new(client: OciClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NetworkFetcher for OciNetwork {
    async fn get_network_interface(&self, interface_id: &str) -> Result<NetworkInterface> {
        let url = self
            .client
            .core_url(&format!("vnics/{}", interface_id), &[])?;
        let vnic: VnicWire = decode(self.client.get(&url).await?)?;

        Ok(NetworkInterface {
            id: vnic.id,
            private_ip: vnic.private_ip.filter(|ip| !ip.is_empty()),
            public_ip: vnic.public_ip.filter(|ip| !ip.is_empty()),
            subnet_id: vnic.subnet_id,
            security_group_ids: vnic.nsg_ids,
        })
    }

    async fn get_subnet(&self, subnet_id: &str) -> Result<Subnet> {
        let url = self
            .client
            .core_url(&format!("subnets/{}", subnet_id), &[])?;
        let subnet: SubnetWire = decode(self.client.get(&url).await?)?;
        Ok(Subnet {
            id: subnet.id,
            name: subnet.display_name,
        })
    }

    async fn get_security_group(&self, group_id: &str) -> Result<SecurityGroup> {
        let url = self
            .client
            .core_url(&format!("networkSecurityGroups/{}", group_id), &[])?;
        let nsg: NsgWire = decode(self.client.get(&url).await?)?;
        Ok(nsg.into())
    }

    async fn list_security_groups(&self, scope_id: &str) -> Result<Vec<SecurityGroup>> {
        let url = self
            .client
            .core_url("networkSecurityGroups", &[("compartmentId", scope_id)])?;
        let groups: Vec<NsgWire> = decode_list(self.client.get_all(&url).await?)?;
        Ok(groups.into_iter().map(SecurityGroup::from).collect())
    }

    async fn list_security_rules(&self, group_id: &str) -> Result<Vec<SecurityRule>> {
        let url = self.client.core_url(
            &format!("networkSecurityGroups/{}/securityRules", group_id),
            &[],
        )?;
        let rules: Vec<SecurityRuleWire> = decode_list(self.client.get_all(&url).await?)?;
        Ok(rules.into_iter().map(SecurityRule::from).collect())
    }
}
