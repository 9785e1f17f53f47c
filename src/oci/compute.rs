//! OCI Compute
//!
//! Instances, VNIC attachments and volume attachments.

use super::client::{decode, decode_list, OciClient};
use crate::resource::{
    BootAttachmentQuery, ComputeFetcher, ComputeInstance, InstanceDetail, NetworkAttachment,
    VolumeAttachment, VolumeAttachmentQuery,
};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstanceWire {
    id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    compartment_id: String,
    #[serde(default)]
    lifecycle_state: String,
    #[serde(default)]
    shape: String,
    #[serde(default)]
    availability_domain: String,
    #[serde(default)]
    shape_config: Option<ShapeConfigWire>,
}

#[derive(Debug, Deserialize)]
struct ShapeConfigWire {
    #[serde(default)]
    ocpus: Option<f64>,
    #[serde(default, rename = "memoryInGBs")]
    memory_in_gbs: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VnicAttachmentWire {
    #[serde(default)]
    instance_id: String,
    /// Unset while the attachment is still being created
    #[serde(default)]
    vnic_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BootVolumeAttachmentWire {
    instance_id: String,
    boot_volume_id: String,
    #[serde(default)]
    lifecycle_state: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeAttachmentWire {
    instance_id: String,
    volume_id: String,
    #[serde(default)]
    lifecycle_state: String,
}

/// Compute fetcher over the OCI REST API
#[derive(Clone)]
pub struct OciCompute {
    client: OciClient,
}

impl OciCompute {
    pub fn new(client: OciClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ComputeFetcher for OciCompute {
    async fn list_instances(&self, scope_id: &str) -> Result<Vec<ComputeInstance>> {
        let url = self
            .client
            .core_url("instances", &[("compartmentId", scope_id)])?;
        let instances: Vec<InstanceWire> = decode_list(self.client.get_all(&url).await?)?;

        Ok(instances
            .into_iter()
            .map(|i| ComputeInstance {
                id: i.id,
                name: i.display_name,
                scope_id: i.compartment_id,
                lifecycle_state: i.lifecycle_state,
                shape: i.shape,
                availability_domain: i.availability_domain,
            })
            .collect())
    }

    async fn get_instance(&self, instance_id: &str) -> Result<InstanceDetail> {
        let url = self
            .client
            .core_url(&format!("instances/{}", instance_id), &[])?;
        let instance: InstanceWire = decode(self.client.get(&url).await?)?;
        let (ocpus, memory_in_gbs) = instance
            .shape_config
            .map(|c| (c.ocpus, c.memory_in_gbs))
            .unwrap_or((None, None));

        Ok(InstanceDetail {
            name: instance.display_name,
            ocpus,
            memory_in_gbs,
        })
    }

    async fn list_network_attachments(
        &self,
        scope_id: &str,
        instance_id: &str,
    ) -> Result<Vec<NetworkAttachment>> {
        let url = self.client.core_url(
            "vnicAttachments",
            &[("compartmentId", scope_id), ("instanceId", instance_id)],
        )?;
        let attachments: Vec<VnicAttachmentWire> = decode_list(self.client.get_all(&url).await?)?;

        Ok(attachments
            .into_iter()
            .filter_map(|a| {
                a.vnic_id.map(|interface_id| NetworkAttachment {
                    instance_id: a.instance_id,
                    interface_id,
                })
            })
            .collect())
    }

    async fn list_boot_volume_attachments(
        &self,
        query: &BootAttachmentQuery,
    ) -> Result<Vec<VolumeAttachment>> {
        let mut params = vec![
            ("availabilityDomain", query.availability_domain.as_str()),
            ("compartmentId", query.scope_id.as_str()),
        ];
        if let Some(instance_id) = &query.instance_id {
            params.push(("instanceId", instance_id.as_str()));
        }
        if let Some(volume_id) = &query.boot_volume_id {
            params.push(("bootVolumeId", volume_id.as_str()));
        }

        let url = self.client.core_url("bootVolumeAttachments", &params)?;
        let attachments: Vec<BootVolumeAttachmentWire> =
            decode_list(self.client.get_all(&url).await?)?;

        Ok(attachments
            .into_iter()
            .map(|a| VolumeAttachment::Boot {
                instance_id: a.instance_id,
                volume_id: a.boot_volume_id,
                lifecycle_state: a.lifecycle_state,
            })
            .collect())
    }

    async fn list_volume_attachments(
        &self,
        query: &VolumeAttachmentQuery,
    ) -> Result<Vec<VolumeAttachment>> {
        let mut params = vec![("compartmentId", query.scope_id.as_str())];
        if let Some(instance_id) = &query.instance_id {
            params.push(("instanceId", instance_id.as_str()));
        }
        if let Some(volume_id) = &query.volume_id {
            params.push(("volumeId", volume_id.as_str()));
        }

        let url = self.client.core_url("volumeAttachments", &params)?;
        let attachments: Vec<VolumeAttachmentWire> = decode_list(self.client.get_all(&url).await?)?;

        Ok(attachments
            .into_iter()
            .map(|a| VolumeAttachment::Block {
                instance_id: a.instance_id,
                volume_id: a.volume_id,
                lifecycle_state: a.lifecycle_state,
            })
            .collect())
    }
}
