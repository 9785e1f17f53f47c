//! OCI Block Storage
//!
//! Boot volumes (listed per availability domain) and block volumes.

use super::client::{decode, decode_list, OciClient};
use crate::resource::{StorageFetcher, Volume, VolumeKind};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeWire {
    id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    compartment_id: String,
    #[serde(default)]
    availability_domain: String,
    #[serde(default, rename = "sizeInGBs")]
    size_in_gbs: Option<u64>,
    #[serde(default)]
    lifecycle_state: String,
}

impl VolumeWire {
    fn into_volume(self, kind: VolumeKind) -> Volume {
        Volume {
            id: self.id,
            name: self.display_name,
            kind,
            scope_id: self.compartment_id,
            availability_domain: self.availability_domain,
            size_gb: self.size_in_gbs,
            lifecycle_state: self.lifecycle_state,
        }
    }
}

/// Block storage fetcher over the OCI REST API
#[derive(Clone)]
pub struct OciStorage {
    client: OciClient,
}

impl OciStorage {
    pub fn new(client: OciClient) -> Self {
        Self { client }
    }

    async fn list(&self, path: &str, query: &[(&str, &str)], kind: VolumeKind) -> Result<Vec<Volume>> {
        let url = self.client.core_url(path, query)?;
        let volumes: Vec<VolumeWire> = decode_list(self.client.get_all(&url).await?)?;
        Ok(volumes.into_iter().map(|v| v.into_volume(kind)).collect())
    }

    async fn get(&self, path: &str, kind: VolumeKind) -> Result<Volume> {
        let url = self.client.core_url(path, &[])?;
        let volume: VolumeWire = decode(self.client.get(&url).await?)?;
        Ok(volume.into_volume(kind))
    }
}

#[async_trait]
impl StorageFetcher for OciStorage {
    async fn list_boot_volumes(
        &self,
        scope_id: &str,
        availability_domain: &str,
    ) -> Result<Vec<Volume>> {
        self.list(
            "bootVolumes",
            &[
                ("availabilityDomain", availability_domain),
                ("compartmentId", scope_id),
            ],
            VolumeKind::Boot,
        )
        .await
    }

    async fn list_block_volumes(&self, scope_id: &str) -> Result<Vec<Volume>> {
        self.list("volumes", &[("compartmentId", scope_id)], VolumeKind::Block)
            .await
    }

    async fn get_boot_volume(&self, volume_id: &str) -> Result<Volume> {
        self.get(&format!("bootVolumes/{}", volume_id), VolumeKind::Boot)
            .await
    }

    async fn get_block_volume(&self, volume_id: &str) -> Result<Volume> {
        self.get(&format!("volumes/{}", volume_id), VolumeKind::Block)
            .await
    }
}
