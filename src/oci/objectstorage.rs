//! OCI Object Storage
//!
//! Namespace, buckets and single pages of a bucket's object listing.

use super::client::{decode, decode_list, OciClient};
use crate::resource::{
    BucketDetail, BucketSummary, ObjectPage, ObjectPageRequest, ObjectStorageFetcher,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketSummaryWire {
    name: String,
    #[serde(default)]
    compartment_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketWire {
    #[serde(default)]
    public_access_type: Option<String>,
    #[serde(default)]
    storage_tier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectWire {
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListObjectsWire {
    #[serde(default)]
    objects: Vec<ObjectWire>,
    #[serde(default)]
    next_start_with: Option<String>,
}

/// Object storage fetcher over the OCI REST API
#[derive(Clone)]
pub struct OciObjectStorage {
    client: OciClient,
}

impl OciObjectStorage {
    pub fn new(client: OciClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStorageFetcher for OciObjectStorage {
    async fn get_namespace(&self) -> Result<String> {
        let url = self.client.object_storage_url("/n/", &[])?;
        let body = self.client.get(&url).await?;
        body.as_str()
            .filter(|ns| !ns.is_empty())
            .map(|ns| ns.to_string())
            .context("Namespace response was not a string")
    }

    async fn list_buckets(&self, namespace: &str, scope_id: &str) -> Result<Vec<BucketSummary>> {
        let url = self.client.object_storage_url(
            &format!("/n/{}/b", urlencoding::encode(namespace)),
            &[("compartmentId", scope_id)],
        )?;
        let buckets: Vec<BucketSummaryWire> = decode_list(self.client.get_all(&url).await?)?;

        Ok(buckets
            .into_iter()
            .map(|b| BucketSummary {
                name: b.name,
                scope_id: b.compartment_id,
            })
            .collect())
    }

    async fn get_bucket(&self, namespace: &str, bucket: &str) -> Result<BucketDetail> {
        let url = self.client.object_storage_url(
            &format!(
                "/n/{}/b/{}",
                urlencoding::encode(namespace),
                urlencoding::encode(bucket)
            ),
            &[],
        )?;
        let wire: BucketWire = decode(self.client.get(&url).await?)?;

        Ok(BucketDetail {
            public_access_type: wire.public_access_type.unwrap_or_else(|| "-".to_string()),
            storage_tier: wire.storage_tier.unwrap_or_else(|| "-".to_string()),
        })
    }

    async fn list_objects(
        &self,
        namespace: &str,
        bucket: &str,
        request: &ObjectPageRequest,
    ) -> Result<ObjectPage> {
        let limit = request.limit.to_string();
        let mut query = vec![("limit", limit.as_str()), ("fields", "size")];
        if let Some(start) = &request.start {
            query.push(("start", start.as_str()));
        }

        let url = self.client.object_storage_url(
            &format!(
                "/n/{}/b/{}/o",
                urlencoding::encode(namespace),
                urlencoding::encode(bucket)
            ),
            &query,
        )?;
        let page: ListObjectsWire = decode(self.client.get(&url).await?)?;

        Ok(ObjectPage {
            sizes: page.objects.iter().map(|o| o.size.unwrap_or(0)).collect(),
            next_start: page.next_start_with.filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_objects_wire_without_cursor() {
        let wire: ListObjectsWire = serde_json::from_value(json!({
            "objects": [{"name": "a", "size": 10}, {"name": "b"}]
        }))
        .unwrap();
        assert_eq!(wire.objects.len(), 2);
        assert!(wire.next_start_with.is_none());
        assert_eq!(wire.objects[1].size, None);
    }
}
