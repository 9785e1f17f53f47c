//! OCI Client
//!
//! Main client for interacting with OCI APIs, combining request signing,
//! regional endpoints and list pagination.

use super::auth::{OciProfile, RequestSigner};
use super::http::OciHttpClient;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use url::Url;

/// API version path segment of identity, compute, network and block storage
pub const CORE_API_VERSION: &str = "20160918";

/// API version path segment of the load balancing service
pub const LOAD_BALANCER_API_VERSION: &str = "20170115";

/// Service base URLs for one region
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub identity: Url,
    pub core: Url,
    pub load_balancer: Url,
    pub object_storage: Url,
}

impl Endpoints {
    /// Public endpoints of a region, e.g. `ap-seoul-1`
    pub fn for_region(region: &str) -> Result<Self> {
        let parse = |url: String| Url::parse(&url).with_context(|| format!("Invalid endpoint {}", url));
        Ok(Self {
            identity: parse(format!("https://identity.{}.oci.oraclecloud.com", region))?,
            core: parse(format!("https://iaas.{}.oraclecloud.com", region))?,
            load_balancer: parse(format!("https://iaas.{}.oraclecloud.com", region))?,
            object_storage: parse(format!("https://objectstorage.{}.oraclecloud.com", region))?,
        })
    }

    /// Route every service to one base URL (local proxies, tests)
    pub fn single(base: &str) -> Result<Self> {
        let url = Url::parse(base).with_context(|| format!("Invalid endpoint {}", base))?;
        Ok(Self {
            identity: url.clone(),
            core: url.clone(),
            load_balancer: url.clone(),
            object_storage: url,
        })
    }
}

/// Main OCI client
#[derive(Clone)]
pub struct OciClient {
    pub http: OciHttpClient,
    pub tenancy_id: String,
    pub region: String,
    endpoints: Endpoints,
}

impl OciClient {
    /// Create a client for a config-file profile
    pub fn new(profile: &OciProfile) -> Result<Self> {
        let signer = RequestSigner::from_profile(profile)?;
        let endpoints = Endpoints::for_region(&profile.region)?;
        Self::with_endpoints(signer, &profile.tenancy, &profile.region, endpoints)
    }

    pub fn with_endpoints(
        signer: RequestSigner,
        tenancy_id: &str,
        region: &str,
        endpoints: Endpoints,
    ) -> Result<Self> {
        Ok(Self {
            http: OciHttpClient::new(signer)?,
            tenancy_id: tenancy_id.to_string(),
            region: region.to_string(),
            endpoints,
        })
    }

    /// Make a GET request and return the decoded body
    pub async fn get(&self, url: &Url) -> Result<Value> {
        Ok(self.http.get(url).await?.body)
    }

    /// Fetch every page of a list call (auto-paginate on `opc-next-page`)
    pub async fn get_all(&self, url: &Url) -> Result<Vec<Value>> {
        let mut all_items = Vec::new();
        let mut page: Option<String> = None;

        loop {
            let mut page_url = url.clone();
            if let Some(token) = &page {
                page_url.query_pairs_mut().append_pair("page", token);
            }

            let response = self.http.get(&page_url).await?;
            all_items.extend(list_items(response.body, url)?);

            match response.next_page {
                // A repeated token would never advance
                Some(next) if page.as_deref() != Some(next.as_str()) => page = Some(next),
                _ => break,
            }
        }

        Ok(all_items)
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build an Identity API URL
    pub fn identity_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        build_url(
            &self.endpoints.identity,
            &format!("/{}/{}", CORE_API_VERSION, path),
            query,
        )
    }

    /// Build a Core Services (compute, network, block storage) API URL
    pub fn core_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        build_url(
            &self.endpoints.core,
            &format!("/{}/{}", CORE_API_VERSION, path),
            query,
        )
    }

    /// Build a Load Balancing API URL
    pub fn load_balancer_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        build_url(
            &self.endpoints.load_balancer,
            &format!("/{}/{}", LOAD_BALANCER_API_VERSION, path),
            query,
        )
    }

    /// Build an Object Storage API URL (paths start at `/n/`)
    pub fn object_storage_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        build_url(&self.endpoints.object_storage, path, query)
    }
}

fn build_url(base: &Url, path: &str, query: &[(&str, &str)]) -> Result<Url> {
    let mut url = base
        .join(path)
        .with_context(|| format!("Invalid request path {}", path))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// List endpoints answer with a bare JSON array; a few wrap it in `items`
fn list_items(body: Value, url: &Url) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => bail!("Unexpected list response from {}", url.path()),
        },
        _ => bail!("Unexpected list response from {}", url.path()),
    }
}

/// Decode a list of wire records; one malformed record fails the call
pub fn decode_list<T: serde::de::DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).context("Failed to decode list item"))
        .collect()
}

/// Decode a single wire record
pub fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).context("Failed to decode response")
}
