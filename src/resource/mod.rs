//! Resource abstraction layer
//!
//! This module provides the provider-neutral side of the inventory: the data
//! model the report is built from, the per-category fetcher contracts, and
//! the lookup result type used for cross-references.
//!
//! # Architecture
//!
//! - [`model`] - Scopes, instances, network, volumes, load balancers, buckets
//! - [`fetcher`] - One async trait per resource category
//! - [`detail`] - [`Detail`], the outcome of a single cross-reference lookup
//!
//! # Example
//!
//! ```ignore
//! use ocinfo::resource::Fetchers;
//!
//! async fn count_instances(fetchers: &Fetchers, scope_id: &str) -> anyhow::Result<usize> {
//!     Ok(fetchers.compute.list_instances(scope_id).await?.len())
//! }
//! ```

pub mod detail;
pub mod fetcher;
pub mod model;

pub use detail::Detail;
pub use fetcher::{
    ComputeFetcher, Fetchers, IdentityFetcher, LoadBalancerFetcher, NetworkFetcher,
    ObjectStorageFetcher, StorageFetcher,
};
pub use model::*;
