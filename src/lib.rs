//! ocinfo - read-only inventory report for an OCI tenancy
//!
//! Lists compute instances, load balancers, NSG ingress rules, volumes and
//! buckets across every compartment, correlates the references between them,
//! and prints one report grouped by compartment.
//!
//! # Module Structure
//!
//! - [`oci`] - Signed REST client and per-category fetchers
//! - [`resource`] - Provider-neutral model and fetcher traits
//! - [`inventory`] - Scope resolution, correlation, aggregation, filtering
//! - [`report`] - Row assembly and rendering
//! - [`config`] - Tool settings
//! - [`error`] - Fatal error taxonomy

pub mod config;
pub mod error;
pub mod inventory;
pub mod oci;
pub mod report;
pub mod resource;
