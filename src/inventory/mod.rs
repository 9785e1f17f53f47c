//! Inventory engine
//!
//! Drives one read-only inventory run: resolve compartments, list each
//! selected category per compartment, correlate cross-references, and hand
//! the results to the report assembler.
//!
//! # Module Structure
//!
//! - [`scope`] - Compartment subtree resolution and scope filtering
//! - [`correlate`] - Cross-reference lookups into [`crate::resource::Detail`]s
//! - [`aggregate`] - Bucket object listing totals
//! - [`filter`] - Name filters, row ordering and compartment grouping
//! - [`selection`] - Report categories
//!
//! # Failure isolation
//!
//! Only compartment resolution can abort a run. A category can fail as a
//! whole (object storage namespace, availability domains) and is reported
//! with its error. A listing failure in one compartment becomes a
//! [`ScopeWarning`] and the other compartments still report.
//!
//! # Example
//!
//! ```ignore
//! use ocinfo::inventory::{Inventory, ReportOptions};
//!
//! async fn example(fetchers: ocinfo::resource::Fetchers) -> anyhow::Result<()> {
//!     let inventory = Inventory::new(fetchers, "ocid1.tenancy.oc1..aaaa", 4);
//!     let report = inventory.collect(&ReportOptions::default()).await?;
//!     for warning in &report.warnings {
//!         eprintln!("[WARN] {}", warning);
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod correlate;
pub mod filter;
pub mod scope;
pub mod selection;

pub use filter::NameFilter;
pub use selection::{Category, Selection};

use crate::error::InventoryError;
use crate::oci::http::format_oci_error;
use crate::report::rows;
use crate::report::{CategoryReport, CategoryRows, Report};
use crate::resource::{Fetchers, Scope};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::fmt;
use std::future::Future;

/// Default number of compartments fetched concurrently
pub const DEFAULT_CONCURRENCY: usize = 4;

/// A category listing that failed in one compartment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeWarning {
    pub category: Category,
    pub scope_name: String,
    pub message: String,
}

impl fmt::Display for ScopeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.category, self.scope_name, self.message)
    }
}

/// What to report and how to narrow it
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub selection: Selection,
    /// Matched against each resource's own display name
    pub name_filter: NameFilter,
    /// Matched against compartment names, before anything is listed
    pub scope_filter: NameFilter,
}

/// Inventory runner over a set of fetchers
pub struct Inventory {
    fetchers: Fetchers,
    root_id: String,
    concurrency: usize,
}

impl Inventory {
    pub fn new(fetchers: Fetchers, root_id: impl Into<String>, concurrency: usize) -> Self {
        Self {
            fetchers,
            root_id: root_id.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Run every selected category in fixed order.
    ///
    /// Returns an error only when the compartment tree cannot be resolved.
    pub async fn collect(&self, options: &ReportOptions) -> Result<Report, InventoryError> {
        let scopes =
            scope::resolve_scopes(self.fetchers.identity.as_ref(), &self.root_id, &options.scope_filter)
                .await?;

        let mut report = Report::default();
        let filter = &options.name_filter;

        for category in options.selection.iter() {
            let section = match category {
                Category::Instances => self.instances(&scopes, filter, &mut report.warnings).await,
                Category::LoadBalancers => {
                    self.load_balancers(&scopes, filter, &mut report.warnings)
                        .await
                }
                Category::SecurityGroups => {
                    self.security_groups(&scopes, filter, &mut report.warnings)
                        .await
                }
                Category::Volumes => self.volumes(&scopes, filter, &mut report.warnings).await,
                Category::Buckets => self.buckets(&scopes, filter, &mut report.warnings).await,
            };

            match &section.error {
                Some(error) => tracing::warn!("{} failed: {}", category, error),
                None => tracing::info!("{}: {} rows", category, section.rows.len()),
            }
            report.categories.push(section);
        }

        Ok(report)
    }

    /// Fetch one category across all scopes, `concurrency` scopes at a time.
    /// A failed scope is recorded as a warning and contributes nothing.
    async fn for_each_scope<'a, T, F, Fut>(
        &self,
        category: Category,
        scopes: &'a [Scope],
        warnings: &mut Vec<ScopeWarning>,
        fetch: F,
    ) -> Vec<T>
    where
        F: Fn(&'a Scope) -> Fut,
        Fut: Future<Output = anyhow::Result<Vec<T>>>,
    {
        let results: Vec<(&Scope, anyhow::Result<Vec<T>>)> = stream::iter(scopes)
            .map(|scope| {
                let fut = fetch(scope);
                async move { (scope, fut.await) }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut items = Vec::new();
        for (scope, result) in results {
            match result {
                Ok(found) => items.extend(found),
                Err(e) => {
                    tracing::warn!("Listing {} in {} failed: {:#}", category, scope.name, e);
                    warnings.push(ScopeWarning {
                        category,
                        scope_name: scope.name.clone(),
                        message: format_oci_error(&e),
                    });
                }
            }
        }
        items
    }

    async fn instances(
        &self,
        scopes: &[Scope],
        filter: &NameFilter,
        warnings: &mut Vec<ScopeWarning>,
    ) -> CategoryReport {
        let fetchers = &self.fetchers;
        let correlated = self
            .for_each_scope(Category::Instances, scopes, warnings, |scope| async move {
                let instances = fetchers.compute.list_instances(&scope.id).await?;
                let mut out = Vec::new();
                for instance in instances
                    .into_iter()
                    .filter(|i| !i.is_terminated() && filter.matches(&i.name))
                {
                    out.push(correlate::correlate_instance(fetchers, scope, instance).await);
                }
                Ok::<_, anyhow::Error>(out)
            })
            .await;

        CategoryReport::new(
            Category::Instances,
            CategoryRows::Instances(rows::instance_rows(correlated)),
        )
    }

    async fn load_balancers(
        &self,
        scopes: &[Scope],
        filter: &NameFilter,
        warnings: &mut Vec<ScopeWarning>,
    ) -> CategoryReport {
        let fetchers = &self.fetchers;
        let correlated = self
            .for_each_scope(Category::LoadBalancers, scopes, warnings, |scope| async move {
                let lbs = fetchers.load_balancer.list_load_balancers(&scope.id).await?;
                let mut out = Vec::new();
                for lb in lbs.into_iter().filter(|lb| filter.matches(&lb.name)) {
                    out.push(correlate::correlate_load_balancer(fetchers, scope, lb).await);
                }
                Ok::<_, anyhow::Error>(out)
            })
            .await;

        CategoryReport::new(
            Category::LoadBalancers,
            CategoryRows::LoadBalancers(rows::load_balancer_rows(correlated)),
        )
    }

    async fn security_groups(
        &self,
        scopes: &[Scope],
        filter: &NameFilter,
        warnings: &mut Vec<ScopeWarning>,
    ) -> CategoryReport {
        let fetchers = &self.fetchers;
        let correlated = self
            .for_each_scope(Category::SecurityGroups, scopes, warnings, |scope| async move {
                let groups = fetchers.network.list_security_groups(&scope.id).await?;
                let mut out = Vec::new();
                for group in groups.into_iter().filter(|g| filter.matches(&g.name)) {
                    out.push(correlate::correlate_security_group(fetchers, scope, group).await);
                }
                Ok::<_, anyhow::Error>(out)
            })
            .await;

        CategoryReport::new(
            Category::SecurityGroups,
            CategoryRows::SecurityRules(rows::security_rule_rows(correlated)),
        )
    }

    async fn volumes(
        &self,
        scopes: &[Scope],
        filter: &NameFilter,
        warnings: &mut Vec<ScopeWarning>,
    ) -> CategoryReport {
        let fetchers = &self.fetchers;
        let domains = match fetchers
            .identity
            .list_availability_domains(&self.root_id)
            .await
        {
            Ok(domains) => domains,
            Err(source) => {
                return category_failure(
                    Category::Volumes,
                    InventoryError::AvailabilityDomains { source },
                )
            }
        };
        let domains = domains.as_slice();

        let correlated = self
            .for_each_scope(Category::Volumes, scopes, warnings, |scope| async move {
                let mut volumes = Vec::new();
                for domain in domains {
                    volumes.extend(fetchers.storage.list_boot_volumes(&scope.id, domain).await?);
                }
                volumes.extend(fetchers.storage.list_block_volumes(&scope.id).await?);

                let mut out = Vec::new();
                for volume in volumes
                    .into_iter()
                    .filter(|v| !v.is_terminated() && filter.matches(&v.name))
                {
                    out.push(correlate::correlate_volume(fetchers, scope, volume).await);
                }
                Ok::<_, anyhow::Error>(out)
            })
            .await;

        CategoryReport::new(
            Category::Volumes,
            CategoryRows::Volumes(rows::volume_rows(correlated)),
        )
    }

    async fn buckets(
        &self,
        scopes: &[Scope],
        filter: &NameFilter,
        warnings: &mut Vec<ScopeWarning>,
    ) -> CategoryReport {
        let fetchers = &self.fetchers;
        let namespace = match fetchers.object_storage.get_namespace().await {
            Ok(namespace) => namespace,
            Err(source) => {
                return category_failure(Category::Buckets, InventoryError::Namespace { source })
            }
        };
        let namespace = namespace.as_str();

        let correlated = self
            .for_each_scope(Category::Buckets, scopes, warnings, |scope| async move {
                let buckets = fetchers
                    .object_storage
                    .list_buckets(namespace, &scope.id)
                    .await?;
                let mut out = Vec::new();
                for bucket in buckets.into_iter().filter(|b| filter.matches(&b.name)) {
                    out.push(correlate::correlate_bucket(fetchers, scope, namespace, bucket).await);
                }
                Ok::<_, anyhow::Error>(out)
            })
            .await;

        CategoryReport::new(
            Category::Buckets,
            CategoryRows::Buckets(rows::bucket_rows(correlated)),
        )
    }
}

fn category_failure(category: Category, error: InventoryError) -> CategoryReport {
    let message = format!("{}: {}", error, format_oci_error(error.provider_error()));
    CategoryReport::failed(category, message)
}
