//! Scope Resolver
//!
//! Produces the compartments a run covers: the whole subtree under the
//! tenancy plus the tenancy itself, narrowed by the compartment filter.

use super::filter::NameFilter;
use crate::error::InventoryError;
use crate::resource::{IdentityFetcher, Scope};

/// Resolve the in-scope compartments under `root_id`.
///
/// Either listing failing is fatal for the run. The root is appended once,
/// after its descendants, and an empty result after filtering is not an error.
pub async fn resolve_scopes(
    identity: &dyn IdentityFetcher,
    root_id: &str,
    filter: &NameFilter,
) -> Result<Vec<Scope>, InventoryError> {
    let mut scopes = identity
        .list_scopes(root_id)
        .await
        .map_err(|source| InventoryError::ScopeEnumeration {
            root_id: root_id.to_string(),
            source,
        })?;

    let root = identity
        .get_scope(root_id)
        .await
        .map_err(|source| InventoryError::RootScope {
            root_id: root_id.to_string(),
            source,
        })?;

    let mut seen = std::collections::HashSet::new();
    scopes.retain(|scope| scope.id != root.id && seen.insert(scope.id.clone()));
    scopes.push(root);

    let total = scopes.len();
    scopes.retain(|scope| filter.matches(&scope.name));
    tracing::info!("Resolved {} of {} compartments", scopes.len(), total);

    Ok(scopes)
}
