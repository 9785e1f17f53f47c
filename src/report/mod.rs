//! Report module
//!
//! The assembled report and its output.
//!
//! # Module Structure
//!
//! - [`rows`] - Per-category row schemas built from correlated resources
//! - [`render`] - Table, JSON and YAML output

pub mod render;
pub mod rows;

use crate::inventory::{Category, ScopeWarning};
use rows::{BucketRow, InstanceRow, LoadBalancerRow, SecurityRuleRow, VolumeRow};
use serde::Serialize;

/// Rows of one category, in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryRows {
    Instances(Vec<InstanceRow>),
    LoadBalancers(Vec<LoadBalancerRow>),
    SecurityRules(Vec<SecurityRuleRow>),
    Volumes(Vec<VolumeRow>),
    Buckets(Vec<BucketRow>),
}

impl CategoryRows {
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Instances => CategoryRows::Instances(Vec::new()),
            Category::LoadBalancers => CategoryRows::LoadBalancers(Vec::new()),
            Category::SecurityGroups => CategoryRows::SecurityRules(Vec::new()),
            Category::Volumes => CategoryRows::Volumes(Vec::new()),
            Category::Buckets => CategoryRows::Buckets(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CategoryRows::Instances(rows) => rows.len(),
            CategoryRows::LoadBalancers(rows) => rows.len(),
            CategoryRows::SecurityRules(rows) => rows.len(),
            CategoryRows::Volumes(rows) => rows.len(),
            CategoryRows::Buckets(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One category section of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    pub rows: CategoryRows,
    /// Set when the category as a whole could not be produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryReport {
    pub fn new(category: Category, rows: CategoryRows) -> Self {
        Self {
            category,
            rows,
            error: None,
        }
    }

    pub fn failed(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            rows: CategoryRows::empty(category),
            error: Some(message.into()),
        }
    }
}

/// Everything one run produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub categories: Vec<CategoryReport>,
    pub warnings: Vec<ScopeWarning>,
}

impl Report {
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == category)
    }
}
