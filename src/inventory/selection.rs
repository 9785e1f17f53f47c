//! Report categories and the user's selection of them

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One report category; declaration order is emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Instances,
    LoadBalancers,
    SecurityGroups,
    Volumes,
    Buckets,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Instances,
        Category::LoadBalancers,
        Category::SecurityGroups,
        Category::Volumes,
        Category::Buckets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Instances => "instances",
            Category::LoadBalancers => "loadbalancers",
            Category::SecurityGroups => "securitygroups",
            Category::Volumes => "volumes",
            Category::Buckets => "buckets",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "instances" | "instance" => Ok(Category::Instances),
            "loadbalancers" | "load-balancers" | "lb" => Ok(Category::LoadBalancers),
            "securitygroups" | "security-groups" | "nsg" => Ok(Category::SecurityGroups),
            "volumes" | "volume" => Ok(Category::Volumes),
            "buckets" | "bucket" => Ok(Category::Buckets),
            other => bail!("Unknown report category: {}", other),
        }
    }
}

/// Categories to report, deduplicated and in fixed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    categories: Vec<Category>,
}

impl Selection {
    /// An empty request selects every category
    pub fn from_categories(requested: impl IntoIterator<Item = Category>) -> Self {
        let mut categories: Vec<Category> = requested.into_iter().collect();
        if categories.is_empty() {
            return Self::all();
        }
        categories.sort();
        categories.dedup();
        Self { categories }
    }

    pub fn all() -> Self {
        Self {
            categories: Category::ALL.to_vec(),
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().copied()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}
