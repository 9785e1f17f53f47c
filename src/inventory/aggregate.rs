//! Pagination Aggregator
//!
//! Walks a bucket's object listing page by page and folds it into a count
//! and a byte total. A failed page stops the walk and keeps what was summed.

use crate::resource::{ObjectPageRequest, ObjectStorageFetcher};
use serde::Serialize;

/// Objects requested per page
pub const OBJECT_PAGE_SIZE: u32 = 1000;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Running totals of one bucket's object listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketTotals {
    pub object_count: u64,
    pub total_size_bytes: u64,
    /// Pages consumed successfully
    pub pages: u32,
    /// False when the walk stopped early
    pub complete: bool,
}

impl BucketTotals {
    /// Size in GiB with two decimals, e.g. `1.50GB`
    pub fn size_gb(&self) -> String {
        format_gb(self.total_size_bytes)
    }
}

pub fn format_gb(bytes: u64) -> String {
    format!("{:.2}GB", bytes as f64 / BYTES_PER_GB)
}

/// Sum object count and size over every page of a bucket
pub async fn aggregate_objects(
    fetcher: &dyn ObjectStorageFetcher,
    namespace: &str,
    bucket: &str,
) -> BucketTotals {
    let mut totals = BucketTotals::default();
    let mut start: Option<String> = None;

    loop {
        let request = ObjectPageRequest {
            limit: OBJECT_PAGE_SIZE,
            start: start.clone(),
        };

        let page = match fetcher.list_objects(namespace, bucket, &request).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    "Object listing of bucket {} stopped after {} pages: {:#}",
                    bucket,
                    totals.pages,
                    e
                );
                return totals;
            }
        };

        totals.pages += 1;
        totals.object_count += page.sizes.len() as u64;
        totals.total_size_bytes = page
            .sizes
            .iter()
            .fold(totals.total_size_bytes, |acc, size| acc.saturating_add(*size));

        match page.next_start {
            None => {
                totals.complete = true;
                return totals;
            }
            // Cursors are object names and must move forward
            Some(next) if start.as_deref().map_or(true, |current| next.as_str() > current) => {
                start = Some(next);
            }
            Some(next) => {
                tracing::warn!(
                    "Object listing of bucket {} returned a non-advancing cursor {:?}",
                    bucket,
                    next
                );
                return totals;
            }
        }
    }
}
