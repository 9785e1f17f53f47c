//! Filter & Grouping
//!
//! Case-insensitive substring filters, the per-category sort order, and
//! grouping of sorted rows into per-compartment sections.

/// Case-insensitive substring filter; an empty or absent needle matches all
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    needle: Option<String>,
}

impl NameFilter {
    pub fn new(raw: Option<&str>) -> Self {
        Self {
            needle: raw.filter(|s| !s.is_empty()).map(|s| s.to_lowercase()),
        }
    }

    /// Filter that lets everything through
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.needle.is_some()
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.needle {
            Some(needle) => name.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}

/// A report row that belongs to a compartment and has a defined sort order
pub trait ScopedRow {
    /// Compartment name the row is grouped under
    fn scope_name(&self) -> &str;

    /// Sort key components, most significant first, compared case-insensitively
    fn sort_key(&self) -> Vec<&str>;
}

/// Sort rows by compartment, then by the row's own keys (stable)
pub fn sort_rows<R: ScopedRow>(rows: &mut [R]) {
    rows.sort_by_cached_key(|row| {
        row.sort_key()
            .into_iter()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
    });
}

/// Consecutive rows sharing one compartment name
#[derive(Debug)]
pub struct ScopeGroup<'a, R> {
    pub scope_name: &'a str,
    pub rows: &'a [R],
}

/// Split sorted rows into compartment sections, in emission order
pub fn group_by_scope<R: ScopedRow>(rows: &[R]) -> Vec<ScopeGroup<'_, R>> {
    rows.chunk_by(|a, b| a.scope_name() == b.scope_name())
        .map(|chunk| ScopeGroup {
            scope_name: chunk[0].scope_name(),
            rows: chunk,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        scope: &'static str,
        name: &'static str,
    }

    impl ScopedRow for Row {
        fn scope_name(&self) -> &str {
            self.scope
        }

        fn sort_key(&self) -> Vec<&str> {
            vec![self.scope, self.name]
        }
    }

    fn row(scope: &'static str, name: &'static str) -> Row {
        Row { scope, name }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(NameFilter::new(None).matches("anything"));
        assert!(NameFilter::new(Some("")).matches("anything"));
        assert!(!NameFilter::new(Some("")).is_active());
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let filter = NameFilter::new(Some("Web"));
        assert!(filter.matches("prod-WEB-01"));
        assert!(filter.matches("web"));
        assert!(!filter.matches("db-01"));
    }

    #[test]
    fn test_sort_by_scope_then_name_ignoring_case() {
        let mut rows = vec![row("prod", "b"), row("Dev", "z"), row("prod", "A"), row("dev", "a")];
        sort_rows(&mut rows);
        assert_eq!(
            rows,
            vec![row("dev", "a"), row("Dev", "z"), row("prod", "A"), row("prod", "b")]
        );
    }

    #[test]
    fn test_group_consecutive_scopes() {
        let rows = vec![row("a", "1"), row("a", "2"), row("b", "1"), row("c", "1")];
        let groups = group_by_scope(&rows);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].scope_name, "a");
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[2].scope_name, "c");
    }

    #[test]
    fn test_group_empty() {
        let rows: Vec<Row> = Vec::new();
        assert!(group_by_scope(&rows).is_empty());
    }
}
