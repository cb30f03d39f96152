//! Filtered, sorted and partitioned views over the record store.
//!
//! A projection is recomputed from scratch on every request: filter by
//! search term and category, order, then split into two order-preserving
//! partitions.

use std::cmp::Ordering;

use crate::features::catalog::models::FileRecord;
use crate::features::categories::CategoryService;

/// Category selector of the list view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Id(String),
}

impl CategoryFilter {
    /// `None`, empty and `"all"` select every category
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(v) if v.eq_ignore_ascii_case("all") => CategoryFilter::All,
            Some(v) => CategoryFilter::Id(v.to_string()),
        }
    }

    fn matches(&self, record: &FileRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Id(id) => record.category_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// How the ordered result is split for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionMode {
    /// Pinned records first, then the rest
    #[default]
    Pinned,
    /// The first `count` records by recency, then the rest.
    /// Positional: exactly `count` regardless of how recent they are.
    Recent { count: usize },
}

impl PartitionMode {
    pub const DEFAULT_RECENT_COUNT: usize = 3;

    pub fn labels(&self) -> (&'static str, &'static str) {
        match self {
            PartitionMode::Pinned => ("pinned", "unpinned"),
            PartitionMode::Recent { .. } => ("recent", "other"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectionQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub mode: PartitionMode,
}

#[derive(Debug)]
pub struct Projection<'a> {
    pub mode: PartitionMode,
    pub primary: Vec<&'a FileRecord>,
    pub secondary: Vec<&'a FileRecord>,
}

impl Projection<'_> {
    /// Number of records that passed the filter
    pub fn matched(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }
}

/// Case-insensitive substring match over name, description and the
/// resolved category name. A blank term matches everything.
pub fn matches_search(record: &FileRecord, categories: &CategoryService, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    let contains = |text: &str| text.to_lowercase().contains(&term);

    contains(&record.name)
        || record.description.as_deref().is_some_and(contains)
        || contains(categories.display_name(record.category_id.as_deref()))
}

pub fn filter_records<'a>(
    records: &'a [FileRecord],
    categories: &CategoryService,
    search: &str,
    category: &CategoryFilter,
) -> Vec<&'a FileRecord> {
    records
        .iter()
        .filter(|r| category.matches(r) && matches_search(r, categories, search))
        .collect()
}

/// Stable sort: pinned first (pinned mode only), then newest `updated_at`
pub fn sort_records(records: &mut [&FileRecord], mode: PartitionMode) {
    records.sort_by(|a, b| {
        let pinned = match mode {
            PartitionMode::Pinned => b.is_pinned.cmp(&a.is_pinned),
            PartitionMode::Recent { .. } => Ordering::Equal,
        };
        pinned.then_with(|| b.updated_at.cmp(&a.updated_at))
    });
}

pub fn partition<'a>(sorted: Vec<&'a FileRecord>, mode: PartitionMode) -> Projection<'a> {
    let (primary, secondary) = match mode {
        PartitionMode::Pinned => sorted.into_iter().partition(|r| r.is_pinned),
        PartitionMode::Recent { count } => {
            let mut primary = sorted;
            let secondary = primary.split_off(count.min(primary.len()));
            (primary, secondary)
        }
    };

    Projection {
        mode,
        primary,
        secondary,
    }
}

pub fn project<'a>(
    records: &'a [FileRecord],
    categories: &CategoryService,
    query: &ProjectionQuery,
) -> Projection<'a> {
    let mut filtered = filter_records(records, categories, &query.search, &query.category);
    sort_records(&mut filtered, query.mode);
    partition(filtered, query.mode)
}
