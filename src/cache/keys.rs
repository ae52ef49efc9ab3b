//! Cache key derivation.
//!
//! Id keys are plain `{namespace}:id:{id}`. Query keys fingerprint the
//! descriptor's canonical form with SHA-256 so that structurally equal
//! queries — including ones whose filter sets were assembled in a different
//! order — land on the same entry across processes and restarts. A process-
//! local hasher would not survive a restart, which is why this does not use
//! the standard library hash.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::search::QueryDescriptor;
use crate::search::descriptor::SortDirection;

pub fn id_key(namespace: &str, id: &str) -> String {
    format!("{namespace}:id:{id}")
}

pub fn query_key(namespace: &str, descriptor: &QueryDescriptor) -> String {
    format!("{namespace}:query:{}", fingerprint(descriptor))
}

fn fingerprint(descriptor: &QueryDescriptor) -> String {
    let digest = Sha256::digest(canonical_form(descriptor).as_bytes());
    hex::encode(digest)
}

/// Deterministic textual form of a descriptor. Relies on the descriptor
/// keeping its filter set sorted; every field is delimited so adjacent
/// values cannot collide by concatenation.
fn canonical_form(descriptor: &QueryDescriptor) -> String {
    let mut out = String::new();
    if let Some(text) = descriptor.text() {
        let _ = write!(out, "text={text}\u{1f}");
    }
    for clause in descriptor.filters() {
        let _ = write!(
            out,
            "filter={}\u{1e}{}\u{1e}{}\u{1f}",
            clause.nested_path.as_deref().unwrap_or(""),
            clause.field,
            clause.value,
        );
    }
    if let Some(sort) = descriptor.sort() {
        let direction = match sort.direction() {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        let _ = write!(out, "sort={}\u{1e}{direction}\u{1f}", sort.field());
    }
    let page = descriptor.page();
    let _ = write!(out, "from={}\u{1f}size={}", page.offset(), page.limit());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::descriptor::{FilterClause, PageSpec, SortSpec};

    fn page(number: u32, size: u32) -> PageSpec {
        PageSpec::new(number, size).expect("valid page")
    }

    #[test]
    fn id_key_layout() {
        assert_eq!(id_key("film", "f1"), "film:id:f1");
    }

    #[test]
    fn permuted_filters_share_a_key() {
        let a = QueryDescriptor::new(page(1, 50))
            .with_filter(FilterClause::term("country", "no"))
            .with_filter(FilterClause::nested("genres", "genres.id", "g1"));
        let b = QueryDescriptor::new(page(1, 50))
            .with_filter(FilterClause::nested("genres", "genres.id", "g1"))
            .with_filter(FilterClause::term("country", "no"));
        assert_eq!(query_key("film", &a), query_key("film", &b));
    }

    #[test]
    fn sort_direction_changes_the_key() {
        let base = QueryDescriptor::new(page(1, 50)).with_text("ring");
        let asc = base
            .clone()
            .with_sort(SortSpec::parse("imdb_rating").expect("valid sort"));
        let desc = base.with_sort(SortSpec::parse("-imdb_rating").expect("valid sort"));
        assert_ne!(query_key("film", &asc), query_key("film", &desc));
    }

    #[test]
    fn page_offset_changes_the_key() {
        let first = QueryDescriptor::new(page(1, 50)).with_text("ring");
        let second = QueryDescriptor::new(page(2, 50)).with_text("ring");
        assert_ne!(query_key("film", &first), query_key("film", &second));
    }

    #[test]
    fn namespace_partitions_keys() {
        let descriptor = QueryDescriptor::new(page(1, 50)).with_text("ring");
        assert_ne!(
            query_key("film", &descriptor),
            query_key("genre", &descriptor)
        );
    }

    #[test]
    fn same_descriptor_is_stable() {
        let descriptor = QueryDescriptor::new(page(2, 10))
            .with_text("ring")
            .with_filter(FilterClause::nested("genres", "genres.id", "g1"));
        assert_eq!(
            query_key("film", &descriptor),
            query_key("film", &descriptor.clone())
        );
    }
}
