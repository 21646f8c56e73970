//! Partitioning annotations by book or highlight color

use std::collections::BTreeMap;

use super::types::Annotation;

/// Partition annotations by `key`
///
/// Each group keeps the relative order the annotations arrived in. No
/// sorting happens here; sort before or after grouping as needed.
pub fn group_by_key<F>(annotations: Vec<Annotation>, key: F) -> BTreeMap<String, Vec<Annotation>>
where
    F: Fn(&Annotation) -> &str,
{
    let mut groups: BTreeMap<String, Vec<Annotation>> = BTreeMap::new();
    for annotation in annotations {
        let group = key(&annotation).to_string();
        groups.entry(group).or_default().push(annotation);
    }
    groups
}

/// Partition annotations by highlight color
pub fn group_by_color(annotations: Vec<Annotation>) -> BTreeMap<String, Vec<Annotation>> {
    group_by_key(annotations, Annotation::group_key)
}

/// Partition annotations by owning book
pub fn group_by_book(annotations: Vec<Annotation>) -> BTreeMap<String, Vec<Annotation>> {
    group_by_key(annotations, |a| a.book_id.as_str())
}
