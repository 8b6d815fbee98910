//! Reconciliation of cached lists against server events
//!
//! All four operations are pure: they take the cached documents and an event
//! and return the new documents. None of them fail. A list that has not been
//! fetched yet (`None`) is passed through untouched by edits and removals, and
//! documents without an `id` never match.

use serde_json::Value;

use super::{compare_sort_values, Document, PaginatedList, SortSpec, DEFAULT_PAGE, DEFAULT_PER_PAGE};

/// Fold a fetched page into the cached list
///
/// When the incoming page is the one already at the tail of the cache, the
/// stale tail is cut back to the page boundary before appending, so the cache
/// lines up with server pages again after a deletion shifted them. Any other
/// page is appended as-is. Response metadata comes from `incoming`.
pub fn apply_page(
    current: Option<&[Document]>,
    current_page: u32,
    mut incoming: PaginatedList,
) -> PaginatedList {
    let mut documents = current.map(|docs| docs.to_vec()).unwrap_or_default();

    if incoming.page == current_page {
        let boundary = (incoming.page.saturating_sub(1) as usize).saturating_mul(incoming.per_page as usize);
        log::debug!(
            "Refetched page {}; truncating {} cached documents to {}",
            incoming.page,
            documents.len(),
            boundary
        );
        documents.truncate(boundary);
    }

    documents.append(&mut incoming.documents);

    PaginatedList {
        documents,
        ..incoming
    }
}

/// Insert a document into a key-sorted list, keeping only the fetched window
///
/// `page` and `per_page` fall back to 1 and 25 when unset or zero. The sort is
/// stable; descending order reverses the ascending result, ties included.
pub fn insert_sorted(
    current: Option<&[Document]>,
    page: Option<u32>,
    per_page: Option<u32>,
    document: Document,
    sort: &SortSpec,
) -> Vec<Document> {
    let page = page.filter(|&p| p > 0).unwrap_or(DEFAULT_PAGE) as usize;
    let per_page = per_page.filter(|&p| p > 0).unwrap_or(DEFAULT_PER_PAGE) as usize;

    let mut documents = current.map(|docs| docs.to_vec()).unwrap_or_default();
    documents.push(document);

    documents.sort_by(|a, b| compare_sort_values(a.get(&sort.key), b.get(&sort.key)));

    if sort.descending {
        documents.reverse();
    }

    documents.truncate(per_page.saturating_mul(page));
    documents
}

/// Replace the document sharing `updated`'s identifier
pub fn edit_in_place(current: Option<Vec<Document>>, updated: &Document) -> Option<Vec<Document>> {
    let mut documents = current?;

    let Some(id) = updated.id() else {
        return Some(documents);
    };

    match documents.iter_mut().find(|doc| doc.id() == Some(id)) {
        Some(slot) => *slot = updated.clone(),
        None => log::debug!("No cached document with id {} to update", id),
    }

    Some(documents)
}

/// Drop every document whose identifier appears in `ids`
pub fn remove_by_ids(current: Option<Vec<Document>>, ids: &[Value]) -> Option<Vec<Document>> {
    let mut documents = current?;
    documents.retain(|doc| match doc.id() {
        Some(id) => !ids.contains(id),
        None => true,
    });
    Some(documents)
}
