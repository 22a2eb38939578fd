use crate::state::{ItemRef, Pack};

/// What: Normalize user input into a search term.
///
/// Output:
/// - Trimmed, lowercased text; empty means "no filter".
#[must_use]
pub fn sanitize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Whether `item` matches an already sanitized, non-empty `term`.
fn matches(item: &ItemRef, term: &str) -> bool {
    sanitize(&item.body).contains(term) || sanitize(&item.id).contains(term)
}

/// What: Filter pools by a search term without touching the source pools.
///
/// Inputs:
/// - `term`: Raw or sanitized search text.
/// - `pools`: Recency pool and loaded packs, in display order.
///
/// Output:
/// - One pool per input pool that still has matches, holding only the matching
///   items in their original order. Pools without matches are omitted.
///
/// Details:
/// - Matching is a case-insensitive substring test against label or id.
/// - A blank term returns every pool unchanged. Callers should skip this function
///   entirely when no filter is active and render the source pools directly.
pub fn filter_pools<'a, I>(term: &str, pools: I) -> Vec<Pack>
where
    I: IntoIterator<Item = &'a Pack>,
{
    let term = sanitize(term);
    if term.is_empty() {
        return pools.into_iter().cloned().collect();
    }
    pools
        .into_iter()
        .filter_map(|pool| {
            let items: Vec<ItemRef> = pool
                .items
                .iter()
                .filter(|item| matches(item, &term))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| Pack {
                id: pool.id.clone(),
                title: pool.title.clone(),
                items,
            })
        })
        .collect()
}
