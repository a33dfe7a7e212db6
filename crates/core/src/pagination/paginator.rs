//! Page extraction.

use finrep_shared::types::{OrderDirection, Page, PaginationFilters, PaginationMetadata};

use super::sort::{SortValue, Sortable};

/// Orders, slices and describes `items` according to `filters`.
///
/// 1. With `order_by`, items are stable-sorted by that field. Absent values
///    come first in either direction; `Desc` reverses the present values
///    after the ascending stable sort.
/// 2. Without `order_by`, `Desc` reverses the original order and `Asc`
///    keeps it.
/// 3. The window `[skip, skip + effective_limit)` is returned, where a
///    `limit` of 0 means everything from `skip` on. A `skip` past the end
///    yields an empty page.
///
/// `total_pages`, `has_next` and `current_page` are only exact when `skip`
/// is a multiple of `limit`.
pub fn paginate<T>(items: &[T], filters: &PaginationFilters) -> Page<T>
where
    T: Sortable + Clone,
{
    let order = ordering(items, filters);
    let take = effective_limit(items.len(), filters.skip, filters.limit);

    let data = order
        .iter()
        .skip(filters.skip)
        .take(take)
        .map(|&index| items[index].clone())
        .collect();

    Page {
        data,
        metadata: pagination_metadata(items.len(), filters),
    }
}

/// Resolves the number of items a page actually holds.
///
/// `limit == 0` means "the rest of the list"; otherwise the limit is clamped
/// to what remains after `skip`.
#[must_use]
pub const fn effective_limit(total_items: usize, skip: usize, limit: usize) -> usize {
    let remaining = total_items.saturating_sub(skip);
    if limit == 0 || limit > remaining {
        remaining
    } else {
        limit
    }
}

/// Computes the metadata of a page over `total_items` items.
#[must_use]
pub fn pagination_metadata(total_items: usize, filters: &PaginationFilters) -> PaginationMetadata {
    let (skip, limit) = (filters.skip, filters.limit);

    let (total_pages, has_next, current_page) = if limit > 0 {
        (
            total_items.div_ceil(limit),
            skip.saturating_add(limit) < total_items,
            skip / limit + 1,
        )
    } else {
        (1, false, 1)
    };

    PaginationMetadata {
        total_items,
        total_pages,
        has_next,
        has_previous: skip > 0,
        current_page,
        limit,
        skip,
    }
}

fn ordering<T: Sortable>(items: &[T], filters: &PaginationFilters) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    let descending = filters.order_direction == OrderDirection::Desc;

    match filters.order_by.as_deref().filter(|field| !field.is_empty()) {
        Some(field) => {
            let keys: Vec<Option<SortValue>> =
                items.iter().map(|item| item.sort_value(field)).collect();

            // `None < Some(_)`, and `sort_by` is stable.
            order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

            if descending {
                let absent = keys.iter().filter(|key| key.is_none()).count();
                order[absent..].reverse();
            }
        }
        None => {
            if descending {
                order.reverse();
            }
        }
    }

    order
}
