//! Property-based tests for the pagination engine.

use proptest::prelude::*;

use super::*;

#[derive(Debug, Clone, PartialEq)]
struct Item {
    key: Option<i64>,
    position: usize,
}

impl Sortable for Item {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "key" => self.key.map(SortValue::from),
            _ => None,
        }
    }
}

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(prop::option::of(-50i64..50), 0..40).prop_map(|keys| {
        keys.into_iter()
            .enumerate()
            .map(|(position, key)| Item { key, position })
            .collect()
    })
}

fn direction_strategy() -> impl Strategy<Value = OrderDirection> {
    prop_oneof![Just(OrderDirection::Asc), Just(OrderDirection::Desc)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// An unbounded window from the start returns the list unchanged.
    #[test]
    fn prop_unbounded_window_returns_everything(items in items_strategy()) {
        let page = paginate(&items, &PaginationFilters::new(0, 0));
        prop_assert_eq!(page.data, items);
    }

    /// Skipping past the end always yields an empty page with no next page.
    #[test]
    fn prop_skip_past_end_is_empty(
        items in items_strategy(),
        extra in 0usize..10,
        limit in 0usize..10,
        direction in direction_strategy(),
    ) {
        let filters = PaginationFilters::new(items.len() + extra, limit)
            .order_by("key")
            .direction(direction);
        let page = paginate(&items, &filters);

        prop_assert!(page.data.is_empty());
        prop_assert!(!page.metadata.has_next);
    }

    /// Identical inputs give identical outputs and leave the input untouched.
    #[test]
    fn prop_paginate_is_idempotent(
        items in items_strategy(),
        skip in 0usize..50,
        limit in 0usize..20,
        direction in direction_strategy(),
    ) {
        let snapshot = items.clone();
        let filters = PaginationFilters::new(skip, limit)
            .order_by("key")
            .direction(direction);

        let first = paginate(&items, &filters);
        let second = paginate(&items, &filters);

        prop_assert_eq!(&items, &snapshot);
        prop_assert_eq!(first, second);
    }

    /// Page length equals the effective limit and total_items echoes the input length.
    #[test]
    fn prop_page_length_matches_effective_limit(
        items in items_strategy(),
        skip in 0usize..50,
        limit in 0usize..20,
    ) {
        let page = paginate(&items, &PaginationFilters::new(skip, limit));

        prop_assert_eq!(page.data.len(), effective_limit(items.len(), skip, limit));
        prop_assert_eq!(page.metadata.total_items, items.len());
        prop_assert_eq!(page.metadata.limit, limit);
        prop_assert_eq!(page.metadata.skip, skip);
    }

    /// Sorting places absent keys first and orders present keys by direction.
    #[test]
    fn prop_sorted_output_is_ordered(
        items in items_strategy(),
        direction in direction_strategy(),
    ) {
        let filters = PaginationFilters::new(0, 0).order_by("key").direction(direction);
        let page = paginate(&items, &filters);

        let absent = items.iter().filter(|item| item.key.is_none()).count();
        prop_assert!(page.data[..absent].iter().all(|item| item.key.is_none()));

        let present: Vec<i64> = page.data[absent..].iter().filter_map(|item| item.key).collect();
        for pair in present.windows(2) {
            match direction {
                OrderDirection::Asc => prop_assert!(pair[0] <= pair[1]),
                OrderDirection::Desc => prop_assert!(pair[0] >= pair[1]),
            }
        }
    }

    /// Concatenated aligned pages reproduce the full ordering.
    #[test]
    fn prop_aligned_pages_cover_list(
        items in items_strategy(),
        limit in 1usize..8,
    ) {
        let full = paginate(&items, &PaginationFilters::new(0, 0).order_by("key")).data;

        let mut collected = Vec::new();
        let mut skip = 0;
        loop {
            let page = paginate(&items, &PaginationFilters::new(skip, limit).order_by("key"));
            prop_assert_eq!(page.metadata.current_page, skip / limit + 1);
            let has_next = page.metadata.has_next;
            collected.extend(page.data);
            if !has_next {
                break;
            }
            skip += limit;
        }

        prop_assert_eq!(collected, full);
    }
}
