//! Index bookkeeping for `selected` and `visibleTabs` when children move.
//!
//! All functions are pure so the dispatcher can apply them to tabsets and
//! borders alike.

/// Selection after removing the child at `removed`.
///
/// `remaining` is the child count after the removal.
#[must_use]
pub fn selected_after_remove(
    selected: Option<usize>,
    removed: usize,
    remaining: usize,
) -> Option<usize> {
    let selected = selected?;
    if removed < selected {
        Some(selected - 1)
    } else if removed == selected {
        if remaining == 0 {
            None
        } else {
            Some(selected.min(remaining - 1))
        }
    } else {
        Some(selected)
    }
}

/// Selection after inserting a child at `inserted`.
#[must_use]
pub fn selected_after_insert(selected: Option<usize>, inserted: usize) -> Option<usize> {
    selected.map(|index| if index >= inserted { index + 1 } else { index })
}

/// Tiled set after removing the child at `removed`.
#[must_use]
pub fn visible_after_remove(visible: &[usize], removed: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(visible.len());
    for &index in visible {
        let shifted = match index.cmp(&removed) {
            std::cmp::Ordering::Less => index,
            std::cmp::Ordering::Equal => continue,
            std::cmp::Ordering::Greater => index - 1,
        };
        if !out.contains(&shifted) {
            out.push(shifted);
        }
    }
    out
}

/// Tiled set after inserting a child at `inserted`.
#[must_use]
pub fn visible_after_insert(visible: &[usize], inserted: usize) -> Vec<usize> {
    visible
        .iter()
        .map(|&index| if index >= inserted { index + 1 } else { index })
        .collect()
}

/// Bring a selection/tiling pair into canonical form for `len` children.
///
/// Out-of-range and repeated entries drop; a single tiled entry collapses
/// into plain selection; while tiling, the selection is one of the tiles.
#[must_use]
pub fn normalize(
    selected: Option<usize>,
    visible: &[usize],
    len: usize,
) -> (Option<usize>, Vec<usize>) {
    let selected = selected.filter(|&index| index < len);
    let mut tiles = Vec::with_capacity(visible.len());
    for &index in visible {
        if index < len && !tiles.contains(&index) {
            tiles.push(index);
        }
    }
    match tiles.as_slice() {
        [] => (selected, tiles),
        [only] => (Some(*only), Vec::new()),
        [first, ..] => {
            let selected = match selected {
                Some(index) if tiles.contains(&index) => index,
                _ => *first,
            };
            (Some(selected), tiles)
        }
    }
}

/// Stable reordering that moves pinned entries to the front.
///
/// Returns the new order as old indices, so `order[new] == old`.
#[must_use]
pub fn pinned_first_order(pinned: &[bool]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pinned.len()).filter(|&i| pinned[i]).collect();
    order.extend((0..pinned.len()).filter(|&i| !pinned[i]));
    order
}

/// Map an old index through a permutation produced by [`pinned_first_order`].
#[must_use]
pub fn remap_index(order: &[usize], old: usize) -> Option<usize> {
    order.iter().position(|&candidate| candidate == old)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn removal_before_selection_shifts_left() {
        assert_eq!(selected_after_remove(Some(3), 1, 4), Some(2));
    }

    #[test]
    fn removal_of_selection_keeps_position_or_clamps() {
        assert_eq!(selected_after_remove(Some(1), 1, 3), Some(1));
        assert_eq!(selected_after_remove(Some(2), 2, 2), Some(1));
        assert_eq!(selected_after_remove(Some(0), 0, 0), None);
    }

    #[test]
    fn removal_after_selection_is_ignored() {
        assert_eq!(selected_after_remove(Some(0), 2, 2), Some(0));
        assert_eq!(selected_after_remove(None, 0, 3), None);
    }

    #[test]
    fn insertion_shifts_indices_at_or_after() {
        assert_eq!(selected_after_insert(Some(2), 2), Some(3));
        assert_eq!(selected_after_insert(Some(1), 2), Some(1));
        assert_eq!(visible_after_insert(&[0, 2, 3], 2), vec![0, 3, 4]);
    }

    #[test]
    fn visible_removal_drops_and_decrements() {
        assert_eq!(visible_after_remove(&[0, 2, 3], 2), vec![0, 2]);
        assert_eq!(visible_after_remove(&[1], 1), Vec::<usize>::new());
    }

    #[test]
    fn normalize_collapses_single_tile() {
        assert_eq!(normalize(Some(0), &[2], 3), (Some(2), vec![]));
        assert_eq!(normalize(Some(2), &[0, 2, 0], 3), (Some(2), vec![0, 2]));
        assert_eq!(normalize(Some(1), &[0, 2], 3), (Some(0), vec![0, 2]));
        assert_eq!(normalize(Some(5), &[7], 3), (None, vec![]));
    }

    #[test]
    fn pinned_entries_move_to_front() {
        let order = pinned_first_order(&[false, true, false, true]);
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert_eq!(remap_index(&order, 0), Some(2));
        assert_eq!(remap_index(&order, 3), Some(1));
    }

    proptest! {
        #[test]
        fn removal_keeps_selection_in_range(
            len in 1usize..12,
            selected in 0usize..12,
            removed in 0usize..12,
        ) {
            let selected = selected % len;
            let removed = removed % len;
            let next = selected_after_remove(Some(selected), removed, len - 1);
            match next {
                Some(index) => prop_assert!(index < len - 1),
                None => prop_assert_eq!(len, 1),
            }
        }

        #[test]
        fn normalized_pairs_are_consistent(
            len in 0usize..8,
            selected in proptest::option::of(0usize..10),
            visible in proptest::collection::vec(0usize..10, 0..6),
        ) {
            let (selected, tiles) = normalize(selected, &visible, len);
            if let Some(index) = selected {
                prop_assert!(index < len);
            }
            prop_assert!(tiles.len() != 1);
            for (i, index) in tiles.iter().enumerate() {
                prop_assert!(*index < len);
                prop_assert!(!tiles[..i].contains(index));
            }
            if !tiles.is_empty() {
                prop_assert!(selected.is_some_and(|index| tiles.contains(&index)));
            }
        }
    }
}
