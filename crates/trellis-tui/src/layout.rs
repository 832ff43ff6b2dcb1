//! Windowing for the board view: how many lists fit side by side and which
//! slice of a long list is on screen.

/// Number of list columns for a terminal `width`.
pub fn num_columns(width: u16) -> usize {
    match width {
        w if w >= 160 => 4,
        w if w >= 120 => 3,
        w if w >= 80 => 2,
        _ => 1,
    }
}

/// Scroll offset that keeps list `index` inside the visible columns.
pub fn ensure_list_visible(index: usize, offset: usize, num_columns: usize) -> usize {
    let num_columns = num_columns.max(1);
    if index < offset {
        index
    } else if index >= offset + num_columns {
        index + 1 - num_columns
    } else {
        offset
    }
}

/// Range of lists shown for the given offset.
pub fn visible_lists(total: usize, offset: usize, num_columns: usize) -> std::ops::Range<usize> {
    let start = offset.min(total);
    start..(start + num_columns).min(total)
}

#[derive(Debug, PartialEq)]
pub struct CardWindow<'a, T> {
    pub items: &'a [T],
    /// Index of `items[0]` in the full list.
    pub offset: usize,
    /// Hidden items above the window.
    pub scroll_top: usize,
    /// Hidden items below the window.
    pub scroll_bottom: usize,
}

/// Slice of `cards` to draw in `max_rows` rows, centred on `selected` where
/// possible.
pub fn visible_cards<T>(cards: &[T], selected: usize, max_rows: usize) -> CardWindow<'_, T> {
    if cards.len() <= max_rows {
        return CardWindow {
            items: cards,
            offset: 0,
            scroll_top: 0,
            scroll_bottom: 0,
        };
    }

    let selected = selected.min(cards.len() - 1);
    let mut start = selected.saturating_sub(max_rows / 2);
    let mut end = start + max_rows;
    if end > cards.len() {
        end = cards.len();
        start = end - max_rows;
    }

    CardWindow {
        items: &cards[start..end],
        offset: start,
        scroll_top: start,
        scroll_bottom: cards.len() - end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_breakpoints() {
        assert_eq!(num_columns(200), 4);
        assert_eq!(num_columns(160), 4);
        assert_eq!(num_columns(159), 3);
        assert_eq!(num_columns(120), 3);
        assert_eq!(num_columns(80), 2);
        assert_eq!(num_columns(79), 1);
        assert_eq!(num_columns(0), 1);
    }

    #[test]
    fn test_ensure_list_visible() {
        assert_eq!(ensure_list_visible(0, 2, 3), 0);
        assert_eq!(ensure_list_visible(3, 2, 3), 2);
        assert_eq!(ensure_list_visible(5, 2, 3), 3);
        assert_eq!(ensure_list_visible(9, 0, 1), 9);
    }

    #[test]
    fn test_visible_lists_clamps_to_total() {
        assert_eq!(visible_lists(5, 3, 4), 3..5);
        assert_eq!(visible_lists(2, 0, 4), 0..2);
        assert_eq!(visible_lists(0, 0, 2), 0..0);
    }

    #[test]
    fn test_all_cards_fit() {
        let cards: Vec<u32> = (0..5).collect();
        let window = visible_cards(&cards, 4, 5);
        assert_eq!(window.items.len(), 5);
        assert_eq!(window.scroll_top, 0);
        assert_eq!(window.scroll_bottom, 0);
    }

    #[test]
    fn test_window_contains_selection() {
        let cards: Vec<u32> = (0..20).collect();
        for selected in 0..20 {
            let window = visible_cards(&cards, selected, 6);
            assert_eq!(window.items.len(), 6);
            assert!(window.items.contains(&(selected as u32)));
            assert_eq!(
                window.scroll_top + window.items.len() + window.scroll_bottom,
                20
            );
        }
    }

    #[test]
    fn test_window_centres_then_clamps() {
        let cards: Vec<u32> = (0..20).collect();
        let window = visible_cards(&cards, 10, 6);
        assert_eq!(window.scroll_top, 7);
        assert_eq!(window.scroll_bottom, 7);

        let window = visible_cards(&cards, 19, 6);
        assert_eq!(window.offset, 14);
        assert_eq!(window.scroll_bottom, 0);
    }

    #[test]
    fn test_zero_rows_shows_nothing() {
        let cards = [1, 2, 3];
        let window = visible_cards(&cards, 1, 0);
        assert!(window.items.is_empty());
        assert_eq!(window.scroll_top + window.scroll_bottom, 3);
    }
}
