//! Single-key shortcuts for checklist items.
//!
//! Items are addressed by one keystroke from a fixed symbol table: digits,
//! then letters without `i` (which adds an item), then `0`. Lists longer
//! than the table are paged.

pub const CHECK_ITEM_KEYS: [char; 35] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'k',
    'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0',
];

pub const KEYS_PER_PAGE: usize = CHECK_ITEM_KEYS.len();

/// Position of `key` in the symbol table, ignoring case.
pub fn key_index_of(key: char) -> Option<usize> {
    let key = key.to_ascii_lowercase();
    CHECK_ITEM_KEYS.iter().position(|&k| k == key)
}

pub fn key_for(key_index: usize) -> Option<char> {
    CHECK_ITEM_KEYS.get(key_index).copied()
}

pub fn page_of(global_index: usize) -> usize {
    global_index / KEYS_PER_PAGE
}

pub fn key_index(global_index: usize) -> usize {
    global_index % KEYS_PER_PAGE
}

pub fn global_index(page: usize, key_index: usize) -> usize {
    page * KEYS_PER_PAGE + key_index
}

pub fn page_count(item_count: usize) -> usize {
    item_count.div_ceil(KEYS_PER_PAGE).max(1)
}

/// Item index addressed by `key` on `page`, if that item exists.
pub fn resolve(key: char, page: usize, item_count: usize) -> Option<usize> {
    let global = global_index(page, key_index_of(key)?);
    (global < item_count).then_some(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_symbols_are_unique_and_skip_i() {
        let unique: HashSet<char> = CHECK_ITEM_KEYS.iter().copied().collect();
        assert_eq!(unique.len(), 35);
        assert!(!unique.contains(&'i'));
        assert_eq!(key_index_of('i'), None);
    }

    #[test]
    fn test_digits_come_first() {
        for (offset, digit) in ('1'..='9').enumerate() {
            assert_eq!(key_index_of(digit), Some(offset));
        }
        assert_eq!(key_index_of('a'), Some(9));
        assert_eq!(key_index_of('A'), Some(9));
        assert_eq!(key_index_of('z'), Some(33));
        assert_eq!(key_index_of('0'), Some(34));
    }

    #[test]
    fn test_paging() {
        assert_eq!(page_of(35), 1);
        assert_eq!(key_index(35), 0);
        assert_eq!(page_of(34), 0);
        assert_eq!(key_for(key_index(36)), Some('2'));
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(35), 1);
        assert_eq!(page_count(36), 2);
    }

    #[test]
    fn test_resolve_respects_item_count() {
        assert_eq!(resolve('3', 0, 5), Some(2));
        assert_eq!(resolve('9', 0, 5), None);
        assert_eq!(resolve('1', 1, 40), Some(35));
        assert_eq!(resolve('-', 0, 5), None);
    }
}
