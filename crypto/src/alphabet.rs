//! The two character pools the rotating permutation is built over.
//!
//! Letters and symbols are shuffled independently and never mixed: this is
//! the pool-split invariant enforced throughout the crate (see
//! [`crate::keymap`]).

/// Letter pool `L`, `a..z` in ASCII order.
pub const LETTER_POOL: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Symbol pool `S`: digits, space, and common printable punctuation, in the
/// exact order used as the Fisher-Yates input array. Both peers must use
/// this literal ordering or their permutations diverge.
pub const SYMBOL_POOL: [char; 42] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ' ', '.', ',', '!', '?', '-', '_', '@', '#',
    '$', '%', '&', '*', '(', ')', '[', ']', '{', '}', ':', ';', '"', '\'', '/', '\\', '|', '+',
    '=', '<', '>', '~', '`',
];

pub const LETTER_POOL_LEN: usize = LETTER_POOL.len();
pub const SYMBOL_POOL_LEN: usize = SYMBOL_POOL.len();

/// Index of `c` within [`LETTER_POOL`], if it belongs there.
pub fn letter_index(c: char) -> Option<usize> {
    LETTER_POOL.iter().position(|&l| l == c)
}

/// Index of `c` within [`SYMBOL_POOL`], if it belongs there.
pub fn symbol_index(c: char) -> Option<usize> {
    SYMBOL_POOL.iter().position(|&s| s == c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pools_are_disjoint() {
        for l in LETTER_POOL {
            assert!(symbol_index(l).is_none());
        }
        for s in SYMBOL_POOL {
            assert!(letter_index(s).is_none());
        }
    }

    #[test]
    fn symbol_pool_has_no_duplicates() {
        let mut seen = SYMBOL_POOL.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), SYMBOL_POOL.len());
    }
}
