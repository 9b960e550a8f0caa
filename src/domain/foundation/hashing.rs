//! Stable string hashing for deterministic pseudo-observations.

/// 31-multiplier polynomial hash over UTF-16 code units, folded to a
/// non-negative 32-bit value.
///
/// Stable across runs and platforms, unlike `std::hash`.
pub fn stable_hash(input: &str) -> u32 {
    let hash = input
        .encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_hashes_to_zero() {
        assert_eq!(stable_hash(""), 0);
    }

    #[test]
    fn hash_matches_polynomial() {
        // 'a' = 97, 'b' = 98 -> 97 * 31 + 98
        assert_eq!(stable_hash("ab"), 3105);
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(stable_hash("Option Acost"), stable_hash("Option Acost"));
        assert_ne!(stable_hash("Acost"), stable_hash("Bcost"));
    }

    #[test]
    fn overflow_wraps_without_panicking() {
        let long = "performance-under-load".repeat(50);
        let _ = stable_hash(&long);
    }
}
