//! Amortized growth policy for appends.

/// Capacity to grow to so that at least `required` slots are available.
///
/// Doubles `current` (starting from 1 when it is zero) until the result
/// covers `required`. Returns `current` unchanged when it already
/// suffices. If doubling would overflow `usize`, falls back to exactly
/// `required`.
///
/// ```
/// use ravel_array::next_capacity;
///
/// assert_eq!(next_capacity(0, 1), 1);
/// assert_eq!(next_capacity(4, 5), 8);
/// assert_eq!(next_capacity(0, 5), 8);
/// assert_eq!(next_capacity(16, 3), 16);
/// ```
pub fn next_capacity(current: usize, required: usize) -> usize {
    if required <= current {
        return current;
    }
    let mut capacity = current.max(1);
    while capacity < required {
        match capacity.checked_mul(2) {
            Some(doubled) => capacity = doubled,
            None => return required,
        }
    }
    capacity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one_from_empty() {
        assert_eq!(next_capacity(0, 1), 1);
    }

    #[test]
    fn empty_progression_is_powers_of_two() {
        let mut capacity = 0;
        let mut seen = Vec::new();
        for required in 1..=33 {
            let next = next_capacity(capacity, required);
            if next != capacity {
                seen.push(next);
                capacity = next;
            }
        }
        assert_eq!(seen, [1, 2, 4, 8, 16, 32, 64]);
    }

    #[test]
    fn doubles_from_non_power_of_two() {
        // After an exact resize to 3 slots, growth keeps doubling from 3.
        assert_eq!(next_capacity(3, 4), 6);
        assert_eq!(next_capacity(3, 7), 12);
    }

    #[test]
    fn sufficient_capacity_is_unchanged() {
        assert_eq!(next_capacity(8, 8), 8);
        assert_eq!(next_capacity(8, 0), 8);
        assert_eq!(next_capacity(0, 0), 0);
    }

    #[test]
    fn overflow_falls_back_to_exact() {
        let big = usize::MAX / 2 + 2;
        assert_eq!(next_capacity(big - 1, big), big);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn result_covers_required_without_overshooting(
                current in 0usize..1 << 20,
                required in 0usize..1 << 21,
            ) {
                let next = next_capacity(current, required);
                prop_assert!(next >= required);
                prop_assert!(next >= current);
                if required > current {
                    // Never more than one doubling past what was needed.
                    prop_assert!(next < required.max(1) * 2 || next == current.max(1));
                }
            }
        }
    }
}
