//! Address-width computation for addressable buffers and memories.

/// Returns the number of address bits needed to address `num_values` words.
///
/// This is `max(1, ceil(log2(num_values)))`; zero, one and two values all
/// need a single address bit.
pub fn address_width(num_values: usize) -> u32 {
    if num_values <= 2 {
        1
    } else {
        usize::BITS - (num_values - 1).leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_counts_need_one_bit() {
        assert_eq!(address_width(0), 1);
        assert_eq!(address_width(1), 1);
        assert_eq!(address_width(2), 1);
    }

    #[test]
    fn powers_of_two_are_exact() {
        assert_eq!(address_width(4), 2);
        assert_eq!(address_width(8), 3);
        assert_eq!(address_width(1024), 10);
    }

    #[test]
    fn non_powers_round_up() {
        assert_eq!(address_width(3), 2);
        assert_eq!(address_width(5), 3);
        assert_eq!(address_width(6), 3);
        assert_eq!(address_width(9), 4);
    }

    #[test]
    fn matches_ceil_log2() {
        for n in 3..2000usize {
            let expected = (n as f64).log2().ceil() as u32;
            assert_eq!(address_width(n), expected, "n = {n}");
        }
    }
}
