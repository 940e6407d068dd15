//! # Bits — Binary Digit Decomposition
//!
//! Expands a non-negative integer into its sequence of binary digits. Every
//! binary-chain algorithm in this crate (square-and-multiply exponentiation,
//! matrix power, fast doubling) walks such a sequence, and each one depends on
//! a specific digit order. Getting the order wrong does not crash anything: the
//! loop still terminates and still produces a number, just the wrong one. The
//! order is therefore part of the contract, not a private detail.

/// Digit order of a binary expansion.
///
/// `LsbFirst` puts bit 0 of `n` at index 0 of the output. `MsbFirst` reverses,
/// which is what the squaring chains want (process the leading bit first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    LsbFirst,
    MsbFirst,
}

/// Decompose `n` into binary digits in the requested order.
///
/// `n = 0` yields an empty sequence: zero has no significant bits, and the
/// callers' loops are all defined over significant bits only.
pub fn bit_decompose(n: u64, order: BitOrder) -> Vec<bool> {
    let mut digits = Vec::with_capacity(64 - n.leading_zeros() as usize);
    let mut rest = n;
    while rest > 0 {
        digits.push(rest & 1 == 1);
        rest >>= 1;
    }
    if order == BitOrder::MsbFirst {
        digits.reverse();
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Zero has no significant bits, so both orders yield an empty sequence.
    #[test]
    fn zero_decomposes_to_empty() {
        assert!(bit_decompose(0, BitOrder::LsbFirst).is_empty());
        assert!(bit_decompose(0, BitOrder::MsbFirst).is_empty());
    }

    /// 6 = 110 in binary: lsb-first [0,1,1], msb-first [1,1,0].
    #[test]
    fn six_in_both_orders() {
        assert_eq!(bit_decompose(6, BitOrder::LsbFirst), vec![false, true, true]);
        assert_eq!(bit_decompose(6, BitOrder::MsbFirst), vec![true, true, false]);
    }

    /// The two orders are exact reverses of each other for every input.
    #[test]
    fn orders_are_reverses() {
        for n in [1u64, 2, 3, 7, 8, 100, 255, 256, 1023, u64::MAX] {
            let mut lsb = bit_decompose(n, BitOrder::LsbFirst);
            let msb = bit_decompose(n, BitOrder::MsbFirst);
            lsb.reverse();
            assert_eq!(lsb, msb, "orders disagree for n={}", n);
        }
    }

    /// Reassembling the lsb-first digits as sum of 2^i recovers n.
    #[test]
    fn decomposition_reassembles() {
        for n in [0u64, 1, 2, 5, 24, 97, 1024, 123_456_789] {
            let digits = bit_decompose(n, BitOrder::LsbFirst);
            let back: u64 = digits
                .iter()
                .enumerate()
                .map(|(i, &bit)| if bit { 1u64 << i } else { 0 })
                .sum();
            assert_eq!(back, n);
        }
    }

    /// The msb-first sequence of a nonzero value always starts with 1: the
    /// leading digit of a significant-bit expansion is set by definition.
    /// The doubling chains rely on this when they skip the leading bit.
    #[test]
    fn msb_first_leading_digit_is_one() {
        for n in 1u64..=64 {
            let digits = bit_decompose(n, BitOrder::MsbFirst);
            assert!(digits[0], "leading digit not set for n={}", n);
        }
    }

    /// Length equals the number of significant bits.
    #[test]
    fn length_is_significant_bits() {
        assert_eq!(bit_decompose(1, BitOrder::LsbFirst).len(), 1);
        assert_eq!(bit_decompose(2, BitOrder::LsbFirst).len(), 2);
        assert_eq!(bit_decompose(255, BitOrder::LsbFirst).len(), 8);
        assert_eq!(bit_decompose(256, BitOrder::LsbFirst).len(), 9);
        assert_eq!(bit_decompose(u64::MAX, BitOrder::LsbFirst).len(), 64);
    }
}
