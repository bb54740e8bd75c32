//! The 64-bit encoded exchange rate carried in book page keys.
//!
//! A rate is `taker_pays / taker_gets`: the amount a taker must pay per
//! unit received. The encoding packs an 8-bit biased exponent above a
//! 56-bit mantissa so that the natural ordering of the integer is the
//! ordering of the rate, and ascending key order in a book directory walks
//! offers from the best rate to the worst.

use bigdecimal::{BigDecimal, Signed, ToPrimitive, Zero};
use core::fmt;

const MANTISSA_MASK: u64 = (1 << 56) - 1;
const MIN_MANTISSA: u128 = 1_000_000_000_000_000;
const MAX_MANTISSA: u128 = 10_000_000_000_000_000;
const EXPONENT_BIAS: i64 = 100;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(pub u64);

impl Quality {
    /// The neutral rate: one unit out per unit in.
    pub const ONE: Quality = Quality((85u64 << 56) | 1_000_000_000_000_000);

    /// Encode a positive decimal rate. Returns `None` for zero, negative,
    /// or out-of-range rates.
    pub fn from_big(rate: &BigDecimal) -> Option<Quality> {
        if rate.is_zero() || rate.is_negative() {
            return None;
        }
        let rounded = rate.with_prec(16);
        let (digits, scale) = rounded.as_bigint_and_exponent();
        let mut mantissa = digits.to_u128()?;
        let mut exponent = -scale;
        while mantissa >= MAX_MANTISSA {
            mantissa /= 10;
            exponent += 1;
        }
        while mantissa < MIN_MANTISSA {
            mantissa = mantissa.checked_mul(10)?;
            exponent -= 1;
        }
        let biased = exponent + EXPONENT_BIAS;
        if !(0..=255).contains(&biased) {
            return None;
        }
        let mantissa = mantissa as u64;
        debug_assert!(mantissa & !MANTISSA_MASK == 0);
        Some(Quality(((biased as u64) << 56) | mantissa))
    }

    /// The decoded decimal rate.
    pub fn as_big(&self) -> BigDecimal {
        let mantissa = self.0 & MANTISSA_MASK;
        let exponent = (self.0 >> 56) as i64 - EXPONENT_BIAS;
        BigDecimal::new(mantissa.into(), -exponent)
    }

    /// Whether this rate is at least as good for the taker as `limit`
    /// (numerically less than or equal).
    pub fn within_limit(&self, limit: &Quality) -> bool {
        self.0 <= limit.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_big())
    }
}

impl fmt::Debug for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quality({:#018X} = {})", self.0, self.as_big())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn rate(s: &str) -> Quality {
        Quality::from_big(&BigDecimal::from_str(s).unwrap()).unwrap()
    }

    #[test]
    fn test_one() {
        assert_eq!(rate("1"), Quality::ONE);
        assert_eq!(Quality::ONE.as_big(), BigDecimal::from(1u32));
    }

    #[test]
    fn test_ordering_matches_rate() {
        assert!(rate("0.1") < rate("1"));
        assert!(rate("1") < rate("10"));
        assert!(rate("0.099999") < rate("0.1"));
        assert!(rate("123456789").0 > rate("1.5").0);
    }

    #[test]
    fn test_roundtrip() {
        for s in ["0.25", "3", "1000000", "0.000001", "1.5"] {
            let q = rate(s);
            assert_eq!(q.as_big(), BigDecimal::from_str(s).unwrap());
        }
    }

    #[test]
    fn test_rejects_nonpositive() {
        assert!(Quality::from_big(&BigDecimal::zero()).is_none());
        assert!(Quality::from_big(&BigDecimal::from(-3)).is_none());
    }
}
