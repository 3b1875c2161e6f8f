//! # f64-forge-helpers
//!
//! Shortest round-trip conversion between `f64` and decimal text.
//!
//! Formatting runs Grisu2 over 64-bit integer arithmetic to find the shortest
//! digit string that reads back to the same double, then lays those digits
//! out printf-style in fixed (`%f`), scientific (`%e`) or general (`%g`)
//! notation. Parsing accumulates the significant digits of a decimal number
//! and rebuilds the double exactly, taking a fast binary power-of-ten ladder
//! whenever that is exact.
//!
//! ## Performance Philosophy
//!
//! - No floating-point arithmetic in digit generation
//! - Compile-time tables for cached powers of ten and digit pairs
//! - One reusable digit buffer per rendering, caller buffers for hot paths
//! - Typed errors instead of asserts at the edges (NaN, overflow, short buffers)
//!
//! # Example
//!
//! ```rust
//! use f64_forge_helpers::*;
//!
//! // Shortest digits, general style
//! assert_eq!(format_double(123.123, None, FloatStyle::General).unwrap(), "123.123");
//! assert_eq!(format_double(1e-7, None, FloatStyle::General).unwrap(), "1e-07");
//!
//! // Explicit precision
//! assert_eq!(format_double(1234.0, Some(3), FloatStyle::Scientific).unwrap(), "1.234e+03");
//! assert_eq!(format_double(99.99, Some(3), FloatStyle::General).unwrap(), "100");
//!
//! // Into a caller buffer
//! let mut buffer = [0u8; 32];
//! let len = write_f64(&mut buffer, 0, 0.1 + 0.2).unwrap();
//! assert_eq!(&buffer[..len], b"0.30000000000000004");
//!
//! // And back
//! assert_eq!(parse_double("0.30000000000000004"), (0.1 + 0.2, 19));
//! ```

pub mod buffer;
pub mod diagnostics;
pub mod diyfp;
pub mod errors;
pub mod grisu;
mod powers;
pub mod reading;
pub mod writing;

// Re-export all public items for convenience
pub use buffer::*;
pub use diagnostics::*;
pub use diyfp::*;
pub use errors::*;
pub use grisu::*;
pub use reading::*;
pub use writing::*;

// Two ASCII digits per value 0..=99, used for exponents
pub(crate) const DIGIT_PAIRS: &[u8; 200] = &[
    48, 48, 48, 49, 48, 50, 48, 51, 48, 52, 48, 53, 48, 54, 48, 55, 48, 56, 48, 57, 49, 48, 49, 49,
    49, 50, 49, 51, 49, 52, 49, 53, 49, 54, 49, 55, 49, 56, 49, 57, 50, 48, 50, 49, 50, 50, 50, 51,
    50, 52, 50, 53, 50, 54, 50, 55, 50, 56, 50, 57, 51, 48, 51, 49, 51, 50, 51, 51, 51, 52, 51, 53,
    51, 54, 51, 55, 51, 56, 51, 57, 52, 48, 52, 49, 52, 50, 52, 51, 52, 52, 52, 53, 52, 54, 52, 55,
    52, 56, 52, 57, 53, 48, 53, 49, 53, 50, 53, 51, 53, 52, 53, 53, 53, 54, 53, 55, 53, 56, 53, 57,
    54, 48, 54, 49, 54, 50, 54, 51, 54, 52, 54, 53, 54, 54, 54, 55, 54, 56, 54, 57, 55, 48, 55, 49,
    55, 50, 55, 51, 55, 52, 55, 53, 55, 54, 55, 55, 55, 56, 55, 57, 56, 48, 56, 49, 56, 50, 56, 51,
    56, 52, 56, 53, 56, 54, 56, 55, 56, 56, 56, 57, 57, 48, 57, 49, 57, 50, 57, 51, 57, 52, 57, 53,
    57, 54, 57, 55, 57, 56, 57, 57,
];

#[cfg(test)]
mod round_trip_tests {
    use super::*;
    use proptest::prelude::*;

    fn shortest(value: f64) -> String {
        format_double(value, None, FloatStyle::General).unwrap()
    }

    fn assert_round_trip(value: f64) {
        let text = shortest(value);
        let (parsed, consumed) = parse_double(&text);
        assert_eq!(consumed, text.len(), "{text}");
        assert_eq!(parsed.to_bits(), value.to_bits(), "{value:e} -> {text}");
    }

    #[test]
    fn test_digit_pairs() {
        for n in 0..100usize {
            let pair = &DIGIT_PAIRS[n * 2..n * 2 + 2];
            assert_eq!(pair, format!("{n:02}").as_bytes());
        }
    }

    #[test]
    fn test_powers_of_two() {
        for exp in -1074i32..=1023 {
            let bits = if exp >= -1022 {
                ((exp + 1023) as u64) << 52
            } else {
                1u64 << (exp + 1074)
            };
            let value = f64::from_bits(bits);
            assert_round_trip(value);
            assert_round_trip(-value);
        }
    }

    #[test]
    fn test_subnormal_boundaries() {
        assert_round_trip(5e-324);
        assert_round_trip(f64::from_bits(2));
        assert_round_trip(f64::from_bits((1 << 52) - 1));
        assert_round_trip(f64::MIN_POSITIVE);
        assert_round_trip(f64::MAX);
        assert_round_trip(f64::MIN);
    }

    #[test]
    fn test_trailing_zero_mantissa_bits() {
        for shift in 0..52 {
            let bits = (1023u64 << 52) | ((1u64 << 52) - 1) >> shift << shift;
            assert_round_trip(f64::from_bits(bits));
        }
    }

    #[test]
    fn test_signed_zero_round_trip() {
        assert_eq!(shortest(-0.0), "-0");
        assert_round_trip(0.0);
        assert_round_trip(-0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20_000))]

        #[test]
        fn round_trip_any_bits(bits in any::<u64>()) {
            let value = f64::from_bits(bits);
            prop_assume!(value.is_finite());
            let text = shortest(value);
            let (parsed, consumed) = parse_double(&text);
            prop_assert_eq!(consumed, text.len());
            prop_assert_eq!(parsed.to_bits(), value.to_bits());
        }

        #[test]
        fn round_trip_subnormals(bits in 1u64..(1u64 << 52)) {
            let value = f64::from_bits(bits);
            prop_assert_eq!(parse_double(&shortest(value)).0, value);
        }

        #[test]
        fn format_is_idempotent(value in f64::MIN..f64::MAX) {
            let once = shortest(value);
            let twice = shortest(parse_double(&once).0);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn scientific_with_all_digits_round_trips(value in f64::MIN..f64::MAX) {
            let text = format_double(value, Some(16), FloatStyle::Scientific).unwrap();
            prop_assert_eq!(parse_double(&text).0, value);
        }

        #[test]
        fn fixed_natural_round_trips(value in -1e30f64..1e30) {
            let text = format_double(value, None, FloatStyle::Fixed).unwrap();
            prop_assert_eq!(parse_double(&text).0, value);
        }

        #[test]
        fn fixed_places_stay_within_one_unit(value in -1e6f64..1e6) {
            let text = format_double(value, Some(6), FloatStyle::Fixed).unwrap();
            let (parsed, _) = parse_double(&text);
            let dot = text.find('.').unwrap();
            prop_assert_eq!(text.len() - dot - 1, 6);
            prop_assert!((parsed - value).abs() <= 1.000001e-6);
        }

        #[test]
        fn write_matches_format(value in f64::MIN..f64::MAX) {
            let mut buf = [0u8; 32];
            let len = write_f64(&mut buf, 0, value).unwrap();
            let text = shortest(value);
            prop_assert_eq!(&buf[..len], text.as_bytes());
        }
    }
}
