//! Duration literals such as `300ms`, `1.5h` or `2h45m`.
//!
//! A literal is one or more `<magnitude><unit>` groups. The magnitude is a
//! decimal number with an optional fraction; the unit is one of `ns`, `us`
//! (or `µs`/`μs`), `ms`, `s`, `m`, `h`. An optional leading `+` is accepted,
//! and the bare literal `0` needs no unit. Negative values are rejected since
//! [`Duration`] cannot represent them.

use std::time::Duration;

use crate::error::CoerceError;

const UNITS: &[(&str, u64)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
];

/// Fraction digits beyond this are ignored; they are below nanosecond precision.
const MAX_FRACTION_DIGITS: usize = 18;

/// Parse a duration literal.
pub fn parse_duration(literal: &str) -> Result<Duration, CoerceError> {
    let invalid = |reason: &str| CoerceError::InvalidDuration {
        value: literal.to_string(),
        reason: reason.to_string(),
    };

    let (negative, mut rest) = if let Some(tail) = literal.strip_prefix('-') {
        (true, tail)
    } else if let Some(tail) = literal.strip_prefix('+') {
        (false, tail)
    } else {
        (false, literal)
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid("empty literal"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after) = rest.split_at(int_len);
        let (frac_digits, after) = match after.strip_prefix('.') {
            Some(tail) => {
                let frac_len = tail.bytes().take_while(u8::is_ascii_digit).count();
                tail.split_at(frac_len)
            }
            None => ("", after),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid("expected a number"));
        }

        let unit_len = after
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after.len());
        let (unit, tail) = after.split_at(unit_len);
        if unit.is_empty() {
            return Err(invalid("missing unit"));
        }
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, nanos)| u128::from(*nanos))
            .ok_or_else(|| invalid(&format!("unknown unit '{unit}'")))?;

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| invalid("out of range"))?
        };
        let frac_digits = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)];
        let fraction = if frac_digits.is_empty() {
            0
        } else {
            let digits: u128 = frac_digits.parse().map_err(|_| invalid("out of range"))?;
            digits * scale / 10u128.pow(frac_digits.len() as u32)
        };

        total = whole
            .checked_mul(scale)
            .and_then(|n| n.checked_add(fraction))
            .and_then(|n| n.checked_add(total))
            .ok_or_else(|| invalid("out of range"))?;
        rest = tail;
    }

    if negative && total > 0 {
        return Err(invalid("negative durations are not supported"));
    }
    let nanos = u64::try_from(total).map_err(|_| invalid("out of range"))?;
    Ok(Duration::from_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn single_unit() {
        assert_eq!(parse_duration("5s").unwrap(), secs(5));
        assert_eq!(parse_duration("3m").unwrap(), secs(180));
        assert_eq!(parse_duration("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_duration("7us").unwrap(), Duration::from_micros(7));
        assert_eq!(parse_duration("7µs").unwrap(), Duration::from_micros(7));
        assert_eq!(parse_duration("12ns").unwrap(), Duration::from_nanos(12));
    }

    #[test]
    fn compound_literal() {
        assert_eq!(parse_duration("2h30m").unwrap(), secs(9000));
        assert_eq!(parse_duration("1h1m1s").unwrap(), secs(3661));
    }

    #[test]
    fn fractional_magnitude() {
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration(".5m").unwrap(), secs(30));
        assert_eq!(parse_duration("1.5h").unwrap(), secs(5400));
    }

    #[test]
    fn bare_zero_needs_no_unit() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn leading_plus_accepted() {
        assert_eq!(parse_duration("+10s").unwrap(), secs(10));
    }

    #[test]
    fn missing_unit_rejected() {
        let err = parse_duration("5").unwrap_err();
        assert!(matches!(err, CoerceError::InvalidDuration { .. }));
        assert!(err.to_string().contains("missing unit"));
    }

    #[test]
    fn unknown_unit_rejected() {
        let err = parse_duration("5d").unwrap_err();
        assert!(err.to_string().contains("unknown unit 'd'"));
    }

    #[test]
    fn garbage_rejected() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("1h-5m").is_err());
    }

    #[test]
    fn negative_rejected() {
        let err = parse_duration("-5s").unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn overflow_rejected() {
        assert!(parse_duration("99999999999999999999999h").is_err());
    }
}
