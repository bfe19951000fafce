use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

/// An exact-decimal number value.
///
/// The original literal text is preserved alongside the parsed numeric value
/// so that select expressions can match on the exact decimal form a
/// translator wrote (`[1.5]` matches the value `1.5`), and so that plural
/// rules can see visible fraction digits (`1.0` is not the same plural
/// operand as `1` in many locales).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Number {
    raw: String,
    value: f64,
}

impl Number {
    /// Parse a number from its canonical text form: `-? digits (. digits)?`.
    ///
    /// Returns `None` if the text is not a valid number literal.
    pub fn parse(raw: &str) -> Option<Number> {
        let unsigned = raw.strip_prefix('-').unwrap_or(raw);
        let (int, frac) = match unsigned.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (unsigned, None),
        };
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int) || !frac.is_none_or(all_digits) {
            return None;
        }
        let value = raw.parse().ok()?;
        Some(Number {
            raw: raw.to_string(),
            value,
        })
    }

    /// The original text of the number, e.g. `"-0.50"`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The value as an integer, if it has no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        (self.value.fract() == 0.0).then_some(self.value as i64)
    }

    /// The number of visible fraction digits in the literal text.
    pub fn fraction_digits(&self) -> usize {
        self.raw.split_once('.').map_or(0, |(_, frac)| frac.len())
    }

    /// Exact-decimal match against another number.
    ///
    /// Two numbers match when their literal texts are identical or their
    /// numeric values are equal, so `[1.0]` matches the value `1`.
    pub fn matches(&self, other: &Number) -> bool {
        self.raw == other.raw || self.value == other.value
    }

    /// Pad the literal with trailing zeros up to `digits` fraction digits.
    ///
    /// Used by the NUMBER function's `minimumFractionDigits` option. Padding
    /// affects both display and plural-operand computation.
    pub fn with_minimum_fraction_digits(&self, digits: usize) -> Number {
        let current = self.fraction_digits();
        if current >= digits {
            return self.clone();
        }
        let mut raw = self.raw.clone();
        if current == 0 {
            raw.push('.');
        }
        for _ in current..digits {
            raw.push('0');
        }
        Number {
            raw,
            value: self.value,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.raw)
    }
}

macro_rules! number_from_int {
    ($($t:ty),+) => {
        $(impl From<$t> for Number {
            fn from(n: $t) -> Self {
                Number { raw: n.to_string(), value: n as f64 }
            }
        })+
    };
}

number_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number {
            raw: n.to_string(),
            value: n,
        }
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::from(f64::from(n))
    }
}

#[cfg(test)]
mod tests {
    use super::Number;

    #[test]
    fn parses_integers_and_decimals() {
        assert_eq!(Number::parse("3").unwrap().value(), 3.0);
        assert_eq!(Number::parse("-0.5").unwrap().value(), -0.5);
        assert_eq!(Number::parse("10.25").unwrap().raw(), "10.25");
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(Number::parse("").is_none());
        assert!(Number::parse("-").is_none());
        assert!(Number::parse("1.").is_none());
        assert!(Number::parse(".5").is_none());
        assert!(Number::parse("1e3").is_none());
        assert!(Number::parse("--1").is_none());
    }

    #[test]
    fn exact_match_ignores_formatting() {
        let one = Number::parse("1").unwrap();
        let one_point_zero = Number::parse("1.0").unwrap();
        assert!(one.matches(&one_point_zero));
        assert!(!one.matches(&Number::parse("2").unwrap()));
    }

    #[test]
    fn minimum_fraction_digits_pads_with_zeros() {
        let n = Number::parse("2").unwrap();
        assert_eq!(n.with_minimum_fraction_digits(2).raw(), "2.00");
        let n = Number::parse("2.5").unwrap();
        assert_eq!(n.with_minimum_fraction_digits(2).raw(), "2.50");
        assert_eq!(n.with_minimum_fraction_digits(1).raw(), "2.5");
    }

    #[test]
    fn display_preserves_literal_text() {
        assert_eq!(Number::parse("-0.50").unwrap().to_string(), "-0.50");
        assert_eq!(Number::from(42).to_string(), "42");
    }
}
