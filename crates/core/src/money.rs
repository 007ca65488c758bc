use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// A signed amount held at exactly two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        let mut value = decimal.round_dp(2);
        value.rescale(2);
        if value.is_zero() {
            value.set_sign_positive(true);
        }
        Money(value)
    }

    pub fn zero() -> Self {
        Money::from_cents(0)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn transaction_type(self) -> TransactionType {
        if self.0 >= Decimal::ZERO {
            TransactionType::Credit
        } else {
            TransactionType::Debit
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Serialized the way it is displayed, e.g. `-12.50`.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Saturates at the edges of `Decimal` rather than panicking.
impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money::from_decimal(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money::from_decimal(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self {
        Money::from_decimal(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |a, b| a + b)
    }
}

/// Direction label expected by the import format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Credit => write!(f, "credit"),
            TransactionType::Debit => write!(f, "debit"),
        }
    }
}

/// Best-effort parse of a register money string such as `$1,234.56` or
/// `(12.00)`. Anything unparseable becomes zero; this never fails.
pub fn parse_money(text: &str) -> Money {
    let text = text.trim();
    let (negative, text) = match text.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, text),
    };
    let cleaned = text.replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Money::zero();
    }

    let amount = parse_decimal(cleaned)
        .or_else(|| out_of_range_exponent(cleaned))
        .or_else(|| {
            let salvaged: String = cleaned
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            parse_decimal(&salvaged)
        })
        .unwrap_or(Decimal::ZERO);

    let money = Money::from_decimal(amount);
    if negative {
        -money
    } else {
        money
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Digits before the point in `Decimal::MAX`.
const MAX_INTEGER_DIGITS: i64 = 29;

/// Well-formed exponent notation that `Decimal` cannot hold. Magnitudes past
/// its range saturate, anything else becomes zero. Not exponent form ⇒ `None`.
fn out_of_range_exponent(s: &str) -> Option<Decimal> {
    let (mantissa, exponent) = s.split_once(['e', 'E'])?;
    let exponent_digits = exponent
        .strip_prefix(['+', '-'])
        .unwrap_or(exponent);
    if !all_digits(exponent_digits) {
        return None;
    }

    let (negative, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !(whole.is_empty() || all_digits(whole)) || !(fraction.is_empty() || all_digits(fraction)) {
        return None;
    }

    let significant = whole.trim_start_matches('0').len();
    let leading_fraction_zeros = fraction.len() - fraction.trim_start_matches('0').len();
    if significant == 0 && leading_fraction_zeros == fraction.len() {
        return Some(Decimal::ZERO);
    }

    let magnitude = i64::from(exponent_digits.parse::<u32>().unwrap_or(u32::MAX));
    let shift = if exponent.starts_with('-') { -magnitude } else { magnitude };
    let integer_digits = if significant > 0 {
        significant as i64 + shift
    } else {
        shift - leading_fraction_zeros as i64
    };
    Some(match (integer_digits >= MAX_INTEGER_DIGITS, negative) {
        (false, _) => Decimal::ZERO,
        (true, false) => Decimal::MAX,
        (true, true) => Decimal::MIN,
    })
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
