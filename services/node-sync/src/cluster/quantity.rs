//! Integer values of node capacity and allocatable quantities.
//!
//! `k8s-openapi` carries quantities as raw strings. They are decimal numbers
//! with an optional suffix: binary (`Ki`, `Mi`, `Gi`, `Ti`, `Pi`, `Ei`),
//! decimal (`n`, `u`, `m`, `k`, `M`, `G`, `T`, `P`, `E`) or an exponent
//! (`e3`, `E-2`). Values are kept as an exact fraction
//! and rounded up when converted to integers.

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use thiserror::Error;

/// Errors that can occur when parsing a quantity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity cannot be empty")]
    Empty,

    #[error("invalid quantity '{0}'")]
    Invalid(String),

    #[error("quantity '{0}' is out of range")]
    Overflow(String),
}

/// Integer conversions of a [`Quantity`].
pub trait QuantityExt {
    /// Value in milli-units, rounded up (`"2"` is 2000, `"250m"` is 250).
    fn milli_value(&self) -> Result<i64, QuantityError>;

    /// Value in whole units, rounded up (`"4096Mi"` is 4294967296).
    fn value(&self) -> Result<i64, QuantityError>;
}

impl QuantityExt for Quantity {
    fn milli_value(&self) -> Result<i64, QuantityError> {
        let (num, den) = parse(&self.0)?;
        let num = num
            .checked_mul(1000)
            .ok_or_else(|| QuantityError::Overflow(self.0.clone()))?;
        to_i64(ceil_div(num, den), &self.0)
    }

    fn value(&self) -> Result<i64, QuantityError> {
        let (num, den) = parse(&self.0)?;
        to_i64(ceil_div(num, den), &self.0)
    }
}

/// Parses a quantity into an exact fraction `num / den` with `den > 0`.
fn parse(raw: &str) -> Result<(i128, i128), QuantityError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(QuantityError::Empty);
    }
    let invalid = || QuantityError::Invalid(raw.to_string());
    let overflow = || QuantityError::Overflow(raw.to_string());

    let (negative, rest) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let number_len = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let (number, suffix) = rest.split_at(number_len);

    let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }

    let mut num: i128 = 0;
    for digit in int_part.bytes().chain(frac_part.bytes()) {
        if !digit.is_ascii_digit() {
            return Err(invalid());
        }
        num = num
            .checked_mul(10)
            .and_then(|n| n.checked_add(i128::from(digit - b'0')))
            .ok_or_else(overflow)?;
    }
    let mut den: i128 = pow10(frac_part.len() as u32).ok_or_else(overflow)?;

    match parse_suffix(suffix).ok_or_else(invalid)? {
        Scale::Binary(shift) => {
            num = num.checked_mul(1i128 << shift).ok_or_else(overflow)?;
        }
        Scale::Decimal(exp) if exp >= 0 => {
            let factor = pow10(exp as u32).ok_or_else(overflow)?;
            num = num.checked_mul(factor).ok_or_else(overflow)?;
        }
        Scale::Decimal(exp) => {
            let factor = pow10(exp.unsigned_abs()).ok_or_else(overflow)?;
            den = den.checked_mul(factor).ok_or_else(overflow)?;
        }
    }

    if negative {
        num = -num;
    }
    Ok((num, den))
}

enum Scale {
    /// Multiply by `2^shift`.
    Binary(u32),
    /// Multiply by `10^exp`.
    Decimal(i32),
}

fn parse_suffix(suffix: &str) -> Option<Scale> {
    let scale = match suffix {
        "" => Scale::Decimal(0),
        "Ki" => Scale::Binary(10),
        "Mi" => Scale::Binary(20),
        "Gi" => Scale::Binary(30),
        "Ti" => Scale::Binary(40),
        "Pi" => Scale::Binary(50),
        "Ei" => Scale::Binary(60),
        "n" => Scale::Decimal(-9),
        "u" => Scale::Decimal(-6),
        "m" => Scale::Decimal(-3),
        "k" => Scale::Decimal(3),
        "M" => Scale::Decimal(6),
        "G" => Scale::Decimal(9),
        "T" => Scale::Decimal(12),
        "P" => Scale::Decimal(15),
        "E" => Scale::Decimal(18),
        _ => {
            let exp = suffix
                .strip_prefix('e')
                .or_else(|| suffix.strip_prefix('E'))?;
            if exp.is_empty() {
                return None;
            }
            Scale::Decimal(exp.parse().ok()?)
        }
    };
    Some(scale)
}

fn pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}

fn ceil_div(num: i128, den: i128) -> i128 {
    let quotient = num / den;
    if num % den > 0 {
        quotient + 1
    } else {
        quotient
    }
}

fn to_i64(value: i128, raw: &str) -> Result<i64, QuantityError> {
    i64::try_from(value).map_err(|_| QuantityError::Overflow(raw.to_string()))
}
