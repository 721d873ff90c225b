//! Amount Normalization
//!
//! Turns a human-entered price such as `"19.99"` into the integer count of
//! minor currency units the processor expects.
//!
//! Parsing is a prefix scan: leading whitespace is skipped, the longest
//! decimal token is taken, and anything after it is ignored, so `"19.99USD"`
//! is read as `19.99`. An exponent marker belongs to the number, so `"12e"`
//! with no exponent digits is rejected rather than read as `12`. Fractional
//! minor units are truncated toward zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use stripe::Currency;

use crate::error::{PaymentError, Result};

/// Currencies Stripe treats as having no minor unit
const ZERO_DECIMAL: &[Currency] = &[
    Currency::BIF,
    Currency::CLP,
    Currency::DJF,
    Currency::GNF,
    Currency::ISK,
    Currency::JPY,
    Currency::KMF,
    Currency::KRW,
    Currency::MGA,
    Currency::PYG,
    Currency::RWF,
    Currency::UGX,
    Currency::VND,
    Currency::VUV,
    Currency::XAF,
    Currency::XOF,
    Currency::XPF,
];

/// `Decimal` holds at most 28 significant digits, so larger exponents overflow.
const MAX_POSITIVE_EXPONENT: i64 = 28;

/// Beyond this many divisions by ten every amount truncates to zero.
const MAX_NEGATIVE_EXPONENT: u64 = 40;

/// Normalize a price to minor units at the USD scale (cents).
pub fn normalize(price: &str) -> Result<i64> {
    normalize_in(price, Currency::USD)
}

/// Normalize a price to minor units of `currency`.
pub fn normalize_in(price: &str, currency: Currency) -> Result<i64> {
    let value = parse_leading(price)?;
    let scale = Decimal::from(10_i64.pow(minor_unit_exponent(currency)));

    value
        .checked_mul(scale)
        .map(|scaled| scaled.trunc())
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| PaymentError::InvalidAmount(format!("price {price:?} is out of range")))
}

/// Number of minor-unit digits for a currency.
pub fn minor_unit_exponent(currency: Currency) -> u32 {
    if ZERO_DECIMAL.contains(&currency) { 0 } else { 2 }
}

/// Parse the leading decimal token of `input`.
pub fn parse_leading(input: &str) -> Result<Decimal> {
    let token = scan_token(input)
        .ok_or_else(|| PaymentError::InvalidAmount(format!("invalid price format: {input:?}")))?;

    let mantissa = format!(
        "{}{}.{}",
        if token.negative { "-" } else { "" },
        if token.integer.is_empty() { "0" } else { token.integer },
        if token.fraction.is_empty() { "0" } else { token.fraction },
    );
    let mut value = mantissa
        .parse::<Decimal>()
        .map_err(|e| PaymentError::InvalidAmount(format!("invalid price format: {e}")))?;

    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if token.exponent > MAX_POSITIVE_EXPONENT {
        return Err(PaymentError::InvalidAmount(format!("price {input:?} is out of range")));
    }

    if token.exponent > 0 {
        for _ in 0..token.exponent {
            value = value.checked_mul(Decimal::TEN).ok_or_else(|| {
                PaymentError::InvalidAmount(format!("price {input:?} is out of range"))
            })?;
        }
    } else {
        for _ in 0..token.exponent.unsigned_abs().min(MAX_NEGATIVE_EXPONENT) {
            value /= Decimal::TEN;
        }
    }

    Ok(value)
}

/// Pieces of a scanned decimal token, borrowed from the input
#[derive(Debug, PartialEq, Eq)]
struct Token<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
    exponent: i64,
}

fn scan_token(input: &str) -> Option<Token<'_>> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    pos += count_digits(&bytes[pos..]);
    let integer = &s[int_start..pos];

    let mut fraction = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let frac_len = count_digits(&bytes[frac_start..]);
        fraction = &s[frac_start..frac_start + frac_len];
        pos = frac_start + frac_len;
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut exponent = 0_i64;
    match bytes.get(pos) {
        // Binary exponents only exist for hex floats.
        Some(b'p' | b'P') => return None,
        Some(b'e' | b'E') => {
            let mut exp_pos = pos + 1;
            let exp_negative = match bytes.get(exp_pos) {
                Some(b'-') => {
                    exp_pos += 1;
                    true
                }
                Some(b'+') => {
                    exp_pos += 1;
                    false
                }
                _ => false,
            };
            let exp_len = count_digits(&bytes[exp_pos..]);
            if exp_len == 0 {
                return None;
            }
            let magnitude = s[exp_pos..exp_pos + exp_len]
                .parse::<i64>()
                .unwrap_or(i64::MAX);
            exponent = if exp_negative { -magnitude } else { magnitude };
        }
        _ => {}
    }

    Some(Token {
        negative,
        integer,
        fraction,
        exponent,
    })
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
