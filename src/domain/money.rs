use thiserror::Error;

/// Money is represented as integer cents to avoid floating-point drift in totals.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as locale-independent decimal text.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse decimal text into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "10.0" -> 1000
///
/// Scientific notation as printed for large or tiny floating-point amounts is
/// accepted too: "1.2E7" -> 1200000000, "1.0E-4" -> 0.
///
/// Digits past the second decimal place are truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let invalid = || ParseCentsError::InvalidFormat(input.to_string());
    let out_of_range = || ParseCentsError::OutOfRange(input.to_string());

    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    if digits.is_empty() {
        return Err(ParseCentsError::Empty);
    }

    let (mantissa, exponent) = match digits.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, parse_exponent(exponent).ok_or_else(invalid)?),
        None => (digits, 0),
    };

    let (units_str, decimal_str) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(invalid());
    }
    if !units_str.bytes().all(|b| b.is_ascii_digit())
        || !decimal_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let mantissa_digits = units_str.bytes().chain(decimal_str.bytes());
    if mantissa_digits.clone().all(|b| b == b'0') {
        return Ok(0);
    }

    // Digits in front of the decimal point once it is moved by the exponent,
    // plus two for the cents.
    let width = i64::try_from(units_str.len())
        .map_err(|_| out_of_range())?
        .saturating_add(exponent)
        .saturating_add(2);
    if width <= 0 {
        return Ok(0);
    }
    let width = usize::try_from(width).map_err(|_| out_of_range())?;

    let mut cents: Cents = 0;
    for digit in mantissa_digits.chain(std::iter::repeat(b'0')).take(width) {
        cents = cents
            .checked_mul(10)
            .and_then(|c| c.checked_add(i64::from(digit - b'0')))
            .ok_or_else(out_of_range)?;
    }

    Ok(if negative { -cents } else { cents })
}

/// Exponent part of scientific notation: optional sign, then at least one digit.
fn parse_exponent(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("empty amount")]
    Empty,

    #[error("invalid money format: '{0}'")]
    InvalidFormat(String),

    #[error("amount out of range: '{0}'")]
    OutOfRange(String),
}
