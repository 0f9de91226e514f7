use std::fmt;

/// Money is represented as integer cents so totals never drift.
/// €50.00 = 5000 cents. Transaction amounts and budget limits are never
/// negative; balances and net figures are signed.
pub type Cents = i64;

/// Largest amount a single transaction or budget may carry: one trillion
/// units. Totals still saturate rather than wrap.
pub const MAX_AMOUNT: Cents = 100_000_000_000_000;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Share of `part` in `whole` as a percentage, 0 when `whole` is 0.
pub fn percentage_of(part: Cents, whole: Cents) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Integer average, 0 for an empty set.
pub fn average_cents(total: Cents, count: usize) -> Cents {
    if count == 0 { 0 } else { total / count as i64 }
}

/// Parse a signed decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "-100" -> -10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let digits = input.trim_start_matches('-');
    if digits.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((_, rest)) if rest.contains('.') => return Err(ParseCentsError::InvalidFormat),
        Some((units, decimals)) => (units, decimals),
        None => (digits, ""),
    };

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        parse_digits(units_str)?
    };

    // Anything past two decimal places is truncated
    let decimal_cents = match decimal_str.len() {
        0 => 0,
        1 => parse_digits(decimal_str)? * 10,
        _ => parse_digits(&decimal_str[..2])?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::Overflow)?;
    Ok(if negative { -cents } else { cents })
}

/// Parse an amount that must be in `0..=MAX_AMOUNT` (transaction amounts,
/// limits).
pub fn parse_amount(input: &str) -> Result<Cents, ParseCentsError> {
    let cents = parse_cents(input)?;
    if cents < 0 {
        return Err(ParseCentsError::Negative);
    }
    if cents > MAX_AMOUNT {
        return Err(ParseCentsError::TooLarge);
    }
    Ok(cents)
}

/// True for amounts a transaction or budget may carry.
pub fn is_valid_amount(cents: Cents) -> bool {
    (0..=MAX_AMOUNT).contains(&cents)
}

fn parse_digits(s: &str) -> Result<i64, ParseCentsError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }
    s.parse().map_err(|_| ParseCentsError::Overflow)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Negative,
    Overflow,
    TooLarge,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Negative => write!(f, "amount must not be negative"),
            ParseCentsError::Overflow => write!(f, "amount is too large"),
            ParseCentsError::TooLarge => {
                write!(f, "amount exceeds the maximum of {}", format_cents(MAX_AMOUNT))
            }
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("-50.00"), Ok(-5000));
        assert_eq!(parse_cents("100.999"), Ok(10099)); // Truncates
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("12.34.56").is_err());
        assert!(parse_cents("-").is_err());
        assert!(parse_cents("1.x").is_err());
    }

    #[test]
    fn test_parse_amount_rejects_negative() {
        assert_eq!(parse_amount("12.00"), Ok(1200));
        assert_eq!(parse_amount("-12.00"), Err(ParseCentsError::Negative));
    }

    #[test]
    fn test_parse_amount_upper_bound() {
        assert_eq!(parse_amount("1000000000000"), Ok(MAX_AMOUNT));
        assert_eq!(parse_amount("1000000000000.01"), Err(ParseCentsError::TooLarge));
        assert_eq!(parse_amount("90000000000000000"), Err(ParseCentsError::TooLarge));
        assert!(is_valid_amount(0));
        assert!(!is_valid_amount(-1));
        assert!(!is_valid_amount(MAX_AMOUNT + 1));
    }

    #[test]
    fn test_percentage_and_average() {
        assert_eq!(percentage_of(25, 100), 25.0);
        assert_eq!(percentage_of(25, 0), 0.0);
        assert_eq!(average_cents(300, 2), 150);
        assert_eq!(average_cents(300, 0), 0);
    }
}
