//! # Validation Module
//!
//! Parsing of what the user types into count and amount fields.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                     │
//! │  └── Raw text from count / amount inputs                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Blank count → 0                                                    │
//! │  ├── Counts: whole, non-negative, bounded                               │
//! │  └── Amounts: at most two decimals → integer cents                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Drawer setters                                                │
//! │  └── Kind exists, roll values positive                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use drawer_core::validation::{parse_amount, parse_count};
//!
//! assert_eq!(parse_count("quarter", " 12 ").unwrap(), 12);
//! assert_eq!(parse_count("quarter", "").unwrap(), 0);
//! assert_eq!(parse_amount("target", "$120.5").unwrap().cents(), 12050);
//! assert!(parse_amount("target", "1.005").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_PIECE_COUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Counts
// =============================================================================

/// Parses a piece count. Blank input means zero.
pub fn parse_count(field: &str, input: &str) -> ValidationResult<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0);
    }

    if let Ok(count) = input.parse::<i64>() {
        validate_count(field, count)?;
        return Ok(count);
    }

    // Distinguish "2.5" from "abc" so the message is useful.
    if parse_amount_unsigned(input).is_some() {
        return Err(ValidationError::NotAnInteger {
            field: field.to_string(),
        });
    }
    if input.starts_with('-') {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Err(ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{input}' is not a number"),
    })
}

/// Validates a piece count already held as an integer.
pub fn validate_count(field: &str, count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    if count > MAX_PIECE_COUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PIECE_COUNT,
        });
    }
    Ok(())
}

// =============================================================================
// Amounts
// =============================================================================

/// Parses a dollar amount such as `100`, `$99.5` or `.25` into cents.
///
/// ## Rules
/// - Must not be blank
/// - Optional leading `$`
/// - At most two digits after the decimal point
/// - Never negative
pub fn parse_amount(field: &str, input: &str) -> ValidationResult<Money> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
    if unsigned.starts_with('-') {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    let cents = parse_amount_unsigned(unsigned).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{trimmed}' is not an amount with at most two decimals"),
    })?;

    let amount = Money::from_cents(cents);
    validate_amount(field, amount)?;
    Ok(amount)
}

/// Validates a non-negative amount.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }
    Ok(())
}

/// Validates a strictly positive amount (roll values, face values).
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    validate_amount(field, amount)?;
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// `digits[.d[d]]` → cents, or `None` on any other shape or overflow.
fn parse_amount_unsigned(input: &str) -> Option<i64> {
    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if frac.len() > 2 {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let dollars: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };

    dollars.checked_mul(100)?.checked_add(cents)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_valid() {
        assert_eq!(parse_count("dime", "0"), Ok(0));
        assert_eq!(parse_count("dime", "  7"), Ok(7));
        assert_eq!(parse_count("dime", ""), Ok(0));
        assert_eq!(parse_count("dime", "   "), Ok(0));
    }

    #[test]
    fn test_parse_count_rejects() {
        assert!(matches!(
            parse_count("dime", "-1"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            parse_count("dime", "2.5"),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert!(matches!(
            parse_count("dime", "abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_count("dime", "-2.5"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            parse_count("dime", &(MAX_PIECE_COUNT + 1).to_string()),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_amount_valid() {
        assert_eq!(parse_amount("t", "100").unwrap().cents(), 10000);
        assert_eq!(parse_amount("t", "100.00").unwrap().cents(), 10000);
        assert_eq!(parse_amount("t", "99.5").unwrap().cents(), 9950);
        assert_eq!(parse_amount("t", "$0.03").unwrap().cents(), 3);
        assert_eq!(parse_amount("t", ".25").unwrap().cents(), 25);
        assert_eq!(parse_amount("t", "10.").unwrap().cents(), 1000);
    }

    #[test]
    fn test_parse_amount_rejects() {
        assert!(matches!(
            parse_amount("t", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_amount("t", "-5"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            parse_amount("t", "1.005"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount("t", "1e3"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount("t", "."),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(parse_amount("t", "99999999999999999999").is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount("roll", Money::from_cents(50)).is_ok());
        assert!(matches!(
            validate_positive_amount("roll", Money::zero()),
            Err(ValidationError::MustBePositive { .. })
        ));
    }
}
