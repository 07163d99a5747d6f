//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on reasonable UX limits for titles, messages and
//! addresses; the database has no built-in length enforcement.

use rust_decimal::Decimal;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Product titles, usernames
pub const MAX_TITLE_LEN: usize = 200;

/// Descriptions, offer messages, rejection/return reasons
pub const MAX_TEXT_LEN: usize = 2000;

/// Short identifiers: mobile numbers, OTP codes, notification types
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Maximum allowed monetary amount (₹10,000,000)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a monetary amount: strictly positive and within bounds.
pub fn validate_amount(value: Decimal, field: &str) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Validate password strength before hashing.
///
/// Requires at least 8 characters with an uppercase letter, a lowercase
/// letter, a digit and a special character.
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let mut errors: Vec<&str> = Vec::new();

    if password.len() < 8 {
        errors.push("at least 8 characters");
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN} chars)"
        )));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("a digit");
    }
    if !password.chars().any(|c| "!@#$%^&*(),.?\":{}|<>".contains(c)) {
        errors.push("a special character");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "password must contain {}",
            errors.join(", ")
        )))
    }
}

/// Validate an Indian-style mobile number: digits only with optional leading
/// '+', 10 to 15 characters.
pub fn validate_mobile(mobile: &str) -> Result<(), AppError> {
    let digits = mobile.strip_prefix('+').unwrap_or(mobile);
    if digits.len() < 10 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "mobile must be a 10-15 digit number".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_empty() {
        assert!(validate_required_text("  ", "title", MAX_TITLE_LEN).is_err());
        assert!(validate_required_text("ok", "title", MAX_TITLE_LEN).is_ok());
    }

    #[test]
    fn test_amount_bounds() {
        assert!(validate_amount(Decimal::new(100, 0), "amount").is_ok());
        assert!(validate_amount(Decimal::ZERO, "amount").is_err());
        assert!(validate_amount(Decimal::new(-5, 0), "amount").is_err());
        assert!(validate_amount(MAX_AMOUNT + Decimal::ONE, "amount").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Secure@123").is_ok());
        assert!(validate_password_strength("short1!").is_err());
        assert!(validate_password_strength("alllowercase1!").is_err());
        assert!(validate_password_strength("NoDigits!!").is_err());
        assert!(validate_password_strength("NoSpecial123").is_err());
    }

    #[test]
    fn test_mobile_format() {
        assert!(validate_mobile("9876543210").is_ok());
        assert!(validate_mobile("+919876543210").is_ok());
        assert!(validate_mobile("12345").is_err());
        assert!(validate_mobile("98765abcde").is_err());
    }
}
