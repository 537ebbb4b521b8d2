//! Common validation utilities.

use validator::ValidationError;

/// Validates that a commission rate is a percentage in (0, 100].
pub fn validate_commission_rate(rate: f64) -> Result<(), ValidationError> {
    if rate > 0.0 && rate <= 100.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("commission_rate_range");
        err.message = Some("Commission rate must be between 0 and 100".into());
        Err(err)
    }
}

/// Validates that a monetary amount in cents is positive.
pub fn validate_amount_cents(amount: i64) -> Result<(), ValidationError> {
    if amount > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount_range");
        err.message = Some("Amount must be positive".into());
        Err(err)
    }
}

/// Validates password strength: at least 8 characters with one uppercase,
/// one lowercase, and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.len() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "Password must be at least 8 characters with one uppercase letter, one lowercase letter, and one digit"
                .into(),
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_rate_valid() {
        assert!(validate_commission_rate(0.5).is_ok());
        assert!(validate_commission_rate(15.0).is_ok());
        assert!(validate_commission_rate(100.0).is_ok());
    }

    #[test]
    fn test_commission_rate_invalid() {
        assert!(validate_commission_rate(0.0).is_err());
        assert!(validate_commission_rate(-1.0).is_err());
        assert!(validate_commission_rate(100.1).is_err());
    }

    #[test]
    fn test_amount_cents() {
        assert!(validate_amount_cents(1).is_ok());
        assert!(validate_amount_cents(99_999).is_ok());
        assert!(validate_amount_cents(0).is_err());
        assert!(validate_amount_cents(-500).is_err());
    }

    #[test]
    fn test_password_strength_valid() {
        assert!(validate_password_strength("SecureP4ss").is_ok());
    }

    #[test]
    fn test_password_strength_too_short() {
        assert!(validate_password_strength("Ab1").is_err());
    }

    #[test]
    fn test_password_strength_missing_classes() {
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1").is_err());
        assert!(validate_password_strength("NoDigitsHere").is_err());
    }
}
