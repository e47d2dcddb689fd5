//! Form input validation.

use crate::error::FlowError;
use std::fmt;
use tracing::debug;
use velaa_client::phone;

/// Shortest password accepted when creating or resetting a password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Number of digits in an OTP code.
pub const OTP_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLevel {
    pub fn label(self) -> &'static str {
        match self {
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Fair => "Fair",
            StrengthLevel::Good => "Good",
            StrengthLevel::Strong => "Strong",
        }
    }
}

/// Password strength as shown next to a password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0 to 5, one point per satisfied rule.
    pub score: u8,
    /// `None` for an empty password.
    pub level: Option<StrengthLevel>,
}

impl PasswordStrength {
    pub fn fill_percent(&self) -> u8 {
        self.score * 20
    }
}

/// Score a password: length of 8+, lowercase, uppercase, digit, symbol.
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            score: 0,
            level: None,
        };
    }

    let rules = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = rules.iter().filter(|&&passed| passed).count() as u8;

    let level = match score {
        0 | 1 => StrengthLevel::Weak,
        2 => StrengthLevel::Fair,
        3 => StrengthLevel::Good,
        _ => StrengthLevel::Strong,
    };

    PasswordStrength {
        score,
        level: Some(level),
    }
}

pub fn validate_required(field: &str, value: &str) -> Result<(), FlowError> {
    if value.trim().is_empty() {
        return Err(FlowError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn validate_min_length(field: &str, value: &str, min: usize) -> Result<(), FlowError> {
    if value.chars().count() < min {
        debug!(field, min, "Value too short");
        return Err(FlowError::Validation(format!(
            "Minimum length is {} characters",
            min
        )));
    }
    Ok(())
}

/// OTP codes are exactly four ASCII digits.
pub fn validate_otp(code: &str) -> Result<(), FlowError> {
    if code.len() != OTP_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(FlowError::Validation(format!(
            "Please enter the {}-digit code sent to your phone",
            OTP_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), FlowError> {
    validate_required("Password", password)?;
    validate_min_length("Password", password, MIN_PASSWORD_LENGTH)?;
    if password != confirmation {
        return Err(FlowError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

/// A normalized, valid Tanzanian phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize `raw` and reject numbers that are not valid in Tanzania.
    pub fn parse(raw: &str) -> Result<Self, FlowError> {
        if !phone::is_valid(raw) {
            return Err(FlowError::InvalidPhoneNumber(raw.to_string()));
        }
        Ok(Self(phone::normalize(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Grouped form for display, e.g. `+255 712 345 678`.
    pub fn display_format(&self) -> String {
        phone::display_format(&self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength_levels() {
        assert_eq!(password_strength("").level, None);
        assert_eq!(password_strength("abc").level, Some(StrengthLevel::Weak));
        assert_eq!(password_strength("abcdefgh").level, Some(StrengthLevel::Fair));
        assert_eq!(password_strength("abcdefG1").level, Some(StrengthLevel::Strong));
        assert_eq!(password_strength("abcDEF").level, Some(StrengthLevel::Fair));
        assert_eq!(password_strength("abcDE1").level, Some(StrengthLevel::Good));

        let strongest = password_strength("Abcdef1!");
        assert_eq!(strongest.score, 5);
        assert_eq!(strongest.fill_percent(), 100);
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("Warehouse name", "Depot").is_ok());
        let err = validate_required("Warehouse name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Warehouse name is required");
    }

    #[test]
    fn test_validate_otp() {
        assert!(validate_otp("1234").is_ok());
        assert!(validate_otp("0000").is_ok());
        assert!(validate_otp("123").is_err());
        assert!(validate_otp("12a4").is_err());
        assert!(validate_otp("12345").is_err());
    }

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("secret1", "secret1").is_ok());
        assert_eq!(
            validate_new_password("abc", "abc").unwrap_err().to_string(),
            "Minimum length is 6 characters"
        );
        assert_eq!(
            validate_new_password("secret1", "secret2")
                .unwrap_err()
                .to_string(),
            "Passwords do not match"
        );
    }

    #[test]
    fn test_parse_phone() {
        let phone = PhoneNumber::parse("0712 345 678").unwrap();
        assert_eq!(phone.as_str(), "+255712345678");
        assert_eq!(phone.display_format(), "+255 712 345 678");
        assert!(matches!(
            PhoneNumber::parse("12345"),
            Err(FlowError::InvalidPhoneNumber(_))
        ));
    }
}
