use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

use shared_models::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$";

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Rejected client input; surfaces as `ValidationError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidInput(pub String);

impl From<InvalidInput> for AppError {
    fn from(err: InvalidInput) -> Self {
        AppError::ValidationError(err.0)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254
        && Regex::new(EMAIL_PATTERN)
            .map(|re| re.is_match(email))
            .unwrap_or(false)
}

/// Trimmed, lower-cased email or `ValidationError`.
pub fn normalize_email(email: &str) -> Result<String, InvalidInput> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(InvalidInput("Invalid email address".to_string()));
    }
    Ok(email)
}

pub fn check_password(password: &str) -> Result<(), InvalidInput> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(InvalidInput(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn require_non_blank(field: &str, value: &str) -> Result<String, InvalidInput> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Empty strings from form fields count as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, InvalidInput> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            InvalidInput(format!(
                "Invalid date '{}', expected YYYY-MM-DD HH:MM:SS",
                value
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("anna@clinic.example"));
        assert!(!is_valid_email("anna@"));
        assert!(!is_valid_email("anna clinic@example.com"));
        assert_eq!(normalize_email("  Anna@Clinic.Example ").unwrap(), "anna@clinic.example");
    }

    #[test]
    fn password_length() {
        assert!(check_password("12345678").is_ok());
        assert_matches!(check_password("1234567"), Err(InvalidInput(_)));
    }

    #[test]
    fn accepted_timestamp_formats() {
        let expected = NaiveDateTime::parse_from_str("2025-06-02 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(parse_timestamp("2025-06-02 09:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-02T09:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-02 09:00").unwrap(), expected);
        assert_matches!(parse_timestamp("02.06.2025 9am"), Err(InvalidInput(_)));
    }

    #[test]
    fn blank_values() {
        assert_matches!(require_non_blank("Diagnosis", "  "), Err(InvalidInput(msg)) if msg == "Diagnosis is required");
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" 12 ".to_string())).as_deref(), Some("12"));
    }
}
