//! Server-side input policy. Clients may run the same checks for UX, but
//! every write path re-validates here.

use lazy_static::lazy_static;
use regex::Regex;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::error::ApiError;

pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
    static ref PASSWORD_CHARSET_RE: Regex = Regex::new(r"^[A-Za-z\d@$!%*?&]{8,}$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
}

fn invalid(msg: &str) -> ApiError {
    ApiError::Validation(msg.to_string())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(invalid("Invalid email"))
    }
}

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(invalid(
            "Username must be 3-30 characters of letters, digits or underscore",
        ))
    }
}

/// 8 to 72 characters from `[A-Za-z0-9@$!%*?&]`, with one lowercase, one
/// uppercase, one digit and one special character.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} characters"
        )));
    }
    let ok = PASSWORD_CHARSET_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if ok {
        Ok(())
    } else {
        Err(invalid(
            "Password must contain at least 8 characters, one lowercase, one uppercase, one number, and one special character",
        ))
    }
}

pub fn validate_phone(phone: &str) -> Result<(), ApiError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(invalid("Phone number must be 7 to 15 digits"))
    }
}

pub fn validate_required(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

pub fn validate_language(language: &str) -> Result<(), ApiError> {
    let trimmed = language.trim();
    if trimmed.is_empty() || trimmed.len() > 64 {
        return Err(invalid("Language must be 1 to 64 characters"));
    }
    Ok(())
}

pub fn validate_languages(languages: &[String]) -> Result<(), ApiError> {
    if languages.is_empty() {
        return Err(invalid("At least one language preference is required"));
    }
    languages.iter().try_for_each(|l| validate_language(l))
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp and keeps the date.
pub fn parse_date_of_birth(raw: &str) -> Result<Date, ApiError> {
    let raw = raw.trim();
    let date = Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc3339).map(|dt| dt.date()))
        .map_err(|_| invalid("Date of birth must be an ISO-8601 date"))?;
    if date > OffsetDateTime::now_utc().date() {
        return Err(invalid("Date of birth cannot be in the future"));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn password_policy() {
        assert!(validate_password("Abcdef1!").is_ok());
        assert!(validate_password("Str0ng&Longer?").is_ok());

        assert!(validate_password("Abcde1!").is_err()); // too short
        assert!(validate_password("abcdef1!").is_err()); // no uppercase
        assert!(validate_password("ABCDEF1!").is_err()); // no lowercase
        assert!(validate_password("Abcdefg!").is_err()); // no digit
        assert!(validate_password("Abcdefg1").is_err()); // no special
        assert!(validate_password("Abcdef1!#").is_err()); // '#' not allowed
        assert!(validate_password("Abcdef 1!").is_err());

        let at_limit = format!("Aa1!{}", "x".repeat(68));
        assert!(validate_password(&at_limit).is_ok());
        assert!(validate_password(&format!("{at_limit}x")).is_err());
    }

    #[test]
    fn email_format() {
        assert!(validate_email("alice@gmail.com").is_ok());
        assert!(validate_email("alice@naver.com").is_ok());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("alice@gmail").is_err());
        assert!(validate_email("al ice@gmail.com").is_err());
    }

    #[test]
    fn username_format() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("alice_99").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn phone_format() {
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("+821012345678").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("010-1234-5678").is_err());
    }

    #[test]
    fn languages_must_be_non_empty() {
        assert!(validate_languages(&[]).is_err());
        assert!(validate_languages(&["English".into()]).is_ok());
        assert!(validate_languages(&["English".into(), "  ".into()]).is_err());
    }

    #[test]
    fn date_of_birth_accepts_date_and_timestamp() {
        assert_eq!(
            parse_date_of_birth("1995-04-12").unwrap(),
            date!(1995 - 04 - 12)
        );
        assert_eq!(
            parse_date_of_birth("1995-04-12T15:00:00.000Z").unwrap(),
            date!(1995 - 04 - 12)
        );
        assert!(parse_date_of_birth("12/04/1995").is_err());
        assert!(parse_date_of_birth("2999-01-01").is_err());
    }
}
