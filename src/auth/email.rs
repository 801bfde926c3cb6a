use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Trim, lowercase and syntax-check an email address. Deliverability is not
/// checked. The returned string is the canonical form stored and matched on.
pub fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    match syntax_error(&email) {
        None => Ok(email),
        Some(reason) => Err(ApiError::Validation(format!(
            "Invalid email address: {reason}"
        ))),
    }
}

fn syntax_error(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some("the address is empty");
    }
    if email.chars().any(char::is_whitespace) {
        return Some("the address must not contain whitespace");
    }
    match email.matches('@').count() {
        0 => return Some("the address must have an @-sign"),
        1 => {}
        _ => return Some("the address must have exactly one @-sign"),
    }
    // sole '@' at this point, split is safe
    let (local, domain) = email.split_once('@').unwrap_or(("", ""));
    if local.is_empty() {
        return Some("there is nothing before the @-sign");
    }
    if domain.is_empty() {
        return Some("there is nothing after the @-sign");
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Some("the domain is not valid");
    }
    if !EMAIL_RE.is_match(email) {
        return Some("the address is not valid");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = normalize_email("  Alice@Example.COM ").expect("valid email");
        assert_eq!(email, "alice@example.com");
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(normalize_email("bob@example.com").is_ok());
        assert!(normalize_email("bob+tag@sub.example.co").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "not-an-email",
            "missing-domain@",
            "@missing-local.com",
            "two@@example.com",
            "no-dot@example",
            "dot-at-end@example.",
            "spaces in@example.com",
        ] {
            let err = normalize_email(bad).unwrap_err();
            assert!(
                err.to_string().starts_with("Invalid email address: "),
                "unexpected message for {bad}: {err}"
            );
        }
    }
}
