//! Account field validation shared by registration, the admin CLI and sharing.

use validator::ValidateEmail;

/// Minimum username length in characters.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum email length in characters.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validate a username: 3-150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        ));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(
            "Username may only contain letters, digits and @/./+/-/_ characters".to_string(),
        );
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        ));
    }
    if !email.validate_email() {
        return Err(format!("'{email}' is not a valid email address"));
    }
    Ok(())
}

/// Canonical form used for storage and lookup: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_django_style_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b+c-d_e@f").is_ok());
    }

    #[test]
    fn rejects_short_and_long_usernames() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(151)).is_err());
        assert!(validate_username(&"x".repeat(150)).is_ok());
    }

    #[test]
    fn rejects_spaces_in_username() {
        let err = validate_username("bad name").unwrap_err();
        assert!(err.contains("may only contain"));
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("owner@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  Bob@Example.COM "), "bob@example.com");
    }
}
