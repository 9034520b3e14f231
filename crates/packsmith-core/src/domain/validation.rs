use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z_\-]+$").expect("package pattern is valid"));

static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|[1-9]\d*)(\.(0|[1-9]\d*))(\.(0|[1-9]\d*))?$")
        .expect("version pattern is valid")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

// GitHub-style handles: alphanumeric, single inner hyphens, at most 39 chars.
static USER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9]|-[a-zA-Z0-9]){0,38}$").expect("user pattern is valid")
});

/// Format rules for user-supplied strings.
///
/// Everything here runs before any filesystem mutation, so a rejected value
/// never needs a rollback.
pub struct Validator;

impl Validator {
    pub fn package(name: &str) -> Result<&str, DomainError> {
        check(
            &PACKAGE,
            "package",
            name,
            "must start with a letter and contain only letters, '-' or '_' (at least 2 characters)",
        )
    }

    pub fn version(version: &str) -> Result<&str, DomainError> {
        check(
            &VERSION,
            "version",
            version,
            "expected MAJOR.MINOR or MAJOR.MINOR.PATCH",
        )
    }

    pub fn email(email: &str) -> Result<&str, DomainError> {
        check(&EMAIL, "email", email, "expected an address like name@example.com")
    }

    pub fn user(user: &str) -> Result<&str, DomainError> {
        check(
            &USER,
            "user",
            user,
            "expected an alphanumeric handle with single inner hyphens",
        )
    }

    pub fn author(author: &str) -> Result<&str, DomainError> {
        let trimmed = author.trim();
        if trimmed.is_empty() {
            return Err(invalid("author", author, "cannot be blank"));
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(invalid("author", author, "must fit on one line"));
        }
        Ok(trimmed)
    }
}

fn check<'a>(
    pattern: &Regex,
    field: &'static str,
    value: &'a str,
    reason: &str,
) -> Result<&'a str, DomainError> {
    if pattern.is_match(value) {
        Ok(value)
    } else {
        Err(invalid(field, value, reason))
    }
}

fn invalid(field: &'static str, value: &str, reason: &str) -> DomainError {
    DomainError::Validation {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_names() {
        for ok in ["demo", "my-package", "my_package", "Ab"] {
            assert!(Validator::package(ok).is_ok(), "rejected {ok}");
        }
        for bad in ["", "a", "1demo", "-demo", "de mo", "demo2", "de.mo"] {
            assert!(Validator::package(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn versions() {
        for ok in ["0.1", "0.1.0", "10.20.30"] {
            assert!(Validator::version(ok).is_ok(), "rejected {ok}");
        }
        for bad in ["1", "01.2", "1.2.3.4", "v1.0", "1.0-beta"] {
            assert!(Validator::version(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn emails() {
        assert!(Validator::email("ada@example.com").is_ok());
        assert!(Validator::email("ada@example").is_err());
        assert!(Validator::email("ada example.com").is_err());
    }

    #[test]
    fn users() {
        assert!(Validator::user("octocat").is_ok());
        assert!(Validator::user("octo-cat").is_ok());
        assert!(Validator::user("-octocat").is_err());
        assert!(Validator::user("octo--cat").is_err());
        assert!(Validator::user("octocat-").is_err());
        assert!(Validator::user(&"a".repeat(40)).is_err());
    }

    #[test]
    fn authors_are_trimmed() {
        assert_eq!(Validator::author("  Ada Lovelace ").unwrap(), "Ada Lovelace");
        assert!(Validator::author("   ").is_err());
        assert!(Validator::author("Ada\nLovelace").is_err());
    }

    #[test]
    fn errors_name_the_field() {
        let err = Validator::package("1demo").unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "package", .. }));
        assert!(err.to_string().contains("1demo"));
    }
}
