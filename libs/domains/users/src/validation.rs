//! Domain rules for a user record.
//!
//! Every rule runs; failures are collected in rule order and joined with
//! `\n` into one [`UserError::Validation`].

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, Role};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$").expect("valid email regex")
});
static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid regex"));
static LOWERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").expect("valid regex"));
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").expect("valid regex"));

pub const MIN_AGE: i64 = 16;
pub const MAX_AGE: i64 = 150;
const MIN_NAME_CHARS: usize = 2;
const PASSWORD_CHARS: std::ops::RangeInclusive<usize> = 8..=32;

struct Rule<'a> {
    passed: bool,
    message: &'a str,
}

/// Validate the candidate fields and build a [`NewUser`].
pub fn create_user(
    name: &str,
    age: i64,
    password: &str,
    email: Option<&str>,
    role: Role,
) -> UserResult<NewUser> {
    let rules = [
        Rule {
            passed: !name.is_empty(),
            message: "name can't be empty.",
        },
        Rule {
            passed: name.chars().count() >= MIN_NAME_CHARS,
            message: "name should be at least 2 characters.",
        },
        Rule {
            passed: is_alphanumeric(name),
            message: "name should be alpha or alpha numeric.",
        },
        Rule {
            passed: (MIN_AGE..=MAX_AGE).contains(&age),
            message: "age should be between 16 and 150.",
        },
        Rule {
            passed: email.is_none_or(|e| EMAIL.is_match(e)),
            message: "email should be a valid one.",
        },
        Rule {
            passed: !password.is_empty(),
            message: "password can't be empty.",
        },
        Rule {
            passed: is_strong_password(password),
            message: "password should be stronger.",
        },
    ];

    let failures: Vec<&str> = rules
        .iter()
        .filter(|rule| !rule.passed)
        .map(|rule| rule.message)
        .collect();

    if !failures.is_empty() {
        return Err(UserError::Validation(failures.join("\n")));
    }

    Ok(NewUser {
        name: name.to_string(),
        age,
        email: email.map(str::to_string),
        password: password.to_string(),
        role,
    })
}

/// Non-empty and made only of letters or digits (Unicode aware).
fn is_alphanumeric(name: &str) -> bool {
    !name.is_empty() && name.chars().all(char::is_alphanumeric)
}

/// 8 to 32 characters with an upper, a lower and a digit.
fn is_strong_password(password: &str) -> bool {
    PASSWORD_CHARS.contains(&password.chars().count())
        && !password.contains('\n')
        && UPPERCASE.is_match(password)
        && LOWERCASE.is_match(password)
        && DIGIT.is_match(password)
}
