//! Environment selection and `${VAR}` token substitution

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Process variable selecting the active environment
pub const ENVIRONMENT_VAR: &str = "TEST_ENV";

/// Environment used when neither an override nor `TEST_ENV` is present
pub const DEFAULT_ENVIRONMENT: &str = "qa";

static ENV_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid token pattern"));

/// Resolve the active environment: explicit override, then `TEST_ENV`, then `qa`.
///
/// Blank values are treated as absent.
pub fn resolve_environment(override_env: Option<&str>) -> String {
    override_env
        .map(str::trim)
        .filter(|env| !env.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var(ENVIRONMENT_VAR)
                .ok()
                .map(|env| env.trim().to_string())
                .filter(|env| !env.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

/// Replace every `${NAME}` token with the process environment value.
///
/// Unset variables are left as the literal token.
pub fn substitute_env_vars(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

/// Replace `${NAME}` tokens using an arbitrary lookup.
pub fn substitute_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_TOKEN
        .replace_all(input, |caps: &Captures<'_>| match lookup(&caps[1]) {
            Some(value) => value,
            None => {
                log::debug!("Environment variable '{}' is not set, leaving token", &caps[1]);
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Substitute tokens in every string-typed top-level value of a document.
///
/// Nested mappings and sequences are left untouched.
pub(crate) fn substitute_top_level<F>(values: &mut Map<String, Value>, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for value in values.values_mut() {
        if let Value::String(text) = value {
            if text.contains("${") {
                *text = substitute_with(text, &lookup);
            }
        }
    }
}
