//! Helpers for reading typed configuration values from the environment.
//!
//! Config structs take an explicit `lookup` function rather than reading
//! `std::env` directly, so tests can feed them a fixed set of variables.

use std::fmt::Display;
use std::str::FromStr;

/// An environment variable was set but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{var} has invalid value {value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Read `var` through `lookup`, falling back to `default` when unset or blank.
pub fn var_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|e: T::Err| ConfigError {
                var,
                value,
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}

/// [`std::env::var`] as a `lookup` function.
pub fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_uses_default() {
        assert_eq!(var_or(&vars(&[]), "PORT", 8000u16), Ok(8000));
    }

    #[test]
    fn blank_uses_default() {
        assert_eq!(var_or(&vars(&[("PORT", "  ")]), "PORT", 8000u16), Ok(8000));
    }

    #[test]
    fn set_value_is_parsed() {
        assert_eq!(var_or(&vars(&[("PORT", " 9001 ")]), "PORT", 8000u16), Ok(9001));
    }

    #[test]
    fn invalid_value_names_the_variable() {
        let err = var_or(&vars(&[("PORT", "eighty")]), "PORT", 8000u16).unwrap_err();
        assert_eq!(err.var, "PORT");
        assert_eq!(err.value, "eighty");
        assert!(err.to_string().starts_with("PORT has invalid value \"eighty\""));
    }
}
