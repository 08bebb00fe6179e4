//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Strings without `${` are returned unchanged.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, Unset> {
        std::env::var(var).map(Some).map_err(|_| Unset(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that is not set.
struct Unset(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("APIREF_TEST_OUT", "public");
        }
        let result = expand_env("${APIREF_TEST_OUT}/api", "output.dir").unwrap();
        assert_eq!(result, "public/api");
        unsafe {
            std::env::remove_var("APIREF_TEST_OUT");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("APIREF_TEST_UNSET");
        }
        let result = expand_env("${APIREF_TEST_UNSET:-docs.json}", "source.input").unwrap();
        assert_eq!(result, "docs.json");
    }

    #[test]
    fn test_expand_missing_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("APIREF_TEST_MISSING");
        }
        let err = expand_env("${APIREF_TEST_MISSING}", "source.input").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("APIREF_TEST_MISSING"));
        assert!(err.to_string().contains("source.input"));
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("site", "output.dir").unwrap(), "site");
        assert_eq!(expand_env("$HOME", "output.dir").unwrap(), "$HOME");
    }
}
