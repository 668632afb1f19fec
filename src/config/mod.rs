/// Catalog configuration loading from config.toml
pub mod catalog;

/// Database configuration and connection management
pub mod database;

use crate::errors::Result;
use std::env::VarError;

/// Reads an optional environment variable.
///
/// Unset yields `None`; a value that is set but not valid UTF-8 is an error rather
/// than a silent fallback.
///
/// # Errors
/// Returns [`crate::errors::Error::EnvVar`] for a non-UTF-8 value.
pub fn optional_env(name: &str) -> Result<Option<String>> {
    present(std::env::var(name))
}

fn present(value: std::result::Result<String, VarError>) -> Result<Option<String>> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::ffi::OsString;

    #[test]
    fn test_env_value_mapping() {
        assert_eq!(present(Ok("x".to_string())).ok().flatten().as_deref(), Some("x"));
        assert!(matches!(present(Err(VarError::NotPresent)), Ok(None)));
        assert!(matches!(
            present(Err(VarError::NotUnicode(OsString::from("x")))),
            Err(Error::EnvVar(VarError::NotUnicode(_)))
        ));
    }

    #[test]
    fn test_unset_variable_is_none() {
        assert!(matches!(
            optional_env("STORE_CATALOG_TEST_UNSET_VARIABLE"),
            Ok(None)
        ));
    }
}
