//! Repository error type

use thiserror::Error;

/// Errors returned by the repositories
#[derive(Debug, Error)]
pub enum DbError {
    /// A record violated a schema constraint. `field` names the offending input.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Turn a UNIQUE constraint failure on `field` into a validation error.
pub(crate) fn map_unique_violation(err: sqlx::Error, field: &'static str, value: &str) -> DbError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DbError::validation(field, format!("`{}` is already taken", value))
        }
        _ => DbError::Database(err),
    }
}

/// Check a required string field against a minimum length (in characters, after trimming).
pub(crate) fn require_min_length(field: &'static str, value: &str, min: usize) -> DbResult<()> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(DbError::validation(field, format!("{} is required", field)));
    }
    if len < min {
        return Err(DbError::validation(
            field,
            format!("{} must be at least {} characters long", field, min),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_min_length_counts_characters() {
        assert!(require_min_length("username", "äöü", 3).is_ok());
        assert_matches!(
            require_min_length("username", "ab", 3),
            Err(DbError::Validation { field: "username", .. })
        );
    }

    #[test]
    fn test_blank_is_required_error() {
        let err = require_min_length("title", "   ", 2).unwrap_err();
        assert_eq!(err.to_string(), "title: title is required");
    }
}
