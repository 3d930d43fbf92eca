// Helpers shared across GraphQL query/mutation modules.

use std::fmt::Display;

use async_graphql::{Error, ErrorExtensions, Value};

use crate::db::DbError;

/// Log an unexpected failure and hide its details from the client
pub(crate) fn internal_error(err: impl Display) -> Error {
    tracing::error!(error = %err, "Resolver failed");
    Error::new("internal server error").extend_with(|_, e| e.set("code", "INTERNAL_SERVER_ERROR"))
}

/// Map a repository error for a mutation.
///
/// Validation failures become `BAD_USER_INPUT` errors carrying the
/// arguments the client sent; anything else is an internal error.
pub(crate) fn db_error_with_args(err: DbError, invalid_args: serde_json::Value) -> Error {
    if !err.is_validation() {
        return internal_error(err);
    }

    tracing::warn!(error = %err, "Rejected invalid input");
    let args = Value::from_json(invalid_args).unwrap_or(Value::Null);
    Error::new(err.to_string()).extend_with(|_, e| {
        e.set("code", "BAD_USER_INPUT");
        e.set("invalidArgs", args);
    })
}
