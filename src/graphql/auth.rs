//! GraphQL authentication and authorization
//!
//! The bearer token is verified once per request, before execution. The
//! resolved user is stored in the request data as [CurrentUser]; resolvers
//! that need a user call [AuthExt::require_user].

use async_graphql::{Context, ErrorExtensionValues, ErrorExtensions, Response, Result, ServerError};

use crate::db::UserRecord;
use crate::services::{AuthError, AuthService};

/// The user the request's bearer token belongs to
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; anything other than
/// `Bearer <token>` yields `None`.
pub fn extract_token(authorization: Option<&str>) -> Option<&str> {
    let header = authorization?;
    let scheme = header.get(..7)?;
    if scheme.eq_ignore_ascii_case("bearer ") {
        Some(header[7..].trim())
    } else {
        None
    }
}

/// Resolve the current user from an `Authorization` header value.
///
/// No header, or a non-bearer header, is not an error. A bearer token that
/// fails verification is.
pub async fn authenticate(
    auth: &AuthService,
    authorization: Option<&str>,
) -> std::result::Result<Option<CurrentUser>, AuthError> {
    let Some(token) = extract_token(authorization) else {
        return Ok(None);
    };

    let user = auth.resolve_user(token).await?;
    if user.is_none() {
        tracing::debug!("Bearer token refers to a user that no longer exists");
    }
    Ok(user.map(CurrentUser))
}

/// Build the response for a request whose bearer token was rejected
pub fn rejected_response(err: &AuthError) -> Response {
    let (message, code) = match err {
        AuthError::InvalidToken(_) | AuthError::InvalidCredentials => {
            (err.to_string(), "UNAUTHENTICATED")
        }
        AuthError::Database(_) => ("internal server error".to_string(), "INTERNAL_SERVER_ERROR"),
    };

    let mut extensions = ErrorExtensionValues::default();
    extensions.set("code", code);

    let mut error = ServerError::new(message, None);
    error.extensions = Some(extensions);
    Response::from_errors(vec![error])
}

/// Error returned when an operation needs a logged-in user
pub fn unauthenticated() -> async_graphql::Error {
    async_graphql::Error::new("not authenticated")
        .extend_with(|_, e| e.set("code", "UNAUTHENTICATED"))
}

/// Extension trait to get the current user from GraphQL context
pub trait AuthExt {
    /// The current user, if the request carried a valid token
    fn current_user(&self) -> Option<&CurrentUser>;

    /// The current user, or an `UNAUTHENTICATED` error
    fn require_user(&self) -> Result<&CurrentUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn current_user(&self) -> Option<&CurrentUser> {
        self.data_opt::<CurrentUser>()
    }

    fn require_user(&self) -> Result<&CurrentUser> {
        self.current_user().ok_or_else(unauthenticated)
    }
}
