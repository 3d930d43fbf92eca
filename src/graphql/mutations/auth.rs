//! Login mutation

use async_graphql::ErrorExtensions;

use super::prelude::*;
use crate::services::{AuthError, AuthService};

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Log in with a username and the shared password
    ///
    /// No authentication required. Returns a bearer token.
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<Option<Token>> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth.login(&username, &password).await {
            Ok(value) => Ok(Some(Token { value })),
            Err(AuthError::InvalidCredentials) => {
                tracing::warn!(username = %username, "Login failed");
                Err(async_graphql::Error::new("wrong credentials")
                    .extend_with(|_, e| e.set("code", "UNAUTHENTICATED")))
            }
            Err(e) => Err(internal_error(e)),
        }
    }
}
