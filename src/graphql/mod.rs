//! GraphQL API
//!
//! This is the single API surface for the catalog: queries and mutations
//! over books, authors and users, served by async-graphql.

pub mod auth;
pub mod helpers;
pub mod loaders;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

use async_graphql::{Request, Response};

use crate::services::AuthService;

pub use auth::{AuthExt, CurrentUser, authenticate};
pub use schema::{CatalogSchema, MutationRoot, QueryRoot, build_schema, schema_sdl};

/// Execute a request on behalf of whoever the `Authorization` header names.
///
/// A bearer token that fails verification rejects the whole request.
pub async fn execute(
    schema: &CatalogSchema,
    auth: &AuthService,
    authorization: Option<&str>,
    request: Request,
) -> Response {
    match authenticate(auth, authorization).await {
        Ok(Some(user)) => schema.execute(request.data(user)).await,
        Ok(None) => schema.execute(request).await,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected request with invalid bearer token");
            auth::rejected_response(&e)
        }
    }
}
