//! GraphQL schema definition
//!
//! Queries and mutations live in domain modules and are merged into the
//! root objects here.

use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::AuthService;

use super::loaders::{AuthorLoader, BookCountLoader};
use super::mutations::{AuthMutations, AuthorMutations, BookMutations, UserMutations};
use super::queries::{AuthorQueries, BookQueries, UserQueries};

/// The GraphQL schema type
pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(BookQueries, AuthorQueries, UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(BookMutations, AuthorMutations, UserMutations, AuthMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: AuthService) -> CatalogSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(DataLoader::new(AuthorLoader::new(db.clone()), tokio::spawn))
        .data(DataLoader::new(BookCountLoader::new(db.clone()), tokio::spawn))
        .data(db)
        .data(auth)
        .extension(async_graphql::extensions::Tracing)
        .finish()
}

/// The schema in SDL form. Needs no database.
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .finish()
        .sdl()
}
