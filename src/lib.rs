//! Catalog backend: a GraphQL API over books, authors and users.
//!
//! All operations are exposed via GraphQL at /graphql.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod graphql;
pub mod services;
