//! GraphQL type definitions
//!
//! These types mirror the database records but are decorated with
//! async-graphql attributes.

use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, ID, Result, SimpleObject};

use crate::db::{AuthorRecord, BookRecord, UserRecord};

use super::helpers::internal_error;
use super::loaders::{AuthorLoader, BookCountLoader};

/// A registered user
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub id: ID,
    pub username: String,
    pub favorite_genre: Option<String>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: ID(r.id),
            username: r.username,
            favorite_genre: r.favorite_genre,
        }
    }
}

/// A signed bearer token
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    pub value: String,
}

/// A book author
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Author {
    pub id: ID,
    pub name: String,
    /// Birth year, if known
    pub born: Option<i32>,
}

impl From<AuthorRecord> for Author {
    fn from(r: AuthorRecord) -> Self {
        Self {
            id: ID(r.id),
            name: r.name,
            born: r.born,
        }
    }
}

#[ComplexObject]
impl Author {
    /// Number of books by this author
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let loader = ctx.data_unchecked::<DataLoader<BookCountLoader>>();
        let count = loader
            .load_one(self.id.0.clone())
            .await
            .map_err(internal_error)?
            .unwrap_or(0);
        Ok(count as i32)
    }
}

/// A book in the catalog
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Book {
    pub id: ID,
    pub title: String,
    /// Publication year
    pub published: i32,
    pub genres: Vec<String>,
    #[graphql(skip)]
    pub author_id: String,
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        Self {
            id: ID(r.id),
            title: r.title,
            published: r.published,
            genres: r.genres,
            author_id: r.author_id,
        }
    }
}

#[ComplexObject]
impl Book {
    async fn author(&self, ctx: &Context<'_>) -> Result<Author> {
        let loader = ctx.data_unchecked::<DataLoader<AuthorLoader>>();
        loader
            .load_one(self.author_id.clone())
            .await
            .map_err(internal_error)?
            .map(Author::from)
            .ok_or_else(|| {
                internal_error(format!(
                    "author {} of book {} does not exist",
                    self.author_id, self.id.0
                ))
            })
    }
}
