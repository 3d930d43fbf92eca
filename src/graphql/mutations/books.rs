use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Add a book, creating its author on first use
    ///
    /// Requires authentication. Without a user the field is null and an
    /// `UNAUTHENTICATED` error is reported.
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        published: i32,
        author: String,
        genres: Vec<String>,
    ) -> Result<Option<Book>> {
        let user = ctx.require_user()?;
        let db = ctx.data_unchecked::<Database>();
        let invalid_args = json!({
            "title": title,
            "published": published,
            "author": author,
            "genres": genres,
        });

        let created = db
            .books()
            .create_with_author(CreateBook {
                title,
                published,
                author,
                genres,
            })
            .await
            .map_err(|e| db_error_with_args(e, invalid_args))?;

        tracing::info!(
            user_id = %user.0.id,
            book_id = %created.book.id,
            author_id = %created.author.id,
            author_created = created.author_created,
            "Book added"
        );
        Ok(Some(Book::from(created.book)))
    }
}
