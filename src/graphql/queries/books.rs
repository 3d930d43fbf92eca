use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Total number of books
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let db = ctx.data_unchecked::<Database>();
        let count = db.books().count().await.map_err(internal_error)?;
        Ok(count as i32)
    }

    /// All books, optionally only those by `author` and/or tagged with `genre`
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> Result<Vec<Book>> {
        let db = ctx.data_unchecked::<Database>();

        let records = match author {
            Some(name) => {
                let Some(author) = db.authors().get_by_name(&name).await.map_err(internal_error)?
                else {
                    return Ok(Vec::new());
                };
                db.books().list(Some(&author.id)).await
            }
            None => db.books().list(None).await,
        }
        .map_err(internal_error)?;

        Ok(records
            .into_iter()
            .filter(|b| genre.as_ref().is_none_or(|g| b.genres.contains(g)))
            .map(Book::from)
            .collect())
    }
}
