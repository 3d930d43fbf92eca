use super::prelude::*;

#[derive(Default)]
pub struct AuthorMutations;

#[Object]
impl AuthorMutations {
    /// Set an author's birth year
    ///
    /// Requires authentication. Returns null when no author has this name.
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        born: i32,
    ) -> Result<Option<Author>> {
        let user = ctx.require_user()?;
        let db = ctx.data_unchecked::<Database>();

        let updated = db
            .authors()
            .set_born(&name, born)
            .await
            .map_err(|e| db_error_with_args(e, json!({ "name": name, "born": born })))?;

        match &updated {
            Some(author) => {
                tracing::info!(user_id = %user.0.id, author_id = %author.id, born, "Author edited")
            }
            None => tracing::debug!(name = %name, "editAuthor: no such author"),
        }
        Ok(updated.map(Author::from))
    }
}
