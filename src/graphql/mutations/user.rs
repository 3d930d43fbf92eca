use super::prelude::*;

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    /// Register a new user
    ///
    /// No authentication required.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favorite_genre: Option<String>,
    ) -> Result<Option<User>> {
        let db = ctx.data_unchecked::<Database>();
        let invalid_args = json!({ "username": username, "favoriteGenre": favorite_genre });

        let user = db
            .users()
            .create(CreateUser {
                username,
                favorite_genre,
            })
            .await
            .map_err(|e| db_error_with_args(e, invalid_args))?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(Some(User::from(user)))
    }
}
