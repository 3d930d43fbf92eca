use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    async fn all_users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db.users().list().await.map_err(internal_error)?;
        Ok(records.into_iter().map(User::from).collect())
    }

    /// The user the request's bearer token belongs to, if any
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        ctx.current_user().map(|user| User::from(user.0.clone()))
    }
}
