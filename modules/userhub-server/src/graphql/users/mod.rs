pub mod mutations;
pub mod subscriptions;
pub mod types;

use std::sync::Arc;

use async_graphql::*;
use userhub_core::ServerDeps;

use crate::graphql::error;
use types::GqlUser;

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Look up a single user by id. Null when absent.
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<GqlUser>> {
        let deps = ctx.data_unchecked::<Arc<ServerDeps>>();
        let user = deps
            .users()
            .find(id.as_str())
            .await
            .map_err(error::from_hub)?;
        Ok(user.map(GqlUser::from))
    }

    /// All users. An empty store yields an empty list.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<GqlUser>> {
        let deps = ctx.data_unchecked::<Arc<ServerDeps>>();
        let users = deps.users().all().await.map_err(error::from_hub)?;
        Ok(users.into_iter().map(GqlUser::from).collect())
    }
}
