use std::sync::Arc;

use async_graphql::*;
use userhub_core::{topics, ServerDeps};

use crate::graphql::error;
use super::types::GqlUser;

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create a user and return it with its store-assigned id.
    ///
    /// The user-added event is published only after the store acknowledges
    /// the insert, so a subscriber can never observe a user that a
    /// concurrent read would not yet see.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
    ) -> Result<GqlUser> {
        let deps = ctx.data_unchecked::<Arc<ServerDeps>>();
        let user = deps
            .users()
            .create(&name, &email)
            .await
            .map_err(error::from_hub)?;

        deps.bus.publish(topics::USER_ADDED, user.clone());
        tracing::info!(user_id = %user.id, "user created");

        Ok(user.into())
    }

    /// Delete a user by id. An absent id is an error and publishes nothing.
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<String> {
        let deps = ctx.data_unchecked::<Arc<ServerDeps>>();
        deps.users()
            .remove(id.as_str())
            .await
            .map_err(error::from_hub)?;

        tracing::info!(user_id = %*id, "user deleted");
        Ok(format!("User with ID {} deleted successfully", *id))
    }
}
