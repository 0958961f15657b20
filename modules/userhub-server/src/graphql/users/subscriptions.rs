use std::sync::Arc;

use async_graphql::*;
use futures::{Stream, StreamExt};
use userhub_core::{topics, ServerDeps};

use super::types::GqlUser;

#[derive(Default)]
pub struct UserSubscription;

#[Subscription]
impl UserSubscription {
    /// Users as they are created, from the moment the subscription is
    /// registered. No replay of earlier events.
    ///
    /// The transport dropping the stream (client disconnect) tears the
    /// underlying channel down and deregisters it from the bus.
    async fn user_added(&self, ctx: &Context<'_>) -> impl Stream<Item = GqlUser> {
        let deps = ctx.data_unchecked::<Arc<ServerDeps>>();
        let channel = deps.bus.subscribe(topics::USER_ADDED);
        tracing::debug!(topic = topics::USER_ADDED, "subscription opened");
        channel.into_stream().map(GqlUser::from)
    }
}
