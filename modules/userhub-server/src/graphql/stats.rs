use std::sync::Arc;

use async_graphql::*;
use userhub_core::{topics, ServerDeps};

/// Delivery-side counters for the subscription core.
#[derive(SimpleObject)]
pub struct SubscriptionStats {
    /// Channels currently registered on the user-added topic.
    pub live_channels: i64,
    /// Events dropped bus-wide under the bounded queue policy.
    pub dropped_events: i64,
}

#[derive(Default)]
pub struct StatsQuery;

#[Object]
impl StatsQuery {
    async fn subscription_stats(&self, ctx: &Context<'_>) -> SubscriptionStats {
        let deps = ctx.data_unchecked::<Arc<ServerDeps>>();
        SubscriptionStats {
            live_channels: deps.bus.subscriber_count(topics::USER_ADDED) as i64,
            dropped_events: deps.bus.dropped_total() as i64,
        }
    }
}
