pub mod error;
pub mod stats;
pub mod users;

use std::sync::Arc;

use async_graphql::*;
use userhub_core::ServerDeps;

/// Merged query root composing all domain query modules.
#[derive(MergedObject, Default)]
pub struct QueryRoot(users::UserQuery, stats::StatsQuery);

/// Merged mutation root composing all domain mutation modules.
#[derive(MergedObject, Default)]
pub struct MutationRoot(users::mutations::UserMutation);

/// Merged subscription root.
#[derive(MergedSubscription, Default)]
pub struct SubscriptionRoot(users::subscriptions::UserSubscription);

pub type AppSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

pub fn build_schema(deps: Arc<ServerDeps>) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        SubscriptionRoot::default(),
    )
    .data(deps)
    .limit_depth(10)
    .limit_complexity(1000)
    .finish()
}
