use std::sync::Arc;

use userhub_events::EventBus;

use crate::config::AppConfig;
use crate::gateway::StorageGateway;
use crate::users::{User, UserRepo};

/// Central dependency container passed to all handlers and resolvers.
///
/// The bus lives here rather than as a global: it is constructed once at
/// server start and torn down at server stop.
#[derive(Clone)]
pub struct ServerDeps {
    pub gateway: Arc<dyn StorageGateway>,
    pub bus: EventBus<User>,
    pub config: AppConfig,
}

impl ServerDeps {
    pub fn new(gateway: Arc<dyn StorageGateway>, bus: EventBus<User>, config: AppConfig) -> Self {
        Self {
            gateway,
            bus,
            config,
        }
    }

    pub fn users(&self) -> UserRepo {
        UserRepo::new(self.gateway.clone())
    }
}
