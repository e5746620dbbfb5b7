use domain_tasks::{StoreTaskRepository, SystemClock, TaskService, TaskStore};
use domain_users::{InMemoryUserRepository, UserService};
use std::sync::Arc;

use crate::config::Config;

pub type SharedStore = Arc<dyn TaskStore>;

/// Shared handles for the route builders and the readiness check
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: SharedStore,
    pub users: InMemoryUserRepository,
}

impl AppState {
    pub fn new(config: Config, store: SharedStore) -> Self {
        Self {
            config,
            store,
            users: InMemoryUserRepository::new(),
        }
    }

    pub fn task_service(&self) -> TaskService<StoreTaskRepository<SharedStore>> {
        let repository = StoreTaskRepository::new(Arc::clone(&self.store), Arc::new(SystemClock));
        TaskService::new(repository)
    }

    pub fn user_service(&self) -> UserService<InMemoryUserRepository> {
        UserService::new(self.users.clone())
    }
}
