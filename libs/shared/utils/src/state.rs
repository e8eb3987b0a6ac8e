use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, DatabaseBackend};
use shared_database::{ClinicStore, MemoryStore, SupabaseStore};

/// Shared handler state. The store is injected here once; nothing else holds
/// a connection.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ClinicStore>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn ClinicStore>) -> Self {
        Self { config, store }
    }

    /// Builds the backend named by `DATABASE_BACKEND`.
    pub fn from_config(config: AppConfig) -> Self {
        let store: Arc<dyn ClinicStore> = match config.database_backend {
            DatabaseBackend::Supabase => {
                info!("Using PostgREST store at {}", config.supabase_url);
                Arc::new(SupabaseStore::new(&config))
            }
            DatabaseBackend::Memory => {
                info!("Using in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Self::new(Arc::new(config), store)
    }
}
