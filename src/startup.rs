use crate::components::{hours::Hours, suggestions::Suggestions, ComponentManager};
use crate::config::Config;
use crate::db::{HoursDb, InMemoryDb, RedisDB};
use crate::error::component_error;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| component_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Set the display locale from the loaded config
pub async fn apply_locale(config: &Arc<RwLock<Config>>) {
    let config_read = config.read().await;
    crate::utils::i18n::set_locale(&config_read.locale);
}

/// Open the configured storage backend
///
/// A Redis connection failure degrades to process-local memory so the
/// directory can still serve requests, with nothing surviving a restart.
pub async fn build_db(config: &Arc<RwLock<Config>>) -> Arc<dyn HoursDb> {
    let redis_url = {
        let config_read = config.read().await;
        config_read.redis_url.clone()
    };

    match RedisDB::new(&redis_url) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to open Redis at {}: {:?}", redis_url, e);
            warn!("Falling back to in-memory storage, data will not survive a restart");
            Arc::new(InMemoryDb::default())
        }
    }
}

/// Build the component manager with every enabled component registered
pub async fn build_components(config: Arc<RwLock<Config>>) -> ComponentManager {
    let mut manager = ComponentManager::new(Arc::clone(&config));

    let (hours_enabled, suggestions_enabled) = {
        let config_read = config.read().await;
        (
            config_read.is_component_enabled("hours"),
            config_read.is_component_enabled("suggestions"),
        )
    };

    if hours_enabled {
        manager.register(Hours::new());
    } else {
        warn!("Hours component is disabled in configuration");
    }

    if suggestions_enabled {
        manager.register(Suggestions::new());
    } else {
        warn!("Suggestions component is disabled in configuration");
    }

    info!("Component manager ready");
    manager
}
