use aukiolo::components::hours::models::{OpenStatus, ScheduleDoc, TimeField};
use aukiolo::components::hours::Hours;
use aukiolo::components::suggestions::Suggestions;
use aukiolo::components::{ComponentManager, HoursHandle};
use aukiolo::config::Config;
use aukiolo::db::{HoursDb, InMemoryDb};
use aukiolo::startup;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Minimal config for tests
fn test_config() -> Config {
    Config {
        redis_url: "redis://127.0.0.1:6379".to_string(),
        locale: "en".to_string(),
        timezone: "Asia/Seoul".to_string(),
        listen_port: 8080,
        components: HashMap::new(),
    }
}

/// Smoke test to verify that a config can be built and read back
#[tokio::test]
async fn test_config_loads() {
    let config = test_config();

    assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
    assert_eq!(config.timezone, "Asia/Seoul");
    assert_eq!(config.listen_port, 8080);
}

/// Smoke test for component enablement lookups
#[tokio::test]
async fn test_component_enablement() {
    let mut components = HashMap::new();
    components.insert("hours".to_string(), true);
    components.insert("suggestions".to_string(), false);

    let config = Config {
        components,
        ..test_config()
    };

    assert!(config.is_component_enabled("hours"));
    assert!(!config.is_component_enabled("suggestions"));
    // Unknown components are treated as disabled
    assert!(!config.is_component_enabled("telemetry"));
}

/// Smoke test for the timezone fallback
#[tokio::test]
async fn test_timezone_parsing() {
    let config = test_config();
    assert_eq!(config.directory_tz(), Tz::Asia__Seoul);

    let config = Config {
        timezone: "Not/AZone".to_string(),
        ..test_config()
    };
    assert_eq!(config.directory_tz(), Tz::Asia__Seoul);
}

/// Smoke test for the hours handle round trip against in-memory storage
#[tokio::test]
async fn test_hours_handle_round_trip() {
    let config = Arc::new(RwLock::new(test_config()));
    let db: Arc<dyn HoursDb> = Arc::new(InMemoryDb::default());

    let doc = ScheduleDoc {
        mon_start: Some(TimeField::Num(900)),
        mon_end: Some(TimeField::Num(1800)),
        ..ScheduleDoc::default()
    };
    db.set_schedule("h-1", &doc).await.unwrap();

    let handle = HoursHandle::new(config, Arc::clone(&db));

    let fetched = handle.get_schedule("h-1").await.unwrap();
    assert_eq!(fetched, Some(doc));

    // Monday 2025-03-03 at 10:00 falls inside the 09:00-18:00 slot
    let monday = NaiveDate::from_ymd_opt(2025, 3, 3)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    assert_eq!(
        handle.status_at("h-1", monday).await.unwrap(),
        OpenStatus::Open
    );

    // A hospital with no stored hours still answers
    assert_eq!(
        handle.status_at("h-missing", monday).await.unwrap(),
        OpenStatus::Unknown
    );

    assert!(handle.shutdown().await.is_ok());
}

/// Smoke test for registering and initializing components through the manager
#[tokio::test]
async fn test_component_manager_lifecycle() {
    let config = Arc::new(RwLock::new(test_config()));
    let db: Arc<dyn HoursDb> = Arc::new(InMemoryDb::default());

    let mut manager = ComponentManager::new(Arc::clone(&config));
    manager.register(Hours::new());
    manager.register(Suggestions::new());

    manager.init_all(Arc::clone(&db)).await.unwrap();

    // Both components are reachable by name and hand out live handles
    let hours = manager
        .get_component_by_name("hours")
        .and_then(|c| c.as_any().downcast_ref::<Hours>())
        .expect("hours component should be registered");
    assert!(hours.get_handle().await.is_some());

    let suggestions = manager
        .get_component_by_name("suggestions")
        .and_then(|c| c.as_any().downcast_ref::<Suggestions>())
        .expect("suggestions component should be registered");
    assert!(suggestions.get_handle().await.is_some());

    assert!(manager.get_component_by_name("telemetry").is_none());

    manager.shutdown_all().await.unwrap();
}

/// Test that disabled components are left out at startup
#[tokio::test]
async fn test_disabled_component_not_registered() {
    let mut components = HashMap::new();
    components.insert("hours".to_string(), true);
    components.insert("suggestions".to_string(), false);

    let config = Arc::new(RwLock::new(Config {
        components,
        ..test_config()
    }));

    let manager = startup::build_components(Arc::clone(&config)).await;
    assert!(manager.get_component_by_name("hours").is_some());
    assert!(manager.get_component_by_name("suggestions").is_none());
}
