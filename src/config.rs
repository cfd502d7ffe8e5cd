use crate::error::{env_error, HoursResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default timezone used to derive "now" for status checks
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

/// Default Redis connection string
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";

/// Main configuration structure for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Redis connection URL for the directory store
    pub redis_url: String,
    /// Locale for user-facing labels and notes
    pub locale: String,
    /// Timezone the directory's facilities operate in
    pub timezone: String,
    /// Port the HTTP surface listens on
    pub listen_port: u16,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> HoursResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| String::from(DEFAULT_REDIS_URL));

        let locale = env::var("LOCALE").unwrap_or_else(|_| String::from("en"));

        // Default timezone
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));

        // Parse numeric values
        let listen_port = env::var("PORT")
            .unwrap_or_else(|_| String::from("8080"))
            .parse::<u16>()
            .map_err(|_| env_error("Invalid PORT format"))?;

        // Initialize default components
        let mut components = HashMap::new();
        components.insert("hours".to_string(), true);
        components.insert("suggestions".to_string(), true);

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/components.toml") {
            if let Ok(file_components) = toml::from_str::<HashMap<String, bool>>(&content) {
                // Merge with defaults
                for (key, value) in file_components {
                    components.insert(key, value);
                }
            }
        }

        Ok(Config {
            redis_url,
            locale,
            timezone,
            listen_port,
            components,
        })
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    /// Update component enabled status
    #[allow(dead_code)]
    pub fn set_component_enabled(&mut self, name: &str, enabled: bool) -> HoursResult<()> {
        self.components.insert(name.to_string(), enabled);
        self.save_components()
    }

    /// Save component configuration to file
    #[allow(dead_code)]
    fn save_components(&self) -> HoursResult<()> {
        // Create config directory if it doesn't exist
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let toml_str = toml::to_string(&self.components)?;
        fs::write("config/components.toml", toml_str)?;

        Ok(())
    }

    /// Parse the configured timezone, falling back to the default on bad input
    pub fn directory_tz(&self) -> Tz {
        self.timezone.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(
                "Unknown timezone {:?}, falling back to {}",
                self.timezone,
                DEFAULT_TIMEZONE
            );
            Tz::Asia__Seoul
        })
    }
}
