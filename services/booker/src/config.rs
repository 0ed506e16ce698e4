//! Service configuration
//!
//! Loaded once at startup from `BOOKER_*` environment variables and handed
//! to the collaborators that need it.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Settings for the booking site
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    pub bind_address: String,
    /// Session lifetime in seconds, renewed on every request
    pub session_ttl_seconds: u64,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    /// Bucket receiving uploaded hotel images
    pub image_bucket: String,
    /// Key prefix for uploaded hotel images
    pub image_key_prefix: String,
    /// Custom S3-compatible endpoint, e.g. MinIO
    pub image_endpoint: Option<String>,
}

impl AppConfig {
    /// Load configuration from the environment
    ///
    /// # Environment Variables
    /// - `BOOKER_BIND_ADDRESS` (default: "0.0.0.0:3000")
    /// - `BOOKER_SESSION_TTL_SECONDS` (default: 604800, 7 days)
    /// - `BOOKER_SECURE_COOKIES` (default: false)
    /// - `BOOKER_IMAGE_BUCKET` (default: "hotel-images")
    /// - `BOOKER_IMAGE_KEY_PREFIX` (default: "hotels/")
    /// - `BOOKER_IMAGE_ENDPOINT` (optional)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("session_ttl_seconds", 604_800_i64)?
            .set_default("secure_cookies", false)?
            .set_default("image_bucket", "hotel-images")?
            .set_default("image_key_prefix", "hotels/")?
            .add_source(Environment::with_prefix("BOOKER").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "BOOKER_BIND_ADDRESS",
        "BOOKER_SESSION_TTL_SECONDS",
        "BOOKER_SECURE_COOKIES",
        "BOOKER_IMAGE_BUCKET",
        "BOOKER_IMAGE_KEY_PREFIX",
        "BOOKER_IMAGE_ENDPOINT",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = AppConfig::load().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.session_ttl_seconds, 604_800);
        assert!(!config.secure_cookies);
        assert_eq!(config.image_bucket, "hotel-images");
        assert_eq!(config.image_key_prefix, "hotels/");
        assert_eq!(config.image_endpoint, None);
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("BOOKER_BIND_ADDRESS", "127.0.0.1:8080");
            std::env::set_var("BOOKER_SESSION_TTL_SECONDS", "3600");
            std::env::set_var("BOOKER_SECURE_COOKIES", "true");
            std::env::set_var("BOOKER_IMAGE_BUCKET", "staging-images");
            std::env::set_var("BOOKER_IMAGE_ENDPOINT", "http://localhost:9000");
        }

        let config = AppConfig::load().unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.session_ttl_seconds, 3600);
        assert!(config.secure_cookies);
        assert_eq!(config.image_bucket, "staging-images");
        assert_eq!(config.image_key_prefix, "hotels/");
        assert_eq!(
            config.image_endpoint.as_deref(),
            Some("http://localhost:9000")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_ttl_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("BOOKER_SESSION_TTL_SECONDS", "forever");
        }

        assert!(AppConfig::load().is_err());

        clear_env();
    }
}
