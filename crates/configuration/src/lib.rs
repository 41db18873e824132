use crate::error::ConfigError;
use std::collections::HashMap;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::Settings;

/// Loads the application settings.
///
/// Sources, lowest precedence first: built-in defaults, an optional `config.toml` in the
/// working directory, then process environment variables (`MONGO_URI`, `DB_NAME`, `HOST`,
/// `PORT`, `LOG_LEVEL`, `LOG_DIR`). Callers load `.env` beforehand.
pub fn load_settings() -> Result<Settings, ConfigError> {
    build_settings(config::Environment::default())
}

/// Same as [`load_settings`], reading variables from `vars` instead of the process environment.
pub fn load_settings_from(vars: HashMap<String, String>) -> Result<Settings, ConfigError> {
    build_settings(config::Environment::default().source(Some(vars)))
}

fn build_settings(environment: config::Environment) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("mongo_uri", settings::DEFAULT_MONGO_URI)?
        .set_default("db_name", settings::DEFAULT_DB_NAME)?
        .set_default("host", settings::DEFAULT_HOST)?
        .set_default("port", i64::from(settings::DEFAULT_PORT))?
        .set_default("log_level", settings::DEFAULT_LOG_LEVEL)?
        // Tells the builder to look for an optional file named `config.toml`
        .add_source(config::File::with_name("config").required(false))
        .add_source(environment)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let settings = load_settings_from(HashMap::new()).unwrap();
        assert_eq!(settings.mongo_uri, "mongodb://localhost:27017/");
        assert_eq!(settings.db_name, "student_attendance_db");
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.socket_addr().unwrap().to_string(), "0.0.0.0:5000");
        assert_eq!(settings.log_dir, None);
    }

    #[test]
    fn test_environment_overrides() {
        let settings = load_settings_from(vars(&[
            ("MONGO_URI", "mongodb://db:27017/"),
            ("DB_NAME", "school"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("LOG_DIR", "/tmp/rollcall"),
        ]))
        .unwrap();
        assert_eq!(settings.mongo_uri, "mongodb://db:27017/");
        assert_eq!(settings.db_name, "school");
        assert_eq!(settings.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(settings.log_dir.as_deref(), Some("/tmp/rollcall"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            load_settings_from(vars(&[("DB_NAME", " ")])),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            load_settings_from(vars(&[("HOST", "not-an-ip")])),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(load_settings_from(vars(&[("PORT", "seventy")])).is_err());
    }
}
