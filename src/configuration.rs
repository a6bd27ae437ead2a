//! Layered settings: built-in defaults, then an optional `configuration`
//! file (any format the `config` crate understands), then `APP_*`
//! environment variables such as `APP_APPLICATION__PORT=8080` or
//! `APP_DATABASE__PATH=trivia.db`. A `.env` file is loaded first.

use serde::Deserialize;
use serde_aux::field_attributes::{
    deserialize_bool_from_anything, deserialize_number_from_string,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub create_if_missing: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

pub fn get_configuration(file: Option<&str>) -> Result<Settings, config::ConfigError> {
    dotenv::dotenv().ok();
    config::Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8080_i64)?
        .set_default("database.path", "trivia.db")?
        .set_default("database.create_if_missing", true)?
        .set_default("database.max_connections", 5_i64)?
        .add_source(config::File::with_name(file.unwrap_or("configuration")).required(file.is_some()))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
