use std::env;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Trust `X-Forwarded-For` when resolving the client address. Enable
    /// only behind a proxy that overwrites the header.
    pub trust_proxy: bool,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let port = match env::var("VOTEX_PORT") {
            Ok(value) => match parse_port(&value) {
                Some(port) => port,
                None => {
                    return Err(ConfigError::Invalid {
                        name: "VOTEX_PORT",
                        value,
                    });
                }
            },
            Err(_) => DEFAULT_PORT,
        };

        let trust_proxy = match env::var("VOTEX_TRUST_PROXY") {
            Ok(value) => parse_flag(&value),
            Err(_) => false,
        };

        Ok(Config {
            database_url,
            port,
            trust_proxy,
        })
    }
}

fn parse_port(value: &str) -> Option<u16> {
    value.trim().parse().ok()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
