use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use rookery_api::PasswordScheme;
use rookery_db::StorageConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    pub password_scheme: PasswordScheme,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("ROOKERY_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("ROOKERY_PORT")
            .unwrap_or_else(|| "8081".into())
            .parse()
            .context("ROOKERY_PORT must be a port number")?;

        let storage = match lookup("ROOKERY_STORAGE")
            .unwrap_or_else(|| "sqlite".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StorageConfig::Memory,
            "sqlite" => StorageConfig::Sqlite {
                path: PathBuf::from(lookup("ROOKERY_DB_PATH").unwrap_or_else(|| "rookery.db".into())),
            },
            other => bail!("unknown ROOKERY_STORAGE '{}', expected memory or sqlite", other),
        };

        let password_scheme = match lookup("ROOKERY_PASSWORD_SCHEME") {
            Some(raw) => raw
                .parse::<PasswordScheme>()
                .context("invalid ROOKERY_PASSWORD_SCHEME")?,
            None => PasswordScheme::default(),
        };

        Ok(Self {
            host,
            port,
            storage,
            password_scheme,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
