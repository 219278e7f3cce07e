use std::net::SocketAddr;
use std::path::PathBuf;

use gigline_types::models::{Language, UnsupportedLanguage};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid GIGLINE_PORT '{0}'")]
    InvalidPort(String),

    #[error("invalid listen address {0}")]
    InvalidAddr(#[from] std::net::AddrParseError),

    #[error("invalid GIGLINE_DEFAULT_LANGUAGE: {0}")]
    InvalidLanguage(#[from] UnsupportedLanguage),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub jwt_secret: String,
    pub actors_path: Option<PathBuf>,
    pub default_language: Language,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = var("GIGLINE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = var("GIGLINE_PORT").unwrap_or_else(|| "3000".into());
        let port: u16 = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

        let default_language = match var("GIGLINE_DEFAULT_LANGUAGE") {
            Some(lang) => lang.parse()?,
            None => Language::default(),
        };

        Ok(Self {
            addr,
            jwt_secret: var("GIGLINE_JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.into()),
            actors_path: var("GIGLINE_ACTORS_PATH").map(PathBuf::from),
            default_language,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}
