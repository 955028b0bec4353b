use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

use crate::auth::{AuthConfig, DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB, DEFAULT_TOKEN_TTL_SECS};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not defined in environment variables")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Who may see and change a todo.
///
/// `Shared` lets every authenticated user read, update and delete any todo.
/// `Owner` restricts all of that to the todo's creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoOwnership {
    #[default]
    Shared,
    Owner,
}

impl FromStr for TodoOwnership {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(TodoOwnership::Shared),
            "owner" => Ok(TodoOwnership::Owner),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TodoOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoOwnership::Shared => f.write_str("shared"),
            TodoOwnership::Owner => f.write_str("owner"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub auth: AuthConfig,
    pub ownership: TodoOwnership,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let database_url = required("DATABASE_URL")?;
        let secret = required("JWT_SECRET")?;

        let host = parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let ttl_secs = parse_or(&lookup, "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        let hash_iterations = parse_or(&lookup, "PASSWORD_HASH_COST", DEFAULT_HASH_ITERATIONS)?;
        let ownership = parse_or(&lookup, "TODO_OWNERSHIP", TodoOwnership::default())?;

        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_SECS",
                value: ttl_secs.to_string(),
            });
        }

        Ok(Self {
            database_url,
            host,
            port,
            auth: AuthConfig {
                secret,
                token_ttl: Duration::seconds(ttl_secs),
                hash_iterations,
                hash_memory_kib: DEFAULT_HASH_MEMORY_KIB,
            },
            ownership,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
