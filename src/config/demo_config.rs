//! config/demo_config.rs
//! Configuración de la demo, leída de variables de entorno (o `.env`).

use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

pub const DIVIDER_WIDTH: usize = 80;

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub database_url: String,
    pub echo: bool, // loguear cada statement SQL
    pub max_connections: u32,
    /// Cuánto esperar por una conexión del pool antes de fallar.
    pub acquire_timeout: Duration,
    pub divider_width: usize,
    pub bind_address: String,
    pub port: u16,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            database_url: String::new(),
            echo: true,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            divider_width: DIVIDER_WIDTH,
            bind_address: "0.0.0.0".to_string(),
            port: 5022,
        }
    }
}

impl DemoConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Igual que `from_env`, pero con una función de lookup inyectable
    /// (así los tests no tocan el entorno del proceso).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DemoConfig::default();

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL is not set"))?;

        Ok(DemoConfig {
            database_url,
            echo: match lookup("DEMO_ECHO") {
                Some(raw) => parse_bool("DEMO_ECHO", &raw)?,
                None => defaults.echo,
            },
            max_connections: parse_or("DEMO_MAX_CONNECTIONS", &lookup, defaults.max_connections)?,
            acquire_timeout: Duration::from_secs(parse_or(
                "DEMO_ACQUIRE_TIMEOUT_SECS",
                &lookup,
                defaults.acquire_timeout.as_secs(),
            )?),
            divider_width: parse_or("DEMO_DIVIDER_WIDTH", &lookup, defaults.divider_width)?,
            bind_address: lookup("DEMO_BIND").unwrap_or(defaults.bind_address),
            port: parse_or("DEMO_PORT", &lookup, defaults.port)?,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Valor inválido para {key}: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("Valor inválido para {key}: {raw:?}")),
    }
}
