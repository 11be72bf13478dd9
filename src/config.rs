use anyhow::{Context, bail};
use std::env;
use std::fmt;

/// Runtime mode. Decides log format and how much detail a 500 response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    /// Anything other than "production" (case-insensitive) is treated as development.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub api_token: String,
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .map(|label| Environment::from_label(&label))
            .unwrap_or(Environment::Development);

        let api_token = match lookup("API_TOKEN") {
            Some(token) if !token.is_empty() => token,
            _ => bail!("API_TOKEN must be set to a non-empty value"),
        };

        // default to 8000 if API_PORT is not set
        let api_port = lookup("API_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .trim()
            .parse::<u16>()
            .context("API_PORT must be a valid port number (1-65535)")?;

        Ok(Self {
            environment,
            api_token,
            api_port,
        })
    }
}
