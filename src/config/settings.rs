//! Application settings loaded from config.toml and the environment.
//!
//! The TOML file is optional; every setting has a default. Environment
//! variables (typically from `.env`) override the file.

use crate::{
    config::database::DEFAULT_DATABASE_URL,
    core::{
        DEFAULT_PREVIEW_MONTHS, ServiceSettings, ValidationLimits, types::max_storable_money,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Path to the settings file used when `LOAN_CONFIG_PATH` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Address the HTTP server binds to by default, matching the browser client.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Everything the service needs at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `host:port` for the HTTP server
    pub bind_addr: String,
    /// `SeaORM` connection URL
    pub database_url: String,
    /// Months of schedule included in detail responses
    pub schedule_preview_months: usize,
    /// Input bounds
    pub limits: ValidationLimits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            schedule_preview_months: DEFAULT_PREVIEW_MONTHS,
            limits: ValidationLimits::default(),
        }
    }
}

impl AppConfig {
    /// Settings for the scenario service.
    #[must_use]
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            preview_months: self.schedule_preview_months,
            limits: self.limits.clone(),
        }
    }

    /// Applies `LOAN_BIND_ADDR`, `DATABASE_URL` and `LOAN_PREVIEW_MONTHS`
    /// overrides using `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("LOAN_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(months) = lookup("LOAN_PREVIEW_MONTHS") {
            self.schedule_preview_months = months.trim().parse().map_err(|e| Error::Config {
                message: format!("LOAN_PREVIEW_MONTHS must be a positive integer: {e}"),
            })?;
        }
        Ok(())
    }

    /// Rejects settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.schedule_preview_months == 0 {
            return Err(Error::Config {
                message: "schedule_preview_months must be at least 1".to_string(),
            });
        }
        if self.limits.max_term_months == 0 {
            return Err(Error::Config {
                message: "limits.max_term_months must be at least 1".to_string(),
            });
        }
        if self.limits.max_amount <= Decimal::ZERO {
            return Err(Error::Config {
                message: "limits.max_amount must be positive".to_string(),
            });
        }
        if self.limits.max_apr < Decimal::ZERO {
            return Err(Error::Config {
                message: "limits.max_apr must not be negative".to_string(),
            });
        }

        // A one-month term pays the most: amount plus a month of interest,
        // bounded here by a full year of interest.
        let largest_payment = self
            .limits
            .max_apr
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|rate| rate.checked_add(Decimal::ONE))
            .and_then(|factor| self.limits.max_amount.checked_mul(factor));
        let storable = max_storable_money();
        if largest_payment.is_none_or(|payment| payment > storable) {
            return Err(Error::Config {
                message: format!(
                    "limits.max_amount {} at max_apr {} exceeds storable money {storable}",
                    self.limits.max_amount, self.limits.max_apr
                ),
            });
        }
        Ok(())
    }
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads the full application configuration.
///
/// Reads the file named by `LOAN_CONFIG_PATH` (default `config.toml`) when it
/// exists, applies environment overrides and validates the result.
pub fn load_app_config() -> Result<AppConfig> {
    let path =
        std::env::var("LOAN_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&path).exists() {
        info!("Loading configuration from {path}");
        load_config(&path)?
    } else {
        info!("No configuration file at {path}; using defaults");
        AppConfig::default()
    };

    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}
