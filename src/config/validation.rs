//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::helpers::is_valid_email;
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;

    if let Some(ref admin) = settings.bootstrap_admin {
        validate_bootstrap_admin(admin)?;
    }

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(ReserveHubError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(ReserveHubError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ReserveHubError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(ReserveHubError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ReserveHubError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ReserveHubError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ReserveHubError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if matches!(config.file_path.as_deref(), Some("")) {
        return Err(ReserveHubError::Config(
            "Log file path cannot be empty when set".to_string()
        ));
    }

    Ok(())
}

/// Validate bootstrap administrator
fn validate_bootstrap_admin(config: &super::BootstrapAdminConfig) -> Result<()> {
    if !is_valid_email(&config.email) {
        return Err(ReserveHubError::Config(
            format!("Bootstrap admin email is invalid: {}", config.email)
        ));
    }

    if config.password.is_empty() {
        return Err(ReserveHubError::Config(
            "Bootstrap admin password is required".to_string()
        ));
    }

    Ok(())
}
