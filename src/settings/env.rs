//! Environment variable loader.
//!
//! | Variable | Setter |
//! |----------|--------|
//! | `MIKROTIK_USER` | [`SettingsBuilder::username`] |
//! | `MIKROTIK_PASSWD` | [`SettingsBuilder::password`] |
//! | `MIKROTIK_API_TRANSPORT` | [`SettingsBuilder::transport`] (`TCP` or `SSL`) |
//! | `MIKROTIK_SSL_CHECK_CERT` | [`SettingsBuilder::verify_certificate`] |
//! | `MIKROTIK_SSL_CHECK_HOSTNAME` | [`SettingsBuilder::verify_hostname`] |
//! | `MIKROTIK_SSL_CAFILE` | [`SettingsBuilder::ca_file`] |
//! | `MIKROTIK_MAX_CONN_PER_HOST` | [`SettingsBuilder::pool_capacity`] |
//! | `MIKROTIK_CONN_TIMEOUT` | [`SettingsBuilder::idle_ttl`] (seconds) |
//!
//! Unset variables keep the builder defaults.

// ============================================================================
// Imports
// ============================================================================

use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};

use super::builder::SettingsBuilder;
use super::core::Settings;

// ============================================================================
// Constants
// ============================================================================

const USER: &str = "MIKROTIK_USER";
const PASSWORD: &str = "MIKROTIK_PASSWD";
const TRANSPORT: &str = "MIKROTIK_API_TRANSPORT";
const CHECK_CERT: &str = "MIKROTIK_SSL_CHECK_CERT";
const CHECK_HOSTNAME: &str = "MIKROTIK_SSL_CHECK_HOSTNAME";
const CA_FILE: &str = "MIKROTIK_SSL_CAFILE";
const MAX_CONN: &str = "MIKROTIK_MAX_CONN_PER_HOST";
const CONN_TIMEOUT: &str = "MIKROTIK_CONN_TIMEOUT";

// ============================================================================
// Settings - Environment
// ============================================================================

impl Settings {
    /// Loads and validates settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable cannot be parsed or the
    /// resulting combination is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = SettingsBuilder::new();

        if let Some(user) = lookup(USER) {
            builder = builder.username(user);
        }
        if let Some(password) = lookup(PASSWORD) {
            builder = builder.password(password);
        }
        if let Some(transport) = lookup(TRANSPORT) {
            builder = builder.transport(transport.parse()?);
        }
        if let Some(value) = lookup(CHECK_CERT) {
            builder = builder.verify_certificate(parse_bool(CHECK_CERT, &value)?);
        }
        if let Some(value) = lookup(CHECK_HOSTNAME) {
            builder = builder.verify_hostname(parse_bool(CHECK_HOSTNAME, &value)?);
        }
        if let Some(path) = lookup(CA_FILE) {
            builder = builder.ca_file(path);
        }
        if let Some(value) = lookup(MAX_CONN) {
            builder = builder.pool_capacity(parse_number(MAX_CONN, &value)?);
        }
        if let Some(value) = lookup(CONN_TIMEOUT) {
            builder = builder.idle_ttl(Duration::from_secs(parse_number(CONN_TIMEOUT, &value)?));
        }

        let settings = builder.build()?;
        debug!(
            transport = %settings.transport(),
            capacity = settings.pool().capacity.get(),
            idle_ttl_secs = settings.pool().idle_ttl.as_secs(),
            "Settings loaded from environment"
        );
        Ok(settings)
    }
}

// ============================================================================
// Parsing Helpers
// ============================================================================

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::config(format!("{key}: expected a boolean, got \"{other}\""))),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{key}: expected a number, got \"{value}\"")))
}

// ============================================================================
// Tests
// ============================================================================
