//! Connection config resolution for the AIO Tests upstream.
//!
//! Checks two locations in precedence order:
//! 1. `./mcp.json` (project-local)
//! 2. `~/.cursor/mcp.json` (user-global)
//!
//! Values under the `"jira-aio"` → `"env"` namespace win over same-named
//! process environment variables. A missing or unreadable file is not an
//! error; missing `AIO_URL` or `AIO_TOKEN` after both sources is.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

const CONFIG_FILENAME: &str = "mcp.json";
const GLOBAL_CONFIG_DIR: &str = ".cursor";
const NAMESPACE_KEY: &str = "jira-aio";

pub const URL_KEY: &str = "AIO_URL";
pub const TOKEN_KEY: &str = "AIO_TOKEN";
pub const AUTH_MODE_KEY: &str = "AIO_AUTH_MODE";
pub const ALLOW_INSECURE_KEY: &str = "AIO_ALLOW_INSECURE";

/// Configuration resolution failures. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required in mcp.json or the environment")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// How the static token is forwarded to the upstream API.
///
/// The token itself is taken verbatim: in basic mode it must already be the
/// base64-encoded `user:apitoken` pair AIO expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Basic,
    Bearer,
}

impl AuthMode {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "bearer" => Some(Self::Bearer),
            _ => None,
        }
    }
}

/// Resolved connection facts. Immutable after startup; passed explicitly into
/// the client rather than held in process-global state.
#[derive(Debug, Clone)]
pub struct AioConfig {
    /// Upstream base URL without a trailing slash.
    pub base_url: String,
    /// Pre-encoded credential forwarded in the `Authorization` header.
    pub token: String,
    pub auth_mode: AuthMode,
    /// Skip TLS certificate verification for self-signed upstreams. Off by
    /// default; only honored when explicitly enabled.
    pub allow_insecure: bool,
}

impl AioConfig {
    /// Resolve configuration from the discovered config file and the process
    /// environment. Called once at startup.
    pub fn resolve() -> Result<Self, ConfigError> {
        let file_values = load_file_values();
        Self::from_lookup(|key| {
            file_values
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
        })
    }

    /// Resolve from an arbitrary key lookup. Split out so tests can inject
    /// sources without touching the process environment.
    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_empty(URL_KEY).ok_or(ConfigError::Missing(URL_KEY))?;
        let token = non_empty(TOKEN_KEY).ok_or(ConfigError::Missing(TOKEN_KEY))?;

        let auth_mode = match non_empty(AUTH_MODE_KEY) {
            Some(value) => AuthMode::parse(&value).ok_or(ConfigError::Invalid {
                key: AUTH_MODE_KEY,
                value,
                reason: "expected 'basic' or 'bearer'",
            })?,
            None => AuthMode::default(),
        };

        let allow_insecure = match non_empty(ALLOW_INSECURE_KEY) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                key: ALLOW_INSECURE_KEY,
                value,
                reason: "expected 'true' or 'false'",
            })?,
            None => false,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            auth_mode,
            allow_insecure,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Load the `"jira-aio"` env map from the first discovered config file.
/// Read or parse failures degrade to environment-only resolution.
fn load_file_values() -> HashMap<String, String> {
    let Some(path) = find_config_file() else {
        return HashMap::new();
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => match parse_file_values(&contents) {
            Ok(values) => {
                info!(path = %path.display(), "Loaded AIO config");
                values
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse mcp.json, falling back to environment");
                HashMap::new()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read mcp.json, falling back to environment");
            HashMap::new()
        }
    }
}

/// Extract string values under `{"jira-aio": {"env": {...}}}`. Non-string
/// values are coerced via their JSON rendering, matching how the host writes
/// this file.
fn parse_file_values(contents: &str) -> Result<HashMap<String, String>, serde_json::Error> {
    let root: serde_json::Value = serde_json::from_str(contents)?;
    let mut values = HashMap::new();
    if let Some(env) = root
        .get(NAMESPACE_KEY)
        .and_then(|ns| ns.get("env"))
        .and_then(|env| env.as_object())
    {
        for (key, value) in env {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            values.insert(key.clone(), rendered);
        }
    }
    Ok(values)
}

/// Search for the config file in precedence order.
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    if let Some(home) = home_dir() {
        let global = home.join(GLOBAL_CONFIG_DIR).join(CONFIG_FILENAME);
        if global.is_file() {
            return Some(global);
        }
    }

    None
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
