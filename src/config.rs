//! Gate configuration parsed from key/value lookups.
//!
//! The browser bundle reads its values at compile time (`option_env!`)
//! through [`GateConfig::from_lookup`], which tests drive with a map.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
pub const DEFAULT_FORBIDDEN_PATH: &str = "/forbidden";
pub const DEFAULT_ELEVATION_CLAIM: &str = "is_admin";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A route path did not start with `/`.
    #[error("{key} must be an absolute path, got {value:?}")]
    RelativePath { key: &'static str, value: String },

    /// The elevation claim name was empty.
    #[error("{key} must not be empty")]
    Empty { key: &'static str },

    /// Login and forbidden views must be distinct routes.
    #[error("login and forbidden paths must differ (both {0:?})")]
    SameRedirectTargets(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub login_path: String,
    pub forbidden_path: String,
    /// Claim name whose boolean `true` value grants elevated privilege.
    pub elevation_claim: String,
    /// Prefix for API calls; empty means same origin.
    pub api_base_url: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            forbidden_path: DEFAULT_FORBIDDEN_PATH.to_owned(),
            elevation_claim: DEFAULT_ELEVATION_CLAIM.to_owned(),
            api_base_url: String::new(),
        }
    }
}

impl GateConfig {
    /// Build typed config from an arbitrary key lookup.
    ///
    /// Optional:
    /// - `GATE_LOGIN_PATH`: default `/auth/login`
    /// - `GATE_FORBIDDEN_PATH`: default `/forbidden`
    /// - `GATE_ELEVATION_CLAIM`: default `is_admin`
    /// - `GATE_API_BASE_URL`: default empty (same origin)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let login_path = parse_path(&lookup, "GATE_LOGIN_PATH", DEFAULT_LOGIN_PATH)?;
        let forbidden_path = parse_path(&lookup, "GATE_FORBIDDEN_PATH", DEFAULT_FORBIDDEN_PATH)?;
        if login_path == forbidden_path {
            return Err(ConfigError::SameRedirectTargets(login_path));
        }

        let elevation_claim = match lookup("GATE_ELEVATION_CLAIM") {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::Empty { key: "GATE_ELEVATION_CLAIM" }),
            Some(raw) => raw.trim().to_owned(),
            None => DEFAULT_ELEVATION_CLAIM.to_owned(),
        };

        let api_base_url = lookup("GATE_API_BASE_URL")
            .unwrap_or_default()
            .trim()
            .trim_end_matches('/')
            .to_owned();

        Ok(Self { login_path, forbidden_path, elevation_claim, api_base_url })
    }

    /// Build config from values baked in at compile time.
    ///
    /// # Errors
    ///
    /// See [`GateConfig::from_lookup`].
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                "GATE_LOGIN_PATH" => option_env!("GATE_LOGIN_PATH"),
                "GATE_FORBIDDEN_PATH" => option_env!("GATE_FORBIDDEN_PATH"),
                "GATE_ELEVATION_CLAIM" => option_env!("GATE_ELEVATION_CLAIM"),
                "GATE_API_BASE_URL" => option_env!("GATE_API_BASE_URL"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Join the API base URL with an absolute API path.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }
}

fn parse_path<F>(lookup: &F, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default.to_owned());
    };
    let value = raw.trim();
    if !value.starts_with('/') {
        return Err(ConfigError::RelativePath { key, value: raw });
    }
    if value.len() > 1 {
        return Ok(value.trim_end_matches('/').to_owned());
    }
    Ok(value.to_owned())
}
