// src/config.rs

use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::sys::host::LocalTestAction;

pub const PARAMS_VAR: &str = "SECRET_FETCH_PARAMS";
pub const ENDPOINT_VAR: &str = "SECRET_FETCH_ENDPOINT_URL";
pub const LOG_FORMAT_VAR: &str = "SECRET_FETCH_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings of the stand-alone runner. The action's own inputs always come from
/// the parameter file, never from here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    pub params_path: PathBuf,
    /// Overrides the Secrets Manager endpoint (LocalStack and similar emulators).
    pub endpoint_url: Option<String>,
    pub log_format: LogFormat,
}

impl RunnerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let params_path = non_blank(PARAMS_VAR)
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingVar(PARAMS_VAR))?;

        let log_format = match non_blank(LOG_FORMAT_VAR).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        };

        Ok(Self {
            params_path,
            endpoint_url: non_blank(ENDPOINT_VAR),
            log_format,
        })
    }

    pub fn load_test_action(&self) -> Result<LocalTestAction, ConfigError> {
        let path = self.params_path.display().to_string();
        let raw = fs::read_to_string(&self.params_path).map_err(|source| ConfigError::ReadParams {
            path: path.clone(),
            source,
        })?;
        LocalTestAction::from_json(&raw).map_err(|source| ConfigError::ParseParams { path, source })
    }
}
