use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{FetchError, HostError};
use crate::sys::secrets::{ClientAuth, SecretValue};

// ==============================================================================
// 1. Host Parameter Tree
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ActionMode {
    Input,
    Buffer,
    Verify,
    WaitOn,
    Select,
}

/// One node of the host's parameter tree. Configuration groups carry children,
/// leaf parameters carry a value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub mode: ActionMode,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub children: Vec<Parameter>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, mode: ActionMode, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            mode,
            value: value.map(str::to_string),
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>, children: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            mode: ActionMode::Input,
            value: None,
            children,
        }
    }

    /// Child lookup restricted to the given action modes.
    pub fn child(&self, name: &str, modes: &[ActionMode]) -> Option<&Parameter> {
        self.children
            .iter()
            .find(|c| c.name == name && modes.contains(&c.mode))
    }

    /// A present parameter always yields an input value; an unset value reads as "".
    pub fn input_value(&self) -> String {
        self.value.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultState {
    Ok,
    Failed,
}

// ==============================================================================
// 2. Host Capabilities (implemented by the automation engine)
// ==============================================================================

pub trait TestAction: Send + Sync {
    fn parameter(&self, name: &str) -> Option<Parameter>;

    /// Attaches a per-parameter outcome to the running test step.
    fn set_result_for_parameter(&self, parameter: &Parameter, state: ResultState, message: &str);
}

pub trait BufferStore: Send + Sync {
    /// Overwrites any existing entry under `name`.
    fn set_buffer(&self, name: &str, value: &str) -> Result<(), HostError>;

    fn get_buffer(&self, name: &str) -> Option<String>;
}

/// The engine's generic routine for output parameters that are not buffers
/// (verification, wait-on, ...).
pub trait ActualValueHandler: Send + Sync {
    fn handle_actual_value(
        &self,
        test_action: &dyn TestAction,
        parameter: &Parameter,
        actual: Option<&str>,
    ) -> Result<(), HostError>;
}

// ==============================================================================
// 3. Secret Store
// ==============================================================================

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// `Ok(None)` means the store answered but the secret has no string payload.
    async fn get_secret_value(&self, secret_id: &str) -> Result<Option<SecretValue>, FetchError>;
}

#[async_trait]
pub trait SecretStoreConnector: Send + Sync {
    async fn connect(&self, region: &str, auth: ClientAuth)
    -> Result<Box<dyn SecretStore>, FetchError>;
}
