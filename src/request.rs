// src/request.rs

use zeroize::Zeroizing;

use crate::error::{ActionError, HostError};
use crate::sys::logs::ExecutionLog;
use crate::sys::secrets::ClientAuth;
use crate::sys::traits::{ActionMode, Parameter, TestAction};

pub const CONFIGURATION_GROUP: &str = "AWS_Configurations";
pub const REGION: &str = "Region";
pub const ACCESS_KEY: &str = "AccessKey";
pub const SECRET_KEY: &str = "SecretAccess";
pub const SECRET_NAME: &str = "SecretName";
pub const OUTPUT: &str = "Output";

/// Where the fetched payload goes once retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Written to the shared buffer store under `buffer`.
    Buffer { parameter: Parameter, buffer: String },
    /// Handed to the engine's actual-value routine.
    Value { parameter: Parameter },
}

impl OutputTarget {
    fn from_parameter(parameter: Parameter) -> Result<Self, HostError> {
        if parameter.mode != ActionMode::Buffer {
            return Ok(OutputTarget::Value { parameter });
        }
        let buffer = parameter.input_value();
        if buffer.is_empty() {
            return Err(HostError::EmptyBufferName(parameter.name));
        }
        Ok(OutputTarget::Buffer { parameter, buffer })
    }

    pub fn parameter(&self) -> &Parameter {
        match self {
            OutputTarget::Buffer { parameter, .. } | OutputTarget::Value { parameter } => parameter,
        }
    }
}

/// Everything one invocation needs, read once from the host parameter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub region: String,
    pub auth: ClientAuth,
    pub secret_name: String,
    pub output: OutputTarget,
}

impl ActionRequest {
    /// Reads and validates the parameters, recording one log line per missing input.
    ///
    /// The `Output` parameter is resolved here as well, before any client is built.
    /// This runs early on purpose: a test step without a usable output slot fails
    /// without making the remote call, instead of fetching a secret it cannot deliver.
    pub fn from_test_action(
        test_action: &dyn TestAction,
        log: &mut ExecutionLog,
    ) -> Result<Self, ActionError> {
        let Some(config) = test_action.parameter(CONFIGURATION_GROUP) else {
            log.record(crate::action::MISSING_CONFIGURATION_MESSAGE);
            return Err(ActionError::MissingConfiguration);
        };
        log.record("Fetching AWS configuration parameters...");

        let input = |name: &str| {
            config
                .child(name, &[ActionMode::Input])
                .map(Parameter::input_value)
        };
        let region = input(REGION);
        let access_key = input(ACCESS_KEY).map(Zeroizing::new);
        let secret_key = input(SECRET_KEY).map(Zeroizing::new);
        let secret_name = test_action
            .parameter(SECRET_NAME)
            .map(|p| p.input_value());

        if secret_name.is_none() {
            log.record("Secret Name parameter is missing.");
        }
        if region.is_none() {
            log.record("Region parameter is missing.");
        }
        if access_key.is_none() {
            log.record("AWS Access Key parameter is missing.");
        }
        if secret_key.is_none() {
            log.record("AWS Secret Key parameter is missing.");
        }

        let (Some(secret_name), Some(region), Some(access_key), Some(secret_key)) =
            (secret_name, region, access_key, secret_key)
        else {
            return Err(ActionError::MissingInput);
        };
        log.record(format!("Secret Name: {}, Region: {}", secret_name, region));

        let output = test_action
            .parameter(OUTPUT)
            .ok_or_else(|| HostError::MissingParameter(OUTPUT.to_string()))?;

        Ok(Self {
            auth: ClientAuth::from_keys(&access_key, &secret_key),
            region,
            secret_name,
            output: OutputTarget::from_parameter(output)?,
        })
    }
}
