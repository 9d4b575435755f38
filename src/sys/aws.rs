// src/sys/aws.rs

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::config::Credentials;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::{GetSecretValueError, GetSecretValueOutput};
use aws_sdk_secretsmanager::Client;

use crate::error::FetchError;
use crate::sys::secrets::{ClientAuth, SecretValue};
use crate::sys::traits::{SecretStore, SecretStoreConnector};

const PROVIDER_NAME: &str = "secret-fetch-action";

// ==============================================================================
// 1. Connector (one client per invocation)
// ==============================================================================

#[derive(Debug, Clone, Default)]
pub struct AwsSecretsManagerConnector {
    endpoint_url: Option<String>,
}

impl AwsSecretsManagerConnector {
    pub fn new(endpoint_url: Option<String>) -> Self {
        Self { endpoint_url }
    }
}

#[async_trait]
impl SecretStoreConnector for AwsSecretsManagerConnector {
    async fn connect(
        &self,
        region: &str,
        auth: ClientAuth,
    ) -> Result<Box<dyn SecretStore>, FetchError> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_owned()));

        if let ClientAuth::Static(creds) = &auth {
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id(),
                creds.secret_access_key(),
                None,
                None,
                PROVIDER_NAME,
            ));
        }

        let shared_config = loader.load().await;
        let mut builder = aws_sdk_secretsmanager::config::Builder::from(&shared_config);
        if let Some(endpoint) = self.endpoint_url.as_deref() {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Box::new(AwsSecretsManagerStore {
            client: Client::from_conf(builder.build()),
        }))
    }
}

// ==============================================================================
// 2. Store
// ==============================================================================

pub struct AwsSecretsManagerStore {
    client: Client,
}

#[async_trait]
impl SecretStore for AwsSecretsManagerStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<Option<SecretValue>, FetchError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(classify)?;

        Ok(string_payload(&output))
    }
}

// ==============================================================================
// 3. Response & Error Mapping
// ==============================================================================

/// Only `SecretString` counts. A secret stored as `SecretBinary` has no string
/// payload and reads as absent.
fn string_payload(output: &GetSecretValueOutput) -> Option<SecretValue> {
    output
        .secret_string()
        .map(|payload| SecretValue::new(payload.to_owned()))
}

/// Service answers (unknown secret, access denied, decryption failure) become
/// `Provider`; anything that never reached the service becomes `General`.
fn classify(err: SdkError<GetSecretValueError>) -> FetchError {
    match err.as_service_error() {
        Some(service_err) => FetchError::Provider(
            service_err
                .message()
                .map(str::to_owned)
                .unwrap_or_else(|| service_err.to_string()),
        ),
        None => FetchError::General(DisplayErrorContext(&err).to_string()),
    }
}
