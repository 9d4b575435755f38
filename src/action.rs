// src/action.rs

use std::sync::Arc;
use tracing::instrument;

use crate::error::{ActionError, FetchError};
use crate::request::{ActionRequest, OutputTarget};
use crate::result::{ActionResult, FailureKind};
use crate::sys::logs::ExecutionLog;
use crate::sys::secrets::SecretValue;
use crate::sys::traits::{
    ActualValueHandler, BufferStore, ResultState, SecretStore, SecretStoreConnector, TestAction,
};

/// Name under which the host engine registers this action.
pub const ACTION_NAME: &str = "AWS_Secret_Manager_getSecret";

/// Inherited wording from the S3 action this one was derived from, kept verbatim on
/// purpose. `FailureKind::MissingConfiguration` identifies the case without the text.
pub const MISSING_CONFIGURATION_MESSAGE: &str = "S3 Configuration parameters are missing.";

const PASSED_MESSAGE: &str = "Secret retrieved successfully.";
const UNHANDLED_MESSAGE: &str = "Error during secret retrieval.";

// ==============================================================================
// 1. Action (one invocation = one request, one log, one fetch)
// ==============================================================================

/// Fetches one named secret from the secret store and hands it to the host.
///
/// The action holds only shared capabilities; the request and transcript of each
/// call live inside `execute`, so one instance may serve concurrent invocations.
pub struct SecretFetchAction {
    connector: Arc<dyn SecretStoreConnector>,
    buffers: Arc<dyn BufferStore>,
    actual_values: Arc<dyn ActualValueHandler>,
}

impl SecretFetchAction {
    pub fn new(
        connector: Arc<dyn SecretStoreConnector>,
        buffers: Arc<dyn BufferStore>,
        actual_values: Arc<dyn ActualValueHandler>,
    ) -> Self {
        Self {
            connector,
            buffers,
            actual_values,
        }
    }

    /// Runs the action. Every failure comes back as `ActionResult::Failed`.
    #[instrument(skip_all, fields(action = ACTION_NAME))]
    pub async fn execute(&self, test_action: &dyn TestAction) -> ActionResult {
        let mut log = ExecutionLog::new();
        log.record("Starting AWS Secrets Manager retrieval execution...");

        match self.run(test_action, &mut log).await {
            Ok(()) => ActionResult::passed(PASSED_MESSAGE, log),
            Err(err) => {
                let kind = FailureKind::from(&err);
                tracing::warn!(?kind, "Secret retrieval failed: {}", err);
                let message = match kind {
                    FailureKind::Unhandled => {
                        log.record(format!("An error occurred during secret retrieval: {}", err));
                        UNHANDLED_MESSAGE.to_string()
                    }
                    _ => err.to_string(),
                };
                ActionResult::failed(kind, message, log)
            }
        }
    }

    async fn run(&self, test_action: &dyn TestAction, log: &mut ExecutionLog) -> Result<(), ActionError> {
        // 1. Parameter Extraction
        // Everything the call needs is read up front; a missing group or input stops
        // here, before any credentials leave the parameter tree.
        let request = ActionRequest::from_test_action(test_action, log)?;

        // 2. Client Construction
        // Binary branch only: both keys non-empty means explicit credentials, anything
        // else leaves resolution to the SDK's default chain (env, profile, role).
        log.record("Initializing AWS Secrets Manager client...");
        let explicit = !request.auth.is_ambient();
        let store = self
            .connector
            .connect(&request.region, request.auth.clone())
            .await?;
        if explicit {
            log.record("Initialized AWS Secrets Manager client with provided access and secret keys.");
        } else {
            log.record("Initialized AWS Secrets Manager client with default credentials.");
        }

        // 3. Single Fetch
        // One call, no retry. An answer without a string payload is treated exactly
        // like an empty string.
        log.record(format!("Retrieving secret value for: {}", request.secret_name));
        let secret = match fetch_secret(store.as_ref(), &request.secret_name, log).await? {
            Some(secret) if !secret.is_empty() => secret,
            _ => return Err(ActionError::EmptySecret(request.secret_name)),
        };
        log.record(format!(
            "Successfully retrieved the secret value for: {}",
            request.secret_name
        ));

        // 4. Output Delivery
        // `secret` is moved into `deliver` and dropped (zeroized) when it returns.
        self.deliver(test_action, &request.output, secret, log)
    }

    fn deliver(
        &self,
        test_action: &dyn TestAction,
        output: &OutputTarget,
        secret: SecretValue,
        log: &mut ExecutionLog,
    ) -> Result<(), ActionError> {
        match output {
            OutputTarget::Buffer { parameter, buffer } => {
                secret.use_secret(|value| self.buffers.set_buffer(buffer, value))?;
                let message = format!("Buffer {} set to actual secret value.", buffer);
                test_action.set_result_for_parameter(parameter, ResultState::Ok, &message);
                log.record(message);
            }
            OutputTarget::Value { parameter } => {
                let actual = self.buffers.get_buffer(&parameter.name);
                self.actual_values
                    .handle_actual_value(test_action, parameter, actual.as_deref())?;
                log.record(format!("Actual value handed over for parameter {}.", parameter.name));
            }
        }
        Ok(())
    }
}

// ==============================================================================
// 2. Fetch Step
// ==============================================================================

/// One call against the store. Provider and transport failures get distinct log
/// lines before being returned.
async fn fetch_secret(
    store: &dyn SecretStore,
    secret_name: &str,
    log: &mut ExecutionLog,
) -> Result<Option<SecretValue>, FetchError> {
    store.get_secret_value(secret_name).await.inspect_err(|err| match err {
        FetchError::Provider(msg) => log.record(format!("AWS Secrets Manager error: {}", msg)),
        FetchError::General(msg) => log.record(format!("General error: {}", msg)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ACCESS_KEY, CONFIGURATION_GROUP, OUTPUT, REGION, SECRET_KEY, SECRET_NAME};
    use crate::sys::host::{ActualValueVerifier, InMemoryBuffers, LocalTestAction};
    use crate::sys::secrets::{ClientAuth, StaticCredentials};
    use crate::sys::traits::{ActionMode, Parameter};
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::sync::Mutex;

    #[derive(Clone)]
    enum Reply {
        Payload(Option<&'static str>),
        Fail(FetchError),
    }

    struct FakeStore {
        reply: Reply,
        requested: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SecretStore for FakeStore {
        async fn get_secret_value(&self, secret_id: &str) -> Result<Option<SecretValue>, FetchError> {
            self.requested.lock().unwrap().push(secret_id.to_string());
            match &self.reply {
                Reply::Payload(p) => Ok(p.map(|s| SecretValue::new(s.to_string()))),
                Reply::Fail(e) => Err(e.clone()),
            }
        }
    }

    struct FakeConnector {
        reply: Reply,
        connections: Mutex<Vec<(String, ClientAuth)>>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl FakeConnector {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                connections: Mutex::new(Vec::new()),
                requested: Arc::new(Mutex::new(Vec::new())),
            })
        }
    }

    #[async_trait]
    impl SecretStoreConnector for FakeConnector {
        async fn connect(&self, region: &str, auth: ClientAuth) -> Result<Box<dyn SecretStore>, FetchError> {
            self.connections.lock().unwrap().push((region.to_string(), auth));
            Ok(Box::new(FakeStore {
                reply: self.reply.clone(),
                requested: self.requested.clone(),
            }))
        }
    }

    struct Harness {
        connector: Arc<FakeConnector>,
        buffers: Arc<InMemoryBuffers>,
        action: SecretFetchAction,
    }

    fn harness(reply: Reply) -> Harness {
        let connector = FakeConnector::new(reply);
        let buffers = Arc::new(InMemoryBuffers::new());
        let action = SecretFetchAction::new(connector.clone(), buffers.clone(), Arc::new(ActualValueVerifier));
        Harness { connector, buffers, action }
    }

    fn test_action(access: &str, secret: &str, output: Parameter) -> LocalTestAction {
        LocalTestAction::new(vec![
            Parameter::group(
                CONFIGURATION_GROUP,
                vec![
                    Parameter::new(REGION, ActionMode::Input, Some("us-west-2")),
                    Parameter::new(ACCESS_KEY, ActionMode::Input, Some(access)),
                    Parameter::new(SECRET_KEY, ActionMode::Input, Some(secret)),
                ],
            ),
            Parameter::new(SECRET_NAME, ActionMode::Input, Some("app/api-token")),
            output,
        ])
    }

    fn buffer_output() -> Parameter {
        Parameter::new(OUTPUT, ActionMode::Buffer, Some("MySecretBuffer"))
    }

    #[tokio::test]
    async fn missing_configuration_group_fails_with_legacy_message() {
        let h = harness(Reply::Payload(Some("unused")));
        let action = LocalTestAction::new(vec![Parameter::new(SECRET_NAME, ActionMode::Input, Some("x"))]);

        let result = h.action.execute(&action).await;

        assert_eq!(result.message(), "S3 Configuration parameters are missing.");
        assert_eq!(result.failure_kind(), Some(FailureKind::MissingConfiguration));
        assert!(h.connector.connections.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_inputs_fail_before_connecting() {
        let h = harness(Reply::Payload(Some("unused")));
        let action = LocalTestAction::new(vec![Parameter::group(CONFIGURATION_GROUP, vec![])]);

        let result = h.action.execute(&action).await;

        assert_eq!(result.message(), "Missing required input parameters.");
        assert_eq!(result.failure_kind(), Some(FailureKind::MissingInput));
        assert!(result.log().contains("Region parameter is missing."));
        assert!(h.connector.connections.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_keys_use_ambient_credentials() {
        let h = harness(Reply::Payload(Some("v")));
        let result = h.action.execute(&test_action("", "", buffer_output())).await;

        assert!(result.is_passed());
        let connections = h.connector.connections.lock().unwrap();
        assert_eq!(connections.as_slice(), [("us-west-2".to_string(), ClientAuth::Ambient)]);
        assert!(result.log().contains("Initialized AWS Secrets Manager client with default credentials."));
    }

    #[tokio::test]
    async fn explicit_keys_are_passed_through_unchanged() {
        let h = harness(Reply::Payload(Some("v")));
        let result = h.action.execute(&test_action("AKIAEXAMPLE", "wJalr", buffer_output())).await;

        assert!(result.is_passed());
        let connections = h.connector.connections.lock().unwrap();
        assert_eq!(
            connections[0].1,
            ClientAuth::Static(StaticCredentials::new("AKIAEXAMPLE", "wJalr"))
        );
        assert!(result.log().contains("with provided access and secret keys."));
        assert!(!result.render().contains("wJalr"));
    }

    #[tokio::test]
    async fn empty_payload_is_a_fetch_failure() {
        for reply in [Reply::Payload(Some("")), Reply::Payload(None)] {
            let h = harness(reply);
            let result = h.action.execute(&test_action("", "", buffer_output())).await;

            assert_eq!(result.failure_kind(), Some(FailureKind::FetchFailure));
            assert!(result
                .message()
                .contains("Failed to retrieve the secret value for: app/api-token."));
            assert!(h.buffers.is_empty());
        }
    }

    #[tokio::test]
    async fn buffer_output_receives_secret() {
        let h = harness(Reply::Payload(Some("top-secret-value")));
        let action = test_action("", "", buffer_output());

        let result = h.action.execute(&action).await;

        assert!(result.is_passed());
        assert_eq!(result.message(), "Secret retrieved successfully.");
        assert_eq!(h.buffers.get_buffer("MySecretBuffer").as_deref(), Some("top-secret-value"));
        assert_eq!(*h.connector.requested.lock().unwrap(), ["app/api-token"]);

        let outcomes = action.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].state, ResultState::Ok);
        assert_eq!(outcomes[0].message, "Buffer MySecretBuffer set to actual secret value.");
        assert!(!result.render().contains("top-secret-value"));
    }

    #[tokio::test]
    async fn value_output_hands_existing_buffer_to_host() {
        let h = harness(Reply::Payload(Some("fresh")));
        h.buffers.set_buffer(OUTPUT, "expected").unwrap();
        let action = test_action("", "", Parameter::new(OUTPUT, ActionMode::Verify, Some("expected")));

        let result = h.action.execute(&action).await;

        assert!(result.is_passed());
        assert_eq!(action.outcomes()[0].state, ResultState::Ok);
        assert_eq!(h.buffers.get_buffer(OUTPUT).as_deref(), Some("expected"));
    }

    #[tokio::test]
    async fn missing_output_fails_without_remote_call() {
        let h = harness(Reply::Payload(Some("never-fetched")));
        let action = LocalTestAction::new(vec![
            Parameter::group(
                CONFIGURATION_GROUP,
                vec![
                    Parameter::new(REGION, ActionMode::Input, Some("us-west-2")),
                    Parameter::new(ACCESS_KEY, ActionMode::Input, Some("")),
                    Parameter::new(SECRET_KEY, ActionMode::Input, Some("")),
                ],
            ),
            Parameter::new(SECRET_NAME, ActionMode::Input, Some("app/api-token")),
        ]);

        let result = h.action.execute(&action).await;

        assert_eq!(result.failure_kind(), Some(FailureKind::Unhandled));
        assert_eq!(result.message(), "Error during secret retrieval.");
        assert!(result.log().contains("parameter 'Output' is missing"));
        assert!(h.connector.connections.lock().unwrap().is_empty());
        assert!(h.connector.requested.lock().unwrap().is_empty());
        assert!(h.buffers.is_empty());
    }

    #[tokio::test]
    async fn provider_error_is_captured_in_transcript() {
        let h = harness(Reply::Fail(FetchError::Provider(
            "Secrets Manager can't find the specified secret.".into(),
        )));

        let result = h.action.execute(&test_action("", "", buffer_output())).await;

        assert_eq!(result.failure_kind(), Some(FailureKind::Unhandled));
        assert_eq!(result.message(), "Error during secret retrieval.");
        assert!(result
            .log()
            .contains("AWS Secrets Manager error: Secrets Manager can't find the specified secret."));
        assert!(result
            .log()
            .contains("An error occurred during secret retrieval: Secrets Manager can't find"));
    }

    #[tokio::test]
    async fn transport_error_gets_general_log_line() {
        let h = harness(Reply::Fail(FetchError::General("dispatch failure".into())));
        let result = h.action.execute(&test_action("", "", buffer_output())).await;

        assert!(!result.is_passed());
        assert!(result.log().contains("General error: dispatch failure"));
        assert!(!result.log().contains("AWS Secrets Manager error"));
    }

    #[tokio::test]
    async fn transcript_is_timestamped_and_in_step_order() {
        let h = harness(Reply::Payload(Some("v")));
        let result = h.action.execute(&test_action("", "", buffer_output())).await;

        let steps: Vec<&str> = result
            .log()
            .entries()
            .iter()
            .map(|line| {
                let (stamp, rest) = line.split_at(19);
                assert!(NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok());
                rest.trim_start_matches(" - ")
            })
            .collect();

        assert_eq!(
            steps,
            [
                "Starting AWS Secrets Manager retrieval execution...",
                "Fetching AWS configuration parameters...",
                "Secret Name: app/api-token, Region: us-west-2",
                "Initializing AWS Secrets Manager client...",
                "Initialized AWS Secrets Manager client with default credentials.",
                "Retrieving secret value for: app/api-token",
                "Successfully retrieved the secret value for: app/api-token",
                "Buffer MySecretBuffer set to actual secret value.",
            ]
        );
    }
}
