// src/sys/host.rs
//
// Stand-alone host used by the runner binary and the tests. It plays the part of
// the automation engine: a parameter tree, a buffer store and the actual-value
// routine for non-buffer outputs.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::HostError;
use crate::sys::traits::{
    ActionMode, ActualValueHandler, BufferStore, Parameter, ResultState, TestAction,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ==============================================================================
// 1. Test Action (JSON parameter tree)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterOutcome {
    pub parameter: String,
    pub state: ResultState,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocalTestAction {
    parameters: Vec<Parameter>,
    #[serde(skip)]
    outcomes: Mutex<Vec<ParameterOutcome>>,
}

impl LocalTestAction {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self {
            parameters,
            outcomes: Mutex::new(Vec::new()),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn outcomes(&self) -> Vec<ParameterOutcome> {
        lock(&self.outcomes).clone()
    }
}

impl TestAction for LocalTestAction {
    fn parameter(&self, name: &str) -> Option<Parameter> {
        self.parameters.iter().find(|p| p.name == name).cloned()
    }

    fn set_result_for_parameter(&self, parameter: &Parameter, state: ResultState, message: &str) {
        lock(&self.outcomes).push(ParameterOutcome {
            parameter: parameter.name.clone(),
            state,
            message: message.to_string(),
        });
    }
}

// ==============================================================================
// 2. Buffer Store
// ==============================================================================

#[derive(Debug, Default)]
pub struct InMemoryBuffers {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    /// Names of the buffers written so far, sorted. Values are never exposed here.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.entries).keys().cloned().collect();
        names.sort();
        names
    }
}

impl BufferStore for InMemoryBuffers {
    fn set_buffer(&self, name: &str, value: &str) -> Result<(), HostError> {
        if name.is_empty() {
            return Err(HostError::Rejected("buffer name cannot be empty".into()));
        }
        lock(&self.entries).insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn get_buffer(&self, name: &str) -> Option<String> {
        lock(&self.entries).get(name).cloned()
    }
}

// ==============================================================================
// 3. Actual Value Routine
// ==============================================================================

/// Verify-mode parameters compare their expected value against the actual one;
/// every other mode simply reports what was observed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActualValueVerifier;

impl ActualValueHandler for ActualValueVerifier {
    fn handle_actual_value(
        &self,
        test_action: &dyn TestAction,
        parameter: &Parameter,
        actual: Option<&str>,
    ) -> Result<(), HostError> {
        let Some(actual) = actual else {
            test_action.set_result_for_parameter(
                parameter,
                ResultState::Failed,
                &format!("No actual value available for {}.", parameter.name),
            );
            return Ok(());
        };

        let (state, message) = match (parameter.mode, parameter.value.as_deref()) {
            (ActionMode::Verify, Some(expected)) if expected != actual => (
                ResultState::Failed,
                format!("{} does not match the expected value.", parameter.name),
            ),
            (ActionMode::Verify, _) => (
                ResultState::Ok,
                format!("{} matches the expected value.", parameter.name),
            ),
            _ => (ResultState::Ok, format!("{} received an actual value.", parameter.name)),
        };
        test_action.set_result_for_parameter(parameter, state, &message);
        Ok(())
    }
}
