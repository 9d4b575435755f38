// src/result.rs

use crate::error::ActionError;
use crate::sys::logs::ExecutionLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingConfiguration,
    MissingInput,
    FetchFailure,
    Unhandled,
}

impl From<&ActionError> for FailureKind {
    fn from(err: &ActionError) -> Self {
        match err {
            ActionError::MissingConfiguration => FailureKind::MissingConfiguration,
            ActionError::MissingInput => FailureKind::MissingInput,
            ActionError::EmptySecret(_) => FailureKind::FetchFailure,
            ActionError::Fetch(_) | ActionError::Host(_) => FailureKind::Unhandled,
        }
    }
}

/// Outcome handed back to the automation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Passed {
        message: String,
        log: ExecutionLog,
    },
    Failed {
        kind: FailureKind,
        message: String,
        log: ExecutionLog,
    },
}

impl ActionResult {
    pub fn passed(message: impl Into<String>, log: ExecutionLog) -> Self {
        ActionResult::Passed {
            message: message.into(),
            log,
        }
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>, log: ExecutionLog) -> Self {
        ActionResult::Failed {
            kind,
            message: message.into(),
            log,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, ActionResult::Passed { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ActionResult::Passed { .. } => None,
            ActionResult::Failed { kind, .. } => Some(*kind),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ActionResult::Passed { message, .. } | ActionResult::Failed { message, .. } => message,
        }
    }

    pub fn log(&self) -> &ExecutionLog {
        match self {
            ActionResult::Passed { log, .. } | ActionResult::Failed { log, .. } => log,
        }
    }

    /// Message followed by the transcript, the form shown in the engine's result pane.
    pub fn render(&self) -> String {
        if self.log().is_empty() {
            return self.message().to_string();
        }
        format!("{}\n{}", self.message(), self.log().render())
    }
}
