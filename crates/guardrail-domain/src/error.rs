use thiserror::Error;

/// Setup errors raised while assembling a [`crate::RuleSet`]. Fatal: evaluation must not start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),

    #[error("invalid rule metadata for '{rule_id}': {reason}")]
    Configuration { rule_id: String, reason: String },
}

/// Engine-level faults. Per-rule faults never surface here; they become `UNKNOWN` outcomes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed configuration tree at '{path}': {reason}")]
    MalformedInput { path: String, reason: String },

    #[error("failed to build evaluation worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl EngineError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Internal fault raised by a rule's evaluation logic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleFault {
    message: String,
}

impl RuleFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
