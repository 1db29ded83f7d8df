//! The rule contract: identity metadata plus a pure evaluation over an [`AttributeView`].

use crate::error::RuleFault;
use crate::view::AttributeView;
use guardrail_types::{Category, Outcome, Severity};
use std::collections::BTreeSet;
use std::fmt;

/// Resource kinds a rule applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceKinds {
    /// Applies to every resource kind.
    Universal,
    Kinds(BTreeSet<String>),
}

impl ResourceKinds {
    pub fn of<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResourceKinds::Kinds(kinds.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, kind: &str) -> bool {
        match self {
            ResourceKinds::Universal => true,
            ResourceKinds::Kinds(kinds) => kinds.contains(kind),
        }
    }
}

/// What a rule concludes when the attribute it inspects is not declared.
///
/// Declared per rule so default-fail and default-pass choices can be audited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbsencePolicy {
    /// Unset implies an insecure platform default.
    DefaultFail,
    /// Unset means nothing is configured, so the rule holds vacuously.
    DefaultPass,
    /// Unset means the rule cannot judge the resource.
    Skip,
}

impl AbsencePolicy {
    pub fn outcome(self) -> Outcome {
        match self {
            AbsencePolicy::DefaultFail => Outcome::Failed,
            AbsencePolicy::DefaultPass => Outcome::Passed,
            AbsencePolicy::Skip => Outcome::Skipped,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AbsencePolicy::DefaultFail => "default-fail",
            AbsencePolicy::DefaultPass => "default-pass",
            AbsencePolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for AbsencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleMeta {
    /// Globally unique, stable identifier.
    pub id: String,
    pub name: String,
    pub category: Category,
    pub severity: Severity,
    pub resources: ResourceKinds,
    pub absence: AbsencePolicy,
}

/// Outcome of one evaluation plus an optional diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub message: Option<String>,
}

impl Evaluation {
    pub fn new(outcome: Outcome, message: Option<String>) -> Self {
        Self { outcome, message }
    }

    pub fn passed() -> Self {
        Self::new(Outcome::Passed, None)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(Outcome::Failed, Some(message.into()))
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self::new(Outcome::Skipped, Some(message.into()))
    }

    /// Outcome dictated by `policy` when `attribute` is not declared.
    pub fn absent(policy: AbsencePolicy, attribute: &str) -> Self {
        let message = match policy {
            AbsencePolicy::DefaultFail => {
                format!("'{attribute}' is not set; the platform default is insecure")
            }
            AbsencePolicy::DefaultPass => format!("no '{attribute}' declared"),
            AbsencePolicy::Skip => format!("'{attribute}' is not set; rule not applicable"),
        };
        Self::new(policy.outcome(), Some(message))
    }
}

/// A unit of compliance logic.
///
/// `evaluate` must be pure with respect to the engine: it only reads the view it is given
/// and must return promptly.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn evaluate(&self, view: &AttributeView<'_>) -> Result<Evaluation, RuleFault>;
}

type EvalFn = dyn Fn(&AttributeView<'_>) -> Result<Evaluation, RuleFault> + Send + Sync;

/// Rule backed by a closure. Handy for ad hoc and organization-specific rules.
pub struct FnRule {
    meta: RuleMeta,
    eval: Box<EvalFn>,
}

impl FnRule {
    pub fn new<F>(meta: RuleMeta, eval: F) -> Self
    where
        F: Fn(&AttributeView<'_>) -> Result<Evaluation, RuleFault> + Send + Sync + 'static,
    {
        Self {
            meta,
            eval: Box::new(eval),
        }
    }
}

impl Rule for FnRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn evaluate(&self, view: &AttributeView<'_>) -> Result<Evaluation, RuleFault> {
        (self.eval)(view)
    }
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("meta", &self.meta).finish()
    }
}
