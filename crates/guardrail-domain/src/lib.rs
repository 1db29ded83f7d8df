//! Pure rule evaluation (no IO).
//!
//! Input: a configuration tree constructed elsewhere, plus a frozen rule set.
//! Output: an immutable result set with per-(resource, rule) outcomes.

#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod policy;
pub mod result;
pub mod rule;
pub mod rules;
pub mod ruleset;
pub mod view;

mod engine;
mod fingerprint;

pub use engine::{CancellationToken, Engine, EngineOptions, RunState, Suppressions};
pub use error::{EngineError, RuleFault, RuleSetError};
pub use fingerprint::fingerprint_for_result;
pub use model::{Attributes, ConfigTree, ResourceRef, Value};
pub use result::{ResultEntry, ResultSet};
pub use rule::{AbsencePolicy, Evaluation, ResourceKinds, Rule, RuleMeta};
pub use ruleset::RuleSet;
pub use view::AttributeView;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
