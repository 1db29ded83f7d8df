use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `guardrail.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardrailConfigV1 {
    /// Optional schema string for tooling (`guardrail.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When to fail the run: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Evaluation worker count (defaults to available parallelism).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,

    /// Wall-clock budget per rule evaluation, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_budget_ms: Option<u64>,

    /// Map of rule_id -> config.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override severity: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Resource addresses the rule does not evaluate (e.g. `azurerm_storage_account.legacy_*`).
    ///
    /// Each entry matches an address verbatim or as a glob, so `kind[0]` names an indexed
    /// instance directly.
    #[serde(default)]
    pub allow: Vec<String>,
}
