use guardrail_types::Severity;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulePolicy {
    pub enabled: bool,
    /// Overrides the rule's declared severity.
    pub severity: Option<Severity>,
    /// Glob patterns over resource addresses that are not evaluated by this rule.
    pub allow: Vec<String>,
}

impl RulePolicy {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            severity: None,
            allow: Vec::new(),
        }
    }

    pub fn enabled_with(severity: Severity) -> Self {
        Self {
            severity: Some(severity),
            ..Self::enabled()
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::enabled()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    /// Worker count; `None` means available parallelism.
    pub parallelism: Option<usize>,
    /// Wall-clock budget per rule evaluation.
    pub rule_budget: Option<Duration>,
    /// Rule id -> policy. Rules without an entry run with their declared metadata.
    pub rules: BTreeMap<String, RulePolicy>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "strict".to_string(),
            fail_on: FailOn::Error,
            parallelism: None,
            rule_budget: None,
            rules: BTreeMap::new(),
        }
    }
}

impl EffectiveConfig {
    pub fn rule_policy(&self, rule_id: &str) -> Option<&RulePolicy> {
        self.rules.get(rule_id)
    }

    pub fn is_enabled(&self, rule_id: &str) -> bool {
        self.rule_policy(rule_id).map(|p| p.enabled).unwrap_or(true)
    }
}
