use guardrail_domain::policy::{EffectiveConfig, FailOn, RulePolicy};
use guardrail_domain::rules::builtin_rules;
use guardrail_types::Severity;
use std::collections::BTreeMap;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    match profile {
        "strict" => Ok(strict_profile()),
        "warn" => Ok(warn_profile()),
        other => anyhow::bail!("unknown profile: {other} (expected strict|warn)"),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Error,
        parallelism: None,
        rule_budget: None,
        rules: default_rules(None),
    }
}

fn warn_profile() -> EffectiveConfig {
    // Every built-in rule still runs, but failures only warn.
    EffectiveConfig {
        profile: "warn".to_string(),
        fail_on: FailOn::Error,
        parallelism: None,
        rule_budget: None,
        rules: default_rules(Some(Severity::Warning)),
    }
}

fn default_rules(severity: Option<Severity>) -> BTreeMap<String, RulePolicy> {
    builtin_rules()
        .iter()
        .map(|rule| {
            let policy = match severity {
                Some(sev) => RulePolicy::enabled_with(sev),
                None => RulePolicy::enabled(),
            };
            (rule.meta().id.clone(), policy)
        })
        .collect()
}
