use crate::{model::GuardrailConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use guardrail_domain::policy::{EffectiveConfig, FailOn, RulePolicy};
use guardrail_types::Severity;
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub parallelism: Option<usize>,
    pub rule_budget_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: GuardrailConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile)?;

    if let Some(n) = overrides.parallelism.or(cfg.parallelism) {
        if n == 0 {
            anyhow::bail!("parallelism must be at least 1");
        }
        effective.parallelism = Some(n);
    }

    if let Some(ms) = overrides.rule_budget_ms.or(cfg.rule_budget_ms) {
        if ms == 0 {
            anyhow::bail!("rule_budget_ms must be at least 1");
        }
        effective.rule_budget = Some(Duration::from_millis(ms));
    }

    // per-rule overrides
    for (rule_id, rc) in cfg.rules.iter() {
        let entry = effective
            .rules
            .entry(rule_id.clone())
            .or_insert_with(RulePolicy::enabled);

        if let Some(enabled) = rc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = rc.severity.as_deref() {
            let severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?;
            entry.severity = Some(severity);
        }
        if !rc.allow.is_empty() {
            validate_allowlist(rule_id, &rc.allow)?;
            entry.allow = rc.allow.clone();
        }
    }

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig { effective })
}

fn validate_allowlist(rule_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {rule_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
