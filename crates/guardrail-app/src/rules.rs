//! The `rules` use case: list the rule catalog as configured for this run.

use anyhow::Context;
use guardrail_domain::rules::builtin_rules;
use guardrail_domain::ResourceKinds;
use guardrail_settings::Overrides;
use guardrail_types::{Category, Severity};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleListing {
    pub id: String,
    pub name: String,
    pub category: Category,
    /// Effective severity after profile and per-rule overrides.
    pub severity: Severity,
    pub kinds: Vec<String>,
    pub absence: &'static str,
    pub enabled: bool,
}

pub fn run_list_rules(config_text: &str, overrides: Overrides) -> anyhow::Result<Vec<RuleListing>> {
    let cfg = if config_text.trim().is_empty() {
        guardrail_settings::GuardrailConfigV1::default()
    } else {
        guardrail_settings::parse_config_toml(config_text).context("parse config")?
    };
    let resolved = guardrail_settings::resolve_config(cfg, overrides).context("resolve config")?;
    let effective = &resolved.effective;

    Ok(builtin_rules()
        .iter()
        .map(|rule| {
            let meta = rule.meta();
            let policy = effective.rule_policy(&meta.id);
            RuleListing {
                id: meta.id.clone(),
                name: meta.name.clone(),
                category: meta.category,
                severity: policy.and_then(|p| p.severity).unwrap_or(meta.severity),
                kinds: match &meta.resources {
                    ResourceKinds::Universal => vec!["*".to_string()],
                    ResourceKinds::Kinds(kinds) => kinds.iter().cloned().collect(),
                },
                absence: meta.absence.as_str(),
                enabled: effective.is_enabled(&meta.id),
            }
        })
        .collect())
}

pub fn format_rule_list(rules: &[RuleListing]) -> String {
    let mut out = String::new();
    for r in rules {
        out.push_str(&format!(
            "{}  {}  [{}] severity={} absence={}{}\n",
            r.id,
            r.name,
            r.category,
            r.severity,
            r.absence,
            if r.enabled { "" } else { " (disabled)" }
        ));
        out.push_str(&format!("    kinds: {}\n", r.kinds.join(", ")));
    }
    out
}
