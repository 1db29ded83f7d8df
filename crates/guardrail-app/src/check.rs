//! The `check` use case: evaluate a configuration tree and produce a report.

use anyhow::Context;
use guardrail_domain::rules::{build_rule_set, builtin_rules};
use guardrail_domain::{
    CancellationToken, ConfigTree, Engine, EngineOptions, ResultSet, fingerprint_for_result,
};
use guardrail_settings::{Overrides, ResolvedConfig};
use guardrail_types::{
    GuardrailData, ReportEnvelope, ResourceRecord, ResultRecord, SCHEMA_REPORT_V1, ToolMeta,
    Verdict, ids,
};
use time::OffsetDateTime;
use tracing::info;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Parser output: resource kind -> instances, as JSON text.
    pub tree_json: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Cancels the run between work items.
    pub cancel: CancellationToken,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: ReportEnvelope,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, build the rule set, evaluate the tree, produce a report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        guardrail_settings::GuardrailConfigV1::default()
    } else {
        guardrail_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = guardrail_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let raw: serde_json::Value =
        serde_json::from_str(input.tree_json).context("parse configuration tree json")?;
    let tree = ConfigTree::from_json(&raw).context("validate configuration tree")?;

    let rules = build_rule_set(builtin_rules(), &resolved.effective).context("build rule set")?;
    let options =
        EngineOptions::from_config(&resolved.effective).context("compile rule allowlists")?;
    let engine = Engine::new(rules, options);
    let rules_loaded = engine.rules().len();

    let results = engine
        .run(&tree, &input.cancel)
        .context("evaluate configuration tree")?;

    let verdict = results.verdict(resolved.effective.fail_on);
    let summary = results.summary();
    let complete = results.is_complete();

    let mut reasons = Vec::new();
    if !complete {
        reasons.push(ids::REASON_RUN_CANCELLED.to_string());
    }
    if summary.unknown > 0 {
        reasons.push(ids::REASON_UNKNOWN_OUTCOMES.to_string());
    }

    info!(
        profile = %resolved.effective.profile,
        resources = tree.resource_count(),
        rules = rules_loaded,
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        unknown = summary.unknown,
        ?verdict,
        "check finished"
    );

    let data = GuardrailData {
        profile: resolved.effective.profile.clone(),
        resources_scanned: tree.resource_count() as u32,
        rules_loaded: rules_loaded as u32,
        complete,
        summary,
        reasons,
    };

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "guardrail".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        results: to_records(results),
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

fn to_records(results: ResultSet) -> Vec<ResultRecord> {
    results
        .into_entries()
        .into_iter()
        .map(|e| {
            let address = e.resource.address();
            ResultRecord {
                fingerprint: Some(fingerprint_for_result(&e.rule_id, &address)),
                rule_id: e.rule_id,
                rule_name: e.rule_name,
                category: e.category,
                severity: e.severity,
                outcome: e.outcome,
                resource: ResourceRecord {
                    kind: e.resource.kind,
                    index: e.resource.index as u32,
                    name: e.resource.name,
                    address,
                },
                message: e.message,
            }
        })
        .collect()
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
