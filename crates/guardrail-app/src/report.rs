use anyhow::Context;
use guardrail_render::{
    RenderableData, RenderableOutcome, RenderableReport, RenderableResult, RenderableSeverity,
    RenderableVerdict,
};
use guardrail_types::{
    Category, GuardrailData, Outcome, ReportEnvelope, ResourceRecord, ResultRecord,
    SCHEMA_REPORT_V1, Severity, SummaryCounts, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ReportEnvelope> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse guardrail report")
}

pub fn serialize_report(report: &ReportEnvelope) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &ReportEnvelope) -> RenderableReport {
    let data = &report.data;
    let incomplete_reason = if data.complete {
        None
    } else if data.reasons.is_empty() {
        Some("not every rule was evaluated".to_string())
    } else {
        Some(data.reasons.join(", "))
    };

    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdict::Pass,
            Verdict::Warn => RenderableVerdict::Warn,
            Verdict::Fail => RenderableVerdict::Fail,
        },
        results: report.results.iter().map(renderable_result).collect(),
        data: RenderableData {
            profile: data.profile.clone(),
            resources_scanned: data.resources_scanned,
            rules_loaded: data.rules_loaded,
            passed: data.summary.passed,
            failed: data.summary.failed,
            skipped: data.summary.skipped,
            unknown: data.summary.unknown,
            incomplete_reason,
        },
    }
}

fn renderable_result(r: &ResultRecord) -> RenderableResult {
    RenderableResult {
        severity: match r.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        outcome: match r.outcome {
            Outcome::Passed => RenderableOutcome::Passed,
            Outcome::Failed => RenderableOutcome::Failed,
            Outcome::Skipped => RenderableOutcome::Skipped,
            Outcome::Unknown => RenderableOutcome::Unknown,
        },
        rule_id: r.rule_id.clone(),
        rule_name: r.rule_name.clone(),
        category: r.category.to_string(),
        address: r.resource.address.clone(),
        message: r.message.clone(),
    }
}

/// Report emitted when the tool itself fails (bad config, unreadable or malformed input).
pub fn runtime_error_report(message: &str) -> ReportEnvelope {
    let now = OffsetDateTime::now_utc();

    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "guardrail".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        results: vec![ResultRecord {
            rule_id: ids::RULE_TOOL_RUNTIME.to_string(),
            rule_name: "guardrail runtime".to_string(),
            category: Category::GeneralSecurity,
            severity: Severity::Error,
            outcome: Outcome::Failed,
            resource: ResourceRecord {
                kind: "tool".to_string(),
                index: 0,
                name: None,
                address: "tool".to_string(),
            },
            message: Some(message.to_string()),
            fingerprint: None,
        }],
        data: GuardrailData {
            profile: "unknown".to_string(),
            resources_scanned: 0,
            rules_loaded: 0,
            complete: false,
            summary: SummaryCounts {
                failed: 1,
                ..SummaryCounts::default()
            },
            reasons: vec!["tool_error".to_string()],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_foreign_schema() {
        let err = parse_report_json(r#"{"schema": "other.report.v9"}"#).expect_err("schema");
        assert!(err.to_string().contains("other.report.v9"));
        assert!(parse_report_json("[").is_err());
    }

    #[test]
    fn serialized_report_parses_back() {
        let report = runtime_error_report("config missing");
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.contains("\"schema\": \"guardrail.report.v1\""));
        assert!(text.contains("\"outcome\": \"FAILED\""));
        assert_eq!(parse_report_json(&text).expect("parse"), report);
    }

    #[test]
    fn renderable_carries_incomplete_reasons() {
        let mut report = runtime_error_report("boom");
        let renderable = to_renderable(&report);
        assert_eq!(renderable.verdict, RenderableVerdict::Fail);
        assert_eq!(renderable.data.incomplete_reason.as_deref(), Some("tool_error"));
        assert_eq!(renderable.results[0].address, "tool");
        assert_eq!(renderable.results[0].category, "GENERAL_SECURITY");

        report.data.complete = true;
        assert!(to_renderable(&report).data.incomplete_reason.is_none());
    }
}
