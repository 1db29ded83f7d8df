use crate::{
    RenderableOutcome, RenderableReport, RenderableResult, RenderableSeverity, RenderableVerdict,
};

/// Render a report as Markdown.
///
/// Only FAILED and UNKNOWN results are listed; passed and skipped pairs show up in the counts.
pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Guardrail report\n\n");
    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Warn => "WARN",
        RenderableVerdict::Fail => "FAIL",
    };
    let d = &report.data;
    out.push_str(&format!(
        "- Verdict: **{}**\n- Profile: `{}`\n- Resources: {} / Rules: {}\n- Passed: {} / Failed: {} / Skipped: {} / Unknown: {}\n\n",
        verdict,
        d.profile,
        d.resources_scanned,
        d.rules_loaded,
        d.passed,
        d.failed,
        d.skipped,
        d.unknown
    ));

    if let Some(r) = &d.incomplete_reason {
        out.push_str(&format!("> Note: incomplete run: {}\n\n", r));
    }

    let failed: Vec<&RenderableResult> = report
        .results
        .iter()
        .filter(|r| r.outcome == RenderableOutcome::Failed)
        .collect();
    let unknown: Vec<&RenderableResult> = report
        .results
        .iter()
        .filter(|r| r.outcome == RenderableOutcome::Unknown)
        .collect();

    if failed.is_empty() && unknown.is_empty() {
        out.push_str("No failures.\n");
        return out;
    }

    if !failed.is_empty() {
        out.push_str("## Failures\n\n");
        for r in failed {
            push_result(&mut out, r);
        }
        out.push('\n');
    }

    if !unknown.is_empty() {
        out.push_str("## Not evaluated\n\n");
        for r in unknown {
            push_result(&mut out, r);
        }
        out.push('\n');
    }

    out
}

fn push_result(out: &mut String, r: &RenderableResult) {
    let sev = match r.severity {
        RenderableSeverity::Info => "INFO",
        RenderableSeverity::Warning => "WARN",
        RenderableSeverity::Error => "ERROR",
    };
    out.push_str(&format!(
        "- [{}] `{}` {} on `{}` ({})\n",
        sev, r.rule_id, r.rule_name, r.address, r.category
    ));
    if let Some(message) = &r.message {
        out.push_str(&format!("  - {}\n", message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderableData;

    fn data() -> RenderableData {
        RenderableData {
            profile: "strict".to_string(),
            resources_scanned: 2,
            rules_loaded: 3,
            passed: 3,
            failed: 0,
            skipped: 0,
            unknown: 0,
            incomplete_reason: None,
        }
    }

    fn result(outcome: RenderableOutcome, message: Option<&str>) -> RenderableResult {
        RenderableResult {
            severity: RenderableSeverity::Error,
            outcome,
            rule_id: "GR_AZURE_002".to_string(),
            rule_name: "Storage must disable public network access".to_string(),
            category: "NETWORKING".to_string(),
            address: "azurerm_storage_account.logs".to_string(),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn renders_clean_report() {
        let report = RenderableReport {
            verdict: RenderableVerdict::Pass,
            results: vec![result(RenderableOutcome::Passed, None)],
            data: data(),
        };
        let md = render_markdown(&report);
        assert!(md.contains("Verdict: **PASS**"));
        assert!(md.contains("Passed: 3 / Failed: 0"));
        assert!(md.contains("No failures"));
        assert!(!md.contains("azurerm_storage_account.logs"));
    }

    #[test]
    fn renders_failures_and_unknowns_in_separate_sections() {
        let report = RenderableReport {
            verdict: RenderableVerdict::Fail,
            results: vec![
                result(RenderableOutcome::Skipped, Some("suppressed")),
                result(
                    RenderableOutcome::Failed,
                    Some("public_network_access_enabled is not set"),
                ),
                result(RenderableOutcome::Unknown, Some("rule panicked: boom")),
            ],
            data: RenderableData {
                failed: 1,
                skipped: 1,
                unknown: 1,
                passed: 0,
                ..data()
            },
        };

        let md = render_markdown(&report);
        assert!(md.contains("Verdict: **FAIL**"));
        assert!(md.contains("## Failures"));
        assert!(md.contains("## Not evaluated"));
        assert!(md.contains("[ERROR] `GR_AZURE_002`"));
        assert!(md.contains("  - public_network_access_enabled is not set"));
        assert!(md.contains("rule panicked: boom"));
        assert!(!md.contains("suppressed"));
        let failures = md.find("## Failures").expect("failures");
        let unknown = md.find("## Not evaluated").expect("unknown");
        assert!(failures < unknown);
    }

    #[test]
    fn renders_incomplete_note() {
        let report = RenderableReport {
            verdict: RenderableVerdict::Warn,
            results: Vec::new(),
            data: RenderableData {
                incomplete_reason: Some("run cancelled".to_string()),
                ..data()
            },
        };
        let md = render_markdown(&report);
        assert!(md.contains("Verdict: **WARN**"));
        assert!(md.contains("> Note: incomplete run: run cancelled"));
    }
}
