use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Stable schema identifier for guardrail reports.
pub const SCHEMA_REPORT_V1: &str = "guardrail.report.v1";

/// Severity is intentionally small: it maps cleanly to CI signals.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating one rule against one resource instance.
///
/// `Skipped` means the rule did not evaluate (suppressed, or a precondition was not met).
/// `Unknown` means the rule itself faulted; it is data, never a propagated error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    Unknown,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Passed => "PASSED",
            Outcome::Failed => "FAILED",
            Outcome::Skipped => "SKIPPED",
            Outcome::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Networking,
    Encryption,
    Identity,
    Logging,
    BackupAndRecovery,
    GeneralSecurity,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Networking => "NETWORKING",
            Category::Encryption => "ENCRYPTION",
            Category::Identity => "IDENTITY",
            Category::Logging => "LOGGING",
            Category::BackupAndRecovery => "BACKUP_AND_RECOVERY",
            Category::GeneralSecurity => "GENERAL_SECURITY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub kind: String,
    /// Declaration order within the kind.
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub rule_id: String,
    pub rule_name: String,
    pub category: Category,
    pub severity: Severity,
    pub outcome: Outcome,
    pub resource: ResourceRecord,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `rule_id + resource address`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub unknown: u32,
}

impl SummaryCounts {
    pub fn total(&self) -> u32 {
        self.passed + self.failed + self.skipped + self.unknown
    }
}

/// Guardrail-specific summary payload for the report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailData {
    pub profile: String,
    pub resources_scanned: u32,
    pub rules_loaded: u32,
    /// `false` when the run was cancelled before every item was evaluated.
    pub complete: bool,
    pub summary: SummaryCounts,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub results: Vec<ResultRecord>,
    pub data: GuardrailData,
}
