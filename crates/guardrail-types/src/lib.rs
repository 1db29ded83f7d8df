//! Stable DTOs and IDs used across the guardrail workspace.
//!
//! This crate is intentionally boring:
//! - outcome, category, and severity enums shared by every layer
//! - data types for the emitted report
//! - stable rule IDs and resource kinds
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use receipt::{
    Category, GuardrailData, Outcome, ReportEnvelope, ResourceRecord, ResultRecord,
    SCHEMA_REPORT_V1, Severity, SummaryCounts, ToolMeta, Verdict,
};
