//! Use case orchestration for guardrail.
//!
//! This crate provides the application layer: use cases that coordinate the settings, domain,
//! and render layers. It is intentionally thin and delegates heavy lifting to those layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;
mod report;
mod rules;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::{run_markdown, write_report, write_text};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
pub use rules::{RuleListing, format_rule_list, run_list_rules};
