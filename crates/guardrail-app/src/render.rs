//! Render and write use cases for in-memory reports.

use anyhow::Context;
use camino::Utf8Path;
use guardrail_types::ReportEnvelope;

use crate::report::{serialize_report, to_renderable};

pub fn run_markdown(report: &ReportEnvelope) -> String {
    guardrail_render::render_markdown(&to_renderable(report))
}

/// Write the report as pretty JSON, creating parent directories as needed.
pub fn write_report(path: &Utf8Path, report: &ReportEnvelope) -> anyhow::Result<()> {
    let bytes = serialize_report(report)?;
    write_bytes(path, &bytes)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create dir {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))
}
