//! CLI entry point for guardrail.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `guardrail-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use guardrail_app::{
    CheckInput, ExplainOutput, format_explanation, format_not_found, format_rule_list,
    parse_report_json, run_check, run_explain, run_list_rules, run_markdown,
    runtime_error_report, verdict_exit_code, write_report, write_text,
};
use guardrail_domain::CancellationToken;
use guardrail_settings::Overrides;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "guardrail",
    version,
    about = "Compliance rule evaluation for parsed infrastructure configuration"
)]
struct Cli {
    /// Path to guardrail config TOML (missing file means defaults).
    #[arg(long, default_value = "guardrail.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|warn).
    #[arg(long)]
    profile: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a configuration tree and write the report.
    Check {
        /// Parser output as JSON: resource kind -> list of instances.
        #[arg(long)]
        input: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/guardrail/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/guardrail/comment.md")]
        markdown_out: Utf8PathBuf,

        /// Override evaluation worker count.
        #[arg(long)]
        parallelism: Option<usize>,

        /// Override the per-rule wall-clock budget, in milliseconds.
        #[arg(long)]
        rule_budget_ms: Option<u64>,
    },

    /// Render markdown from an existing JSON report.
    Md {
        #[arg(long, default_value = "artifacts/guardrail/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a rule id with remediation guidance.
    Explain {
        /// The rule id to explain (e.g. "GR_AZURE_001").
        identifier: String,
    },

    /// List the rule catalog with effective severity and absence policy.
    Rules,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.cmd {
        Commands::Check {
            input,
            report_out,
            write_markdown,
            markdown_out,
            parallelism,
            rule_budget_ms,
        } => {
            let overrides = Overrides {
                profile: cli.profile.clone(),
                parallelism: *parallelism,
                rule_budget_ms: *rule_budget_ms,
            };
            let markdown_out = (*write_markdown).then_some(markdown_out.as_path());
            cmd_check(&cli.config, input, overrides, report_out, markdown_out)
        }
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Explain { identifier } => cmd_explain(identifier),
        Commands::Rules => cmd_rules(&cli),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_config(path: &Utf8Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            debug!(path = %path, error = %err, "config not loaded; using defaults");
            String::new()
        }
    }
}

fn cmd_check(
    config: &Utf8Path,
    input: &Utf8Path,
    overrides: Overrides,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(config);
        let tree_json = std::fs::read_to_string(input)
            .with_context(|| format!("read configuration tree: {input}"))?;

        let output = run_check(CheckInput {
            tree_json: &tree_json,
            config_text: &cfg_text,
            overrides,
            cancel: CancellationToken::new(),
        })?;

        write_report(report_out, &output.report).context("write report json")?;
        if let Some(md_path) = markdown_out {
            write_text(md_path, &run_markdown(&output.report)).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report(report_out, &report);
            eprintln!("guardrail error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let md = run_markdown(&report);

    match output {
        Some(out_path) => write_text(out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
        } => {
            eprint!("{}", format_not_found(&identifier, available_rule_ids));
            std::process::exit(1);
        }
    }
}

fn cmd_rules(cli: &Cli) -> anyhow::Result<()> {
    let cfg_text = read_config(&cli.config);
    let overrides = Overrides {
        profile: cli.profile.clone(),
        ..Overrides::default()
    };
    let rules = run_list_rules(&cfg_text, overrides)?;
    print!("{}", format_rule_list(&rules));
    Ok(())
}
