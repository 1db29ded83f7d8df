use crate::error::EngineError;
use crate::model::{Attributes, ConfigTree, ResourceRef};
use crate::policy::EffectiveConfig;
use crate::result::{ResultEntry, ResultSet};
use crate::rule::{Evaluation, Rule};
use crate::ruleset::RuleSet;
use crate::view::AttributeView;
use globset::{Glob, GlobSet, GlobSetBuilder};
use guardrail_types::Outcome;
use rayon::prelude::*;
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cooperative cancellation signal shared between the caller and a running engine.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lifecycle of the most recent run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    /// Engine-internal fault (malformed input, pool setup). Rule faults never land here.
    Failed,
}

/// Per-rule allowlists over resource addresses.
///
/// A pattern matches either as a glob or as the exact address, so indexed addresses such as
/// `kind[0]` can be listed verbatim even though `[0]` is a glob character class.
#[derive(Clone, Debug, Default)]
pub struct Suppressions {
    by_rule: BTreeMap<String, Allowlist>,
}

#[derive(Clone, Debug)]
struct Allowlist {
    globs: GlobSet,
    exact: BTreeSet<String>,
}

impl Suppressions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule_id: &str, patterns: &[String]) -> Result<(), globset::Error> {
        if patterns.is_empty() {
            return Ok(());
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        self.by_rule.insert(
            rule_id.to_string(),
            Allowlist {
                globs: builder.build()?,
                exact: patterns.iter().cloned().collect(),
            },
        );
        Ok(())
    }

    pub fn is_suppressed(&self, rule_id: &str, address: &str) -> bool {
        self.by_rule
            .get(rule_id)
            .map(|list| list.exact.contains(address) || list.globs.is_match(address))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Default)]
pub struct EngineOptions {
    /// Worker count; `None` means available parallelism.
    pub parallelism: Option<usize>,
    /// Wall-clock budget per rule evaluation; overruns become `UNKNOWN`.
    pub rule_budget: Option<Duration>,
    pub suppressions: Suppressions,
}

impl EngineOptions {
    pub fn from_config(cfg: &EffectiveConfig) -> Result<Self, globset::Error> {
        let mut suppressions = Suppressions::new();
        for (rule_id, policy) in &cfg.rules {
            suppressions.insert(rule_id, &policy.allow)?;
        }
        Ok(Self {
            parallelism: cfg.parallelism,
            rule_budget: cfg.rule_budget,
            suppressions,
        })
    }
}

struct WorkItem {
    resource: ResourceRef,
    attrs: Arc<Attributes>,
    rule: Arc<dyn Rule>,
}

/// Drives (resource instance x applicable rule) evaluation over a frozen tree and rule set.
pub struct Engine {
    rules: RuleSet,
    options: EngineOptions,
    state: Mutex<RunState>,
}

impl Engine {
    pub fn new(rules: RuleSet, options: EngineOptions) -> Self {
        Self {
            rules,
            options,
            state: Mutex::new(RunState::Idle),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: RunState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Validate raw parser output and evaluate it. Malformed input fails before any rule runs.
    pub fn run_json(
        &self,
        input: &serde_json::Value,
        cancel: &CancellationToken,
    ) -> Result<ResultSet, EngineError> {
        let tree = match ConfigTree::from_json(input) {
            Ok(tree) => tree,
            Err(err) => {
                self.set_state(RunState::Failed);
                return Err(err);
            }
        };
        self.run(&tree, cancel)
    }

    pub fn run(
        &self,
        tree: &ConfigTree,
        cancel: &CancellationToken,
    ) -> Result<ResultSet, EngineError> {
        self.set_state(RunState::Running);

        let mut items = Vec::new();
        for (resource, attrs) in tree.resources() {
            for rule in self.rules.applicable(&resource.kind) {
                items.push(WorkItem {
                    resource: resource.clone(),
                    attrs: Arc::clone(attrs),
                    rule: Arc::clone(rule),
                });
            }
        }

        let threads = self
            .options
            .parallelism
            .unwrap_or_else(default_parallelism)
            .max(1);
        debug!(
            resources = tree.resource_count(),
            rules = self.rules.len(),
            items = items.len(),
            threads,
            "evaluation started"
        );

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("guardrail-eval-{i}"))
            .build()
        {
            Ok(pool) => pool,
            Err(err) => {
                self.set_state(RunState::Failed);
                return Err(err.into());
            }
        };

        // One slot per work item keeps output order independent of scheduling.
        let slots: Vec<Option<ResultEntry>> = pool.install(|| {
            items
                .par_iter()
                .map(|item| {
                    if cancel.is_cancelled() {
                        None
                    } else {
                        Some(self.evaluate_item(item))
                    }
                })
                .collect()
        });

        let complete = slots.iter().all(Option::is_some);
        let results = ResultSet::new(slots.into_iter().flatten().collect(), complete);

        let summary = results.summary();
        info!(
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            unknown = summary.unknown,
            complete,
            "evaluation finished"
        );

        self.set_state(if complete {
            RunState::Completed
        } else {
            RunState::Cancelled
        });
        Ok(results)
    }

    fn evaluate_item(&self, item: &WorkItem) -> ResultEntry {
        let meta = item.rule.meta();
        let address = item.resource.address();

        let evaluation = if self.options.suppressions.is_suppressed(&meta.id, &address) {
            Evaluation::skipped(format!("suppressed by allowlist for {}", meta.id))
        } else {
            match self.options.rule_budget {
                Some(budget) => evaluate_with_budget(&item.rule, &item.attrs, budget),
                None => evaluate_guarded(item.rule.as_ref(), &item.attrs),
            }
        };

        if evaluation.outcome == Outcome::Unknown {
            warn!(
                rule_id = %meta.id,
                resource = %address,
                detail = evaluation.message.as_deref().unwrap_or(""),
                "rule evaluation faulted"
            );
        }

        ResultEntry {
            resource: item.resource.clone(),
            rule_id: meta.id.clone(),
            rule_name: meta.name.clone(),
            category: meta.category,
            severity: meta.severity,
            outcome: evaluation.outcome,
            message: evaluation.message,
        }
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Run a rule, converting faults and panics into `UNKNOWN`.
fn evaluate_guarded(rule: &dyn Rule, attrs: &Attributes) -> Evaluation {
    let view = AttributeView::new(attrs);
    match catch_unwind(AssertUnwindSafe(|| rule.evaluate(&view))) {
        Ok(Ok(evaluation)) => evaluation,
        Ok(Err(fault)) => Evaluation::new(Outcome::Unknown, Some(fault.to_string())),
        Err(payload) => Evaluation::new(
            Outcome::Unknown,
            Some(format!("rule panicked: {}", panic_message(payload.as_ref()))),
        ),
    }
}

/// Run a rule on a detached worker so an overrun cannot stall the run.
fn evaluate_with_budget(
    rule: &Arc<dyn Rule>,
    attrs: &Arc<Attributes>,
    budget: Duration,
) -> Evaluation {
    let (tx, rx) = mpsc::channel();
    let rule = Arc::clone(rule);
    let attrs = Arc::clone(attrs);

    let spawned = std::thread::Builder::new()
        .name("guardrail-rule".to_string())
        .spawn(move || {
            let _ = tx.send(evaluate_guarded(rule.as_ref(), &attrs));
        });
    if let Err(err) = spawned {
        return Evaluation::new(
            Outcome::Unknown,
            Some(format!("failed to start rule worker: {err}")),
        );
    }

    match rx.recv_timeout(budget) {
        Ok(evaluation) => evaluation,
        Err(RecvTimeoutError::Timeout) => Evaluation::new(
            Outcome::Unknown,
            Some(format!(
                "rule exceeded its evaluation budget of {}ms",
                budget.as_millis()
            )),
        ),
        Err(RecvTimeoutError::Disconnected) => Evaluation::new(
            Outcome::Unknown,
            Some("rule worker exited without a result".to_string()),
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
