use crate::model::ResourceRef;
use crate::policy::FailOn;
use guardrail_types::{Category, Outcome, Severity, SummaryCounts, Verdict};

/// One (resource, rule) outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultEntry {
    pub resource: ResourceRef,
    pub rule_id: String,
    pub rule_name: String,
    pub category: Category,
    pub severity: Severity,
    pub outcome: Outcome,
    pub message: Option<String>,
}

/// Immutable outcome collection for one engine run.
///
/// `complete` is `false` when the run was cancelled before every work item was evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultSet {
    entries: Vec<ResultEntry>,
    complete: bool,
}

impl ResultSet {
    pub(crate) fn new(entries: Vec<ResultEntry>, complete: bool) -> Self {
        Self { entries, complete }
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ResultEntry> {
        self.entries
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter()
    }

    pub fn filter<P>(&self, predicate: P) -> ResultSet
    where
        P: Fn(&ResultEntry) -> bool,
    {
        ResultSet {
            entries: self
                .entries
                .iter()
                .filter(|e| predicate(e))
                .cloned()
                .collect(),
            complete: self.complete,
        }
    }

    pub fn by_category(&self, category: Category) -> ResultSet {
        self.filter(|e| e.category == category)
    }

    pub fn at_least(&self, severity: Severity) -> ResultSet {
        self.filter(|e| e.severity >= severity)
    }

    pub fn failures(&self) -> Vec<&ResultEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome == Outcome::Failed)
            .collect()
    }

    pub fn summary(&self) -> SummaryCounts {
        let mut counts = SummaryCounts::default();
        for e in &self.entries {
            match e.outcome {
                Outcome::Passed => counts.passed += 1,
                Outcome::Failed => counts.failed += 1,
                Outcome::Skipped => counts.skipped += 1,
                Outcome::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    /// Roll outcomes into a CI verdict.
    ///
    /// Error-severity failures fail the run. Warning failures warn unless `fail_on` is
    /// `Warning`. Info failures, unknown outcomes, and incomplete runs warn.
    pub fn verdict(&self, fail_on: FailOn) -> Verdict {
        let failed_at = |sev: Severity| {
            self.entries
                .iter()
                .any(|e| e.outcome == Outcome::Failed && e.severity == sev)
        };

        if failed_at(Severity::Error) {
            return Verdict::Fail;
        }
        if failed_at(Severity::Warning) {
            return match fail_on {
                FailOn::Warning => Verdict::Fail,
                FailOn::Error => Verdict::Warn,
            };
        }

        let unknown = self.entries.iter().any(|e| e.outcome == Outcome::Unknown);
        if failed_at(Severity::Info) || unknown || !self.complete {
            return Verdict::Warn;
        }

        Verdict::Pass
    }
}
