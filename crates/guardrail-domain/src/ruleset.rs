use crate::error::RuleSetError;
use crate::rule::{ResourceKinds, Rule};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Ordered, id-unique collection of rules, indexed by resource kind for dispatch.
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<dyn Rule>>,
    ids: BTreeSet<String>,
    by_kind: BTreeMap<String, Vec<usize>>,
    universal: Vec<usize>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule set from a pre-assembled sequence, failing on the first invalid rule.
    pub fn from_rules<I>(rules: I) -> Result<Self, RuleSetError>
    where
        I: IntoIterator<Item = Arc<dyn Rule>>,
    {
        let mut set = Self::new();
        for rule in rules {
            set.register(rule)?;
        }
        Ok(set)
    }

    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<(), RuleSetError> {
        validate(rule.as_ref())?;

        let meta = rule.meta();
        if self.ids.contains(&meta.id) {
            return Err(RuleSetError::DuplicateRuleId(meta.id.clone()));
        }

        let slot = self.rules.len();
        match &meta.resources {
            ResourceKinds::Universal => self.universal.push(slot),
            ResourceKinds::Kinds(kinds) => {
                for kind in kinds {
                    self.by_kind.entry(kind.clone()).or_default().push(slot);
                }
            }
        }
        self.ids.insert(meta.id.clone());
        self.rules.push(rule);
        Ok(())
    }

    /// Rules applicable to `kind`, in registration order.
    pub fn applicable(&self, kind: &str) -> Vec<&Arc<dyn Rule>> {
        let specific = self.by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[]);
        let mut slots: Vec<usize> = specific.iter().chain(&self.universal).copied().collect();
        slots.sort_unstable();
        slots.into_iter().map(|i| &self.rules[i]).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.iter().find(|r| r.meta().id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| &r.meta().id))
            .finish()
    }
}

fn validate(rule: &dyn Rule) -> Result<(), RuleSetError> {
    let meta = rule.meta();
    let invalid = |reason: &str| RuleSetError::Configuration {
        rule_id: meta.id.clone(),
        reason: reason.to_string(),
    };

    if meta.id.trim().is_empty() {
        return Err(invalid("rule id must not be empty"));
    }
    if meta.name.trim().is_empty() {
        return Err(invalid("rule name must not be empty"));
    }
    if let ResourceKinds::Kinds(kinds) = &meta.resources {
        if kinds.is_empty() {
            return Err(invalid(
                "resource kinds must not be empty unless the rule is universal",
            ));
        }
        if kinds.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("resource kinds must not contain blank entries"));
        }
    }
    Ok(())
}
