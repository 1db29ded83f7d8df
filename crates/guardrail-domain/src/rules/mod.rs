//! Built-in rule catalog.

use crate::error::{RuleFault, RuleSetError};
use crate::policy::EffectiveConfig;
use crate::rule::{Evaluation, Rule, RuleMeta};
use crate::ruleset::RuleSet;
use crate::view::AttributeView;
use std::sync::Arc;

mod nsg_no_ssh_from_internet;
mod storage_min_tls;
mod storage_no_public_network;
mod utils;


pub use nsg_no_ssh_from_internet::NsgNoSshFromInternet;
pub use storage_min_tls::StorageMinTls;
pub use storage_no_public_network::StorageNoPublicNetwork;

/// Every built-in rule, in stable registration order.
pub fn builtin_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(NsgNoSshFromInternet::new()),
        Arc::new(StorageNoPublicNetwork::new()),
        Arc::new(StorageMinTls::new()),
    ]
}

/// Assemble the rule set for a run: drop disabled rules and apply severity overrides.
pub fn build_rule_set(
    rules: Vec<Arc<dyn Rule>>,
    cfg: &EffectiveConfig,
) -> Result<RuleSet, RuleSetError> {
    let mut set = RuleSet::new();
    for rule in rules {
        let id = rule.meta().id.clone();
        if !cfg.is_enabled(&id) {
            continue;
        }
        let rule = match cfg.rule_policy(&id).and_then(|p| p.severity) {
            Some(severity) if severity != rule.meta().severity => {
                let mut meta = rule.meta().clone();
                meta.severity = severity;
                Arc::new(Configured { inner: rule, meta }) as Arc<dyn Rule>
            }
            _ => rule,
        };
        set.register(rule)?;
    }
    Ok(set)
}

/// A rule whose metadata was adjusted by configuration.
struct Configured {
    inner: Arc<dyn Rule>,
    meta: RuleMeta,
}

impl Rule for Configured {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn evaluate(&self, view: &AttributeView<'_>) -> Result<Evaluation, RuleFault> {
        self.inner.evaluate(view)
    }
}
