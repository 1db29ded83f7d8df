use crate::error::RuleFault;
use crate::model::{Attributes, ResourceRef, Value};
use crate::result::ResultEntry;
use crate::rule::{AbsencePolicy, Evaluation, FnRule, ResourceKinds, Rule, RuleMeta};
use guardrail_types::{Category, Outcome, Severity};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn s(v: &str) -> Value {
    Value::String(v.to_string())
}

pub fn attrs(entries: Vec<(&str, Vec<Value>)>) -> Attributes {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

pub fn block(entries: Vec<(&str, Vec<Value>)>) -> Value {
    Value::Block(attrs(entries))
}

/// NSG `security_rule` block with the four attributes the SSH rule inspects.
pub fn nsg_rule(direction: &str, access: &str, port: Value, source: &str) -> Value {
    block(vec![
        ("direction", vec![s(direction)]),
        ("access", vec![s(access)]),
        ("destination_port_range", vec![port]),
        ("source_address_prefix", vec![s(source)]),
    ])
}

pub fn meta(id: &str, resources: ResourceKinds) -> RuleMeta {
    RuleMeta {
        id: id.to_string(),
        name: format!("rule {id}"),
        category: Category::GeneralSecurity,
        severity: Severity::Error,
        resources,
        absence: AbsencePolicy::Skip,
    }
}

pub fn fixed_rule(meta: RuleMeta, outcome: Outcome) -> Arc<dyn Rule> {
    Arc::new(FnRule::new(meta, move |_| Ok(Evaluation::new(outcome, None))))
}

pub fn faulting_rule(meta: RuleMeta, message: &'static str) -> Arc<dyn Rule> {
    Arc::new(FnRule::new(meta, move |_| Err(RuleFault::new(message))))
}

/// Rule that counts its invocations and passes.
pub fn counting_rule(meta: RuleMeta, counter: Arc<AtomicUsize>) -> Arc<dyn Rule> {
    Arc::new(FnRule::new(meta, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Evaluation::passed())
    }))
}

pub fn entry(
    rule_id: &str,
    category: Category,
    severity: Severity,
    outcome: Outcome,
) -> ResultEntry {
    ResultEntry {
        resource: ResourceRef {
            kind: "kind".to_string(),
            index: 0,
            name: None,
        },
        rule_id: rule_id.to_string(),
        rule_name: format!("rule {rule_id}"),
        category,
        severity,
        outcome,
        message: None,
    }
}
