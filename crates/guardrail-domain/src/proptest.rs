//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Absence policies of the built-in rules
//! - Existential-match semantics over repeated blocks
//! - Determinism and independence of engine runs

use crate::engine::{CancellationToken, Engine, EngineOptions};
use crate::model::{Attributes, ConfigTree, Value};
use crate::rule::Rule;
use crate::rules::{NsgNoSshFromInternet, StorageMinTls, StorageNoPublicNetwork, builtin_rules};
use crate::ruleset::RuleSet;
use crate::test_support::{attrs, nsg_rule, s};
use crate::view::AttributeView;
use guardrail_types::{Outcome, ids};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

/// Attribute names that none of the built-in rules inspect.
fn arb_unrelated_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("x_[a-z]{1,12}").unwrap()
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-zA-Z0-9_./*-]{0,16}".prop_map(Value::String),
        Just(Value::Null),
    ]
}

fn arb_unrelated_attrs() -> impl Strategy<Value = Attributes> {
    prop::collection::btree_map(
        arb_unrelated_name(),
        prop::collection::vec(arb_scalar(), 0..3),
        0..6,
    )
}

/// NSG rule blocks that never expose SSH to the internet.
fn arb_benign_block() -> impl Strategy<Value = Value> {
    prop_oneof![
        ("(80|443|3389|8000-8080)", "(\\*|Internet|Any)")
            .prop_map(|(port, src)| nsg_rule("Inbound", "Allow", s(&port), &src)),
        "(22|\\*|20-30)".prop_map(|port| nsg_rule("Inbound", "Deny", s(&port), "*")),
        "(22|\\*)".prop_map(|port| nsg_rule("Outbound", "Allow", s(&port), "*")),
        "(10\\.0\\.0\\.0/24|VirtualNetwork|192\\.168\\.1\\.0/24)"
            .prop_map(|src| nsg_rule("Inbound", "Allow", s("22"), &src)),
    ]
}

fn arb_exposing_block() -> impl Strategy<Value = Value> {
    ("(22|\\*|1-1024)", "(\\*|0\\.0\\.0\\.0/0|Internet|Any)")
        .prop_map(|(port, src)| nsg_rule("Inbound", "Allow", s(&port), &src))
}

fn arb_storage_account() -> impl Strategy<Value = Attributes> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of("(TLS1_0|TLS1_1|TLS1_2)"),
        arb_unrelated_attrs(),
    )
        .prop_map(|(public, tls, mut extra)| {
            if let Some(public) = public {
                extra.insert(
                    "public_network_access_enabled".to_string(),
                    vec![Value::Bool(public)],
                );
            }
            if let Some(tls) = tls {
                extra.insert("min_tls_version".to_string(), vec![Value::String(tls)]);
            }
            extra
        })
}

fn arb_nsg() -> impl Strategy<Value = Attributes> {
    prop::collection::vec(
        prop_oneof![3 => arb_benign_block(), 1 => arb_exposing_block()],
        0..5,
    )
    .prop_map(|blocks| attrs(vec![("security_rule", blocks)]))
}

fn arb_tree() -> impl Strategy<Value = ConfigTree> {
    (
        prop::collection::vec(arb_storage_account(), 0..6),
        prop::collection::vec(arb_nsg(), 0..6),
    )
        .prop_map(|(accounts, groups)| {
            let mut tree = ConfigTree::new();
            for a in accounts {
                tree.push(ids::KIND_AZURE_STORAGE_ACCOUNT, a);
            }
            for g in groups {
                tree.push(ids::KIND_AZURE_NETWORK_SECURITY_GROUP, g);
            }
            tree
        })
}

fn evaluate(rule: &dyn Rule, a: &Attributes) -> Outcome {
    rule.evaluate(&AttributeView::new(a))
        .expect("built-in rules do not fault")
        .outcome
}

fn run(rules: Vec<Arc<dyn Rule>>, tree: &ConfigTree) -> Vec<(String, String, Outcome)> {
    let engine = Engine::new(
        RuleSet::from_rules(rules).expect("valid rule set"),
        EngineOptions {
            parallelism: Some(4),
            ..EngineOptions::default()
        },
    );
    engine
        .run(tree, &CancellationToken::new())
        .expect("run")
        .iter()
        .map(|e| (e.resource.address(), e.rule_id.clone(), e.outcome))
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn default_fail_rules_fail_when_attribute_absent(extra in arb_unrelated_attrs()) {
        prop_assert_eq!(evaluate(&StorageNoPublicNetwork::new(), &extra), Outcome::Failed);
        prop_assert_eq!(evaluate(&StorageMinTls::new(), &extra), Outcome::Failed);
    }

    #[test]
    fn default_pass_rule_passes_without_blocks(extra in arb_unrelated_attrs()) {
        prop_assert_eq!(evaluate(&NsgNoSshFromInternet::new(), &extra), Outcome::Passed);
    }

    #[test]
    fn any_single_exposing_block_fails_regardless_of_position(
        benign in prop::collection::vec(arb_benign_block(), 0..8),
        exposing in arb_exposing_block(),
        position in any::<prop::sample::Index>(),
    ) {
        let mut blocks = benign.clone();
        let k = position.index(blocks.len() + 1);
        blocks.insert(k, exposing);

        let rule = NsgNoSshFromInternet::new();
        prop_assert_eq!(
            evaluate(&rule, &attrs(vec![("security_rule", blocks)])),
            Outcome::Failed
        );
        prop_assert_eq!(
            evaluate(&rule, &attrs(vec![("security_rule", benign)])),
            Outcome::Passed
        );
    }

    #[test]
    fn repeated_runs_are_identical(tree in arb_tree()) {
        let first = run(builtin_rules(), &tree);
        let second = run(builtin_rules(), &tree);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn removing_a_rule_does_not_change_other_outcomes(
        tree in arb_tree(),
        removed in 0usize..3,
    ) {
        let all = run(builtin_rules(), &tree);

        let mut rules = builtin_rules();
        let removed_id = rules.remove(removed).meta().id.clone();
        let rest = run(rules, &tree);

        let expected: Vec<_> = all.into_iter().filter(|(_, id, _)| *id != removed_id).collect();
        prop_assert_eq!(expected, rest);
    }

    #[test]
    fn every_applicable_pair_gets_exactly_one_result(tree in arb_tree()) {
        let results = run(builtin_rules(), &tree);
        let storage = tree.instances(ids::KIND_AZURE_STORAGE_ACCOUNT).len();
        let nsg = tree.instances(ids::KIND_AZURE_NETWORK_SECURITY_GROUP).len();
        prop_assert_eq!(results.len(), storage * 2 + nsg);
    }
}
