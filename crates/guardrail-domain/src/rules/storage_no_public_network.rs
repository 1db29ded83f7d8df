use super::utils::describe;
use crate::error::RuleFault;
use crate::model::Value;
use crate::rule::{AbsencePolicy, Evaluation, ResourceKinds, Rule, RuleMeta};
use crate::view::AttributeView;
use guardrail_types::{Category, Severity, ids};

const PUBLIC_NETWORK_ACCESS: &str = "public_network_access_enabled";

/// Passes only on an explicit boolean `public_network_access_enabled = false`.
///
/// Absence: the platform default is public access (default-fail).
#[derive(Debug, Clone)]
pub struct StorageNoPublicNetwork {
    meta: RuleMeta,
}

impl StorageNoPublicNetwork {
    pub fn new() -> Self {
        Self::with_kinds([ids::KIND_AZURE_STORAGE_ACCOUNT])
    }

    pub fn with_kinds<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            meta: RuleMeta {
                id: ids::RULE_AZURE_STORAGE_NO_PUBLIC_NETWORK.to_string(),
                name: "Storage must disable public network access".to_string(),
                category: Category::Networking,
                severity: Severity::Error,
                resources: ResourceKinds::of(kinds),
                absence: AbsencePolicy::DefaultFail,
            },
        }
    }
}

impl Default for StorageNoPublicNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for StorageNoPublicNetwork {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn evaluate(&self, view: &AttributeView<'_>) -> Result<Evaluation, RuleFault> {
        Ok(match view.first(PUBLIC_NETWORK_ACCESS) {
            None => Evaluation::absent(self.meta.absence, PUBLIC_NETWORK_ACCESS),
            Some(Value::Bool(false)) => Evaluation::passed(),
            Some(other) => Evaluation::failed(format!(
                "{PUBLIC_NETWORK_ACCESS} is {}; expected false",
                describe(other)
            )),
        })
    }
}
