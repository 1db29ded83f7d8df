use super::utils::describe;
use crate::error::RuleFault;
use crate::rule::{AbsencePolicy, Evaluation, ResourceKinds, Rule, RuleMeta};
use crate::view::AttributeView;
use guardrail_types::{Category, Severity, ids};

const MIN_TLS_VERSION: &str = "min_tls_version";
const REQUIRED: &str = "TLS1_2";

/// Passes only when `min_tls_version` is `TLS1_2`.
///
/// Absence: default-fail.
#[derive(Debug, Clone)]
pub struct StorageMinTls {
    meta: RuleMeta,
}

impl StorageMinTls {
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
                id: ids::RULE_AZURE_STORAGE_MIN_TLS_1_2.to_string(),
                name: "Storage must require TLS 1.2 minimum".to_string(),
                category: Category::Encryption,
                severity: Severity::Error,
                resources: ResourceKinds::of(kinds),
                absence: AbsencePolicy::DefaultFail,
            },
        }
    }
}

impl Default for StorageMinTls {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for StorageMinTls {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn evaluate(&self, view: &AttributeView<'_>) -> Result<Evaluation, RuleFault> {
        Ok(match view.first(MIN_TLS_VERSION) {
            None => Evaluation::absent(self.meta.absence, MIN_TLS_VERSION),
            Some(value) if value.as_str() == Some(REQUIRED) => Evaluation::passed(),
            Some(other) => Evaluation::failed(format!(
                "{MIN_TLS_VERSION} is {}; expected '{REQUIRED}'",
                describe(other)
            )),
        })
    }
}
