use super::utils::{is_internet_source, port_covers, text_eq, texts};
use crate::error::RuleFault;
use crate::rule::{AbsencePolicy, Evaluation, ResourceKinds, Rule, RuleMeta};
use crate::view::AttributeView;
use guardrail_types::{Category, Severity, ids};

const SECURITY_RULE: &str = "security_rule";
const SSH_PORT: u16 = 22;

/// Fails when any `security_rule` block allows inbound SSH from the open internet.
///
/// Absence: no `security_rule` blocks means nothing is exposed (default-pass).
#[derive(Debug, Clone)]
pub struct NsgNoSshFromInternet {
    meta: RuleMeta,
}

impl NsgNoSshFromInternet {
    pub fn new() -> Self {
        Self::with_kinds([ids::KIND_AZURE_NETWORK_SECURITY_GROUP])
    }

    pub fn with_kinds<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            meta: RuleMeta {
                id: ids::RULE_AZURE_NSG_NO_SSH_FROM_INTERNET.to_string(),
                name: "Disallow SSH (22) from Internet on NSG rules".to_string(),
                category: Category::Networking,
                severity: Severity::Error,
                resources: ResourceKinds::of(kinds),
                absence: AbsencePolicy::DefaultPass,
            },
        }
    }
}

impl Default for NsgNoSshFromInternet {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NsgNoSshFromInternet {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn evaluate(&self, view: &AttributeView<'_>) -> Result<Evaluation, RuleFault> {
        if !view.contains(SECURITY_RULE) {
            return Ok(Evaluation::absent(self.meta.absence, SECURITY_RULE));
        }

        // Any single exposing block fails the resource.
        for (position, block) in view.try_blocks(SECURITY_RULE)?.into_iter().enumerate() {
            if let Some(source) = exposed_source(&block) {
                let label = block.text("name").unwrap_or_else(|| format!("#{}", position + 1));
                return Ok(Evaluation::failed(format!(
                    "security_rule {label} allows inbound port {SSH_PORT} from '{source}'"
                )));
            }
        }

        Ok(Evaluation::passed())
    }
}

fn exposed_source(block: &AttributeView<'_>) -> Option<String> {
    if !text_eq(block, "direction", "Inbound") || !text_eq(block, "access", "Allow") {
        return None;
    }

    let covers_ssh = texts(block, "destination_port_range")
        .into_iter()
        .chain(texts(block, "destination_port_ranges"))
        .any(|spec| port_covers(&spec, SSH_PORT));
    if !covers_ssh {
        return None;
    }

    texts(block, "source_address_prefix")
        .into_iter()
        .chain(texts(block, "source_address_prefixes"))
        .find(|prefix| is_internet_source(prefix))
}
