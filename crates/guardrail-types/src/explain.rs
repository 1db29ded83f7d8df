//! Explain registry for rules.
//!
//! Maps rule IDs to human-readable explanations with remediation guidance and the
//! rule's documented absence policy.

use crate::ids;

/// Explanation entry for a rule.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule does and why it exists.
    pub description: &'static str,
    /// What the rule concludes when the inspected attribute is not declared.
    pub absence_policy: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after HCL examples.
    pub examples: ExamplePair,
}

/// Before and after configuration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would fail the rule.
    pub before: &'static str,
    /// Configuration that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule ID.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::RULE_AZURE_NSG_NO_SSH_FROM_INTERNET => Some(explain_nsg_no_ssh_from_internet()),
        ids::RULE_AZURE_STORAGE_NO_PUBLIC_NETWORK => Some(explain_storage_no_public_network()),
        ids::RULE_AZURE_STORAGE_MIN_TLS_1_2 => Some(explain_storage_min_tls()),
        _ => None,
    }
}

/// List all known rule IDs.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_AZURE_NSG_NO_SSH_FROM_INTERNET,
        ids::RULE_AZURE_STORAGE_NO_PUBLIC_NETWORK,
        ids::RULE_AZURE_STORAGE_MIN_TLS_1_2,
    ]
}

fn explain_nsg_no_ssh_from_internet() -> Explanation {
    Explanation {
        title: "Disallow SSH (22) from Internet on NSG rules",
        description: "\
Detects network security groups with an inbound allow rule that exposes port 22
to the open internet.

A `security_rule` block matches when all of these hold:
- `direction` is `Inbound` and `access` is `Allow`
- the destination port covers 22 (`22`, `*`, or a range such as `20-30`)
- the source is `*`, `0.0.0.0/0`, `Internet`, or `Any`

Every block is inspected; a single matching block fails the resource.",
        absence_policy: "\
Default-pass: a security group without any `security_rule` blocks exposes nothing,
so it passes vacuously.",
        remediation: "\
Restrict the source to a trusted range (VPN, bastion subnet) or remove the rule
and use a bastion host / just-in-time access instead.",
        examples: ExamplePair {
            before: r#"security_rule {
  name                       = "ssh"
  direction                  = "Inbound"
  access                     = "Allow"
  destination_port_range     = "22"
  source_address_prefix      = "*"
}"#,
            after: r#"security_rule {
  name                       = "ssh"
  direction                  = "Inbound"
  access                     = "Allow"
  destination_port_range     = "22"
  source_address_prefix      = "10.0.0.0/24"
}"#,
        },
    }
}

fn explain_storage_no_public_network() -> Explanation {
    Explanation {
        title: "Storage must disable public network access",
        description: "\
Detects storage accounts that accept traffic from public networks.

Only an explicit `public_network_access_enabled = false` passes.",
        absence_policy: "\
Default-fail: when the attribute is not declared the platform enables public
network access, so absence is treated as insecure.",
        remediation: "\
Set `public_network_access_enabled = false` and reach the account through
private endpoints.",
        examples: ExamplePair {
            before: r#"resource "azurerm_storage_account" "logs" {
  name = "logs"
}"#,
            after: r#"resource "azurerm_storage_account" "logs" {
  name                          = "logs"
  public_network_access_enabled = false
}"#,
        },
    }
}

fn explain_storage_min_tls() -> Explanation {
    Explanation {
        title: "Storage must require TLS 1.2 minimum",
        description: "\
Detects storage accounts that accept TLS versions older than 1.2.

Only `min_tls_version = \"TLS1_2\"` passes.",
        absence_policy: "\
Default-fail: an undeclared minimum TLS version may fall back to an older
platform default, so absence is treated as insecure.",
        remediation: "\
Set `min_tls_version = \"TLS1_2\"` on the storage account.",
        examples: ExamplePair {
            before: r#"resource "azurerm_storage_account" "logs" {
  min_tls_version = "TLS1_0"
}"#,
            after: r#"resource "azurerm_storage_account" "logs" {
  min_tls_version = "TLS1_2"
}"#,
        },
    }
}
