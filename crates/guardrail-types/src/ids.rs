//! Stable identifiers for rules, resource kinds, and tool-level codes.
//!
//! Rule IDs follow the `GR_<PROVIDER>_<NNN>` convention and never change once published.

// Rules
pub const RULE_AZURE_NSG_NO_SSH_FROM_INTERNET: &str = "GR_AZURE_001";
pub const RULE_AZURE_STORAGE_NO_PUBLIC_NETWORK: &str = "GR_AZURE_002";
pub const RULE_AZURE_STORAGE_MIN_TLS_1_2: &str = "GR_AZURE_003";

// Resource kinds
pub const KIND_AZURE_NETWORK_SECURITY_GROUP: &str = "azurerm_network_security_group";
pub const KIND_AZURE_STORAGE_ACCOUNT: &str = "azurerm_storage_account";

// Tool-level
pub const RULE_TOOL_RUNTIME: &str = "tool.runtime";
pub const REASON_RUN_CANCELLED: &str = "run_cancelled";
pub const REASON_UNKNOWN_OUTCOMES: &str = "unknown_outcomes";
