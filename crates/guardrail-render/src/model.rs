#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableOutcome {
    Passed,
    Failed,
    Skipped,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableResult {
    pub severity: RenderableSeverity,
    pub outcome: RenderableOutcome,
    pub rule_id: String,
    pub rule_name: String,
    pub category: String,
    pub address: String,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub profile: String,
    pub resources_scanned: u32,
    pub rules_loaded: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub unknown: u32,
    /// Set when the run did not evaluate every pair (cancelled or aborted).
    pub incomplete_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdict,
    pub results: Vec<RenderableResult>,
    pub data: RenderableData,
}
