//! Rendering utilities for CI surfaces (Markdown job summaries, PR comments).
//!
//! Renderers take a `RenderableReport`, a flattened view of a report that does not
//! depend on the wire DTOs, so they can be tested without building full envelopes.

#![forbid(unsafe_code)]

mod markdown;
mod model;

pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableOutcome, RenderableReport, RenderableResult, RenderableSeverity,
    RenderableVerdict,
};
