use crate::error::RuleFault;
use crate::model::{Attributes, Value};

/// Read-only projection over one resource instance (or one nested block).
///
/// Absence is always representable: a missing attribute reads as an empty sequence.
#[derive(Clone, Copy, Debug)]
pub struct AttributeView<'a> {
    attrs: &'a Attributes,
}

impl<'a> AttributeView<'a> {
    pub fn new(attrs: &'a Attributes) -> Self {
        Self { attrs }
    }

    /// The attribute's value sequence, empty when absent.
    pub fn get(&self, name: &str) -> &'a [Value] {
        self.attrs.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First entry of [`get`](Self::get); the access pattern for logically scalar attributes.
    pub fn first(&self, name: &str) -> Option<&'a Value> {
        self.get(name).first()
    }

    /// First entry rendered as text.
    pub fn text(&self, name: &str) -> Option<String> {
        self.first(name).and_then(Value::to_text).map(|s| s.into_owned())
    }

    /// One child view per repetition of a nested block, in declaration order.
    ///
    /// Entries that are not blocks are not yielded.
    pub fn blocks(&self, name: &str) -> impl Iterator<Item = AttributeView<'a>> + 'a {
        self.get(name)
            .iter()
            .filter_map(Value::as_block)
            .map(AttributeView::new)
    }

    /// Like [`blocks`](Self::blocks), but every entry must be a block.
    ///
    /// An entry that breaks the sequence-wrapping convention (e.g. a block with a bare scalar
    /// member, which arrives as a plain map) is a fault rather than something to skip.
    pub fn try_blocks(&self, name: &str) -> Result<Vec<AttributeView<'a>>, RuleFault> {
        self.get(name)
            .iter()
            .enumerate()
            .map(|(position, value)| {
                value.as_block().map(AttributeView::new).ok_or_else(|| {
                    RuleFault::new(format!(
                        "{name} entry #{} is not a nested block",
                        position + 1
                    ))
                })
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }
}
