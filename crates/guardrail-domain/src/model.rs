use crate::error::EngineError;
use serde_json::Value as Json;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Attribute name -> value sequence.
///
/// Every attribute is a sequence: empty means unset, one entry is the common case, more than
/// one entry means the attribute (usually a nested block) was declared repeatedly.
pub type Attributes = BTreeMap<String, Vec<Value>>;

/// Reserved attribute carrying the parser-assigned resource address.
pub const ADDRESS_ATTRIBUTE: &str = "__address__";

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    /// Plain key/value map (e.g. `tags`), values are not sequence-wrapped.
    Map(BTreeMap<String, Value>),
    /// Nested block following the same sequence-wrapping convention as a resource.
    Block(Attributes),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Attributes> {
        match self {
            Value::Block(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Scalar rendered as text, so `22` and `"22"` compare equal.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Int(i) => Some(Cow::Owned(i.to_string())),
            Value::Float(f) => Some(Cow::Owned(f.to_string())),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Null | Value::List(_) | Value::Map(_) | Value::Block(_) => None,
        }
    }
}

/// Identity of one resource instance within a [`ConfigTree`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceRef {
    pub kind: String,
    /// Declaration order within `kind`.
    pub index: usize,
    pub name: Option<String>,
}

impl ResourceRef {
    /// `kind.name` when named, `kind[index]` otherwise.
    pub fn address(&self) -> String {
        match &self.name {
            Some(name) => format!("{}.{}", self.kind, name),
            None => format!("{}[{}]", self.kind, self.index),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

/// Resource kind -> ordered resource instances. Frozen once built.
#[derive(Clone, Debug, Default)]
pub struct ConfigTree {
    kinds: BTreeMap<String, Vec<Arc<Attributes>>>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instance of `kind`, preserving declaration order.
    pub fn push(&mut self, kind: impl Into<String>, attributes: Attributes) {
        self.kinds
            .entry(kind.into())
            .or_default()
            .push(Arc::new(attributes));
    }

    /// Convert parser output into a tree, validating the sequence-wrapping convention.
    pub fn from_json(input: &Json) -> Result<Self, EngineError> {
        let Json::Object(top) = input else {
            return Err(EngineError::malformed(
                "",
                format!("expected an object of resource kinds, found {}", json_kind(input)),
            ));
        };

        let mut tree = ConfigTree::new();
        for (kind, instances) in top {
            let path = format!("/{kind}");
            let Json::Array(instances) = instances else {
                return Err(EngineError::malformed(
                    path,
                    format!(
                        "resource kind must map to a sequence of instances, found {}",
                        json_kind(instances)
                    ),
                ));
            };

            let entry = tree.kinds.entry(kind.clone()).or_default();
            for (index, instance) in instances.iter().enumerate() {
                let path = format!("{path}/{index}");
                let Json::Object(obj) = instance else {
                    return Err(EngineError::malformed(
                        path,
                        format!(
                            "resource instance must be a mapping, found {}",
                            json_kind(instance)
                        ),
                    ));
                };
                entry.push(Arc::new(attributes_from_json(obj, &path)?));
            }
        }
        Ok(tree)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn instances(&self, kind: &str) -> &[Arc<Attributes>] {
        self.kinds.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All instances in evaluation order: kinds sorted, instances in declaration order.
    ///
    /// A name shared by several instances of one kind (e.g. an unresolved `${var.name}`) is not
    /// an identity; those instances are addressed by declaration index instead.
    pub fn resources(&self) -> impl Iterator<Item = (ResourceRef, &Arc<Attributes>)> {
        self.kinds.iter().flat_map(|(kind, instances)| {
            let names: Vec<Option<String>> =
                instances.iter().map(|attrs| resource_name(attrs)).collect();
            let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
            for name in names.iter().flatten() {
                *seen.entry(name.as_str()).or_default() += 1;
            }
            let unique: Vec<Option<String>> = names
                .iter()
                .map(|name| name.clone().filter(|n| seen.get(n.as_str()) == Some(&1)))
                .collect();

            instances
                .iter()
                .zip(unique)
                .enumerate()
                .map(move |(index, (attrs, name))| {
                    (
                        ResourceRef {
                            kind: kind.clone(),
                            index,
                            name,
                        },
                        attrs,
                    )
                })
        })
    }

    pub fn resource_count(&self) -> usize {
        self.kinds.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.resource_count() == 0
    }
}

fn resource_name(attrs: &Attributes) -> Option<String> {
    [ADDRESS_ATTRIBUTE, "name"].iter().find_map(|key| {
        attrs
            .get(*key)
            .and_then(|values| values.first())
            .and_then(Value::to_text)
            .map(|s| s.into_owned())
    })
}

fn attributes_from_json(
    obj: &serde_json::Map<String, Json>,
    path: &str,
) -> Result<Attributes, EngineError> {
    let mut attrs = Attributes::new();
    for (name, value) in obj {
        let path = format!("{path}/{name}");
        let Json::Array(entries) = value else {
            return Err(EngineError::malformed(
                path,
                format!("attribute must be a sequence, found {}", json_kind(value)),
            ));
        };
        let entries = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| value_from_json(entry, &format!("{path}/{i}")))
            .collect::<Result<Vec<_>, _>>()?;
        attrs.insert(name.clone(), entries);
    }
    Ok(attrs)
}

fn value_from_json(value: &Json, path: &str) -> Result<Value, EngineError> {
    Ok(match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::List(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| value_from_json(item, &format!("{path}/{i}")))
                .collect::<Result<_, _>>()?,
        ),
        // An object whose members are all sequences is a nested block; anything else is a
        // plain map such as `tags`.
        Json::Object(obj) if obj.values().all(Json::is_array) => {
            Value::Block(attributes_from_json(obj, path)?)
        }
        Json::Object(obj) => Value::Map(
            obj.iter()
                .map(|(k, v)| Ok((k.clone(), value_from_json(v, &format!("{path}/{k}"))?)))
                .collect::<Result<_, EngineError>>()?,
        ),
    })
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "a sequence",
        Json::Object(_) => "a mapping",
    }
}
