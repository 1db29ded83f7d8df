use crate::model::Value;
use crate::view::AttributeView;

/// Textual entries of an attribute, flattening list-valued entries.
pub fn texts(view: &AttributeView<'_>, name: &str) -> Vec<String> {
    let mut out = Vec::new();
    for value in view.get(name) {
        collect_text(value, &mut out);
    }
    out
}

fn collect_text(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::List(items) => items.iter().for_each(|v| collect_text(v, out)),
        other => {
            if let Some(text) = other.to_text() {
                out.push(text.into_owned());
            }
        }
    }
}

/// Whether a port specification (`22`, `*`, `20-30`) covers `port`.
pub fn port_covers(spec: &str, port: u16) -> bool {
    let spec = spec.trim();
    if spec == "*" {
        return true;
    }
    if let Some((lo, hi)) = spec.split_once('-') {
        return match (lo.trim().parse::<u16>(), hi.trim().parse::<u16>()) {
            (Ok(lo), Ok(hi)) => (lo..=hi).contains(&port),
            _ => false,
        };
    }
    spec.parse::<u16>().map(|p| p == port).unwrap_or(false)
}

const INTERNET_SOURCES: &[&str] = &["*", "0.0.0.0/0", "internet", "any"];

pub fn is_internet_source(prefix: &str) -> bool {
    let prefix = prefix.trim();
    INTERNET_SOURCES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(prefix))
}

pub fn text_eq(view: &AttributeView<'_>, name: &str, expected: &str) -> bool {
    view.text(name)
        .map(|v| v.trim().eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

/// Short rendering of a value for diagnostics.
pub fn describe(value: &Value) -> String {
    match value.to_text() {
        Some(text) => format!("'{text}'"),
        None => match value {
            Value::Null => "null".to_string(),
            Value::List(_) => "a list".to_string(),
            Value::Map(_) => "a map".to_string(),
            Value::Block(_) => "a block".to_string(),
            _ => "an unsupported value".to_string(),
        },
    }
}
