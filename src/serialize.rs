//! Deterministic serialization of values into snapshot text.
//!
//! Two formats exist. The current format writes strings and byte sequences
//! out raw (plus one trailing newline each) and renders everything else as a
//! structural dump. The legacy format predates the raw-text special case and
//! pushes every value through the structural dump; the comparison layer falls
//! back to it when matching fixtures written by older versions.
//!
//! The structural dump converts a value into [`serde_json::Value`] and renders
//! it with this module's own writer so the output is byte-identical across
//! runs and machines: object keys sorted, sequences of objects sorted by their
//! rendered text, no pointer identity, no capacities. Both serializers are
//! pure functions of their inputs and a [`FormatConfig`].

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

use crate::error::SnapshotError;

/// Formatting knobs for the structural dump.
///
/// An immutable value passed by reference into every serializer call; there is
/// no shared formatting state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Indentation unit for nested containers.
    pub indent: String,
    /// Sort object keys before rendering.
    pub sort_keys: bool,
    /// Sort sequences of objects by their rendered text, so output does not
    /// depend on the order a collection happened to be built in.
    pub sort_sequences: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            sort_keys: true,
            sort_sequences: true,
        }
    }
}

/// One value destined for a snapshot.
///
/// Plain text and raw bytes are preserved verbatim by the current format;
/// anything else enters as a [`Structured`](SnapshotValue::Structured) value,
/// usually via [`SnapshotValue::structured`].
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotValue {
    /// Literal text, written to the fixture as-is.
    Text(String),
    /// Raw bytes, written to the fixture as-is when they are valid UTF-8.
    ///
    /// Fixture content is text: bytes that are not valid UTF-8 are written
    /// with U+FFFD replacement, so byte-for-byte fidelity holds only for
    /// UTF-8 input. Binary snapshot formats are out of scope.
    Bytes(Vec<u8>),
    /// A structural value, rendered through the deterministic dump.
    Structured(Value),
}

impl SnapshotValue {
    /// Converts any serializable value into its structural form.
    pub fn structured<T: Serialize>(value: &T) -> Result<Self, SnapshotError> {
        Ok(Self::Structured(serde_json::to_value(value)?))
    }
}

impl From<&str> for SnapshotValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SnapshotValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&[u8]> for SnapshotValue {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for SnapshotValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Value> for SnapshotValue {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

/// Current snapshot format: text and bytes raw, everything else dumped.
pub fn take_snapshot(values: &[SnapshotValue], format: &FormatConfig) -> String {
    let mut out = String::new();
    for value in values {
        match value {
            SnapshotValue::Text(text) => {
                out.push_str(text);
                out.push('\n');
            }
            SnapshotValue::Bytes(bytes) => {
                out.push_str(&String::from_utf8_lossy(bytes));
                out.push('\n');
            }
            SnapshotValue::Structured(json) => dump_value(&mut out, json, format),
        }
    }
    out
}

/// Legacy snapshot format: every value goes through the structural dump,
/// text as a quoted string and bytes as a list of byte values.
pub fn take_legacy_snapshot(values: &[SnapshotValue], format: &FormatConfig) -> String {
    let mut out = String::new();
    for value in values {
        let json = match value {
            SnapshotValue::Text(text) => Value::String(text.clone()),
            SnapshotValue::Bytes(bytes) => {
                Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())
            }
            SnapshotValue::Structured(json) => json.clone(),
        };
        dump_value(&mut out, &json, format);
    }
    out
}

/// Renders one structural value, ending with a newline.
fn dump_value(out: &mut String, value: &Value, format: &FormatConfig) {
    write_value(out, value, 0, format);
    out.push('\n');
}

fn write_value(out: &mut String, value: &Value, depth: usize, format: &FormatConfig) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::String(s) => {
            let _ = write!(out, "{s:?}");
        }
        Value::Array(items) => write_array(out, items, depth, format),
        Value::Object(map) => write_object(out, map, depth, format),
    }
}

fn write_array(out: &mut String, items: &[Value], depth: usize, format: &FormatConfig) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    let mut rendered: Vec<String> = items
        .iter()
        .map(|item| {
            let mut buf = String::new();
            write_value(&mut buf, item, depth + 1, format);
            buf
        })
        .collect();
    if format.sort_sequences && items.iter().all(Value::is_object) {
        rendered.sort();
    }
    out.push('[');
    for item in &rendered {
        out.push('\n');
        push_indent(out, depth + 1, format);
        out.push_str(item);
        out.push(',');
    }
    out.push('\n');
    push_indent(out, depth, format);
    out.push(']');
}

fn write_object(
    out: &mut String,
    map: &serde_json::Map<String, Value>,
    depth: usize,
    format: &FormatConfig,
) {
    if map.is_empty() {
        out.push_str("{}");
        return;
    }
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    if format.sort_keys {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }
    out.push('{');
    for (key, value) in entries {
        out.push('\n');
        push_indent(out, depth + 1, format);
        let _ = write!(out, "{key:?}: ");
        write_value(out, value, depth + 1, format);
        out.push(',');
    }
    out.push('\n');
    push_indent(out, depth, format);
    out.push('}');
}

fn push_indent(out: &mut String, depth: usize, format: &FormatConfig) {
    for _ in 0..depth {
        out.push_str(&format.indent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn fmt() -> FormatConfig {
        FormatConfig::default()
    }

    #[test]
    fn text_is_written_raw_with_trailing_newline() {
        let values = [SnapshotValue::from("hello world")];
        assert_eq!(take_snapshot(&values, &fmt()), "hello world\n");
    }

    #[test]
    fn bytes_are_written_raw_with_trailing_newline() {
        let values = [SnapshotValue::from(b"raw bytes".to_vec())];
        assert_eq!(take_snapshot(&values, &fmt()), "raw bytes\n");
    }

    #[test]
    fn non_utf8_bytes_are_replaced_not_dropped() {
        let values = [SnapshotValue::from(vec![0xff, b'a'])];
        let out = take_snapshot(&values, &fmt());
        assert_eq!(out, "\u{fffd}a\n");
        // Serializing twice stays byte-identical even for invalid UTF-8.
        assert_eq!(out, take_snapshot(&values, &fmt()));
    }

    #[test]
    fn values_are_concatenated_in_call_order() {
        let values = [SnapshotValue::from("first"), SnapshotValue::from("second")];
        assert_eq!(take_snapshot(&values, &fmt()), "first\nsecond\n");
    }

    #[test]
    fn map_keys_render_sorted_regardless_of_insertion_order() {
        let mut forward = HashMap::new();
        forward.insert("a", 1);
        forward.insert("b", 2);
        let mut backward = HashMap::new();
        backward.insert("b", 2);
        backward.insert("a", 1);

        let one = take_snapshot(
            &[SnapshotValue::structured(&forward).unwrap()],
            &fmt(),
        );
        let two = take_snapshot(
            &[SnapshotValue::structured(&backward).unwrap()],
            &fmt(),
        );
        assert_eq!(one, two);
        let a_pos = one.find("\"a\"").unwrap();
        let b_pos = one.find("\"b\"").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn structural_dump_is_stable_across_calls() {
        let value = json!({
            "name": "widget",
            "tags": ["x", "y"],
            "nested": { "depth": 2, "alive": true }
        });
        let values = [SnapshotValue::from(value)];
        assert_eq!(take_snapshot(&values, &fmt()), take_snapshot(&values, &fmt()));
    }

    #[test]
    fn sequences_of_objects_are_sorted_by_rendered_text() {
        let one = json!([{ "id": 2 }, { "id": 1 }]);
        let two = json!([{ "id": 1 }, { "id": 2 }]);
        assert_eq!(
            take_snapshot(&[SnapshotValue::from(one)], &fmt()),
            take_snapshot(&[SnapshotValue::from(two)], &fmt()),
        );
    }

    #[test]
    fn plain_sequences_keep_their_order() {
        let dumped = take_snapshot(&[SnapshotValue::from(json!([3, 1, 2]))], &fmt());
        let three = dumped.find('3').unwrap();
        let one = dumped.find('1').unwrap();
        assert!(three < one);
    }

    #[test]
    fn legacy_format_quotes_plain_text() {
        let values = [SnapshotValue::from("hello")];
        assert_eq!(take_legacy_snapshot(&values, &fmt()), "\"hello\"\n");
        // The two formats genuinely diverge for plain text.
        assert_ne!(
            take_legacy_snapshot(&values, &fmt()),
            take_snapshot(&values, &fmt())
        );
    }

    #[test]
    fn legacy_format_dumps_bytes_as_a_list() {
        let values = [SnapshotValue::from(vec![1u8, 2u8])];
        let legacy = take_legacy_snapshot(&values, &fmt());
        assert_eq!(legacy, "[\n  1,\n  2,\n]\n");
    }

    #[test]
    fn legacy_and_current_agree_on_structural_values() {
        let values = [SnapshotValue::from(json!({ "k": [1, 2] }))];
        assert_eq!(
            take_snapshot(&values, &fmt()),
            take_legacy_snapshot(&values, &fmt())
        );
    }

    #[test]
    fn empty_containers_render_inline() {
        let dumped = take_snapshot(&[SnapshotValue::from(json!({ "a": [], "b": {} }))], &fmt());
        assert_eq!(dumped, "{\n  \"a\": [],\n  \"b\": {},\n}\n");
    }

    #[test]
    fn derived_structs_round_trip_through_structured() {
        #[derive(serde::Serialize)]
        struct Widget {
            name: String,
            count: u32,
        }
        let widget = Widget {
            name: "gear".to_string(),
            count: 3,
        };
        let dumped = take_snapshot(&[SnapshotValue::structured(&widget).unwrap()], &fmt());
        assert_eq!(dumped, "{\n  \"count\": 3,\n  \"name\": \"gear\",\n}\n");
    }
}
