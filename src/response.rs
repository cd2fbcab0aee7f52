//! Typed navigation over raw metric responses.
//!
//! The reporting service converts XML reports to JSON, so a collection
//! arrives as an array when it has several elements but as a bare object
//! when it has one. The helpers here absorb that collapse, and the scalar
//! readers are lenient because counts are serialized as JSON strings in
//! places.

use serde_json::Value;

use crate::error::NavigationError;

/// A named parameter of a custom event, with its counters.
///
/// `raw_name` is the name exactly as returned (often `"<ordinal>| <name>"`),
/// `name` has the ordinal prefix stripped. Counters the response does not
/// carry are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    pub raw_name: String,
    pub name: String,
    pub total_count: Option<i64>,
    pub session_count: Option<i64>,
    pub duration: Option<i64>,
}

/// A custom event with all of its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub name: String,
    pub parameters: Vec<ParameterRecord>,
}

/// Look up `name` on a JSON object. `path` names the node in error messages,
/// e.g. `"parameters.key"`.
pub fn field<'a>(value: &'a Value, name: &str, path: &str) -> Result<&'a Value, NavigationError> {
    match value {
        Value::Object(map) => map
            .get(name)
            .ok_or_else(|| NavigationError::MissingField(path.to_string())),
        _ => Err(NavigationError::UnexpectedShape {
            path: path.to_string(),
            expected: "object",
        }),
    }
}

/// Look up a string field.
pub fn str_field<'a>(value: &'a Value, name: &str, path: &str) -> Result<&'a str, NavigationError> {
    field(value, name, path)?
        .as_str()
        .ok_or_else(|| NavigationError::UnexpectedShape {
            path: path.to_string(),
            expected: "string",
        })
}

/// The elements of a collection node, whatever shape it arrived in: an
/// array yields its elements, null yields nothing, and anything else is a
/// collapsed one-element collection.
pub fn entries(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Read an integer that may be serialized as a JSON number or as a numeric
/// string.
pub fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Strip the `"<ordinal>| "` prefix the service prepends to display names.
///
/// Everything up to and including the first `|` is removed, along with one
/// following space. A name without a `|` is returned unchanged.
pub fn strip_ordinal_prefix(name: &str) -> &str {
    match name.split_once('|') {
        Some((_, rest)) => rest.strip_prefix(' ').unwrap_or(rest),
        None => name,
    }
}

/// Find a parameter by display name in an Event metric response.
///
/// Names are compared after ordinal-prefix stripping; the first match in
/// response order wins. A parameter that is not present is `Ok(None)`, only
/// a response without the `parameters.key` structure is an error.
pub fn find_parameter(
    event_response: &Value,
    parameter: &str,
) -> Result<Option<ParameterRecord>, NavigationError> {
    for entry in parameter_entries(event_response)? {
        let raw_name = match display_name(entry) {
            Some(name) => name,
            None => continue,
        };
        if strip_ordinal_prefix(raw_name) == parameter {
            return Ok(Some(record(entry, raw_name)));
        }
    }
    Ok(None)
}

/// Collect an Event metric response into an [`EventRecord`]. Entries
/// without a usable name are dropped.
pub fn event_record(event_response: &Value) -> Result<EventRecord, NavigationError> {
    let name = str_field(event_response, "@eventName", "@eventName")?.to_string();
    let parameters = parameter_entries(event_response)?
        .into_iter()
        .filter_map(|entry| display_name(entry).map(|raw_name| record(entry, raw_name)))
        .collect();
    Ok(EventRecord { name, parameters })
}

/// The `@eventName` of every element of a Summary response's `event`
/// collection, in response order. Elements without the field are skipped.
/// Names keep their ordinal prefix, which is what the Event endpoint
/// expects back.
pub fn event_names(summary_response: &Value) -> Result<Vec<String>, NavigationError> {
    let events = field(summary_response, "event", "event")?;
    let names = entries(events)
        .into_iter()
        .filter_map(|event| event.get("@eventName").and_then(Value::as_str))
        .map(str::to_string)
        .collect();
    Ok(names)
}

/// The parameter entries of an Event response. A one-parameter response
/// collapses twice over: the lone `key` object carries its records under
/// `value`, so that node replaces it when present.
fn parameter_entries(event_response: &Value) -> Result<Vec<&Value>, NavigationError> {
    let parameters = field(event_response, "parameters", "parameters")?;
    let mut keys = field(parameters, "key", "parameters.key")?;
    if let Some(values) = keys.get("value") {
        keys = values;
    }
    Ok(entries(keys))
}

/// A parameter entry's display name: its `@name` field, or the entry itself
/// when the service collapsed it to a bare string.
fn display_name(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(name) => Some(name),
        _ => entry.get("@name").and_then(Value::as_str),
    }
}

fn record(entry: &Value, raw_name: &str) -> ParameterRecord {
    ParameterRecord {
        raw_name: raw_name.to_string(),
        name: strip_ordinal_prefix(raw_name).to_string(),
        total_count: entry.get("@totalCount").and_then(lenient_i64),
        session_count: entry.get("@sessionCount").and_then(lenient_i64),
        duration: entry.get("@duration").and_then(lenient_i64),
    }
}
