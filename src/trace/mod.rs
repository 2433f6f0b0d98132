//! Mapping opaque execution traces back onto a rule schema.
//!
//! The engine's trace is keyed by internal node ids; consumers must never
//! assume those keys equal schema field names. This module reconstructs
//! named input/output values by matching trace payload keys against schema
//! field ids first and sanitized property names second.

use crate::rule::{RuleSchema, SchemaField};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One per-node record of what flowed through the graph during evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraceEntry {
    pub id: String,
    pub name: Option<String>,
    pub input: Option<Value>,
    pub output: Option<Value>,
    pub performance: Option<String>,
    pub trace_data: Option<Value>,
}

/// A full execution trace, keyed by node id. `BTreeMap` keeps iteration
/// order deterministic for last-write-wins merging.
pub type TraceMap = BTreeMap<String, TraceEntry>;

/// Which side of the trace to reconstruct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceDirection {
    Input,
    Output,
}

/// Replace CSV-hostile characters in a key: commas become `-` so the key
/// stays CSV-safe, control whitespace is replaced with `replacement`.
pub fn sanitize_key(input: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            ',' => out.push('-'),
            '\n' | '\r' | '\t' | '\x0c' => out.push_str(replacement),
            _ => out.push(ch),
        }
    }
    out
}

fn property_by_id(id: &str, fields: &[SchemaField]) -> Option<String> {
    fields
        .iter()
        .find(|field| {
            field
                .id
                .as_ref()
                .is_some_and(|field_id| field_id.to_string() == id)
        })
        .map(|field| field.property.clone())
}

/// Map one trace payload object onto the schema fields of a direction.
///
/// Keys matching a field id resolve to that field's sanitized property;
/// keys matching a sanitized property directly are kept as-is (nodes that
/// expose named fields without synthetic ids); everything else is an
/// internal value and is dropped.
fn map_payload(payload: &Value, fields: &[SchemaField], result: &mut serde_json::Map<String, Value>) {
    let Some(entries) = payload.as_object() else {
        return;
    };

    for (key, value) in entries {
        if let Some(property) = property_by_id(key, fields) {
            result.insert(sanitize_key(&property, ""), value.clone());
        } else if let Some(direct) = fields
            .iter()
            .find(|field| sanitize_key(&field.property, "") == *key)
        {
            result.insert(sanitize_key(&direct.property, ""), value.clone());
        }
    }
}

/// Merge every trace entry's payload for one direction into a single flat
/// object keyed by schema property. Later entries overwrite earlier ones.
pub fn map_traces(
    traces: &TraceMap,
    schema: &RuleSchema,
    direction: TraceDirection,
) -> serde_json::Map<String, Value> {
    let fields = schema.fields_for(direction);
    let mut result = serde_json::Map::new();

    for entry in traces.values() {
        let payload = match direction {
            TraceDirection::Input => entry.input.as_ref(),
            TraceDirection::Output => entry.output.as_ref(),
        };
        if let Some(payload) = payload {
            map_payload(payload, fields, &mut result);
        }
    }

    result
}
