use super::graph::{Edge, Field, FieldId, Node, RuleGraph};
use crate::error::SchemaError;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// One input or output record in a derived rule schema.
///
/// Records derived from declared node fields carry the full `Field`
/// definition in `source`; records derived from expression aliases carry
/// only a `key`. Expression nodes do not reliably emit stable ids, which is
/// why dedup against final outputs is two-tier (id, then key + property).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaField {
    pub id: Option<FieldId>,
    pub key: Option<String>,
    pub name: Option<String>,
    /// The caller-facing property this record addresses.
    pub property: String,
    /// The originating field definition, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Field>,
}

impl SchemaField {
    fn from_field(field: &Field) -> Option<Self> {
        let property = field.property()?.to_string();
        Some(SchemaField {
            id: field.id.clone(),
            key: None,
            name: field.name.clone(),
            property,
            source: Some(field.clone()),
        })
    }

    fn matches(&self, other: &SchemaField) -> bool {
        if let (Some(a), Some(b)) = (&self.id, &other.id) {
            if a == b {
                return true;
            }
        }
        self.key.is_some() && self.key == other.key && self.property == other.property
    }
}

/// The derived input/output description of a rule graph. Derived on demand,
/// never stored with the rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSchema {
    /// Fields that originate purely from the caller.
    pub inputs: Vec<SchemaField>,
    /// Intermediate outputs, excluding anything counted as a final output.
    pub outputs: Vec<SchemaField>,
    /// Outputs feeding directly into the designated output node.
    pub final_outputs: Vec<SchemaField>,
}

impl RuleSchema {
    /// Derive the schema for a rule graph: unique inputs, general outputs,
    /// and final outputs, with general outputs deduplicated against the
    /// final set.
    pub fn extract(graph: &RuleGraph) -> Result<Self, SchemaError> {
        let inputs = extract_unique_inputs(&graph.nodes);
        let general_outputs = extract_outputs(&graph.nodes);
        let final_outputs = extract_final_outputs(&graph.nodes, &graph.edges)?;

        let outputs = general_outputs
            .into_iter()
            .filter(|output| !final_outputs.iter().any(|fin| fin.matches(output)))
            .collect();

        Ok(RuleSchema {
            inputs,
            outputs,
            final_outputs,
        })
    }

    /// The schema field list for one trace direction.
    pub fn fields_for(&self, direction: crate::trace::TraceDirection) -> &[SchemaField] {
        match direction {
            crate::trace::TraceDirection::Input => &self.inputs,
            crate::trace::TraceDirection::Output => &self.final_outputs,
        }
    }
}

/// Collect every declared input record across all nodes, including the
/// input side of expression aliases.
pub fn extract_inputs(nodes: &[Node]) -> Vec<SchemaField> {
    let mut inputs = Vec::new();
    for node in nodes {
        let Some(content) = &node.content else {
            continue;
        };
        if let Some(fields) = &content.inputs {
            inputs.extend(fields.iter().filter_map(SchemaField::from_field));
        }
        if node.is_expression_node() {
            for expr in content.expressions.as_deref().unwrap_or_default() {
                inputs.push(SchemaField {
                    id: None,
                    key: Some(expr.key.clone()),
                    name: None,
                    property: expr.value.clone(),
                    source: None,
                });
            }
        }
    }
    inputs
}

/// Collect every declared output record across all nodes. Expression
/// aliases read the inverse orientation of the input side.
pub fn extract_outputs(nodes: &[Node]) -> Vec<SchemaField> {
    let mut outputs = Vec::new();
    for node in nodes {
        let Some(content) = &node.content else {
            continue;
        };
        if let Some(fields) = &content.outputs {
            outputs.extend(fields.iter().filter_map(SchemaField::from_field));
        }
        if node.is_expression_node() {
            for expr in content.expressions.as_deref().unwrap_or_default() {
                outputs.push(SchemaField {
                    id: None,
                    key: Some(expr.value.clone()),
                    name: None,
                    property: expr.key.clone(),
                    source: None,
                });
            }
        }
    }
    outputs
}

/// Outputs of the nodes that feed the designated output node directly.
pub fn extract_final_outputs(nodes: &[Node], edges: &[Edge]) -> Result<Vec<SchemaField>, SchemaError> {
    let output_node = nodes
        .iter()
        .find(|node| node.is_output_node())
        .ok_or(SchemaError::MissingOutputNode)?;

    let output_node_id = output_node.id.to_string();
    let feeding_nodes: Vec<Node> = edges
        .iter()
        .filter(|edge| edge.target_id == output_node_id)
        .filter_map(|edge| {
            nodes
                .iter()
                .find(|node| node.id.to_string() == edge.source_id)
        })
        .cloned()
        .collect();

    Ok(extract_outputs(&feeding_nodes))
}

/// Inputs whose property is not produced by any output — values that
/// originate purely from the caller. A field consumed as both input and
/// output elsewhere in the graph is classified as output-only.
///
/// Duplicate properties keep their first-seen position but the last-seen
/// record: a later node's declaration overwrites an earlier one.
pub fn extract_unique_inputs(nodes: &[Node]) -> Vec<SchemaField> {
    let inputs = extract_inputs(nodes);
    let output_properties: AHashSet<String> = extract_outputs(nodes)
        .into_iter()
        .map(|output| output.property)
        .collect();

    let mut order = Vec::new();
    let mut by_property: AHashMap<String, SchemaField> = AHashMap::new();
    for input in inputs {
        if output_properties.contains(&input.property) {
            continue;
        }
        if !by_property.contains_key(&input.property) {
            order.push(input.property.clone());
        }
        by_property.insert(input.property.clone(), input);
    }

    order
        .into_iter()
        .filter_map(|property| by_property.remove(&property))
        .collect()
}
