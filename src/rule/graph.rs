use serde::{Deserialize, Serialize};
use std::fmt;

/// Node type marker for designated graph input nodes.
pub const INPUT_NODE_TYPE: &str = "inputNode";
/// Node type marker for the designated graph output node.
pub const OUTPUT_NODE_TYPE: &str = "outputNode";
/// Node type marker for expression (alias mapping) nodes.
pub const EXPRESSION_NODE_TYPE: &str = "expressionNode";

/// An identifier as it appears in rule JSON. Graph editors emit both string
/// and numeric ids, so both are accepted and compared through their string
/// form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldId {
    Number(i64),
    Text(String),
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Number(n) => write!(f, "{}", n),
            FieldId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        FieldId::Text(value.to_string())
    }
}

impl From<i64> for FieldId {
    fn from(value: i64) -> Self {
        FieldId::Number(value)
    }
}

/// A declared input or output field on a node, possibly nested through
/// `childFields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Field {
    pub id: Option<FieldId>,
    pub name: Option<String>,
    /// Legacy type tag; `data_type` wins when both are present.
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    /// The property key this field reads from or writes to.
    pub field: Option<String>,
    pub data_type: Option<String>,
    pub validation_type: Option<String>,
    pub validation_criteria: Option<String>,
    #[serde(alias = "child_fields")]
    pub child_fields: Option<Vec<Field>>,
}

impl Field {
    /// The declared kind of this field, parsed from `dataType` with `type`
    /// as a fallback.
    pub fn kind(&self) -> FieldKind {
        let tag = self
            .data_type
            .as_deref()
            .or(self.field_type.as_deref())
            .unwrap_or("");
        FieldKind::from_tag(tag)
    }

    /// The property key used to address this field's value, falling back to
    /// the display name when no explicit key exists.
    pub fn property(&self) -> Option<&str> {
        self.field.as_deref().or(self.name.as_deref())
    }

    pub fn children(&self) -> &[Field] {
        self.child_fields.as_deref().unwrap_or_default()
    }
}

/// The value-space variant a field's declared type selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    NumberInput,
    Date,
    TextInput,
    TrueFalse,
    ObjectArray,
    Unknown(String),
}

impl FieldKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "number-input" => FieldKind::NumberInput,
            "date" => FieldKind::Date,
            "text-input" => FieldKind::TextInput,
            "true-false" => FieldKind::TrueFalse,
            "object-array" => FieldKind::ObjectArray,
            other => FieldKind::Unknown(other.to_string()),
        }
    }
}

/// A `{key, value}` alias pair on an expression node. Expressions are
/// bidirectional mappings: the input side reads one orientation and the
/// output side reads the inverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionEntry {
    pub key: String,
    pub value: String,
}

/// The declared content of a node: its fields and expression aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeContent {
    pub inputs: Option<Vec<Field>>,
    pub outputs: Option<Vec<Field>>,
    pub expressions: Option<Vec<ExpressionEntry>>,
}

/// A vertex in the rule graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub content: Option<NodeContent>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Node {
    pub fn is_output_node(&self) -> bool {
        self.node_type == OUTPUT_NODE_TYPE
    }

    pub fn is_expression_node(&self) -> bool {
        self.node_type == EXPRESSION_NODE_TYPE
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: Option<FieldId>,
    #[serde(default, rename = "type")]
    pub edge_type: Option<String>,
    pub source_id: String,
    pub target_id: String,
}

/// The complete node/edge structure describing one decision rule, as stored
/// in rule JSON files and consumed by the external engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl RuleGraph {
    /// Find a node by its id, comparing through the string form.
    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id.to_string() == id)
    }
}
