//! Common test utilities: a sample rule graph and mock decision engines.
use async_trait::async_trait;
use kensho::engine::{DecisionEngine, DecisionResponse, EvaluateOptions};
use kensho::error::EvaluationError;
use kensho::rule::{Field, RuleGraph, RuleSchema, SchemaField};
use kensho::trace::{TraceEntry, TraceMap};
use serde_json::{Value, json};

/// A small eligibility rule: one decision-table node computing
/// `isEligible` from `age`, feeding the designated output node.
#[allow(dead_code)]
pub fn eligibility_graph() -> RuleGraph {
    serde_json::from_value(json!({
        "nodes": [
            {
                "id": "input1",
                "type": "inputNode",
                "content": {
                    "inputs": [
                        {
                            "id": "IN1",
                            "name": "Age",
                            "type": "number-input",
                            "field": "age",
                            "validationType": ">=",
                            "validationCriteria": "18"
                        },
                        {
                            "id": "IN2",
                            "name": "Family Composition",
                            "type": "text-input",
                            "field": "familyComposition"
                        }
                    ]
                }
            },
            {
                "id": "calc1",
                "type": "decisionTableNode",
                "content": {
                    "inputs": [
                        {
                            "id": "CIN1",
                            "name": "Age",
                            "type": "number-input",
                            "field": "age"
                        }
                    ],
                    "outputs": [
                        {
                            "id": "OUT1",
                            "name": "Is Eligible",
                            "type": "true-false",
                            "field": "isEligible"
                        }
                    ]
                }
            },
            { "id": "out1", "type": "outputNode", "content": {} }
        ],
        "edges": [
            { "id": "e1", "sourceId": "calc1", "targetId": "out1" }
        ]
    }))
    .expect("sample graph deserializes")
}

/// Evaluates the eligibility rule for real: `isEligible = age >= 18`.
#[allow(dead_code)]
pub struct MockEngine;

#[async_trait]
impl DecisionEngine for MockEngine {
    async fn evaluate(
        &self,
        _graph: &RuleGraph,
        context: &serde_json::Map<String, Value>,
        options: EvaluateOptions,
    ) -> Result<DecisionResponse, EvaluationError> {
        let age = context.get("age").and_then(Value::as_f64).unwrap_or(0.0);
        let eligible = age >= 18.0;

        let mut result = serde_json::Map::new();
        result.insert("isEligible".to_string(), Value::Bool(eligible));

        let mut trace = TraceMap::new();
        if options.trace {
            trace.insert(
                "calc1".to_string(),
                TraceEntry {
                    id: "calc1".to_string(),
                    name: Some("Eligibility".to_string()),
                    input: Some(json!({ "CIN1": age, "internalTemp": 1 })),
                    output: Some(json!({ "OUT1": eligible })),
                    ..Default::default()
                },
            );
        }

        Ok(DecisionResponse {
            result: Value::Object(result),
            trace,
        })
    }
}

/// Always fails with an opaque engine error.
#[allow(dead_code)]
pub struct FailingEngine;

#[async_trait]
impl DecisionEngine for FailingEngine {
    async fn evaluate(
        &self,
        _graph: &RuleGraph,
        _context: &serde_json::Map<String, Value>,
        _options: EvaluateOptions,
    ) -> Result<DecisionResponse, EvaluationError> {
        Err(EvaluationError::Engine("engine exploded".to_string()))
    }
}

/// A bare number-input field with the given validation rule.
#[allow(dead_code)]
pub fn number_field(property: &str, validation_type: &str, criteria: &str) -> Field {
    serde_json::from_value(json!({
        "id": format!("field-{}", property),
        "name": property,
        "type": "number-input",
        "field": property,
        "validationType": validation_type,
        "validationCriteria": criteria
    }))
    .expect("field deserializes")
}

/// Wrap plain fields into a schema with input records, the shape
/// `RuleSchema::extract` would produce.
#[allow(dead_code)]
pub fn schema_with_inputs(fields: Vec<Field>) -> RuleSchema {
    let inputs = fields
        .into_iter()
        .map(|field| SchemaField {
            id: field.id.clone(),
            key: None,
            name: field.name.clone(),
            property: field.property().unwrap_or_default().to_string(),
            source: Some(field),
        })
        .collect();
    RuleSchema {
        inputs,
        outputs: vec![],
        final_outputs: vec![],
    }
}
