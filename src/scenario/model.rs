use crate::trace::sanitize_key;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

type JsonObject = serde_json::Map<String, Value>;

/// One named value in a scenario: an input variable or an expected result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: Value,
    /// Defaults to the run-time type of `value` when omitted.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

impl Variable {
    /// A variable whose type is inferred from its value.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        let value_type = Some(infer_type(&value).to_string());
        Self {
            name: name.into(),
            value,
            value_type,
        }
    }

    pub fn typed(name: impl Into<String>, value: Value, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            value_type: Some(value_type.into()),
        }
    }
}

/// The run-time type name of a JSON value.
pub fn infer_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One concrete input assignment plus optional expected results, used to
/// test a rule. Never mutated after creation; the id is generated at
/// construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "ruleID", default)]
    pub rule_id: String,
    #[serde(default)]
    pub filepath: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub expected_results: Vec<Variable>,
}

impl Scenario {
    pub fn new(
        title: impl Into<String>,
        filepath: impl Into<String>,
        variables: Vec<Variable>,
        expected_results: Vec<Variable>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            rule_id: String::new(),
            filepath: filepath.into(),
            variables,
            expected_results,
        }
    }
}

/// Flatten a variable list into a plain object, sanitizing names so keys
/// stay CSV-safe.
pub fn variables_to_object(variables: &[Variable]) -> JsonObject {
    let mut object = JsonObject::new();
    for variable in variables {
        object.insert(sanitize_key(&variable.name, ""), variable.value.clone());
    }
    object
}

/// Structural deep equality over JSON values.
///
/// Numbers compare numerically, so `1` equals `1.0` regardless of how each
/// side was produced. Object comparison is key-set plus per-key recursion:
/// an absent key is distinct from `null`, `false`, and `0`. `NaN` never
/// compares equal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_f64(), r.as_f64()) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        },
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter()
                    .all(|(key, a)| r.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => left == right,
    }
}

/// The per-scenario verification outcome.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    /// Trace-mapped input values, keyed by schema property.
    pub inputs: JsonObject,
    /// Trace-mapped final output values, keyed by schema property.
    pub outputs: JsonObject,
    pub expected_results: JsonObject,
    /// The engine's result object.
    pub result: JsonObject,
    /// True when the result deep-equals the expectations, or when no
    /// expectations were declared.
    pub result_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The verification outcomes of one batch run, in scenario order.
#[derive(Debug, Default)]
pub struct RuleRunReport {
    pub results: Vec<(String, ScenarioResult)>,
}

impl RuleRunReport {
    pub fn get(&self, title: &str) -> Option<&ScenarioResult> {
        self.results
            .iter()
            .find(|(name, _)| name == title)
            .map(|(_, result)| result)
    }

    /// True when every scenario's result matched its expectations.
    pub fn all_passed(&self) -> bool {
        !self.results.iter().any(|(_, result)| !result.result_match)
    }
}
