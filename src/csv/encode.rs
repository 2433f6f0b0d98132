use crate::scenario::{RuleRunReport, Scenario, ScenarioResult, Variable};
use serde_json::Value;

/// UTF-8 byte-order mark, prefixed to every encoded report for spreadsheet
/// compatibility.
pub const BOM: char = '\u{feff}';

pub const SCENARIO_HEADER: &str = "Scenario";
pub const PASS_FAIL_HEADER: &str = "Results Match Expected (Pass/Fail)";
pub const ERROR_HEADER: &str = "Error?";
pub const INPUT_PREFIX: &str = "Input: ";
pub const EXPECTED_PREFIX: &str = "Expected Result: ";
pub const RESULT_PREFIX: &str = "Result: ";

/// Quote a raw cell when it contains CSV-significant characters, doubling
/// internal quotes.
fn escape_cell(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn primitive_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Render one value as a CSV cell.
///
/// Arrays of primitives become a bracketed, comma-joined list (quoted,
/// since the list contains commas); arrays containing nested objects are
/// not flattened and render as a bare element count. Missing values render
/// empty.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(text) => escape_cell(text),
        Value::Array(items) => {
            if items.iter().any(Value::is_object) {
                items.len().to_string()
            } else {
                let joined = items.iter().map(primitive_text).collect::<Vec<_>>().join(", ");
                escape_cell(&format!("[{}]", joined))
            }
        }
        Value::Object(_) => {
            escape_cell(&serde_json::to_string(value).unwrap_or_default())
        }
    }
}

/// Drop un-indexed base keys that also appear in indexed form: when
/// `key[1]` exists, a bare `key` column is the parent object and is
/// redundant.
pub fn filter_keys(keys: Vec<String>) -> Vec<String> {
    keys.iter()
        .filter(|key| {
            if key.contains('[') {
                return true;
            }
            let base = key.as_str();
            !keys.iter()
                .any(|other| other.starts_with(&format!("{}[", base)))
        })
        .cloned()
        .collect()
}

/// The union of keys observed across all scenarios for one result section,
/// in first-seen order.
fn unique_keys(
    report: &RuleRunReport,
    select: impl Fn(&ScenarioResult) -> &serde_json::Map<String, Value>,
) -> Vec<String> {
    let mut keys = Vec::new();
    for (_, result) in &report.results {
        for key in select(result).keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    filter_keys(keys)
}

fn section_cells(
    object: &serde_json::Map<String, Value>,
    keys: &[String],
    row: &mut Vec<String>,
) {
    for key in keys {
        row.push(object.get(key).map(render_cell).unwrap_or_default());
    }
}

/// Encode a batch run report as CSV: one row per scenario, with a Pass/Fail
/// column, the union of input/expected/result columns across all scenarios,
/// and a trailing error column. Failures are data: a failed scenario still
/// gets its row, with `Fail` status and a populated error cell.
pub fn report_to_csv(report: &RuleRunReport) -> String {
    let input_keys = unique_keys(report, |result| &result.inputs);
    let expected_keys = unique_keys(report, |result| &result.expected_results);
    let result_keys = unique_keys(report, |result| &result.result);

    let mut headers = vec![SCENARIO_HEADER.to_string(), PASS_FAIL_HEADER.to_string()];
    headers.extend(input_keys.iter().map(|key| format!("{}{}", INPUT_PREFIX, key)));
    headers.extend(expected_keys.iter().map(|key| format!("{}{}", EXPECTED_PREFIX, key)));
    headers.extend(result_keys.iter().map(|key| format!("{}{}", RESULT_PREFIX, key)));
    headers.push(ERROR_HEADER.to_string());

    let mut lines = vec![headers.join(",")];
    for (title, result) in &report.results {
        let mut row = vec![
            escape_cell(title),
            if result.result_match { "Pass" } else { "Fail" }.to_string(),
        ];
        section_cells(&result.inputs, &input_keys, &mut row);
        section_cells(&result.expected_results, &expected_keys, &mut row);
        section_cells(&result.result, &result_keys, &mut row);
        row.push(result.error.as_deref().map(escape_cell).unwrap_or_default());
        lines.push(row.join(","));
    }

    format!("{}{}", BOM, lines.join("\n"))
}

fn variable_keys(scenarios: &[Scenario], select: impl Fn(&Scenario) -> &[Variable]) -> Vec<String> {
    let mut keys = Vec::new();
    for scenario in scenarios {
        for variable in select(scenario) {
            if !keys.contains(&variable.name) {
                keys.push(variable.name.clone());
            }
        }
    }
    keys
}

fn variable_cells(variables: &[Variable], keys: &[String], row: &mut Vec<String>) {
    for key in keys {
        let cell = variables
            .iter()
            .find(|variable| &variable.name == key)
            .map(|variable| render_cell(&variable.value))
            .unwrap_or_default();
        row.push(cell);
    }
}

/// Encode a scenario list as an uploadable CSV skeleton: `Scenario`,
/// `Input:` and `Expected Result:` columns. Decoding this text yields the
/// same scenarios back (names, scalar values, and inferred types survive
/// the round trip).
pub fn scenarios_to_csv(scenarios: &[Scenario]) -> String {
    let input_keys = variable_keys(scenarios, |scenario| &scenario.variables);
    let expected_keys = variable_keys(scenarios, |scenario| &scenario.expected_results);

    let mut headers = vec![SCENARIO_HEADER.to_string()];
    headers.extend(input_keys.iter().map(|key| format!("{}{}", INPUT_PREFIX, key)));
    headers.extend(expected_keys.iter().map(|key| format!("{}{}", EXPECTED_PREFIX, key)));

    let mut lines = vec![headers.join(",")];
    for scenario in scenarios {
        let mut row = vec![escape_cell(&scenario.title)];
        variable_cells(&scenario.variables, &input_keys, &mut row);
        variable_cells(&scenario.expected_results, &expected_keys, &mut row);
        lines.push(row.join(","));
    }

    format!("{}{}", BOM, lines.join("\n"))
}
