use super::encode::{EXPECTED_PREFIX, INPUT_PREFIX};
use crate::error::CsvError;
use crate::generator::values::number_value;
use crate::scenario::{Scenario, Variable};
use serde_json::Value;

/// Split raw CSV text into rows of fields.
///
/// Handles quoted fields with doubled internal quotes, skips blank lines,
/// and strips a leading byte-order mark.
pub fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut rows = Vec::new();

    for line in content.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '"' => {
                    if in_quotes && chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = !in_quotes;
                    }
                }
                ',' if !in_quotes => {
                    fields.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            }
        }
        fields.push(current.trim().to_string());
        rows.push(fields);
    }

    rows
}

/// Header keys carrying the given prefix, in column order.
pub fn extract_keys(headers: &[String], prefix: &str) -> Vec<String> {
    headers
        .iter()
        .filter_map(|header| header.strip_prefix(prefix))
        .map(str::to_string)
        .collect()
}

fn is_iso_date_like(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

fn looks_numeric(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'))
}

/// Infer a typed value from a raw CSV cell: case-insensitive booleans,
/// ISO dates kept as strings, unambiguous numbers, empty cells as null,
/// everything else as text.
pub fn format_value(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if is_iso_date_like(raw) {
        return Value::String(raw.to_string());
    }
    if looks_numeric(raw) {
        if let Ok(number) = raw.parse::<f64>() {
            return number_value(number);
        }
    }
    if raw.is_empty() {
        return Value::Null;
    }
    Value::String(raw.to_string())
}

/// Collect the variables for one prefix out of a data row.
///
/// An indexed header like `key[1]` collapses to base key `key` with each
/// cell wrapped as an array element; repeated indexed columns accumulate
/// under the shared base key.
fn variables_with_prefix(
    headers: &[String],
    row: &[String],
    prefix: &str,
    filter_empty: bool,
) -> Vec<Variable> {
    let mut variables: Vec<Variable> = Vec::new();

    for (index, header) in headers.iter().enumerate() {
        let Some(key) = header.strip_prefix(prefix) else {
            continue;
        };
        let raw = row.get(index).map(String::as_str).unwrap_or("");
        if filter_empty && raw.is_empty() {
            continue;
        }

        if let Some((base, rest)) = key.split_once('[') {
            if rest.ends_with(']') {
                let element = Value::String(raw.to_string());
                match variables
                    .iter_mut()
                    .find(|variable| variable.name == base)
                    .and_then(|variable| variable.value.as_array_mut())
                {
                    Some(items) => items.push(element),
                    None => variables.push(Variable::typed(
                        base,
                        Value::Array(vec![element]),
                        "array",
                    )),
                }
                continue;
            }
        }

        if raw.starts_with('[') && raw.ends_with(']') {
            let inner = &raw[1..raw.len() - 1];
            let items: Vec<Value> = inner
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect();
            variables.push(Variable::typed(key, Value::Array(items), "array"));
        } else {
            variables.push(Variable::new(key, format_value(raw)));
        }
    }

    variables
}

/// Decode parsed CSV rows into scenarios. The first row is headers;
/// `Input:` columns become variables and `Expected Result:` columns become
/// expected results (empty expectation cells are dropped).
pub fn scenarios_from_csv(rows: &[Vec<String>], filepath: &str) -> Result<Vec<Scenario>, CsvError> {
    if rows.len() < 2 {
        return Err(CsvError::Empty);
    }

    let headers = &rows[0];
    Ok(rows[1..]
        .iter()
        .map(|row| {
            let title = row.first().cloned().unwrap_or_default();
            let variables = variables_with_prefix(headers, row, INPUT_PREFIX, false);
            let expected = variables_with_prefix(headers, row, EXPECTED_PREFIX, true);
            Scenario::new(title, filepath, variables, expected)
        })
        .collect())
}

/// Decode raw CSV text into scenarios.
pub fn scenarios_from_text(content: &str, filepath: &str) -> Result<Vec<Scenario>, CsvError> {
    let rows = parse_csv(content);
    scenarios_from_csv(&rows, filepath)
}
