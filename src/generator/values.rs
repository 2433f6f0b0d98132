use super::criteria::{CriteriaOp, ValidationRule, parse_date};
use super::combinations::subsets_with_limit;
use crate::error::GenerationError;
use crate::rule::{Field, FieldKind};
use ahash::AHashMap;
use chrono::{Duration, Local, NaiveDate};
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

/// Representative samples produced per field unless the rules say otherwise.
pub const SAMPLE_COUNT: usize = 10;

/// Integer ranges at or below this many values are enumerated exhaustively
/// instead of sampled.
const ENUMERATION_THRESHOLD: i64 = 5;

/// How far a single-bound range widens away from its bound.
const DEFAULT_RANGE_SPAN: i64 = 20;

const RANDOM_TEXT_LEN: usize = 10;
const MAX_ARRAY_ITEMS: usize = 4;

/// Produces bounded, representative value sets for schema fields.
///
/// One generator owns one memoization cache and one random source, so a
/// generation run is a critical section by construction: overlapping runs
/// would need overlapping `&mut` borrows. The cache must be cleared between
/// independent runs (see [`clear_cache`](Self::clear_cache)); stale entries
/// across unrelated rules are a correctness bug, not just wasted memory.
pub struct ValueGenerator {
    rng: StdRng,
    cache: AHashMap<String, Vec<Value>>,
}

impl ValueGenerator {
    /// A generator seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            cache: AHashMap::new(),
        }
    }

    /// A reproducible generator. Both the exact and the sampling paths of
    /// combination generation become deterministic under a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cache: AHashMap::new(),
        }
    }

    /// Drop all memoized value sets. Call between independent generation
    /// runs.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Generate the candidate value set for one field, degrading to an
    /// empty set when the field's type is unsupported.
    pub fn generate(&mut self, field: &Field, context_default: Option<&Value>) -> Vec<Value> {
        self.try_generate(field, context_default).unwrap_or_default()
    }

    /// Generate the candidate value set for one field.
    pub fn try_generate(
        &mut self,
        field: &Field,
        context_default: Option<&Value>,
    ) -> Result<Vec<Value>, GenerationError> {
        let cache_key = cache_key(field, context_default);
        if let Some(hit) = self.cache.get(&cache_key) {
            return Ok(hit.clone());
        }

        let values = self.generate_uncached(field, context_default)?;
        self.cache.insert(cache_key, values.clone());
        Ok(values)
    }

    fn generate_uncached(
        &mut self,
        field: &Field,
        context_default: Option<&Value>,
    ) -> Result<Vec<Value>, GenerationError> {
        if let Some(default) = context_default {
            if let Some(bounds) = range_override(default) {
                return Ok(self.generate_with_override(field, bounds));
            }
            if let Some(template) = default.as_array() {
                if !template.is_empty() {
                    let filled = self.fill_template(template, field.children());
                    return Ok(vec![Value::Array(filled)]);
                }
                // An empty template says nothing; fall through to synthesis.
            } else if !default.is_null() {
                // A concrete example always wins over synthesis.
                return Ok(vec![default.clone()]);
            }
        }

        let rule = ValidationRule::parse(
            field.validation_type.as_deref(),
            field.validation_criteria.as_deref(),
        );

        match field.kind() {
            FieldKind::NumberInput => Ok(self.generate_numbers(&rule)),
            FieldKind::Date => Ok(self.generate_dates(&rule)),
            FieldKind::TextInput => Ok(self.generate_texts(&rule)),
            FieldKind::TrueFalse => {
                let b = self.rng.random::<bool>();
                Ok(vec![Value::Bool(b), Value::Bool(!b)])
            }
            FieldKind::ObjectArray => Ok(self.generate_object_arrays(field.children())),
            FieldKind::Unknown(type_name) => Err(GenerationError::UnsupportedFieldType {
                field: field.property().unwrap_or_default().to_string(),
                type_name,
            }),
        }
    }

    /// Pick one random value from a field's candidate set, or null when the
    /// field contributes nothing.
    pub fn random_value(&mut self, field: &Field) -> Value {
        let candidates = self.generate(field, None);
        if candidates.is_empty() {
            return Value::Null;
        }
        let index = self.random_index(candidates.len());
        candidates[index].clone()
    }

    pub(crate) fn random_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Fill the null-valued slots of an object template from matching child
    /// field definitions. Non-null slots and non-object elements pass
    /// through unchanged; the structure stays deterministic while the
    /// filled values are one random draw each.
    pub(crate) fn fill_template(&mut self, template: &[Value], fields: &[Field]) -> Vec<Value> {
        template
            .iter()
            .map(|element| match element.as_object() {
                Some(object) => {
                    let mut filled = serde_json::Map::new();
                    for (key, value) in object {
                        let slot = if value.is_null() {
                            fields
                                .iter()
                                .find(|child| child.property() == Some(key.as_str()))
                                .map(|child| self.random_value(child))
                                .unwrap_or(Value::Null)
                        } else {
                            value.clone()
                        };
                        filled.insert(key.clone(), slot);
                    }
                    Value::Object(filled)
                }
                None => element.clone(),
            })
            .collect()
    }

    fn generate_with_override(&mut self, field: &Field, bounds: (Option<Value>, Option<Value>)) -> Vec<Value> {
        // {minValue, maxValue} overrides any declared criteria bounds.
        match field.kind() {
            FieldKind::Date => {
                let min = bounds.0.as_ref().and_then(Value::as_str).and_then(parse_date);
                let max = bounds.1.as_ref().and_then(Value::as_str).and_then(parse_date);
                self.sample_dates(resolve_date_bounds(min, max, CriteriaOp::InclusiveRange))
            }
            _ => {
                let min = bounds.0.as_ref().and_then(Value::as_f64).map(|v| v as i64);
                let max = bounds.1.as_ref().and_then(Value::as_f64).map(|v| v as i64);
                self.sample_integers(resolve_integer_bounds(min, max, CriteriaOp::InclusiveRange))
            }
        }
    }

    fn generate_numbers(&mut self, rule: &ValidationRule) -> Vec<Value> {
        match rule.op {
            CriteriaOp::LiteralList => rule
                .tokens
                .iter()
                .map(|token| Value::String(token.clone()))
                .collect(),
            CriteriaOp::CombinedLiterals => {
                let combined: Vec<Value> =
                    rule.numeric_tokens().into_iter().map(number_value).collect();
                vec![Value::Array(combined)]
            }
            op => {
                let nums = rule.numeric_tokens();
                let (min, max) = match nums.as_slice() {
                    [] => (None, None),
                    [bound] => (Some(*bound as i64), None),
                    [first, .., last] => (Some(*first as i64), Some(*last as i64)),
                };
                self.sample_integers(resolve_integer_bounds(min, max, op))
            }
        }
    }

    fn sample_integers(&mut self, (min, max): (i64, i64)) -> Vec<Value> {
        if max - min < ENUMERATION_THRESHOLD {
            return (min..=max).map(Value::from).collect();
        }
        (0..SAMPLE_COUNT)
            .map(|_| Value::from(self.rng.random_range(min..=max)))
            .collect()
    }

    fn generate_dates(&mut self, rule: &ValidationRule) -> Vec<Value> {
        match rule.op {
            CriteriaOp::LiteralList => rule
                .tokens
                .iter()
                .map(|token| Value::String(token.clone()))
                .collect(),
            CriteriaOp::CombinedLiterals => {
                let combined: Vec<Value> = rule
                    .tokens
                    .iter()
                    .map(|token| Value::String(token.clone()))
                    .collect();
                vec![Value::Array(combined)]
            }
            op => {
                let dates = rule.date_tokens();
                let (min, max) = match dates.as_slice() {
                    [] => (None, None),
                    [bound] => (Some(*bound), None),
                    [first, .., last] => (Some(*first), Some(*last)),
                };
                self.sample_dates(resolve_date_bounds(min, max, op))
            }
        }
    }

    fn sample_dates(&mut self, (min, max): (NaiveDate, NaiveDate)) -> Vec<Value> {
        let span = (max - min).num_days();
        if span < ENUMERATION_THRESHOLD {
            return (0..=span)
                .map(|offset| iso_date(min + Duration::days(offset)))
                .collect();
        }
        (0..SAMPLE_COUNT)
            .map(|_| {
                let offset = self.rng.random_range(0..=span);
                iso_date(min + Duration::days(offset))
            })
            .collect()
    }

    fn generate_texts(&mut self, rule: &ValidationRule) -> Vec<Value> {
        match rule.op {
            CriteriaOp::LiteralList => rule
                .tokens
                .iter()
                .map(|token| Value::String(token.clone()))
                .collect(),
            CriteriaOp::CombinedLiterals => {
                // Every non-empty sub-combination of the comma list, bounded.
                subsets_with_limit(&rule.tokens, SAMPLE_COUNT)
                    .into_iter()
                    .map(|subset| {
                        Value::Array(subset.into_iter().map(Value::String).collect())
                    })
                    .collect()
            }
            _ => (0..SAMPLE_COUNT)
                .map(|_| Value::String(self.random_text()))
                .collect(),
        }
    }

    fn random_text(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(RANDOM_TEXT_LEN)
            .map(char::from)
            .collect()
    }

    fn generate_object_arrays(&mut self, fields: &[Field]) -> Vec<Value> {
        (0..SAMPLE_COUNT)
            .map(|_| {
                let item_count = self.rng.random_range(1..=MAX_ARRAY_ITEMS);
                let items = (0..item_count)
                    .map(|_| Value::Object(self.random_instance(fields)))
                    .collect();
                Value::Array(items)
            })
            .collect()
    }

    /// One randomized object instance with a value per child field.
    pub fn random_instance(&mut self, fields: &[Field]) -> serde_json::Map<String, Value> {
        let mut instance = serde_json::Map::new();
        for field in fields {
            if let Some(property) = field.property() {
                let value = self.random_value(field);
                instance.insert(property.to_string(), value);
            }
        }
        instance
    }
}

impl Default for ValueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A `{minValue, maxValue}` context default, if that is what this is.
fn range_override(default: &Value) -> Option<(Option<Value>, Option<Value>)> {
    let object = default.as_object()?;
    if !object.contains_key("minValue") && !object.contains_key("maxValue") {
        return None;
    }
    Some((
        object.get("minValue").cloned(),
        object.get("maxValue").cloned(),
    ))
}

/// Resolve declared bounds into a concrete inclusive integer range.
///
/// A lone bound widens away from itself; no bounds default to `[0, 20]`.
/// Strict operators shave their excluded endpoint off.
fn resolve_integer_bounds(min: Option<i64>, max: Option<i64>, op: CriteriaOp) -> (i64, i64) {
    let (mut min, mut max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (Some(bound), None) | (None, Some(bound)) => match op {
            CriteriaOp::LessOrEqual | CriteriaOp::Less => (bound - DEFAULT_RANGE_SPAN, bound),
            _ => (bound, bound + DEFAULT_RANGE_SPAN),
        },
        (None, None) => (0, DEFAULT_RANGE_SPAN),
    };

    match op {
        CriteriaOp::Greater => min += 1,
        CriteriaOp::Less => max -= 1,
        CriteriaOp::ExclusiveRange => {
            min += 1;
            max -= 1;
        }
        _ => {}
    }

    if min > max { (max, max) } else { (min, max) }
}

/// Resolve date bounds the same way, in days. An inverted range collapses
/// to the earlier date.
fn resolve_date_bounds(
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
    op: CriteriaOp,
) -> (NaiveDate, NaiveDate) {
    let (mut min, mut max) = match (min, max) {
        (Some(min), Some(max)) => {
            if min > max { (max, max) } else { (min, max) }
        }
        (Some(bound), None) | (None, Some(bound)) => match op {
            CriteriaOp::LessOrEqual | CriteriaOp::Less => {
                (bound - Duration::days(DEFAULT_RANGE_SPAN), bound)
            }
            _ => (bound, bound + Duration::days(DEFAULT_RANGE_SPAN)),
        },
        (None, None) => {
            let today = Local::now().date_naive();
            (today, today + Duration::days(DEFAULT_RANGE_SPAN))
        }
    };

    match op {
        CriteriaOp::Greater => min += Duration::days(1),
        CriteriaOp::Less => max -= Duration::days(1),
        CriteriaOp::ExclusiveRange => {
            min += Duration::days(1);
            max -= Duration::days(1);
        }
        _ => {}
    }

    if min > max { (max, max) } else { (min, max) }
}

fn iso_date(date: NaiveDate) -> Value {
    Value::String(date.format("%Y-%m-%d").to_string())
}

/// Integer-valued floats become JSON integers so samples render as `30`,
/// not `30.0`.
pub(crate) fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        json!(value)
    }
}

fn cache_key(field: &Field, context_default: Option<&Value>) -> String {
    json!({
        "field": field,
        "default": context_default,
    })
    .to_string()
}
