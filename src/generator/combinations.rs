use super::values::ValueGenerator;
use crate::rule::{Field, FieldKind, RuleSchema};
use ahash::AHashSet;
use itertools::Itertools;
use serde_json::Value;

/// Above this many possible combinations the exact cartesian product is
/// skipped in favor of random sampling.
pub const MAX_COMBINATION_SPACE: u128 = 10_000;

/// Hard result-count ceiling for the exact product.
const CARTESIAN_RESULT_CEILING: usize = 10_000;

/// Sampling overdraw factor: the fallback draws up to `2 × count` random
/// combinations while collecting `count` unique ones.
const SAMPLE_OVERDRAW: usize = 2;

type JsonObject = serde_json::Map<String, Value>;

/// The exact cartesian product of the given value sets, short-circuiting
/// once `limit` results exist rather than materializing the full product.
/// Empty sets contribute no dimension instead of zeroing the product.
pub fn cartesian_product_limited(sets: &[Vec<Value>], limit: usize) -> Vec<Vec<Value>> {
    let non_empty: Vec<&Vec<Value>> = sets.iter().filter(|set| !set.is_empty()).collect();
    if non_empty.is_empty() || limit == 0 {
        return Vec::new();
    }
    non_empty
        .into_iter()
        .map(|set| set.iter().cloned())
        .multi_cartesian_product()
        .take(limit)
        .collect()
}

/// All unique non-empty sub-combinations of `items`, up to `limit`.
pub fn subsets_with_limit<T: Clone>(items: &[T], limit: usize) -> Vec<Vec<T>> {
    items
        .iter()
        .cloned()
        .powerset()
        .filter(|subset| !subset.is_empty())
        .take(limit)
        .collect()
}

/// One leaf dimension of the flattened input schema: the dotted path it
/// re-nests under and the field definition that generates its values.
struct Dimension<'a> {
    path: String,
    field: &'a Field,
}

/// Flatten schema inputs into leaf dimensions, accumulating dotted paths
/// through nested children. Object-array fields are whole units and are
/// never recursed into.
fn flatten_inputs(schema: &RuleSchema) -> Vec<Dimension<'_>> {
    fn flatten<'a>(field: &'a Field, prefix: &str, out: &mut Vec<Dimension<'a>>) {
        let Some(property) = field.property() else {
            return;
        };
        let path = if prefix.is_empty() {
            property.to_string()
        } else {
            format!("{}.{}", prefix, property)
        };

        let children = field.children();
        if field.kind() != FieldKind::ObjectArray && !children.is_empty() {
            for child in children {
                flatten(child, &path, out);
            }
        } else {
            out.push(Dimension { path, field });
        }
    }

    let mut dimensions = Vec::new();
    for input in &schema.inputs {
        // Expression-derived inputs carry no field definition and cannot
        // contribute a value dimension.
        if let Some(field) = &input.source {
            flatten(field, "", &mut dimensions);
        }
    }
    dimensions
}

/// Look up a context default for a dotted path, preferring an exact key
/// match over a nested walk.
fn context_default<'a>(context: Option<&'a JsonObject>, path: &str) -> Option<&'a Value> {
    let context = context?;
    if let Some(value) = context.get(path) {
        return Some(value);
    }
    let mut cursor: &Value = context.get(path.split('.').next()?)?;
    for segment in path.split('.').skip(1) {
        cursor = cursor.as_object()?.get(segment)?;
    }
    Some(cursor)
}

/// Expand a dotted path back into nested objects.
///
/// Sibling fields may share a property, so one path can be a prefix of
/// another; when a leaf already claims an intermediate segment, the deeper
/// value is dropped rather than aborting the run.
fn insert_path(target: &mut JsonObject, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut cursor = target;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            cursor.insert(segment.to_string(), value);
            return;
        }
        let slot = cursor
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(JsonObject::new()));
        match slot.as_object_mut() {
            Some(object) => cursor = object,
            None => return,
        }
    }
}

/// Generate up to `count` complete input objects for a schema.
///
/// With a template, combinatorics are skipped entirely: each template entry
/// has its null slots filled and becomes one object. Otherwise the flattened
/// input dimensions are combined exactly (bounded cartesian product) or, for
/// oversized spaces, sampled randomly with structural dedup. The generator's
/// memo cache is cleared on entry; one call is one generation run.
pub fn generate_combinations(
    generator: &mut ValueGenerator,
    schema: &RuleSchema,
    context: Option<&JsonObject>,
    count: usize,
    template: Option<&[Value]>,
) -> Vec<JsonObject> {
    generator.clear_cache();

    if let Some(template) = template {
        if !template.is_empty() {
            return fill_schema_template(generator, schema, template);
        }
    }

    let dimensions = flatten_inputs(schema);
    let mut value_sets = Vec::with_capacity(dimensions.len());
    let mut live_dimensions = Vec::with_capacity(dimensions.len());
    for dimension in &dimensions {
        let default = context_default(context, &dimension.path);
        let values = generator.generate(dimension.field, default);
        if !values.is_empty() {
            value_sets.push(values);
            live_dimensions.push(dimension.path.as_str());
        }
    }

    if live_dimensions.is_empty() {
        return Vec::new();
    }

    let total: u128 = value_sets.iter().map(|set| set.len() as u128).product();
    if total > MAX_COMBINATION_SPACE {
        return sample_combinations(generator, &live_dimensions, &value_sets, count);
    }

    let rows = cartesian_product_limited(&value_sets, CARTESIAN_RESULT_CEILING);

    // Dedup flat rows first, then again after re-nesting: rows with
    // permuted draws can coincide once expanded into objects.
    let mut seen_rows = AHashSet::new();
    let mut seen_objects = AHashSet::new();
    let mut results = Vec::new();
    for row in rows {
        let row_key = serde_json::to_string(&row).unwrap_or_default();
        if !seen_rows.insert(row_key) {
            continue;
        }
        let object = expand_row(&live_dimensions, &row);
        let object_key = serde_json::to_string(&object).unwrap_or_default();
        if !seen_objects.insert(object_key) {
            continue;
        }
        results.push(object);
        if results.len() >= count {
            break;
        }
    }
    results
}

/// Random fallback for oversized spaces: one random pick per dimension,
/// up to `2 × count` draws, stopping at `count` unique objects. Bounds
/// worst-case work to O(count) regardless of dimensionality.
fn sample_combinations(
    generator: &mut ValueGenerator,
    paths: &[&str],
    value_sets: &[Vec<Value>],
    count: usize,
) -> Vec<JsonObject> {
    let mut seen = AHashSet::new();
    let mut results = Vec::new();
    for _ in 0..count.saturating_mul(SAMPLE_OVERDRAW) {
        let row: Vec<Value> = value_sets
            .iter()
            .map(|set| set[generator.random_index(set.len())].clone())
            .collect();
        let object = expand_row(paths, &row);
        let key = serde_json::to_string(&object).unwrap_or_default();
        if seen.insert(key) {
            results.push(object);
            if results.len() >= count {
                break;
            }
        }
    }
    results
}

fn expand_row(paths: &[&str], row: &[Value]) -> JsonObject {
    let mut object = JsonObject::new();
    for (path, value) in paths.iter().zip(row) {
        insert_path(&mut object, path, value.clone());
    }
    object
}

/// Fill each template entry's null fields from the matching schema input
/// definitions; one object per entry, in template order.
fn fill_schema_template(
    generator: &mut ValueGenerator,
    schema: &RuleSchema,
    template: &[Value],
) -> Vec<JsonObject> {
    let fields: Vec<Field> = schema
        .inputs
        .iter()
        .filter_map(|input| input.source.clone())
        .collect();

    generator
        .fill_template(template, &fields)
        .into_iter()
        .map(|entry| entry.as_object().cloned().unwrap_or_default())
        .collect()
}
