mod common;

use common::{number_field, schema_with_inputs};
use kensho::generator::{
    ValueGenerator, cartesian_product_limited, generate_combinations, subsets_with_limit,
};
use kensho::rule::Field;
use serde_json::{Value, json};

fn field_from(value: serde_json::Value) -> Field {
    serde_json::from_value(value).expect("field deserializes")
}

#[test]
fn test_cartesian_product() {
    let sets = vec![vec![json!(1), json!(2)], vec![json!("a"), json!("b")]];
    let rows = cartesian_product_limited(&sets, 100);

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], vec![json!(1), json!("a")]);
    assert_eq!(rows[3], vec![json!(2), json!("b")]);
}

#[test]
fn test_cartesian_product_respects_limit() {
    let sets = vec![vec![json!(1), json!(2)], vec![json!("a"), json!("b")]];
    assert_eq!(cartesian_product_limited(&sets, 3).len(), 3);
}

#[test]
fn test_cartesian_product_skips_empty_sets() {
    // An empty set drops its dimension instead of zeroing the product.
    let sets = vec![vec![json!(1), json!(2)], vec![], vec![json!("a")]];
    let rows = cartesian_product_limited(&sets, 100);

    assert_eq!(rows, vec![
        vec![json!(1), json!("a")],
        vec![json!(2), json!("a")],
    ]);
}

#[test]
fn test_cartesian_product_of_nothing() {
    assert!(cartesian_product_limited(&[], 10).is_empty());
    assert!(cartesian_product_limited(&[vec![], vec![]], 10).is_empty());
}

#[test]
fn test_subsets_with_limit() {
    let items = vec!["a".to_string(), "b".to_string(), "c".to_string()];

    let all = subsets_with_limit(&items, 10);
    assert_eq!(all.len(), 7);
    assert!(all.iter().all(|subset| !subset.is_empty()));

    assert_eq!(subsets_with_limit(&items, 4).len(), 4);
}

#[test]
fn test_generated_combinations_honor_the_bound() {
    let mut generator = ValueGenerator::with_seed(11);
    let schema = schema_with_inputs(vec![number_field("age", ">=", "18")]);

    let combinations = generate_combinations(&mut generator, &schema, None, 5, None);

    assert!(!combinations.is_empty());
    assert!(combinations.len() <= 5);
    for combination in &combinations {
        assert_eq!(combination.len(), 1);
        let age = combination["age"].as_i64().unwrap();
        assert!((18..=38).contains(&age));
    }

    // Exact mode never emits duplicates.
    let rendered: Vec<String> = combinations
        .iter()
        .map(|object| serde_json::to_string(object).unwrap())
        .collect();
    let mut deduped = rendered.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), rendered.len());
}

#[test]
fn test_small_space_is_enumerated_exactly() {
    let mut generator = ValueGenerator::with_seed(2);
    let schema = schema_with_inputs(vec![
        number_field("n", "[num]", "1,3"),
        field_from(json!({ "id": "f1", "type": "true-false", "field": "flag" })),
    ]);

    // 3 enumerated integers x 2 booleans.
    let combinations = generate_combinations(&mut generator, &schema, None, 100, None);
    assert_eq!(combinations.len(), 6);

    let combinations = generate_combinations(&mut generator, &schema, None, 4, None);
    assert_eq!(combinations.len(), 4);
}

#[test]
fn test_nested_children_expand_to_nested_objects() {
    let mut generator = ValueGenerator::with_seed(2);
    let person = field_from(json!({
        "id": "p1",
        "type": "object-group",
        "field": "person",
        "childFields": [
            { "id": "p2", "type": "number-input", "field": "age", "validationType": "[num]", "validationCriteria": "1,2" },
            { "id": "p3", "type": "true-false", "field": "active" }
        ]
    }));
    let schema = schema_with_inputs(vec![person]);

    let combinations = generate_combinations(&mut generator, &schema, None, 100, None);
    assert_eq!(combinations.len(), 4);
    for combination in &combinations {
        let person = combination["person"].as_object().unwrap();
        assert!((1..=2).contains(&person["age"].as_i64().unwrap()));
        assert!(person["active"].is_boolean());
    }
}

#[test]
fn test_conflicting_sibling_paths_do_not_abort_generation() {
    // Two siblings share the property `c`; flattening yields both `p.c`
    // and `p.c.d`, so one path is a prefix of the other.
    let mut generator = ValueGenerator::with_seed(6);
    let parent = field_from(json!({
        "id": "p1",
        "type": "object-group",
        "field": "p",
        "childFields": [
            {
                "id": "c1",
                "type": "number-input",
                "field": "c",
                "validationType": "[num]",
                "validationCriteria": "1,2"
            },
            {
                "id": "c2",
                "type": "object-group",
                "field": "c",
                "childFields": [
                    { "id": "d1", "type": "true-false", "field": "d" }
                ]
            }
        ]
    }));
    let schema = schema_with_inputs(vec![parent]);

    let combinations = generate_combinations(&mut generator, &schema, None, 100, None);

    // The leaf claims `p.c`; the deeper values drop out and the survivors
    // dedup to one object per leaf value.
    assert_eq!(combinations.len(), 2);
    for combination in &combinations {
        let p = combination["p"].as_object().unwrap();
        assert!((1..=2).contains(&p["c"].as_i64().unwrap()));
    }
}

#[test]
fn test_unsupported_dimension_is_dropped() {
    let mut generator = ValueGenerator::with_seed(2);
    let schema = schema_with_inputs(vec![
        field_from(json!({ "id": "u1", "type": "gizmo-input", "field": "mystery" })),
        number_field("n", "[num]", "1,3"),
    ]);

    let combinations = generate_combinations(&mut generator, &schema, None, 100, None);
    assert_eq!(combinations.len(), 3);
    for combination in &combinations {
        assert!(combination.contains_key("n"));
        assert!(!combination.contains_key("mystery"));
    }
}

#[test]
fn test_all_dimensions_empty_yields_nothing() {
    let mut generator = ValueGenerator::with_seed(2);
    let schema = schema_with_inputs(vec![field_from(json!({
        "id": "u2",
        "type": "gizmo-input",
        "field": "mystery"
    }))]);

    assert!(generate_combinations(&mut generator, &schema, None, 10, None).is_empty());
}

#[test]
fn test_context_default_pins_a_dimension() {
    let mut generator = ValueGenerator::with_seed(2);
    let schema = schema_with_inputs(vec![number_field("age", ">=", "18")]);
    let context = json!({ "age": 30 });

    let combinations =
        generate_combinations(&mut generator, &schema, context.as_object(), 10, None);
    assert_eq!(combinations.len(), 1);
    assert_eq!(combinations[0]["age"], json!(30));
}

#[test]
fn test_template_bypasses_combinatorics() {
    let mut generator = ValueGenerator::with_seed(2);
    let schema = schema_with_inputs(vec![number_field("age", ">=", "18")]);
    let template = vec![json!({ "age": null }), json!({ "age": 70 })];

    let combinations = generate_combinations(&mut generator, &schema, None, 100, Some(&template));

    assert_eq!(combinations.len(), 2);
    // Null slots are filled from the schema, preset slots pass through.
    assert!((18..=38).contains(&combinations[0]["age"].as_i64().unwrap()));
    assert_eq!(combinations[1]["age"], json!(70));
}

#[test]
fn test_oversized_space_falls_back_to_sampling() {
    // Five unconstrained text fields: 10^5 possible rows, well past the
    // exact-product threshold.
    let fields: Vec<Field> = (0..5)
        .map(|index| {
            field_from(json!({
                "id": format!("t{}", index),
                "type": "text-input",
                "field": format!("text{}", index)
            }))
        })
        .collect();
    let schema = schema_with_inputs(fields);

    let mut generator = ValueGenerator::with_seed(8);
    let combinations = generate_combinations(&mut generator, &schema, None, 7, None);

    assert!(!combinations.is_empty());
    assert!(combinations.len() <= 7);
    for combination in &combinations {
        assert_eq!(combination.len(), 5);
    }

    let rendered: Vec<String> = combinations
        .iter()
        .map(|object| serde_json::to_string(object).unwrap())
        .collect();
    let mut deduped = rendered.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), rendered.len());
}

#[test]
fn test_seeded_combination_runs_are_reproducible() {
    let schema = schema_with_inputs(vec![
        number_field("age", ">=", "18"),
        field_from(json!({ "id": "t1", "type": "text-input", "field": "name" })),
    ]);

    let mut first = ValueGenerator::with_seed(99);
    let mut second = ValueGenerator::with_seed(99);

    assert_eq!(
        generate_combinations(&mut first, &schema, None, 10, None),
        generate_combinations(&mut second, &schema, None, 10, None)
    );
}
