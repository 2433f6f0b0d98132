mod common;

use common::{FailingEngine, MockEngine, eligibility_graph};
use kensho::generator::ValueGenerator;
use kensho::scenario::{
    Scenario, ScenarioRunner, Variable, generate_scenarios, values_equal, variables_to_object,
};
use serde_json::json;

fn scenario(title: &str, age: i64, expected: Option<bool>) -> Scenario {
    let expected_results = expected
        .map(|value| vec![Variable::new("isEligible", json!(value))])
        .unwrap_or_default();
    Scenario::new(
        title,
        "rules/eligibility.json",
        vec![
            Variable::new("age", json!(age)),
            Variable::new("familyComposition", json!("single")),
        ],
        expected_results,
    )
}

#[test]
fn test_values_equal_is_numeric_aware() {
    assert!(values_equal(&json!(1), &json!(1.0)));
    assert!(values_equal(
        &json!({ "a": { "b": [1, 2] } }),
        &json!({ "a": { "b": [1.0, 2.0] } })
    ));
    assert!(!values_equal(&json!({ "a": null }), &json!({})));
    assert!(!values_equal(&json!([1, 2]), &json!([1, 2, 3])));
    assert!(!values_equal(&json!("1"), &json!(1)));
}

#[test]
fn test_variables_to_object_sanitizes_names() {
    let variables = vec![Variable::new("first,name", json!("Ada"))];
    let object = variables_to_object(&variables);
    assert_eq!(object.get("first-name"), Some(&json!("Ada")));
}

#[test]
fn test_generate_scenarios_titles_and_variables() {
    let graph = eligibility_graph();
    let mut generator = ValueGenerator::with_seed(4);

    let scenarios =
        generate_scenarios(&mut generator, &graph, "rules/eligibility.json", None, 5, None)
            .unwrap();

    assert!(!scenarios.is_empty());
    assert!(scenarios.len() <= 5);
    for (index, scenario) in scenarios.iter().enumerate() {
        assert_eq!(scenario.title, format!("Scenario {}", index + 1));
        assert_eq!(scenario.filepath, "rules/eligibility.json");
        assert!(scenario.expected_results.is_empty());

        let names: Vec<&str> = scenario
            .variables
            .iter()
            .map(|variable| variable.name.as_str())
            .collect();
        assert!(names.contains(&"age"));
        assert!(names.contains(&"familyComposition"));
    }
}

#[tokio::test]
async fn test_run_scenarios_verifies_expectations() {
    let graph = eligibility_graph();
    let runner = ScenarioRunner::new(MockEngine);
    let scenarios = vec![
        scenario("Adult", 30, Some(true)),
        scenario("Minor", 10, Some(true)),
    ];

    let report = runner.run_scenarios(&graph, &scenarios).await.unwrap();
    assert_eq!(report.results.len(), 2);

    let adult = report.get("Adult").unwrap();
    assert!(adult.result_match);
    assert_eq!(adult.result.get("isEligible"), Some(&json!(true)));
    assert!(adult.error.is_none());

    // The engine returns false for minors, so the expectation fails.
    let minor = report.get("Minor").unwrap();
    assert!(!minor.result_match);
    assert_eq!(minor.result.get("isEligible"), Some(&json!(false)));

    assert!(!report.all_passed());
}

#[tokio::test]
async fn test_unasserted_scenarios_cannot_fail() {
    let graph = eligibility_graph();
    let runner = ScenarioRunner::new(MockEngine);
    let scenarios = vec![scenario("No expectations", 3, None)];

    let report = runner.run_scenarios(&graph, &scenarios).await.unwrap();
    assert!(report.all_passed());
}

#[tokio::test]
async fn test_results_carry_trace_mapped_values() {
    let graph = eligibility_graph();
    let runner = ScenarioRunner::new(MockEngine);
    let scenarios = vec![scenario("Adult", 30, Some(true))];

    let report = runner.run_scenarios(&graph, &scenarios).await.unwrap();
    let result = report.get("Adult").unwrap();

    assert_eq!(result.inputs.get("age").and_then(|v| v.as_f64()), Some(30.0));
    assert!(!result.inputs.contains_key("internalTemp"));
    assert_eq!(result.outputs.get("isEligible"), Some(&json!(true)));
}

#[tokio::test]
async fn test_engine_failure_is_recorded_not_propagated() {
    let graph = eligibility_graph();
    let runner = ScenarioRunner::new(FailingEngine);
    let scenarios = vec![scenario("First", 30, Some(true)), scenario("Second", 40, None)];

    let report = runner.run_scenarios(&graph, &scenarios).await.unwrap();
    assert_eq!(report.results.len(), 2);

    for (_, result) in &report.results {
        assert!(!result.result_match);
        assert!(
            result
                .error
                .as_deref()
                .is_some_and(|message| message.contains("engine exploded"))
        );
    }
    assert!(!report.all_passed());
}

#[tokio::test]
async fn test_csv_for_rule_run() {
    let graph = eligibility_graph();
    let runner = ScenarioRunner::new(MockEngine);
    let scenarios = vec![
        scenario("Adult", 30, Some(true)),
        scenario("Minor", 10, Some(true)),
    ];

    let (csv, all_passed) = runner.csv_for_rule_run(&graph, &scenarios).await.unwrap();

    assert!(!all_passed);
    assert!(csv.starts_with('\u{feff}'));
    assert!(csv.contains("Results Match Expected (Pass/Fail)"));
    assert!(csv.contains("Adult,Pass"));
    assert!(csv.contains("Minor,Fail"));
}

#[tokio::test]
async fn test_generate_test_csv_end_to_end() {
    let graph = eligibility_graph();
    let runner = ScenarioRunner::new(MockEngine);
    let mut generator = ValueGenerator::with_seed(12);

    let (csv, all_passed) = runner
        .generate_test_csv(&mut generator, &graph, "rules/eligibility.json", None, 3)
        .await
        .unwrap();

    // Synthesized scenarios carry no expectations, so nothing can fail.
    assert!(all_passed);

    let lines: Vec<&str> = csv.trim_start_matches('\u{feff}').split('\n').collect();
    assert!(lines.len() >= 2);
    assert!(lines[0].contains("Input: age"));
    assert!(lines[0].contains("Result: isEligible"));
    for line in &lines[1..] {
        assert!(line.contains("Pass"));
    }
}
