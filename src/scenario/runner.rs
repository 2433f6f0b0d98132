use super::model::{
    RuleRunReport, Scenario, ScenarioResult, Variable, values_equal, variables_to_object,
};
use crate::csv::encode::report_to_csv;
use crate::engine::{DecisionEngine, EvaluateOptions};
use crate::error::SchemaError;
use crate::generator::{ValueGenerator, generate_combinations};
use crate::rule::{RuleGraph, RuleSchema};
use crate::trace::{TraceDirection, map_traces};
use futures::future::join_all;
use serde_json::Value;

type JsonObject = serde_json::Map<String, Value>;

/// Synthesize `count` test scenarios for a rule by generating bounded input
/// combinations from its schema. Scenarios carry no expected results;
/// un-asserted scenarios cannot fail.
pub fn generate_scenarios(
    generator: &mut ValueGenerator,
    graph: &RuleGraph,
    filepath: &str,
    context: Option<&JsonObject>,
    count: usize,
    template: Option<&[Value]>,
) -> Result<Vec<Scenario>, SchemaError> {
    let schema = RuleSchema::extract(graph)?;
    let combinations = generate_combinations(generator, &schema, context, count, template);

    Ok(combinations
        .into_iter()
        .enumerate()
        .map(|(index, combination)| {
            let variables = combination
                .into_iter()
                .map(|(name, value)| Variable::new(name, value))
                .collect();
            Scenario::new(format!("Scenario {}", index + 1), filepath, variables, vec![])
        })
        .collect())
}

/// Drives scenarios through an external decision engine and verifies the
/// results against their expectations.
pub struct ScenarioRunner<E> {
    engine: E,
}

impl<E: DecisionEngine> ScenarioRunner<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Evaluate every scenario against the rule and collect per-scenario
    /// verification outcomes, keyed by scenario title.
    ///
    /// All engine invocations are issued concurrently and awaited together;
    /// results are keyed by title, so completion order is irrelevant. A
    /// failing scenario records its error and never blocks the rest of the
    /// batch.
    pub async fn run_scenarios(
        &self,
        graph: &RuleGraph,
        scenarios: &[Scenario],
    ) -> Result<RuleRunReport, SchemaError> {
        let schema = RuleSchema::extract(graph)?;
        let runs = scenarios
            .iter()
            .map(|scenario| self.run_one(graph, &schema, scenario));
        let results = join_all(runs).await;
        Ok(RuleRunReport { results })
    }

    async fn run_one(
        &self,
        graph: &RuleGraph,
        schema: &RuleSchema,
        scenario: &Scenario,
    ) -> (String, ScenarioResult) {
        let context = variables_to_object(&scenario.variables);
        let expected = variables_to_object(&scenario.expected_results);

        let result = match self
            .engine
            .evaluate(graph, &context, EvaluateOptions { trace: true })
            .await
        {
            Ok(response) => {
                let result = response.result.as_object().cloned().unwrap_or_default();
                let result_match = expected.is_empty()
                    || values_equal(
                        &Value::Object(result.clone()),
                        &Value::Object(expected.clone()),
                    );
                ScenarioResult {
                    inputs: map_traces(&response.trace, schema, TraceDirection::Input),
                    outputs: map_traces(&response.trace, schema, TraceDirection::Output),
                    expected_results: expected,
                    result,
                    result_match,
                    error: None,
                }
            }
            Err(error) => ScenarioResult {
                expected_results: expected,
                result_match: false,
                error: Some(error.to_string()),
                ..Default::default()
            },
        };

        (scenario.title.clone(), result)
    }

    /// Run the scenarios and render the outcome as a CSV report, returning
    /// the text alongside the out-of-band all-tests-passed flag.
    pub async fn csv_for_rule_run(
        &self,
        graph: &RuleGraph,
        scenarios: &[Scenario],
    ) -> Result<(String, bool), SchemaError> {
        let report = self.run_scenarios(graph, scenarios).await?;
        Ok((report_to_csv(&report), report.all_passed()))
    }

    /// Synthesize `count` scenarios, evaluate them, and render the CSV
    /// report. The generator's seed controls reproducibility.
    pub async fn generate_test_csv(
        &self,
        generator: &mut ValueGenerator,
        graph: &RuleGraph,
        filepath: &str,
        context: Option<&JsonObject>,
        count: usize,
    ) -> Result<(String, bool), SchemaError> {
        let scenarios = generate_scenarios(generator, graph, filepath, context, count, None)?;
        self.csv_for_rule_run(graph, &scenarios).await
    }
}
