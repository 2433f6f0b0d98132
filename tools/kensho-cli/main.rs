use clap::Parser;
use kensho::prelude::*;
use std::fs;

/// A CLI tool to synthesize test-scenario CSV skeletons for a decision rule
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to the rule graph JSON file
    rule: String,

    /// How many scenarios to synthesize
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Seed for reproducible generation; omit for a random run
    #[arg(long)]
    seed: Option<u64>,

    /// Optional JSON file of context defaults keyed by input property
    #[arg(long)]
    context: Option<String>,

    /// The path to write the scenario CSV to; prints to stdout when omitted
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.count == 0 {
        eprintln!("Error: --count must be at least 1");
        std::process::exit(1);
    }

    let graph = match RuleGraph::from_file(&cli.rule) {
        Ok(graph) => graph,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let context = match &cli.context {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let value: serde_json::Value = serde_json::from_str(&content)?;
            Some(value.as_object().cloned().unwrap_or_default())
        }
        None => None,
    };

    let mut generator = match cli.seed {
        Some(seed) => ValueGenerator::with_seed(seed),
        None => ValueGenerator::new(),
    };

    let rule_name = derive_name_from_filepath(&cli.rule);
    println!(
        "Synthesizing up to {} scenario(s) for rule '{}'...",
        cli.count, rule_name
    );

    let scenarios = generate_scenarios(
        &mut generator,
        &graph,
        &cli.rule,
        context.as_ref(),
        cli.count,
        None,
    )?;
    println!("-> Generated {} scenario(s).", scenarios.len());

    let csv_content = scenarios_to_csv(&scenarios);
    match &cli.output {
        Some(path) => {
            fs::write(path, &csv_content)?;
            println!("Successfully saved scenario CSV to '{}'", path);
        }
        None => println!("{}", csv_content),
    }

    Ok(())
}
