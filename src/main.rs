//! Weight tuner CLI - Generate candidate parameter vectors from JSON configuration.

use std::path::PathBuf;

use weight_tuner::{
    compute::ParameterRng,
    schema::{OptimizerConfig, Parameters},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [count]", args[0]);
        eprintln!();
        eprintln!("Generate candidate weight vectors from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to optimizer configuration file");
        eprintln!("  count        Number of random vectors (default: 4)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(4);

    let config = OptimizerConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    log::info!(
        "Generating {} candidates over {} databases ({} slots)",
        count,
        config.databases.len(),
        config.slot_count()
    );

    let mut rng = ParameterRng::from_config(&config);
    let candidates = generate(&mut rng, &config, count).unwrap_or_else(|e| {
        eprintln!("Error generating candidates: {}", e);
        std::process::exit(1);
    });

    match serde_json::to_string_pretty(&candidates) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing candidates: {}", e);
            std::process::exit(1);
        }
    }
}

/// Random vectors, one neighbor of each, and offspring of consecutive pairs.
fn generate(
    rng: &mut ParameterRng,
    config: &OptimizerConfig,
    count: usize,
) -> Result<Vec<Parameters>, weight_tuner::ParameterError> {
    let random = (0..count)
        .map(|_| rng.random_parameters(config))
        .collect::<Result<Vec<_>, _>>()?;

    let mut candidates = random.clone();
    for parent in &random {
        candidates.push(rng.neighbor(parent, None, config)?);
    }
    for pair in random.windows(2) {
        candidates.push(rng.recombine(&pair[0], &pair[1], config)?);
    }
    Ok(candidates)
}

fn print_example_config() {
    let config = OptimizerConfig::new(["swissprot", "tair", "trembl"]).with_seed(42);

    match serde_json::to_string_pretty(&config) {
        Ok(json) => {
            println!("Example configuration (config.json):");
            println!("{}", json);
        }
        Err(e) => eprintln!("Error serializing example config: {}", e),
    }
}
