//! Gromit CLI - Search for x, y in [0, 32) such that x^y = 12345.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use gromit::{Evolver, EvolverConfig, Parameters, Schema};

const TARGET: f64 = 12345.0;
const SCALE: f64 = 32.0;

/// Distance of x^y from the target, negated so that higher is better.
fn fitness_handler(individual: &Parameters) -> f64 {
    let x = individual["x"] * SCALE;
    let y = individual["y"] * SCALE;
    -(TARGET - x.powf(y)).abs()
}

struct Args {
    config_path: Option<PathBuf>,
    max_generations: usize,
    target_fitness: f64,
}

fn usage(program: &str) {
    eprintln!("Usage: {} [config.json] [--generations N] [--target F]", program);
    eprintln!();
    eprintln!("Evolve x, y in [0, 32) until x^y is within |F| of {}.", TARGET);
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json      Evolver configuration (default: built-in)");
    eprintln!("  --generations N  Generation cap (default: 10000)");
    eprintln!("  --target F       Stop once best fitness >= F (default: -0.25)");
    eprintln!("  --example        Print the default configuration");
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        config_path: None,
        max_generations: 10_000,
        target_fitness: -0.25,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--generations" => {
                let value = iter.next().ok_or("--generations needs a value")?;
                parsed.max_generations = value
                    .parse()
                    .map_err(|e| format!("invalid generation count {value:?}: {e}"))?;
            }
            "--target" => {
                let value = iter.next().ok_or("--target needs a value")?;
                parsed.target_fitness = value
                    .parse()
                    .map_err(|e| format!("invalid target {value:?}: {e}"))?;
            }
            other if other.starts_with("--") => return Err(format!("unknown flag {other}")),
            path => parsed.config_path = Some(PathBuf::from(path)),
        }
    }

    Ok(parsed)
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print_example_config();
        return;
    }

    let args = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        usage(&std::env::args().next().unwrap_or_else(|| "gromit".into()));
        std::process::exit(1);
    });

    // Load configuration
    let config = match &args.config_path {
        Some(path) => EvolverConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => EvolverConfig::default(),
    };

    println!("Gromit Evolution");
    println!("================");
    println!("Population: {}", config.population_size);
    println!(
        "Weights: copy={} mutate={} crossover={}",
        config.copy_weight, config.mutate_weight, config.crossover_weight
    );
    println!("Kill percent: {}", config.kill_percent);
    println!();

    let schema = Schema::new(["x", "y"]).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let mut evolver = Evolver::new(schema, fitness_handler, config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let start = Instant::now();

    for generation in 1..=args.max_generations {
        let max_fitness = evolver.evolve().unwrap_or_else(|e| {
            eprintln!("Evolution failed: {}", e);
            std::process::exit(1);
        });

        if let Some(most_fit) = evolver.most_fit_individual() {
            println!(
                "{:4}: max fitness={:.6}  (x={:.6}, y={:.6})",
                generation,
                max_fitness,
                most_fit["x"] * SCALE,
                most_fit["y"] * SCALE
            );
        }

        if max_fitness >= args.target_fitness {
            break;
        }
    }

    let elapsed = start.elapsed();
    println!();
    if let Some(stats) = evolver.stats() {
        println!(
            "Generations: {}  best={:.6}  mean={:.3}  worst={:.3}",
            stats.generation, stats.best_fitness, stats.mean_fitness, stats.worst_fitness
        );
    }
    println!(
        "Time: {:.2}s ({:.1} generations/s)",
        elapsed.as_secs_f32(),
        evolver.generation() as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = EvolverConfig {
        random_seed: Some(42),
        ..Default::default()
    };

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
