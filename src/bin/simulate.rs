//! Race simulator CLI.
//!
//! Replay a race many times and report where one driver finishes.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # 1000 races, car #1 from pole
//!   cargo run --bin simulate -- -d 44 -p 10       # Car #44 from P10
//!   cargo run --bin simulate -- -d HAM -p 10      # Same car, by driver code
//!   cargo run --bin simulate -- --seed 42         # Reproducible run

use pitwall::build_info;
use pitwall::drivers::DriverRegistry;
use pitwall::logging;
use pitwall::simulator::{run_simulation, SimConfig};
use std::env;
use std::process;

struct CliOptions {
    config: SimConfig,
    grid_path: Option<String>,
    list_drivers: bool,
    save_json: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'simulate --help' for usage.");
            process::exit(1);
        }
    };

    if let Err(e) = logging::setup_logging(logging::level_from_env(options.config.log_level())) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let registry = match &options.grid_path {
        Some(path) => match DriverRegistry::load(path) {
            Ok(registry) => registry,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        None => DriverRegistry::default_grid(),
    };

    if options.list_drivers {
        print_drivers(&registry);
        return;
    }

    let mut config = options.config;
    resolve_driver(&registry, &mut config);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              PITWALL RACE SIMULATOR                           ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Driver:         #{}", config.driver);
    println!("  Races:          {}", config.num_simulations);
    println!("  Grid Slot:      P{}", config.initial_position);
    println!("  Parallel:       {}", config.parallel);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = match run_simulation(&registry, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!("{}", report.to_text());

    if options.save_json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write JSON report: {}", e);
                process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        config: SimConfig::default(),
        grid_path: None,
        list_drivers: false,
        save_json: false,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-d" | "--driver" => {
                options.config.driver = value_for(args, i, flag)?.to_string();
                i += 1;
            }
            "-n" | "--runs" => {
                options.config.num_simulations = parse_number(value_for(args, i, flag)?, flag)?;
                i += 1;
            }
            "-p" | "--position" => {
                options.config.initial_position = parse_number(value_for(args, i, flag)?, flag)?;
                i += 1;
            }
            "-s" | "--seed" => {
                options.config.seed = Some(parse_number(value_for(args, i, flag)?, flag)?);
                i += 1;
            }
            "--grid" => {
                options.grid_path = Some(value_for(args, i, flag)?.to_string());
                i += 1;
            }
            "--parallel" => {
                options.config.parallel = true;
            }
            "--quick" => {
                let driver = options.config.driver.clone();
                options.config = SimConfig {
                    seed: options.config.seed,
                    verbosity: options.config.verbosity,
                    ..SimConfig::quick(&driver)
                };
            }
            "--drivers" => {
                options.list_drivers = true;
            }
            "--json" => {
                options.save_json = true;
            }
            "-v" | "--verbose" => {
                options.config.verbosity = 2;
            }
            "-q" | "--quiet" => {
                options.config.verbosity = 0;
            }
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "--version" => {
                println!("{}", build_info::version_string("simulate"));
                process::exit(0);
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(options)
}

/// Accept a driver code (`-d VER`) as well as a car number. Unknown
/// selections are left as given so validation reports them.
fn resolve_driver(registry: &DriverRegistry, config: &mut SimConfig) {
    if let Some(car_number) = registry.resolve_car_number(&config.driver) {
        config.driver = car_number.to_string();
    }
}

fn value_for<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value for {}", flag))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

fn print_drivers(registry: &DriverRegistry) {
    println!("  Car   Driver   Pace  Racecraft  Awareness  Experience  Prime");
    println!("  ───   ──────   ────  ─────────  ─────────  ──────────  ──────");
    for entry in registry.entries() {
        let d = &entry.driver;
        println!(
            "  {:>3}   {:<6}   {:>4}  {:>9}  {:>9}  {:>10}  {:>6.2}",
            entry.car_number,
            d.code,
            d.ratings.pace,
            d.ratings.racecraft,
            d.ratings.awareness,
            d.ratings.experience,
            d.prime_time
        );
    }
}

fn print_help() {
    println!("Pitwall Race Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -d, --driver <CAR>    Car number or driver code (default: 1)");
    println!("    -n, --runs <N>        Number of races to simulate (default: 1000)");
    println!("    -p, --position <P>    Starting grid position 1-20 (default: 1)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    --grid <FILE>         Load the driver grid from a JSON file");
    println!("    --parallel            Spread races across all cores");
    println!("    --quick               Quick run (100 races from pole)");
    println!("    --drivers             List the grid and exit");
    println!("    --json                Save JSON report");
    println!("    -v, --verbose         Log every race (PITWALL_LOG overrides)");
    println!("    -q, --quiet           Only log warnings and errors");
    println!("    --version             Show version information");
    println!("    -h, --help            Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                       # Default run");
    println!("    cargo run --bin simulate -- -d 44 -p 10        # Car #44 from P10");
    println!("    cargo run --bin simulate -- -n 5000 --parallel # Large run");
    println!("    cargo run --bin simulate -- --seed 42 --json   # Reproducible, saved");
}
