//! Hide & Seek solver binary.
//!
//! Usage:
//!   cargo run --release --bin hide_seek -- [OPTIONS]
//!
//! Options:
//!   --config <FILE>        Configuration JSON file (optional)
//!   --size <N>             1D world with N locations
//!   --grid <RxC>           2D world with R rows and C columns
//!   --rounds <N>           Rounds to simulate
//!   --seed <N>             Random seed
//!   --computer <ROLE>      Side the computer plays: hider or seeker
//!   --proximity <SHAPE>    saturating[:SCALE], exponential[:RATE] or flat
//!   --batch <N>            Solve N worlds with consecutive seeds in parallel
//!   --output <FILE>        Output file (default: report.json)

use std::env;
use std::process;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use hide_seek_solver::game::{
    run_batch, Dimensions, GameConfig, PenaltyShape, Role, Simulation, SimulationReport,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let mut config_file: Option<String> = None;
    let mut dimensions: Option<Dimensions> = None;
    let mut rounds: Option<u64> = None;
    let mut seed: Option<u64> = None;
    let mut computer: Option<Role> = None;
    let mut proximity: Option<PenaltyShape> = None;
    let mut batch: usize = 0;
    let mut output_file = "report.json".to_string();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" | "-c" => {
                i += 1;
                config_file = Some(required(&args, i, flag).to_string());
            }
            "--size" | "-n" => {
                i += 1;
                let value = required(&args, i, flag);
                let parsed = parse_size(value);
                dimensions = Some(parsed.unwrap_or_else(|| fail(&format!("Invalid --size value: {}", value))));
            }
            "--grid" | "-g" => {
                i += 1;
                let value = required(&args, i, flag);
                let parsed = parse_grid(value);
                dimensions = Some(parsed.unwrap_or_else(|| {
                    fail(&format!("Invalid --grid value: {} (expected RxC, e.g. 4x5)", value))
                }));
            }
            "--rounds" | "-r" => {
                i += 1;
                let value = required(&args, i, flag);
                rounds = Some(value.parse().unwrap_or_else(|_| fail(&format!("Invalid --rounds value: {}", value))));
            }
            "--seed" | "-s" => {
                i += 1;
                let value = required(&args, i, flag);
                seed = Some(value.parse().unwrap_or_else(|_| fail(&format!("Invalid --seed value: {}", value))));
            }
            "--computer" => {
                i += 1;
                computer = Some(required(&args, i, flag).parse().unwrap_or_else(|e: String| fail(&e)));
            }
            "--proximity" | "-p" => {
                i += 1;
                let value = required(&args, i, flag);
                let parsed = parse_proximity(value);
                proximity = Some(parsed.unwrap_or_else(|| fail(&format!("Unknown proximity shape: {}", value))));
            }
            "--batch" | "-b" => {
                i += 1;
                let value = required(&args, i, flag);
                batch = value.parse().unwrap_or_else(|_| fail(&format!("Invalid --batch value: {}", value)));
            }
            "--output" | "-o" => {
                i += 1;
                output_file = required(&args, i, flag).to_string();
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            _ => {
                print_help();
                fail(&format!("Unknown argument: {}", flag));
            }
        }
        i += 1;
    }

    println!("=================================================");
    println!("  Hide & Seek Solver");
    println!("=================================================");
    println!();

    // Load or create configuration; command-line options override the file
    let mut config = if let Some(path) = &config_file {
        println!("Loading configuration from: {}", path);
        match GameConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => fail(&format!("Error loading config: {}", e)),
        }
    } else {
        GameConfig::default()
    };
    if let Some(d) = dimensions {
        config.dimensions = d;
    }
    if let Some(r) = rounds {
        config.rounds = r;
    }
    if let Some(s) = seed {
        config.seed = s;
    }
    if let Some(role) = computer {
        config.computer_role = role;
    }
    if proximity.is_some() {
        config.proximity = proximity;
    }
    if let Err(e) = config.validate() {
        fail(&format!("Invalid configuration: {}", e));
    }

    println!("Configuration: {}", config.name);
    println!("World: {} ({} locations)", config.dimensions, config.dimensions.len());
    println!("Computer plays: {}", config.computer_role);
    match config.proximity {
        Some(shape) => println!("Proximity penalty: {:?}", shape),
        None => println!("Proximity penalty: off"),
    }
    println!("Rounds: {}", config.rounds);
    println!("Seed: {}", config.seed);
    println!("Output: {}", output_file);
    println!();

    let start_time = Instant::now();

    if batch > 0 {
        run_batch_mode(&config, batch, &output_file);
    } else {
        run_single(config, &output_file);
    }

    println!();
    println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    println!("Done!");
}

fn run_single(config: GameConfig, output_file: &str) {
    let rounds = config.rounds;
    let sim = Simulation::new(config).unwrap_or_else(|e| fail(&format!("Error solving game: {}", e)));

    println!("=== World ===");
    println!("{}", sim.world());
    println!();

    println!("=== Equilibrium ===");
    println!("Game value (seeker score per round): {:.6}", sim.solution().value);
    print_strategy("Seeker", sim.solution().seeker_strategy.weights());
    print_strategy("Hider", sim.solution().hider_strategy.weights());
    println!();

    let report = sim
        .run(rounds)
        .unwrap_or_else(|e| fail(&format!("Error during simulation: {}", e)));
    print_report(&report);
    save_report(&report, output_file);
}

fn run_batch_mode(base: &GameConfig, count: usize, output_file: &str) {
    let configs: Vec<GameConfig> = (0..count as u64)
        .map(|k| {
            let mut config = base.clone().with_seed(base.seed.wrapping_add(k));
            config.name = format!("{} #{}", base.name, k + 1);
            config
        })
        .collect();

    println!("Solving {} worlds in parallel...", count);
    let progress = ProgressBar::new(count as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}] {msg}") {
        progress.set_style(style);
    }

    let results = run_batch(&configs, |config| {
        progress.set_message(config.name.clone());
        progress.inc(1);
    });
    progress.finish_with_message("done");
    println!();

    println!("{:<28} {:>10} {:>10} {:>10}", "World", "Value", "Observed", "Gap");
    let mut reports = Vec::with_capacity(results.len());
    for (config, result) in configs.iter().zip(results) {
        match result {
            Ok(report) => {
                println!(
                    "{:<28} {:>10.4} {:>10.4} {:>+10.4}",
                    report.name,
                    report.solution.value,
                    report.scoreboard.average_seeker_score(),
                    report.value_gap()
                );
                reports.push(report);
            }
            Err(e) => eprintln!("{:<28} failed: {}", config.name, e),
        }
    }
    let failed = count - reports.len();

    println!();
    println!("Exporting results to {}...", output_file);
    let saved = serde_json::to_string_pretty(&reports)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(output_file, json).map_err(|e| e.to_string()));
    match saved {
        Ok(_) => println!("Results saved successfully!"),
        Err(e) => fail(&format!("Error saving results: {}", e)),
    }
    if failed > 0 {
        fail(&format!("{} of {} worlds failed", failed, count));
    }
}

fn print_strategy(label: &str, weights: &[f64]) {
    println!("{} strategy:", label);
    for (i, w) in weights.iter().enumerate() {
        if *w > 0.001 {
            println!("  location {:>3}: {:.1}%", i, w * 100.0);
        }
    }
}

fn print_report(report: &SimulationReport) {
    let board = &report.scoreboard;
    println!("=== Simulation ({} rounds) ===", board.rounds);
    println!("Seeker: {:>10.2} points, {:>6} wins", board.seeker_score, board.seeker_wins);
    println!("Hider:  {:>10.2} points, {:>6} wins", board.hider_score, board.hider_wins);
    println!(
        "Average seeker score: {:.4} (value {:.4}, gap {:+.4})",
        board.average_seeker_score(),
        report.solution.value,
        report.value_gap()
    );
    println!();
    println!("Computer ({}) pick frequencies:", report.computer_role);
    let target = report.computer_role.strategy(&report.solution).weights();
    for (i, freq) in report.pick_frequencies().iter().enumerate() {
        if *freq > 0.0 || target[i] > 0.001 {
            println!("  location {:>3}: {:>5.1}% (optimal {:>5.1}%)", i, freq * 100.0, target[i] * 100.0);
        }
    }
    println!();
}

fn save_report(report: &SimulationReport, output_file: &str) {
    println!("Exporting results to {}...", output_file);
    match report.save_json(output_file) {
        Ok(_) => println!("Results saved successfully!"),
        Err(e) => fail(&format!("Error saving results: {}", e)),
    }
}

/// Print `message` to stderr and exit with status 1.
fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

/// The value following `flag`, or exit if it is missing.
fn required<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(value) => value,
        None => fail(&format!("Missing value for {}", flag)),
    }
}

fn parse_size(s: &str) -> Option<Dimensions> {
    let len: usize = s.trim().parse().ok()?;
    Some(Dimensions::Line { len })
}

fn parse_grid(s: &str) -> Option<Dimensions> {
    let (rows, cols) = s.split_once(['x', 'X'])?;
    Some(Dimensions::Grid {
        rows: rows.trim().parse().ok()?,
        cols: cols.trim().parse().ok()?,
    })
}

fn parse_proximity(s: &str) -> Option<PenaltyShape> {
    let (name, param) = match s.split_once(':') {
        Some((name, param)) => (name, Some(param.parse::<f64>().ok()?)),
        None => (s, None),
    };
    match name.to_ascii_lowercase().as_str() {
        "saturating" => Some(PenaltyShape::Saturating { scale: param.unwrap_or(1.0) }),
        "exponential" => Some(PenaltyShape::Exponential { rate: param.unwrap_or(1.0) }),
        "flat" => Some(PenaltyShape::Flat),
        _ => None,
    }
}

fn print_help() {
    println!("Hide & Seek Solver");
    println!();
    println!("Usage: hide_seek [OPTIONS]");
    println!();
    println!("World (choose one):");
    println!("  -n, --size <N>           1D world with N locations (default: 10)");
    println!("  -g, --grid <RxC>         2D world, e.g. 4x5");
    println!();
    println!("Options:");
    println!("  -c, --config <FILE>      Configuration JSON file");
    println!("  -r, --rounds <N>         Rounds to simulate (default: 100)");
    println!("  -s, --seed <N>           Random seed (default: 0)");
    println!("      --computer <ROLE>    hider or seeker (default: seeker)");
    println!("  -p, --proximity <SHAPE>  saturating[:SCALE], exponential[:RATE] or flat");
    println!("  -b, --batch <N>          Solve N worlds with consecutive seeds in parallel");
    println!("  -o, --output <FILE>      Output file (default: report.json)");
    println!("  -h, --help               Show this help");
    println!();
    println!("Examples:");
    println!("  # Computer seeks on a 12-location line");
    println!("  hide_seek --size 12 --rounds 1000");
    println!();
    println!("  # Computer hides on a 4x4 grid with a proximity penalty");
    println!("  hide_seek --grid 4x4 --computer hider --proximity saturating:2");
    println!();
    println!("  # Compare 32 random worlds");
    println!("  hide_seek --grid 3x3 --batch 32 --rounds 5000");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_world_options() {
        assert_eq!(parse_size("12"), Some(Dimensions::Line { len: 12 }));
        assert_eq!(parse_size("twelve"), None);
        assert_eq!(parse_grid("4x5"), Some(Dimensions::Grid { rows: 4, cols: 5 }));
        assert_eq!(parse_grid("3X3"), Some(Dimensions::Grid { rows: 3, cols: 3 }));
        assert_eq!(parse_grid("3by3"), None);
        assert_eq!(parse_grid("3x"), None);
    }

    #[test]
    fn test_parse_proximity_shapes() {
        assert_eq!(parse_proximity("flat"), Some(PenaltyShape::Flat));
        assert_eq!(parse_proximity("saturating:2"), Some(PenaltyShape::Saturating { scale: 2.0 }));
        assert_eq!(parse_proximity("exponential"), Some(PenaltyShape::Exponential { rate: 1.0 }));
        assert_eq!(parse_proximity("saturating:wide"), None);
        assert_eq!(parse_proximity("gaussian"), None);
    }
}
