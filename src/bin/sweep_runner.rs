/// CLI tool for running critical-voltage parameter sweeps
use coax_sim::app::init_thread_pool;
use coax_sim::sweep::{SweepConfig, SweepRunner};
use std::env;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "generate" => generate_sweep_config(&args[2..]),
        "list" => list_cases(&args[2..]),
        "run" => run_case(&args[2..]),
        "run-all" => run_all_cases(&args[2..]),
        _ => {
            println!("Unknown command: {}", command);
            print_usage();
        }
    }
}

fn print_usage() {
    println!("\n╔══════════════════════════════════════════════════════╗");
    println!("║  coax_sim Sweep Runner - Critical Voltage Studies    ║");
    println!("╚══════════════════════════════════════════════════════╝\n");
    println!("Usage: cargo run --release --bin sweep_runner <command> [options]\n");
    println!("Commands:");
    println!("  generate    Generate a sweep configuration file");
    println!("  list        List all cases in a sweep configuration");
    println!("  run         Run a specific case");
    println!("  run-all     Run all cases in parallel and write Sweep_Summary.csv\n");
    println!("Examples:");
    println!("  cargo run --release --bin sweep_runner generate geometry_sweep.toml");
    println!("  cargo run --release --bin sweep_runner list geometry_sweep.toml");
    println!("  cargo run --release --bin sweep_runner run geometry_sweep.toml R1_0.01_R2_0.02_V_1e6_L_0.1");
    println!("  cargo run --release --bin sweep_runner run-all geometry_sweep.toml\n");
}

fn output_dir(config: &SweepConfig) -> String {
    format!("sweep_results/{}", config.study_name.replace(' ', "_"))
}

fn generate_sweep_config(args: &[String]) {
    if args.is_empty() {
        println!("❌ Error: Please specify output file name");
        println!("Usage: cargo run --bin sweep_runner generate <output_file.toml>");
        return;
    }

    let output_file = &args[0];

    println!("\n🔧 Generating sweep configuration...\n");

    let inner_radii = vec![0.005, 0.01];
    let outer_radii = vec![0.02, 0.03, 0.05];
    let speeds = vec![5e5, 1e6, 2e6];
    let lengths = vec![0.05, 0.1];

    let config = SweepConfig::generate_grid(
        "Geometry Sweep".to_string(),
        &inner_radii,
        &outer_radii,
        &speeds,
        &lengths,
    );

    match config.to_file(output_file) {
        Ok(_) => {
            println!("✅ Sweep configuration generated: {}", output_file);
            println!("📊 Total cases: {}\n", config.cases.len());
        }
        Err(e) => {
            println!("❌ Error generating config: {}", e);
        }
    }
}

fn list_cases(args: &[String]) {
    if args.is_empty() {
        println!("❌ Error: Please specify sweep configuration file");
        println!("Usage: cargo run --bin sweep_runner list <config_file.toml>");
        return;
    }

    match SweepConfig::from_file(&args[0]) {
        Ok(config) => {
            let dir = output_dir(&config);
            SweepRunner::new(config, dir).list_cases();
        }
        Err(e) => {
            println!("❌ Error loading config: {}", e);
        }
    }
}

fn run_case(args: &[String]) {
    if args.len() < 2 {
        println!("❌ Error: Please specify config file and case ID");
        println!("Usage: cargo run --bin sweep_runner run <config_file.toml> <case_id>");
        return;
    }

    let case_id = &args[1];

    match SweepConfig::from_file(&args[0]) {
        Ok(config) => {
            let dir = output_dir(&config);
            let runner = SweepRunner::new(config, dir);

            match runner.run_case(case_id) {
                Ok(result) => match (result.critical_voltage, result.error) {
                    (Some(v), _) => println!(
                        "\n✅ Case '{}': critical voltage {:.6e} V after {} iterations\n",
                        case_id,
                        v,
                        result.iterations.unwrap_or(0)
                    ),
                    (None, Some(e)) => println!("❌ Case '{}' failed: {}\n", case_id, e),
                    (None, None) => println!("❌ Case '{}' produced no result\n", case_id),
                },
                Err(e) => println!("❌ Error running case: {}\n", e),
            }
        }
        Err(e) => {
            println!("❌ Error loading config: {}", e);
        }
    }
}

fn run_all_cases(args: &[String]) {
    if args.is_empty() {
        println!("❌ Error: Please specify sweep configuration file");
        println!("Usage: cargo run --bin sweep_runner run-all <config_file.toml>");
        return;
    }

    init_thread_pool();

    match SweepConfig::from_file(&args[0]) {
        Ok(config) => {
            let dir = output_dir(&config);
            let runner = SweepRunner::new(config, dir);

            match runner.run_and_export() {
                Ok((results, path)) => {
                    let failed = results.iter().filter(|r| r.error.is_some()).count();
                    println!(
                        "\n✅ {} cases finished ({} failed), summary: {}\n",
                        results.len(),
                        failed,
                        path.display()
                    );
                }
                Err(e) => println!("❌ Error running sweep: {}\n", e),
            }
        }
        Err(e) => {
            println!("❌ Error loading config: {}", e);
        }
    }

    #[cfg(feature = "profiling")]
    coax_sim::PROFILER.lock().log_and_clear();
}
