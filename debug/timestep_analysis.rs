// Sensitivity of the critical voltage to the integration step.
// cargo run --release --features debug_bins --bin timestep_analysis -- [R1 R2 v0 L]
use coax_sim::config::TimeStep;
use coax_sim::{CriticalVoltageSearch, Integrator, SimulationParameters};

fn main() {
    env_logger::init();
    let args: Vec<f64> = std::env::args()
        .skip(1)
        .filter_map(|a| a.parse().ok())
        .collect();
    let (r1, r2, v0, len) = match args.as_slice() {
        [r1, r2, v0, len] => (*r1, *r2, *v0, *len),
        _ => (0.01, 0.02, 1e6, 0.1),
    };

    println!("Timestep sensitivity analysis:");
    println!("R1 = {} m, R2 = {} m, v0 = {:e} m/s, L = {} m\n", r1, r2, v0, len);
    println!("{:>10} {:>14} {:>18} {:>12}", "steps", "dt (s)", "U_crit (V)", "rel. change");

    let mut previous: Option<f64> = None;
    for steps in [100u32, 250, 500, 1000, 2000, 5000, 10000] {
        let params = match SimulationParameters::new(r1, r2, v0, len)
            .and_then(|p| p.with_time_step(TimeStep::StepsPerTransit(steps)))
        {
            Ok(p) => p,
            Err(e) => {
                println!("❌ Invalid parameters: {}", e);
                return;
            }
        };
        let dt = params.dt;
        let result = Integrator::new(params)
            .and_then(|integrator| CriticalVoltageSearch::new(&integrator).find_minimum_voltage());
        match result {
            Ok(voltage) => {
                let change = previous
                    .map(|p| format!("{:.3e}", (voltage - p).abs() / p))
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>10} {:>14.4e} {:>18.8e} {:>12}", steps, dt, voltage, change);
                previous = Some(voltage);
            }
            Err(e) => println!("{:>10} {:>14.4e} failed: {}", steps, dt, e),
        }
    }
}
