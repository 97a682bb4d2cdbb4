fn main() {
    env_logger::init();
    if let Err(e) = coax_sim::app::run() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
