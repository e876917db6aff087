use anyhow::Result;
use tau::cli;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let runtime_options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            std::process::exit(code);
        }
        cli::CliResult::Continue(options) => options,
    };
    // Routes all log::info!() etc. to /tmp/tau_debug.log.
    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config (applied later).
    tau::debug::init_log_bridge(runtime_options.log_level);

    log::info!("Starting tau {}", tau::VERSION);

    let result = tau::app::run(runtime_options);
    if let Err(ref e) = result {
        eprintln!("tau: error: {e:#}");
        log::error!("Replay failed: {:#}", e);
    }
    result
}
