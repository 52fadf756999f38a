use std::{env, io, process};

use tracing_subscriber::EnvFilter;

use taskcmd::cli;
use taskcmd::config::Config;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// `RUST_LOG`, then `TASKCMD_LOG`, then `warn`.
fn log_filter() -> EnvFilter {
    let level = env::var("RUST_LOG")
        .or_else(|_| env::var("TASKCMD_LOG"))
        .unwrap_or_else(|_| "warn".to_string());

    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}
