use std::env;
use std::error::Error;
use std::fs;
use std::process::ExitCode;

use processor::{format_logs, Processor, Summary};
use scheduler::{round_robin, Quantum, Workload};

fn main() -> ExitCode {
    init_logger();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        let program = args.first().map(String::as_str).unwrap_or("rr");
        eprintln!("usage: {program} file quantum");
        return ExitCode::FAILURE;
    }

    match run(&args[1], &args[2]) {
        Ok(summary) => {
            print!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, quantum: &str) -> Result<Summary, Box<dyn Error>> {
    let data = fs::read(path).map_err(|err| format!("{path}: {err}"))?;
    let workload = Workload::parse(&data)?;
    let quantum: Quantum = quantum.parse()?;

    let simulation = Processor::run(round_robin(&workload, quantum), &workload);
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("\n{}", format_logs(&simulation));
    }
    Ok(simulation.summary)
}

/// Diagnostics go through the `log` facade and stay off by default, so
/// stderr carries nothing but the one diagnostic line on failure. Set
/// `RR_LOG` (error/warn/info/debug/trace) to see the schedule unfold.
fn init_logger() {
    let Ok(level) = env::var("RR_LOG") else {
        return;
    };
    let level = level.parse().unwrap_or(simplelog::LevelFilter::Debug);
    let mut config = simplelog::ConfigBuilder::new();
    config
        .set_time_level(simplelog::LevelFilter::Off)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    let _ = simplelog::TermLogger::init(
        level,
        config.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    );
}

#[cfg(test)]
mod tests;
