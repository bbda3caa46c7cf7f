use processor::{Processor, Simulation};
use scheduler::{round_robin, ParseError, Quantum, Workload};

mod simple;

/// Run the full loader/simulator pipeline over textual input.
fn simulate(input: &str, quantum: &str) -> Result<Simulation, ParseError> {
    let workload = Workload::parse(input.as_bytes())?;
    let quantum: Quantum = quantum.parse()?;
    Ok(Processor::run(round_robin(&workload, quantum), &workload))
}

/// The rendered two-line report for valid input.
fn report(input: &str, quantum: &str) -> String {
    simulate(input, quantum).unwrap().summary.to_string()
}
