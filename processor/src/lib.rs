//! A processor simulation library.
//!
//! This is used for driving schedulers from the [`scheduler`] crate: the
//! processor hands the CPU to whichever process the scheduler picks,
//! consumes the granted timeslice against that process's remaining service
//! time, and reports back why the process stopped. It keeps a per-iteration
//! trace and computes the final per-process and aggregate statistics.

use std::collections::HashMap;
use std::fmt::{self, Display};

use log::debug;

use scheduler::{
    Pid, Process, ProcessState, Scheduler, SchedulingDecision, StopReason, Time, Workload,
};

/// Running iteration log.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Log {
    /// The action requested by the scheduler.
    pub decision: SchedulingDecision,

    /// The reason the dispatched process stopped, for `Run` decisions.
    pub stop_reason: Option<StopReason>,
}

impl Display for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stop_reason {
            Some(reason) => write!(f, "{} -> {}", self.decision, reason),
            None => write!(f, "{}", self.decision),
        }
    }
}

/// The final statistics of a single process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    /// The PID of the process.
    pub pid: Pid,

    /// The process state when the simulation ended.
    pub state: ProcessState,

    /// The tick the process arrived at.
    pub arrival: Time,

    /// The total CPU time the process asked for.
    pub service: Time,

    /// Ready-but-not-running time, defined once the process finished.
    pub wait: Option<Time>,

    /// Arrival-to-first-dispatch delay, defined once dispatched.
    pub response: Option<Time>,
}

impl ProcessInfo {
    fn new(process: &dyn Process) -> ProcessInfo {
        ProcessInfo {
            pid: process.pid(),
            state: process.state(),
            arrival: process.arrival(),
            service: process.service(),
            wait: process.wait_time(),
            response: process.response_time(),
        }
    }
}

impl Display for ProcessInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt(time: Option<Time>) -> String {
            time.map_or_else(|| String::from("-"), |time| time.to_string())
        }
        write!(
            f,
            "{}\t{}\t\t{}\t{}\t{}\t{}",
            self.pid,
            self.state,
            self.arrival,
            self.service,
            opt(self.wait),
            opt(self.response)
        )
    }
}

/// Aggregate statistics over all processes of a finished simulation.
///
/// The `Display` output is the exact two-line report the program prints on
/// standard output.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Summary {
    pub average_wait: f64,
    pub average_response: f64,
}

impl Summary {
    fn new(processes: &[ProcessInfo]) -> Summary {
        let count = processes.len() as f64;
        let wait: Time = processes.iter().filter_map(|info| info.wait).sum();
        let response: Time = processes.iter().filter_map(|info| info.response).sum();
        Summary {
            average_wait: wait as f64 / count,
            average_response: response as f64 / count,
        }
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Average wait time: {:.2}", self.average_wait)?;
        writeln!(f, "Average response time: {:.2}", self.average_response)
    }
}

/// A finished simulation run.
#[derive(Debug)]
pub struct Simulation {
    /// One entry per scheduling decision, in order.
    pub logs: Vec<Log>,

    /// The final per-process statistics, in the scheduler's table order.
    pub processes: Vec<ProcessInfo>,

    /// The aggregate report.
    pub summary: Summary,
}

/// The processor simulator.
pub struct Processor;

impl Processor {
    /// Run `scheduler` over `workload` until every process has finished.
    ///
    /// The processor owns the remaining service time of each process. For
    /// every `Run` decision it consumes `min(timeslice, remaining)` ticks
    /// and reports [`StopReason::Expired`] or [`StopReason::Exited`] back to
    /// the scheduler.
    ///
    /// PIDs are expected to be unique; duplicate PIDs share one remaining
    /// service budget and produce a nonsensical schedule.
    pub fn run<S: Scheduler>(mut scheduler: S, workload: &Workload) -> Simulation {
        let mut remaining: HashMap<Pid, Time> = workload
            .records()
            .iter()
            .map(|record| (record.pid, record.service))
            .collect();

        let mut logs = Vec::new();
        loop {
            let decision = scheduler.next();
            let stop_reason = match decision {
                SchedulingDecision::Run { pid, timeslice } => {
                    let left = remaining
                        .get_mut(&pid)
                        .expect("scheduler dispatched an unknown pid");
                    let used = timeslice.get().min(*left);
                    *left -= used;
                    let reason = if *left == 0 {
                        StopReason::Exited {
                            unused: timeslice.get() - used,
                        }
                    } else {
                        StopReason::Expired
                    };
                    scheduler.stop(reason);
                    Some(reason)
                }
                SchedulingDecision::Idle { .. } => None,
                SchedulingDecision::Done => None,
            };

            let log = Log {
                decision,
                stop_reason,
            };
            debug!("{log}");
            logs.push(log);

            if decision == SchedulingDecision::Done {
                break;
            }
        }

        let processes: Vec<ProcessInfo> = scheduler
            .list()
            .into_iter()
            .map(ProcessInfo::new)
            .collect();
        let summary = Summary::new(&processes);

        Simulation {
            logs,
            processes,
            summary,
        }
    }
}

/// Format a [`Simulation`]'s trace and process table to a [`String`].
pub fn format_logs(simulation: &Simulation) -> String {
    let mut s = String::new();
    for (iteration, log) in simulation.logs.iter().enumerate() {
        fmt::write(
            &mut s,
            format_args!("===== Iteration: {} =====\n{}\n", iteration + 1, log),
        )
        .unwrap();
    }
    s.push_str("PID\tSTATE\t\tARRIVE\tSERVICE\tWAIT\tRESPONSE\n");
    for process in &simulation.processes {
        fmt::write(&mut s, format_args!("{}\n", process)).unwrap();
    }
    s
}
