//! A scheduling simulation library.
//!
//! This library provides the traits and structures necessary to simulate a
//! process scheduler over a workload read from text: the process table
//! loader, the quantum configuration, and a round-robin policy with fixed
//! context-switch overhead.

mod scheduler;
mod schedulers;
mod workload;

pub use crate::scheduler::{
    Pid, Process, ProcessState, Quantum, Scheduler, SchedulingDecision, StopReason, Time,
    CONTEXT_SWITCH_COST,
};
pub use crate::workload::{ParseError, ProcessRecord, Workload};

use schedulers::RoundRobin;

/// Returns a structure that implements the `Scheduler` trait with a round
/// robin scheduling policy over the given workload.
///
/// * `workload` - the process table the schedule is computed for
/// * `quantum` - the maximum contiguous time a process may hold the
///               processor before it is preempted, either a literal tick
///               count or the median of the workload's service times
pub fn round_robin(workload: &Workload, quantum: Quantum) -> impl Scheduler {
    RoundRobin::new(workload, quantum)
}
