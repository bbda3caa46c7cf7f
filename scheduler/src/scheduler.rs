use std::fmt::{self, Display};
use std::num::NonZeroU64;
use std::str::FromStr;

use crate::workload::{next_int, ParseError};

/// A point on the simulation clock, measured in ticks.
pub type Time = u64;

/// The fixed cost, in ticks, of switching the processor between two
/// different processes.
pub const CONTEXT_SWITCH_COST: Time = 1;

/// The PID of a process.
///
/// PIDs are taken verbatim from the input file; 0 is a valid PID and
/// uniqueness is by convention only.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Pid(u64);

impl Pid {
    pub fn new(pid: u64) -> Pid {
        Pid(pid)
    }
}

impl PartialEq<u64> for Pid {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The time quantum configuration.
///
/// Either a literal tick count, or the `median` keyword, which resolves to
/// the statistical median of all service times before the simulation starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Quantum {
    /// Run each process for at most this many ticks per dispatch.
    Fixed(NonZeroU64),

    /// Derive the quantum from the median of the workload's service times.
    Median,
}

impl Quantum {
    /// Resolve the configuration to a concrete tick count for `services`.
    ///
    /// The median of an even number of service times is the mean of the two
    /// central sorted values; a fractional median is rounded half away from
    /// zero. The result is never below 1.
    pub fn resolve(self, services: &[Time]) -> NonZeroU64 {
        match self {
            Quantum::Fixed(ticks) => ticks,
            Quantum::Median => {
                let ticks = if services.is_empty() {
                    1
                } else {
                    (median(services) + 0.5).floor() as u64
                };
                NonZeroU64::new(ticks.max(1)).unwrap()
            }
        }
    }
}

impl FromStr for Quantum {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Quantum, ParseError> {
        if s == "median" {
            return Ok(Quantum::Median);
        }
        let mut pos = 0;
        let ticks = next_int(s.as_bytes(), &mut pos)?;
        match NonZeroU64::new(ticks) {
            Some(ticks) => Ok(Quantum::Fixed(ticks)),
            None => Err(ParseError::ZeroQuantum),
        }
    }
}

impl Display for Quantum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantum::Fixed(ticks) => write!(f, "{}", ticks),
            Quantum::Median => write!(f, "median"),
        }
    }
}

/// The conventional statistical median.
fn median(values: &[Time]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    }
}

/// The action that the scheduler asks the simulation to take.
///
/// This is returned by the [`Scheduler::next`] function.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SchedulingDecision {
    /// Run the process with PID `pid` for a maximum of `timeslice` ticks.
    ///
    /// Any context-switch cost has already been charged to the clock when
    /// this decision is produced.
    Run { pid: Pid, timeslice: NonZeroU64 },

    /// The ready queue is empty but processes are still to arrive; the clock
    /// has jumped forward to `until`, the next arrival time.
    Idle { until: Time },

    /// All processes have finished.
    Done,
}

impl Display for SchedulingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingDecision::Run { pid, timeslice } => {
                write!(f, "Run {} for at most {} ticks", pid, timeslice)
            }
            SchedulingDecision::Idle { until } => {
                write!(f, "Idle until {}", until)
            }
            SchedulingDecision::Done => {
                write!(f, "Done, all processes finished")
            }
        }
    }
}

/// The reason that the running process gave the processor back.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StopReason {
    /// The timeslice was fully consumed and the process still has work left;
    /// it must be preempted and re-enqueued.
    Expired,

    /// The process finished within its timeslice, leaving `unused` ticks of
    /// the slice unconsumed. It is never scheduled again.
    Exited {
        /// Granted but unconsumed ticks.
        unused: Time,
    },
}

impl Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Expired => write!(f, "Expired"),
            StopReason::Exited { unused } => write!(f, "Exited, {} ticks unused", unused),
        }
    }
}

/// The trait that any scheduling policy has to implement.
pub trait Scheduler: Send {
    /// Returns the action that the simulation has to perform next.
    fn next(&mut self) -> SchedulingDecision;

    /// The scheduler is informed that the running process has stopped
    /// and the reason.
    fn stop(&mut self, reason: StopReason);

    /// Returns the list of processes.
    fn list(&self) -> Vec<&dyn Process>;
}

/// The state of a process.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ProcessState {
    /// The simulation clock has not reached the process's arrival time.
    Unarrived,

    /// The process has arrived and waits in the ready queue.
    Ready,

    /// The process is currently scheduled.
    Running,

    /// The process has consumed all of its service time.
    Finished,
}

impl Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessState::Unarrived => write!(f, "UNARRIVED"),
            ProcessState::Ready => write!(f, "READY"),
            ProcessState::Running => write!(f, "RUNNING"),
            ProcessState::Finished => write!(f, "FINISHED"),
        }
    }
}

/// The view of a process table entry that a scheduler exposes.
pub trait Process {
    /// Return the PID of the process.
    fn pid(&self) -> Pid;

    /// Return the state of the process.
    fn state(&self) -> ProcessState;

    /// Return the tick at which the process becomes ready.
    fn arrival(&self) -> Time;

    /// Return the total CPU time the process requires.
    fn service(&self) -> Time;

    /// Return the tick of the first dispatch, once it has happened.
    fn first_run(&self) -> Option<Time>;

    /// Return the tick at which the process finished, once it has.
    fn completion(&self) -> Option<Time>;

    /// Total time spent ready but not running, defined once finished.
    fn wait_time(&self) -> Option<Time> {
        self.completion()
            .map(|completion| completion - self.arrival() - self.service())
    }

    /// Delay from arrival to first dispatch, defined once dispatched.
    fn response_time(&self) -> Option<Time> {
        self.first_run().map(|first| first - self.arrival())
    }
}
