use std::collections::VecDeque;
use std::num::NonZeroU64;

use log::{debug, trace};

use crate::scheduler::{
    Pid, Process, ProcessState, Quantum, Scheduler, SchedulingDecision, StopReason, Time,
    CONTEXT_SWITCH_COST,
};
use crate::workload::Workload;

/// A process table entry, with the bookkeeping the policy needs.
#[derive(Debug, Copy, Clone)]
struct Pcb {
    pid: Pid,
    /// Position in the input file, the final tie-break for equal arrivals.
    slot: usize,
    arrival: Time,
    service: Time,
    state: ProcessState,
    first_run: Option<Time>,
    completion: Option<Time>,
}

impl Pcb {
    fn new(pid: Pid, slot: usize, arrival: Time, service: Time) -> Self {
        Pcb {
            pid,
            slot,
            arrival,
            service,
            state: ProcessState::Unarrived,
            first_run: None,
            completion: None,
        }
    }
}

/// Round-robin scheduling over a fixed workload.
///
/// The table is sorted once by `(arrival, pid, input position)`, so equal
/// arrival times enqueue in ascending PID order no matter how the input file
/// was ordered. The scheduler owns the simulation clock: context-switch
/// overhead and idle gaps are charged in [`RoundRobin::next`], consumed run
/// time in [`RoundRobin::stop`].
pub struct RoundRobin {
    /// All processes, sorted by `(arrival, pid, slot)`.
    table: Vec<Pcb>,
    /// Indices into `table` of arrived, runnable processes.
    ready: VecDeque<usize>,
    /// Index into `table` of the first process not yet admitted.
    next_arrival: usize,
    /// The currently dispatched process, between `next` and `stop`.
    running: Option<usize>,
    /// The timeslice granted to `running`.
    granted: Time,
    /// The most recently dispatched process; decides whether the next
    /// dispatch pays the context-switch cost. Cleared by idle gaps.
    prev: Option<usize>,
    /// A preempted process waiting to be re-enqueued. It rejoins behind
    /// everything that arrived strictly before the current clock, but ahead
    /// of processes arriving at this very instant.
    preempted: Option<usize>,
    clock: Time,
    quantum: NonZeroU64,
    finished: usize,
}

impl RoundRobin {
    pub fn new(workload: &Workload, quantum: Quantum) -> Self {
        let mut table: Vec<Pcb> = workload
            .records()
            .iter()
            .enumerate()
            .map(|(slot, record)| Pcb::new(record.pid, slot, record.arrival, record.service))
            .collect();
        table.sort_by_key(|pcb| (pcb.arrival, pcb.pid, pcb.slot));

        let quantum = quantum.resolve(&workload.service_times());
        let clock = table.first().map(|pcb| pcb.arrival).unwrap_or(0);
        debug!("round robin over {} processes, quantum {quantum}", table.len());

        RoundRobin {
            table,
            ready: VecDeque::new(),
            next_arrival: 0,
            running: None,
            granted: 0,
            prev: None,
            preempted: None,
            clock,
            quantum,
            finished: 0,
        }
    }

    /// Admit every unarrived process with `arrival <= horizon` onto the tail
    /// of the ready queue, in table order.
    fn admit_through(&mut self, horizon: Time) {
        while self.next_arrival < self.table.len()
            && self.table[self.next_arrival].arrival <= horizon
        {
            trace!(
                "process {} arrived at {}",
                self.table[self.next_arrival].pid,
                self.table[self.next_arrival].arrival
            );
            self.table[self.next_arrival].state = ProcessState::Ready;
            self.ready.push_back(self.next_arrival);
            self.next_arrival += 1;
        }
    }
}

impl Scheduler for RoundRobin {
    fn next(&mut self) -> SchedulingDecision {
        // A repeated call without an intervening stop re-issues the grant.
        if let Some(current) = self.running {
            return SchedulingDecision::Run {
                pid: self.table[current].pid,
                timeslice: NonZeroU64::new(self.granted).unwrap(),
            };
        }

        if self.finished == self.table.len() {
            return SchedulingDecision::Done;
        }

        // Arrivals strictly before now go ahead of the preempted process;
        // arrivals at exactly this instant go behind it.
        if self.clock > 0 {
            self.admit_through(self.clock - 1);
        }
        if let Some(preempted) = self.preempted.take() {
            self.ready.push_back(preempted);
        }
        self.admit_through(self.clock);

        let Some(current) = self.ready.pop_front() else {
            // Every unfinished process is still to arrive; jump the clock.
            let until = self.table[self.next_arrival].arrival;
            trace!("idle from {} until {until}", self.clock);
            self.clock = until;
            self.prev = None;
            return SchedulingDecision::Idle { until };
        };

        if self.prev.is_some_and(|prev| prev != current) {
            trace!("context switch at {}", self.clock);
            self.clock += CONTEXT_SWITCH_COST;
        }

        let clock = self.clock;
        let pcb = &mut self.table[current];
        pcb.state = ProcessState::Running;
        if pcb.first_run.is_none() {
            pcb.first_run = Some(clock);
        }
        debug!("dispatch {} at {clock}", pcb.pid);

        self.granted = self.quantum.get();
        self.running = Some(current);
        SchedulingDecision::Run {
            pid: pcb.pid,
            timeslice: self.quantum,
        }
    }

    fn stop(&mut self, reason: StopReason) {
        let Some(current) = self.running.take() else {
            return;
        };

        match reason {
            StopReason::Expired => {
                self.clock += self.granted;
                self.table[current].state = ProcessState::Ready;
                self.preempted = Some(current);
            }
            StopReason::Exited { unused } => {
                self.clock += self.granted - unused.min(self.granted);
                let pcb = &mut self.table[current];
                pcb.state = ProcessState::Finished;
                pcb.completion = Some(self.clock);
                debug!("process {} finished at {}", pcb.pid, self.clock);
                self.finished += 1;
            }
        }
        self.prev = Some(current);
    }

    fn list(&self) -> Vec<&dyn Process> {
        self.table
            .iter()
            .map(|pcb| pcb as &dyn Process)
            .collect()
    }
}

impl Process for Pcb {
    fn pid(&self) -> Pid {
        self.pid
    }

    fn state(&self) -> ProcessState {
        self.state
    }

    fn arrival(&self) -> Time {
        self.arrival
    }

    fn service(&self) -> Time {
        self.service
    }

    fn first_run(&self) -> Option<Time> {
        self.first_run
    }

    fn completion(&self) -> Option<Time> {
        self.completion
    }
}
