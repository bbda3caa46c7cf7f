//! Scheduling policy implementations.

mod round_robin;
pub use round_robin::RoundRobin;
