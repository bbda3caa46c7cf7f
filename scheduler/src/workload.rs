//! Process table loading.
//!
//! The input format is a count line followed by one `pid, arrival, service`
//! line per process. Scanning is byte-oriented: anything that is not an
//! ASCII digit separates integers, so commas and arbitrary whitespace are
//! interchangeable.

use std::error::Error;
use std::fmt::{self, Display};

use crate::scheduler::{Pid, Time};

/// A single process description as read from the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: Pid,
    pub arrival: Time,
    pub service: Time,
}

/// The ordered process table, preserving input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    records: Vec<ProcessRecord>,
}

impl Workload {
    /// Parse a process table from raw input bytes.
    ///
    /// The first integer is the process count; exactly that many records are
    /// read and anything after them is ignored.
    pub fn parse(data: &[u8]) -> Result<Workload, ParseError> {
        let mut pos = 0;

        let count = next_int(data, &mut pos)?;
        if count == 0 {
            return Err(ParseError::NoProcesses);
        }

        let mut records = Vec::new();
        for _ in 0..count {
            let pid = Pid::new(next_int(data, &mut pos)?);
            let arrival = next_int(data, &mut pos)?;
            let service = next_int(data, &mut pos)?;
            if service == 0 {
                return Err(ParseError::ZeroService(pid));
            }
            records.push(ProcessRecord {
                pid,
                arrival,
                service,
            });
        }

        Ok(Workload { records })
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The service times of all processes, in input order.
    pub fn service_times(&self) -> Vec<Time> {
        self.records.iter().map(|record| record.service).collect()
    }
}

/// Skip past leading non-digits in `data[*pos..]`, then scan a run of ASCII
/// digits as an unsigned decimal integer, leaving `*pos` on the first byte
/// after the run.
pub(crate) fn next_int(data: &[u8], pos: &mut usize) -> Result<u64, ParseError> {
    let mut value: u64 = 0;
    let mut int_start = false;

    while *pos < data.len() {
        let byte = data[*pos];
        if byte.is_ascii_digit() {
            int_start = true;
            value = value
                .checked_mul(10)
                .and_then(|value| value.checked_add(u64::from(byte - b'0')))
                .ok_or(ParseError::IntegerOverflow)?;
        } else if int_start {
            break;
        }
        *pos += 1;
    }

    if !int_start {
        return Err(ParseError::MissingInteger);
    }
    Ok(value)
}

/// A malformed input or quantum argument.
///
/// The `Display` output of each variant is the exact diagnostic line the
/// program prints on standard error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The declared process count is zero.
    NoProcesses,

    /// The input ended before all declared integers were read, or a field
    /// contained no digits.
    MissingInteger,

    /// A scanned integer does not fit in 64 bits.
    IntegerOverflow,

    /// A process declared a service time of zero.
    ZeroService(Pid),

    /// The quantum argument was the literal zero.
    ZeroQuantum,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoProcesses => write!(f, "no processes"),
            ParseError::MissingInteger => write!(f, "missing integer"),
            ParseError::IntegerOverflow => write!(f, "integer overflow"),
            ParseError::ZeroService(pid) => {
                write!(f, "process {} has zero burst time", pid)
            }
            ParseError::ZeroQuantum => write!(f, "zero quantum length"),
        }
    }
}

impl Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_records() {
        let workload = Workload::parse(b"2\n1, 10, 70\n2, 20, 40\n").unwrap();
        assert_eq!(
            workload.records(),
            &[
                ProcessRecord {
                    pid: Pid::new(1),
                    arrival: 10,
                    service: 70
                },
                ProcessRecord {
                    pid: Pid::new(2),
                    arrival: 20,
                    service: 40
                },
            ]
        );
    }

    #[test]
    fn separators_are_interchangeable() {
        let commas = Workload::parse(b"1\n7, 3, 5\n").unwrap();
        let spaces = Workload::parse(b"1\n7 3 5").unwrap();
        assert_eq!(commas, spaces);
    }

    #[test]
    fn records_past_the_declared_count_are_ignored() {
        let workload = Workload::parse(b"1\n1, 0, 5\n2, 0, 5\n").unwrap();
        assert_eq!(workload.len(), 1);
    }

    #[test]
    fn zero_count_is_rejected() {
        assert_eq!(
            Workload::parse(b"0\n1, 10, 70\n"),
            Err(ParseError::NoProcesses)
        );
    }

    #[test]
    fn short_input_is_missing_integer() {
        assert_eq!(
            Workload::parse(b"3\n1, 10, 70\n"),
            Err(ParseError::MissingInteger)
        );
        assert_eq!(Workload::parse(b""), Err(ParseError::MissingInteger));
    }

    #[test]
    fn zero_service_names_the_process() {
        let err = Workload::parse(b"1\n4, 2, 0\n").unwrap_err();
        assert_eq!(err, ParseError::ZeroService(Pid::new(4)));
        assert_eq!(err.to_string(), "process 4 has zero burst time");
    }

    #[test]
    fn oversized_integer_is_rejected() {
        assert_eq!(
            Workload::parse(b"1\n1, 99999999999999999999, 5\n"),
            Err(ParseError::IntegerOverflow)
        );
    }
}
