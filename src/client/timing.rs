//! Per-query timing

use std::time::Duration;

use crate::table::ResultTable;

/// Timing of one query call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryTiming {
    /// Wall clock from send to fully decoded table
    pub total: Duration,
    /// Execution time reported by the server, when present
    pub execution: Option<Duration>,
}

impl QueryTiming {
    pub fn total_ms(&self) -> f64 {
        as_ms(self.total)
    }

    pub fn execution_ms(&self) -> Option<f64> {
        self.execution.map(as_ms)
    }
}

fn as_ms(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

/// A decoded table together with the timing of the call that produced it
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub table: ResultTable,
    pub timing: QueryTiming,
}

impl QueryResult {
    pub fn into_table(self) -> ResultTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milliseconds() {
        let timing = QueryTiming {
            total: Duration::from_millis(12),
            execution: Some(Duration::from_micros(3500)),
        };
        assert!((timing.total_ms() - 12.0).abs() < 1e-9);
        assert!((timing.execution_ms().unwrap() - 3.5).abs() < 1e-9);
    }
}
