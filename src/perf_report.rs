use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::errors::{BenchError, Result};
use crate::perf::{ParallelTimes, SequentialTimes, Speedups};

/// One CSV row: a (problem size, thread count) pair with both timings and the ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub problem_size: String,
    pub thread_count: usize,
    pub sequential_secs: f64,
    pub parallel_secs: f64,
    pub speedup: f64,
}

/// Flattens the three tables into rows, in speedup table order.
pub fn measurements(
    sequential: &SequentialTimes,
    parallel: &ParallelTimes,
    speedups: &Speedups,
) -> Result<Vec<Measurement>> {
    let mut rows = Vec::new();
    for (problem_size, by_threads) in speedups.iter() {
        let missing = || BenchError::MissingBaseline {
            problem_size: problem_size.clone(),
        };
        let sequential_secs = *sequential.get(problem_size.as_str()).ok_or_else(missing)?;
        let parallel_row = parallel.get(problem_size.as_str()).ok_or_else(missing)?;

        for (&thread_count, &speedup) in by_threads.iter() {
            let parallel_secs = *parallel_row.get(&thread_count).ok_or_else(|| {
                BenchError::Config(format!(
                    "no parallel time for {problem_size:?} with {thread_count} threads"
                ))
            })?;
            rows.push(Measurement {
                problem_size: problem_size.clone(),
                thread_count,
                sequential_secs,
                parallel_secs,
                speedup,
            });
        }
    }
    Ok(rows)
}

pub fn write_csv<W: io::Write>(writer: W, rows: &[Measurement]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_report(
    path: &Path,
    sequential: &SequentialTimes,
    parallel: &ParallelTimes,
    speedups: &Speedups,
) -> Result<()> {
    let rows = measurements(sequential, parallel, speedups)?;
    write_csv(File::create(path)?, &rows)
}
