use crate::errors::{BenchError, Result};
use crate::perf::{ParallelTimes, SequentialTimes, Speedups, ThreadTable};

/// `sequential / parallel`, refusing to divide by zero or return a non-finite ratio.
pub fn speedup(
    problem_size: &str,
    thread_count: usize,
    sequential: f64,
    parallel: f64,
) -> Result<f64> {
    if parallel == 0.0 {
        return Err(BenchError::ZeroParallelTime {
            problem_size: problem_size.to_string(),
            thread_count,
        });
    }

    let ratio = sequential / parallel;
    if !ratio.is_finite() {
        return Err(BenchError::NonFiniteSpeedup {
            problem_size: problem_size.to_string(),
            thread_count,
        });
    }
    Ok(ratio)
}

/// Speedup for every entry of `parallel`, keyed the same way.
///
/// Every problem size in `parallel` needs a baseline in `sequential`.
pub fn compute_speedups(
    sequential: &SequentialTimes,
    parallel: &ParallelTimes,
) -> Result<Speedups> {
    let mut speedups = Speedups::with_capacity(parallel.len());

    for (problem_size, by_threads) in parallel.iter() {
        let baseline = *sequential
            .get(problem_size.as_str())
            .ok_or_else(|| BenchError::MissingBaseline {
                problem_size: problem_size.clone(),
            })?;

        let mut row = ThreadTable::with_capacity(by_threads.len());
        for (&thread_count, &parallel_time) in by_threads.iter() {
            row.insert(
                thread_count,
                speedup(problem_size, thread_count, baseline, parallel_time)?,
            );
        }
        speedups.insert(problem_size.clone(), row);
    }

    Ok(speedups)
}
