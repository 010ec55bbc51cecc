use std::io;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

/// Everything that can abort a benchmark run. Nothing is retried.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    /// Stdout was not a single positive number of seconds.
    #[error("`{command}` printed {output:?}, expected elapsed seconds")]
    MalformedOutput { command: String, output: String },

    #[error("no sequential time for problem size {problem_size:?}")]
    MissingBaseline { problem_size: String },

    #[error("parallel time for problem size {problem_size:?} with {thread_count} threads is zero")]
    ZeroParallelTime {
        problem_size: String,
        thread_count: usize,
    },

    #[error("speedup for problem size {problem_size:?} with {thread_count} threads is not finite")]
    NonFiniteSpeedup {
        problem_size: String,
        thread_count: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to plot: {0}")]
    Plot(String),

    #[error("failed to write report: {0}")]
    Report(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
