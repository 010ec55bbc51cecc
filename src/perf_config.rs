use std::path::PathBuf;

use structopt::StructOpt;

use crate::errors::{BenchError, Result};
use crate::perf_command::CommandTemplate;

pub const DEFAULT_PROBLEM_SIZES: [&str; 5] = ["xsmall", "small", "medium", "large", "xlarge"];
pub const DEFAULT_THREAD_COUNTS: [usize; 5] = [2, 4, 6, 8, 12];
pub const DEFAULT_COMMAND: [&str; 3] = ["go", "run", "benchmark.go"];

#[derive(Debug, StructOpt)]
#[structopt(
    name = "speedup-bench",
    about = "Times a benchmark program sequentially and in parallel and plots the speedup."
)]
pub struct Opt {
    /// Problem sizes to benchmark [default: xsmall,small,medium,large,xlarge]
    #[structopt(short = "s", long = "sizes", use_delimiter = true)]
    pub sizes: Vec<String>,

    /// Thread counts for the parallel runs [default: 2,4,6,8,12]
    #[structopt(short = "t", long = "threads", use_delimiter = true)]
    pub threads: Vec<usize>,

    /// Number of trials to average each timing over
    #[structopt(short = "n", long = "trials", default_value = "5")]
    pub trials: usize,

    /// Where to write the speedup plot (.svg for SVG, anything else for PNG)
    #[structopt(short = "o", long = "output", parse(from_os_str), default_value = "speedup.png")]
    pub output: PathBuf,

    /// Also write every measurement to this CSV file
    #[structopt(long = "csv", parse(from_os_str))]
    pub csv: Option<PathBuf>,

    /// Benchmark command; the mode, problem size and thread count are appended
    /// [default: go run benchmark.go]
    #[structopt(last = true)]
    pub command: Vec<String>,
}

/// Everything a run needs, fixed before the first trial starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub problem_sizes: Vec<String>,
    pub thread_counts: Vec<usize>,
    pub trials: usize,
    pub command: CommandTemplate,
    pub output: PathBuf,
    pub csv: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(
        problem_sizes: Vec<String>,
        thread_counts: Vec<usize>,
        trials: usize,
        command: CommandTemplate,
        output: PathBuf,
    ) -> Result<Self> {
        if problem_sizes.is_empty() {
            return Err(config_error("at least one problem size is required"));
        }
        for (i, size) in problem_sizes.iter().enumerate() {
            if size.trim().is_empty() {
                return Err(config_error("problem size labels must not be empty"));
            }
            if problem_sizes[..i].contains(size) {
                return Err(config_error(&format!("problem size {size:?} is listed twice")));
            }
        }

        if thread_counts.is_empty() {
            return Err(config_error("at least one thread count is required"));
        }
        for (i, &threads) in thread_counts.iter().enumerate() {
            if threads == 0 {
                return Err(config_error("thread counts must be positive"));
            }
            if thread_counts[..i].contains(&threads) {
                return Err(config_error(&format!("thread count {threads} is listed twice")));
            }
        }

        if trials == 0 {
            return Err(config_error("trial count must be at least 1"));
        }

        Ok(Self {
            problem_sizes,
            thread_counts,
            trials,
            command,
            output,
            csv: None,
        })
    }

    pub fn with_csv(mut self, csv: Option<PathBuf>) -> Self {
        self.csv = csv;
        self
    }

    /// Fills in defaults for anything left off the command line, then validates.
    pub fn from_opt(opt: Opt) -> Result<Self> {
        let sizes = if opt.sizes.is_empty() {
            DEFAULT_PROBLEM_SIZES.iter().map(|s| s.to_string()).collect()
        } else {
            opt.sizes
        };
        let threads = if opt.threads.is_empty() {
            DEFAULT_THREAD_COUNTS.to_vec()
        } else {
            opt.threads
        };
        let command = if opt.command.is_empty() {
            DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect()
        } else {
            opt.command
        };

        Ok(Self::new(
            sizes,
            threads,
            opt.trials,
            CommandTemplate::from_argv(command)?,
            opt.output,
        )?
        .with_csv(opt.csv))
    }
}

fn config_error(msg: &str) -> BenchError {
    BenchError::Config(msg.to_string())
}
