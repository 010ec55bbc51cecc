use std::process::{Command, Stdio};

use log::debug;

use crate::errors::{BenchError, Result};

/// How the benchmark program is asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sequential,
    Parallel(usize),
}

impl Mode {
    /// The flag the benchmark program expects as its first argument.
    pub fn flag(&self) -> &'static str {
        match self {
            Mode::Sequential => "s",
            Mode::Parallel(_) => "p",
        }
    }
}

/// The fixed leading part of every benchmark invocation, e.g. `go run benchmark.go`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Result<Self> {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(BenchError::Config("benchmark program is empty".to_string()));
        }
        Ok(Self { program, args })
    }

    /// Splits a full argument vector into program and leading arguments.
    pub fn from_argv(argv: Vec<String>) -> Result<Self> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .ok_or_else(|| BenchError::Config("benchmark command is empty".to_string()))?;
        Self::new(program, argv.collect())
    }

    /// Full argument vector for one trial:
    /// `<program> <args..> <mode> <problem_size> [<thread_count>]`.
    pub fn argv(&self, mode: Mode, problem_size: &str) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 4);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv.push(mode.flag().to_string());
        argv.push(problem_size.to_string());
        if let Mode::Parallel(thread_count) = mode {
            argv.push(thread_count.to_string());
        }
        argv
    }
}

/// Runs one trial and reports the elapsed seconds it printed.
///
/// `argv[0]` is the program. The real implementation spawns a process; tests
/// swap in a scripted runner.
pub trait TrialRunner {
    fn run(&mut self, argv: &[String]) -> Result<f64>;
}

/// Spawns the benchmark directly, without a shell, and waits for it to exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl TrialRunner for ProcessRunner {
    fn run(&mut self, argv: &[String]) -> Result<f64> {
        let command = argv.join(" ");
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| BenchError::Config("benchmark command is empty".to_string()))?;

        debug!("spawning {command}");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| BenchError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BenchError::CommandFailed {
                command,
                status: output.status,
            });
        }

        parse_seconds(&command, &String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses a trial's whole stdout as one positive, finite number of seconds.
pub fn parse_seconds(command: &str, stdout: &str) -> Result<f64> {
    let text = stdout.trim();
    let malformed = || BenchError::MalformedOutput {
        command: command.to_string(),
        output: stdout.to_string(),
    };

    let secs: f64 = text.parse().map_err(|_| malformed())?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(malformed());
    }
    Ok(secs)
}
