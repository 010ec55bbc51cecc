use log::info;

use crate::errors::Result;
use crate::perf::{ParallelTimes, SequentialTimes, ThreadTable};
use crate::perf_command::{Mode, TrialRunner};
use crate::perf_config::RunConfig;

/// Mean sequential time for every configured problem size.
pub fn time_sequential<R: TrialRunner>(
    runner: &mut R,
    config: &RunConfig,
) -> Result<SequentialTimes> {
    info!("Running sequential benchmarks...");

    let mut times = SequentialTimes::with_capacity(config.problem_sizes.len());
    for problem_size in &config.problem_sizes {
        let mean = mean_of_trials(runner, config, Mode::Sequential, problem_size)?;
        times.insert(problem_size.clone(), mean);
    }
    Ok(times)
}

/// Mean parallel time for every (problem size, thread count) pair.
pub fn time_parallel<R: TrialRunner>(
    runner: &mut R,
    config: &RunConfig,
) -> Result<ParallelTimes> {
    info!("Running parallel benchmarks...");

    let mut times = ParallelTimes::with_capacity(config.problem_sizes.len());
    for problem_size in &config.problem_sizes {
        let mut by_threads = ThreadTable::with_capacity(config.thread_counts.len());
        for &thread_count in &config.thread_counts {
            let mode = Mode::Parallel(thread_count);
            let mean = mean_of_trials(runner, config, mode, problem_size)?;
            by_threads.insert(thread_count, mean);
        }
        times.insert(problem_size.clone(), by_threads);
    }
    Ok(times)
}

fn mean_of_trials<R: TrialRunner>(
    runner: &mut R,
    config: &RunConfig,
    mode: Mode,
    problem_size: &str,
) -> Result<f64> {
    let argv = config.command.argv(mode, problem_size);
    let command = argv.join(" ");

    let mut total = 0.0;
    for i in 0..config.trials {
        let secs = runner.run(&argv)?;
        match mode {
            Mode::Sequential => info!(
                "{command}: problem size {problem_size}, iteration {}, time {secs}s",
                i + 1
            ),
            Mode::Parallel(threads) => info!(
                "{command}: problem size {problem_size}, threads {threads}, \
                 iteration {}, time {secs}s",
                i + 1
            ),
        }
        total += secs;
    }

    let mean = total / config.trials as f64;
    info!("{command}: mean {mean}s over {} trials", config.trials);
    Ok(mean)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::path::PathBuf;

    use super::*;
    use crate::errors::BenchError;
    use crate::perf_command::CommandTemplate;

    /// Hands out queued timings in order and records every argv it was given.
    #[derive(Default)]
    pub(crate) struct ScriptedRunner {
        pub samples: VecDeque<Result<f64>>,
        pub calls: Vec<Vec<String>>,
    }

    impl ScriptedRunner {
        pub fn with_samples(samples: impl IntoIterator<Item = f64>) -> Self {
            Self {
                samples: samples.into_iter().map(Ok).collect(),
                calls: Vec::new(),
            }
        }
    }

    impl TrialRunner for ScriptedRunner {
        fn run(&mut self, argv: &[String]) -> Result<f64> {
            self.calls.push(argv.to_vec());
            self.samples
                .pop_front()
                .unwrap_or_else(|| panic!("no sample left for {argv:?}"))
        }
    }

    pub(crate) fn config(sizes: &[&str], threads: &[usize], trials: usize) -> RunConfig {
        RunConfig::new(
            sizes.iter().map(|s| s.to_string()).collect(),
            threads.to_vec(),
            trials,
            CommandTemplate::new("bench", Vec::new()).unwrap(),
            PathBuf::from("speedup.png"),
        )
        .unwrap()
    }

    #[test]
    fn sequential_mean_per_size() {
        let config = config(&["small", "large"], &[2], 3);
        let mut runner = ScriptedRunner::with_samples([1.0, 2.0, 3.0, 10.0, 20.0, 60.0]);

        let times = time_sequential(&mut runner, &config).unwrap();

        assert_eq!(times.len(), 2);
        assert_eq!(times.get("small"), Some(&2.0));
        assert_eq!(times.get("large"), Some(&30.0));
        assert_eq!(
            runner.calls,
            [
                ["bench", "s", "small"],
                ["bench", "s", "small"],
                ["bench", "s", "small"],
                ["bench", "s", "large"],
                ["bench", "s", "large"],
                ["bench", "s", "large"],
            ]
        );
    }

    #[test]
    fn single_trial_is_its_own_mean() {
        let config = config(&["medium"], &[4], 1);
        let mut runner = ScriptedRunner::with_samples([0.75]);

        let times = time_sequential(&mut runner, &config).unwrap();
        assert_eq!(times.get("medium"), Some(&0.75));
    }

    #[test]
    fn parallel_table_covers_cross_product() {
        let sizes = ["xsmall", "small", "large"];
        let threads = [2, 4, 8, 12];
        let config = config(&sizes, &threads, 2);
        let samples = (1..=sizes.len() * threads.len() * 2).map(|i| i as f64);
        let mut runner = ScriptedRunner::with_samples(samples);

        let times = time_parallel(&mut runner, &config).unwrap();

        assert_eq!(times.keys().collect::<Vec<_>>(), sizes);
        for (_, by_threads) in times.iter() {
            assert_eq!(by_threads.keys().copied().collect::<Vec<_>>(), threads);
        }
        // first pair averages samples 1 and 2, last pair samples 23 and 24
        assert_eq!(times.get("xsmall").unwrap().get(&2), Some(&1.5));
        assert_eq!(times.get("large").unwrap().get(&12), Some(&23.5));
        assert_eq!(runner.calls[0], ["bench", "p", "xsmall", "2"]);
        assert_eq!(runner.calls[23], ["bench", "p", "large", "12"]);
    }

    #[test]
    fn trial_failure_aborts_the_stage() {
        let config = config(&["small", "large"], &[2], 2);
        let mut runner = ScriptedRunner::default();
        runner.samples.push_back(Ok(1.0));
        runner.samples.push_back(Err(BenchError::MalformedOutput {
            command: "bench s small".to_string(),
            output: "oops".to_string(),
        }));

        let result = time_sequential(&mut runner, &config);

        assert!(matches!(result, Err(BenchError::MalformedOutput { .. })));
        assert_eq!(runner.calls.len(), 2);
    }
}
