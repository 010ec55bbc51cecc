use log::{debug, error, info};
use structopt::StructOpt;

use errors::Result;
use perf_command::{ProcessRunner, TrialRunner};
use perf_config::{Opt, RunConfig};

mod errors;
mod perf;
mod perf_command;
mod perf_config;
mod perf_plot;
mod perf_report;
mod perf_speedup;
mod perf_timer;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    let result = RunConfig::from_opt(opt).and_then(|config| run(&mut ProcessRunner, &config));

    if let Err(err) = result {
        error!("{err}");
        debug!("{err:?}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run<R: TrialRunner>(runner: &mut R, config: &RunConfig) -> Result<()> {
    let sequential = perf_timer::time_sequential(runner, config)?;
    info!("Sequential times: {sequential}");

    let parallel = perf_timer::time_parallel(runner, config)?;
    info!("Parallel times: {parallel}");

    let speedups = perf_speedup::compute_speedups(&sequential, &parallel)?;
    info!("Speedups: {speedups}");

    if let Some(csv) = &config.csv {
        info!("Writing measurements to {}", csv.display());
        perf_report::write_report(csv, &sequential, &parallel, &speedups)?;
    }

    info!("Plotting speedups to {}", config.output.display());
    perf_plot::write_plot(&config.thread_counts, &speedups, &config.output)?;

    info!("Done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BenchError;
    use crate::perf_timer::tests::{config, ScriptedRunner};

    #[test]
    fn full_run_writes_plot_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("speedup.csv");
        let mut config = config(&["small", "large"], &[2, 4], 1).with_csv(Some(csv.clone()));
        config.output = dir.path().join("speedup.svg");

        // small: baseline 8, then 4 and 2; large: baseline 12, then 6 and 3
        let mut runner = ScriptedRunner::with_samples([8.0, 12.0, 4.0, 2.0, 6.0, 3.0]);

        run(&mut runner, &config).unwrap();

        assert_eq!(runner.calls.len(), 6);
        let plot = std::fs::read_to_string(&config.output).unwrap();
        assert!(plot.contains("<svg"));
        let text = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            [
                "problem_size,thread_count,sequential_secs,parallel_secs,speedup",
                "small,2,8.0,4.0,2.0",
                "small,4,8.0,2.0,4.0",
                "large,2,12.0,6.0,2.0",
                "large,4,12.0,3.0,4.0",
            ]
        );
    }

    #[test]
    fn failed_trial_stops_before_plotting() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&["small"], &[2, 4], 1);
        config.output = dir.path().join("speedup.png");

        // sequential baseline, then the first parallel trial fails
        let mut runner = ScriptedRunner::with_samples([4.0]);
        runner.samples.push_back(Err(BenchError::MalformedOutput {
            command: "bench p small 2".to_string(),
            output: String::new(),
        }));

        let result = run(&mut runner, &config);

        assert!(matches!(result, Err(BenchError::MalformedOutput { .. })));
        assert_eq!(runner.calls.len(), 2);
        assert!(!config.output.exists());
    }

    #[test]
    fn report_written_before_plot() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("speedup.csv");
        let mut config = config(&["small"], &[2, 4], 2).with_csv(Some(csv.clone()));
        // the plot target is a directory, so plotting fails after the report is written
        config.output = dir.path().to_path_buf();

        let mut runner = ScriptedRunner::with_samples([3.0, 5.0, 2.0, 2.0, 1.0, 1.0]);

        let result = run(&mut runner, &config);

        assert!(matches!(result, Err(BenchError::Plot(_))));
        let text = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            [
                "problem_size,thread_count,sequential_secs,parallel_secs,speedup",
                "small,2,4.0,2.0,2.0",
                "small,4,4.0,1.0,4.0",
            ]
        );
    }
}
