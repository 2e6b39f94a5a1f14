//! Timing harness over generated maps
//!
//! For every (size, blocks) pair a fresh map is generated per run from a
//! seed, all paths are solved, and the average solve time is reported.
//! Results can be written to a CSV file for plotting.

use anyhow::{Context, Result};
use clap::Parser;
use obstacle_removal_sat::{
    config::{Settings, SolverBackend},
    map::write_generated_map,
    removal::RemovalProblem,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "benchmark")]
#[command(about = "Average solve time over generated obstacle maps")]
struct Args {
    /// Grid sizes to test
    #[arg(long, value_delimiter = ',', default_value = "10,20,30,40,50")]
    sizes: Vec<usize>,

    /// Obstacle counts to test
    #[arg(long, value_delimiter = ',', default_value = "2,4,8")]
    blocks: Vec<usize>,

    /// Runs per configuration
    #[arg(long, default_value_t = 6)]
    runs: usize,

    /// SAT backend
    #[arg(long, default_value = "cadical")]
    backend: SolverBackend,

    /// Seed of the first run; later runs add their index
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Solve the three paths concurrently
    #[arg(long)]
    parallel: bool,

    /// Write averages to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct BenchmarkRow {
    size: usize,
    blocks: usize,
    backend: String,
    runs: usize,
    average_seconds: f64,
    min_seconds: f64,
    max_seconds: f64,
    failed_paths: usize,
}

impl BenchmarkRow {
    fn new(size: usize, blocks: usize, backend: SolverBackend, run_times: &[Duration], failed_paths: usize) -> Self {
        let total: Duration = run_times.iter().sum();
        let average = if run_times.is_empty() {
            Duration::ZERO
        } else {
            total / run_times.len() as u32
        };

        Self {
            size,
            blocks,
            backend: format!("{:?}", backend).to_lowercase(),
            runs: run_times.len(),
            average_seconds: average.as_secs_f64(),
            min_seconds: run_times.iter().min().copied().unwrap_or_default().as_secs_f64(),
            max_seconds: run_times.iter().max().copied().unwrap_or_default().as_secs_f64(),
            failed_paths,
        }
    }
}

fn run_configuration(args: &Args, map_dir: &std::path::Path, size: usize, blocks: usize) -> Result<BenchmarkRow> {
    let mut run_times = Vec::with_capacity(args.runs);
    let mut failed_paths = 0;

    for run in 0..args.runs {
        let seed = args.seed + run as u64;
        let map_file = write_generated_map(map_dir, size, blocks, Some(seed))
            .with_context(|| format!("Failed to generate {}x{} map with {} blocks", size, size, blocks))?;

        let mut settings = Settings::default();
        settings.input.map_file = map_file;
        settings.solver.backend = args.backend;
        settings.solver.parallel_paths = args.parallel;

        let problem = RemovalProblem::new(&settings).context("Failed to load generated map")?;

        let start_time = Instant::now();
        let reports = problem.solve();
        run_times.push(start_time.elapsed());

        failed_paths += reports.iter().filter(|report| report.result.is_err()).count();
    }

    Ok(BenchmarkRow::new(size, blocks, args.backend, &run_times, failed_paths))
}

fn write_rows(path: &PathBuf, rows: &[BenchmarkRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let map_dir = tempfile::tempdir().context("Failed to create map directory")?;

    println!(
        "Benchmarking {:?} over sizes {:?} and blocks {:?} ({} runs each)\n",
        args.backend, args.sizes, args.blocks, args.runs
    );

    let mut rows = Vec::new();
    for &blocks in &args.blocks {
        for &size in &args.sizes {
            let row = run_configuration(&args, map_dir.path(), size, blocks)?;
            println!(
                "{:>3} blocks, {:>4}x{:<4} avg {:.4}s  min {:.4}s  max {:.4}s{}",
                blocks,
                size,
                size,
                row.average_seconds,
                row.min_seconds,
                row.max_seconds,
                if row.failed_paths > 0 {
                    format!("  ({} failed paths)", row.failed_paths)
                } else {
                    String::new()
                }
            );
            rows.push(row);
        }
    }

    if let Some(output) = &args.output {
        write_rows(output, &rows)?;
        println!("\nResults saved to {}", output.display());
    }

    Ok(())
}
