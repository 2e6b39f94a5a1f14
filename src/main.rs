//! Main CLI application for the obstacle removal solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use obstacle_removal_sat::{
    config::{CliOverrides, Settings, SolverBackend},
    map::{
        io::{map_table, write_table_file},
        load_table_file, write_generated_map, ObstacleCatalog, ObstacleRecord,
    },
    removal::{PathOutcome, PathReport, RemovalProblem},
    utils::{init_logging, ColorOutput, ResultFormatter},
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "obstacle_removal_sat")]
#[command(about = "Minimum-weight obstacle removal via SAT enumeration")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the cheapest obstacle removal for each canonical path
    Solve {
        /// Obstacle map file (overrides config)
        map: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Result directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// SAT backend (overrides config)
        #[arg(short, long)]
        backend: Option<SolverBackend>,

        /// Per-call solver timeout in seconds, 0 for none (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Render the map and every result
        #[arg(short, long)]
        graph: bool,

        /// Solve the paths concurrently
        #[arg(short, long)]
        parallel: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate a random obstacle map
    Generate {
        /// Grid size n
        size: usize,

        /// Number of obstacles
        blocks: usize,

        /// Directory to write the map into
        #[arg(short, long, default_value = "mapData")]
        directory: PathBuf,

        /// Seed for a reproducible map
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Draw a map or result file
    Render {
        /// Map or result CSV file
        file: PathBuf,
    },

    /// Create example configuration and map files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            map,
            config,
            output,
            backend,
            timeout,
            graph,
            parallel,
            verbose,
        } => {
            let cli_overrides = CliOverrides {
                map_file: map,
                output_dir: output,
                backend,
                timeout_seconds: timeout,
                graph,
                parallel,
            };
            solve_command(config, cli_overrides, verbose)
        }
        Commands::Generate {
            size,
            blocks,
            directory,
            seed,
        } => generate_command(size, blocks, directory, seed),
        Commands::Render { file } => render_command(file),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn solve_command(config_path: PathBuf, cli_overrides: CliOverrides, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Starting obstacle removal solver"));

    // Load configuration
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Settings::default()
    };
    settings.merge_with_cli(&cli_overrides);

    init_logging(&settings.logging).context("Failed to set up logging")?;

    let failures = run_solve(&settings, verbose)?;
    if failures > 0 {
        anyhow::bail!("{} path(s) could not be solved", failures);
    }
    Ok(())
}

/// Solve, report and save; returns the number of paths that failed.
fn run_solve(settings: &Settings, verbose: bool) -> Result<usize> {
    if verbose {
        println!("Configuration:");
        println!("  Map file: {}", settings.input.map_file.display());
        println!("  Backend: {:?}", settings.solver.backend);
        println!("  Paths: {:?}", settings.paths);
        println!("  Result dir: {}", settings.output.result_directory.display());
        println!();
    }

    settings
        .validate()
        .context("Configuration validation failed")?;

    let start_time = Instant::now();
    let problem = RemovalProblem::new(settings).context("Failed to load obstacle map")?;

    if settings.output.graph {
        println!("{}", ResultFormatter::render_table(&map_table(problem.catalog())));
    }

    println!("{}", ColorOutput::info("Enumerating SAT solutions per path..."));
    let reports = problem.solve();
    let total_time = start_time.elapsed();

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Solved {} path(s) in {:.3}s",
            reports.len(),
            total_time.as_secs_f64()
        ))
    );
    println!("\n{}", ResultFormatter::format_summary(&reports, problem.catalog()));

    for report in &reports {
        if verbose {
            println!("{}", ResultFormatter::format_report(report, problem.catalog()));
        }
        print_path_result(report, &problem, settings.output.graph);
    }

    let written = problem
        .save_results(
            &reports,
            &settings.output.result_directory,
            settings.output.format,
        )
        .context("Failed to save results")?;
    println!(
        "{}",
        ColorOutput::success(&format!(
            "{} file(s) saved to {}",
            written.len(),
            settings.output.result_directory.display()
        ))
    );

    if let Some(log_file) = &settings.logging.log_file {
        println!("For more information see {}", log_file.display());
    }

    Ok(reports.iter().filter(|report| report.result.is_err()).count())
}

fn print_path_result(report: &PathReport, problem: &RemovalProblem, graph: bool) {
    let solve = match &report.result {
        Ok(solve) => solve,
        Err(e) => {
            println!(
                "{}",
                ColorOutput::error(&format!("{} path failed: {}", report.path_type, e))
            );
            return;
        }
    };

    match &solve.outcome {
        PathOutcome::Solved(solution) => {
            println!("cost of best {} path: {}", report.path_type, solution.total_weight);
            if let Some(clearance) = solve.clearance.as_ref().filter(|c| !c.is_fully_clear()) {
                println!(
                    "{}",
                    ColorOutput::warning(&format!(
                        "  {} point(s) of the {} path remain inside kept obstacles",
                        clearance.residual_obstructions.len(),
                        report.path_type
                    ))
                );
            }
            if graph {
                let removed = solution.removed_records(problem.catalog());
                println!(
                    "{}",
                    ResultFormatter::render_grid(
                        problem.catalog().grid_size(),
                        &removed,
                        Some(&solve.path)
                    )
                );
            }
        }
        PathOutcome::NoSolution => {
            println!(
                "{}",
                ColorOutput::warning(&format!("no solution for the {} path", report.path_type))
            );
        }
    }
}

fn generate_command(size: usize, blocks: usize, directory: PathBuf, seed: Option<u64>) -> Result<()> {
    let path = write_generated_map(&directory, size, blocks, seed)
        .with_context(|| format!("Failed to generate map in {}", directory.display()))?;
    println!(
        "{}",
        ColorOutput::success(&format!(
            "Generated {}x{} map with {} obstacles: {}",
            size,
            size,
            blocks,
            path.display()
        ))
    );
    Ok(())
}

fn render_command(file: PathBuf) -> Result<()> {
    let table = load_table_file(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    println!("{}", ResultFormatter::render_table(&table));
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let map_dir = directory.join("mapData");
    let result_dir = directory.join("resultData");

    for dir in [&config_dir, &map_dir, &result_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let map_path = map_dir.join("example.csv");
    if !map_path.exists() || force {
        write_table_file(&map_path, &map_table(&example_catalog()?))
            .context("Failed to create example map")?;
        println!("Created: {}", map_path.display());
    } else {
        println!("Skipped: {} (already exists)", map_path.display());
    }

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Generate maps with: obstacle_removal_sat generate 10 5");
    println!("2. Run: obstacle_removal_sat solve mapData/example.csv");

    Ok(())
}

fn example_catalog() -> Result<ObstacleCatalog> {
    let records = vec![
        ObstacleRecord::new(0, 1, 0, 0, 3),
        ObstacleRecord::new(1, 2, 1, 2, 5),
        ObstacleRecord::new(0, 0, 2, 3, 2),
        ObstacleRecord::new(3, 3, 0, 2, 4),
    ];
    Ok(ObstacleCatalog::new(4, records.len(), records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use obstacle_removal_sat::map::PathType;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "obstacle_removal_sat",
            "solve",
            "mapData/4x4_3blocks.csv",
            "--backend",
            "exhaustive",
            "--timeout",
            "5",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["obstacle_removal_sat", "solve", "--backend", "minisat"]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from(["obstacle_removal_sat", "generate", "10", "5", "--seed", "7"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("mapData/example.csv").exists());
        assert!(temp_dir.path().join("resultData").is_dir());
    }

    #[test]
    fn test_generate_and_render() {
        let temp_dir = tempdir().unwrap();
        generate_command(6, 3, temp_dir.path().to_path_buf(), Some(11)).unwrap();

        let map = temp_dir.path().join("6x6_3blocks.csv");
        assert!(map.exists());
        assert!(render_command(map).is_ok());
        assert!(render_command(temp_dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_run_solve_writes_results() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        let mut settings = Settings::default();
        settings.input.map_file = temp_dir.path().join("mapData/example.csv");
        settings.output.result_directory = temp_dir.path().join("resultData");
        settings.output.graph = true;
        settings.logging.log_file = None;

        let failures = run_solve(&settings, true).unwrap();
        assert_eq!(failures, 0);
        for path_type in PathType::ALL {
            let file = temp_dir
                .path()
                .join(format!("resultData/example_{}.csv", path_type.label()));
            assert!(file.exists());
        }
    }
}
