//! Obstacle removal problem definition

use super::solution::{select_min_cost, PathOutcome, PathSummary};
use super::validator::{ClearanceReport, ClearanceValidator};
use crate::config::{OutputFormat, Settings, SolverBackend};
use crate::error::{RemovalError, Result};
use crate::map::io::{map_stem, result_file_path, result_table, write_table_file, write_text_file};
use crate::map::{load_map_file, ObstacleCatalog, Path, PathType};
use crate::sat::{
    EncodingStatistics, EnumerationStatistics, Formula, FormulaBuilder, SatOracle,
    SolutionEnumerator, SolverOptions, UnifiedOracle,
};
use rayon::prelude::*;
use std::path::{Path as FsPath, PathBuf};
use std::time::{Duration, Instant};

/// Minimum-weight obstacle removal for the canonical paths of one map
pub struct RemovalProblem {
    catalog: ObstacleCatalog,
    map_stem: String,
    paths: Vec<PathType>,
    backend: SolverBackend,
    solver_options: SolverOptions,
    parallel: bool,
}

/// Everything learned while solving one path.
#[derive(Debug, Clone)]
pub struct PathSolve {
    pub path: Path,
    pub outcome: PathOutcome,
    pub solutions_found: usize,
    pub encoding: EncodingStatistics,
    pub enumeration: Option<EnumerationStatistics>,
    pub clearance: Option<ClearanceReport>,
    pub solve_time: Duration,
}

/// Result of one path; failures stay local to their path.
#[derive(Debug)]
pub struct PathReport {
    pub path_type: PathType,
    pub result: Result<PathSolve>,
}

impl PathReport {
    pub fn outcome(&self) -> Option<&PathOutcome> {
        self.result.as_ref().ok().map(|solve| &solve.outcome)
    }

    pub fn summary(&self, catalog: &ObstacleCatalog) -> PathSummary {
        let (status, cost, solutions_found, removed, error) = match &self.result {
            Ok(solve) => match &solve.outcome {
                PathOutcome::Solved(solution) => (
                    "solved",
                    Some(solution.total_weight),
                    Some(solve.solutions_found),
                    solution.removed_records(catalog),
                    None,
                ),
                PathOutcome::NoSolution => ("no_solution", None, Some(0), Vec::new(), None),
            },
            Err(e) => ("failed", None, None, Vec::new(), Some(e.to_string())),
        };

        PathSummary {
            path: self.path_type,
            label: self.path_type.label().to_string(),
            status: status.to_string(),
            cost,
            solutions_found,
            removed,
            error,
        }
    }
}

impl RemovalProblem {
    /// Load the configured map and prepare to solve the configured paths
    pub fn new(settings: &Settings) -> Result<Self> {
        let catalog = load_map_file(&settings.input.map_file)?;
        let mut problem = Self::with_catalog(catalog, settings);
        problem.map_stem = map_stem(&settings.input.map_file);
        Ok(problem)
    }

    /// Create a problem with an explicit catalog (useful for testing)
    pub fn with_catalog(catalog: ObstacleCatalog, settings: &Settings) -> Self {
        Self {
            catalog,
            map_stem: map_stem(&settings.input.map_file),
            paths: settings.paths.clone(),
            backend: settings.solver.backend,
            solver_options: settings.solver_options(),
            parallel: settings.solver.parallel_paths,
        }
    }

    pub fn catalog(&self) -> &ObstacleCatalog {
        &self.catalog
    }

    pub fn map_stem(&self) -> &str {
        &self.map_stem
    }

    pub fn paths(&self) -> &[PathType] {
        &self.paths
    }

    /// Solve every requested path, each with its own oracle and formula.
    pub fn solve(&self) -> Vec<PathReport> {
        let solve_one = |&path_type: &PathType| PathReport {
            path_type,
            result: self.solve_path(path_type),
        };

        if self.parallel {
            self.paths.par_iter().map(solve_one).collect()
        } else {
            self.paths.iter().map(solve_one).collect()
        }
    }

    /// Solve one path with the configured backend.
    pub fn solve_path(&self, path_type: PathType) -> Result<PathSolve> {
        let oracle = UnifiedOracle::new(self.backend, &self.solver_options);
        self.solve_path_with(path_type, oracle)
    }

    /// Solve one path with a caller-supplied oracle.
    pub fn solve_path_with<O: SatOracle>(&self, path_type: PathType, oracle: O) -> Result<PathSolve> {
        let span = tracing::info_span!("path", path = %path_type);
        let _guard = span.enter();

        tracing::info!("find all SAT solutions for {} path", path_type);
        let path = Path::generate(self.catalog.grid_size(), path_type)?;
        let formula = FormulaBuilder::new(&self.catalog).build(&path);
        self.solve_encoded(path, formula, oracle)
    }

    /// Enumerate, cost and validate an already encoded path.
    pub fn solve_encoded<O: SatOracle>(&self, path: Path, formula: Formula, oracle: O) -> Result<PathSolve> {
        let start_time = Instant::now();
        let encoding = FormulaBuilder::new(&self.catalog).statistics(&path, &formula);

        let mut enumerator = SolutionEnumerator::new(oracle);
        let solutions = enumerator.enumerate(formula).map_err(|failure| {
            tracing::error!(path = %path.path_type(), error = %failure, "enumeration aborted");
            RemovalError::Oracle(failure)
        })?;
        let enumeration = enumerator.last_run().cloned();

        tracing::info!("calculate {} path solution costs", path.path_type());
        let (outcome, clearance) = match select_min_cost(&self.catalog, &solutions) {
            Some(best) => {
                let clearance = ClearanceValidator::new(&self.catalog).validate(&path, &best.assignment);
                if !clearance.satisfies_encoding {
                    return Err(RemovalError::Invariant(format!(
                        "chosen assignment for {} path leaves {} points unresolved",
                        path.path_type(),
                        clearance.unresolved_points.len()
                    )));
                }
                (PathOutcome::Solved(best), Some(clearance))
            }
            None => {
                tracing::warn!(path = %path.path_type(), "path formula is unsatisfiable");
                (PathOutcome::NoSolution, None)
            }
        };

        Ok(PathSolve {
            path,
            outcome,
            solutions_found: solutions.len(),
            encoding,
            enumeration,
            clearance,
            solve_time: start_time.elapsed(),
        })
    }

    /// Write one result file per solved path, plus a JSON summary when requested.
    ///
    /// Paths that failed or have no solution produce no result file.
    pub fn save_results(
        &self,
        reports: &[PathReport],
        directory: &FsPath,
        format: OutputFormat,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for report in reports {
            let Some(PathOutcome::Solved(solution)) = report.outcome() else {
                tracing::warn!(path = %report.path_type, "no result file written");
                continue;
            };

            let path = result_file_path(directory, &self.map_stem, report.path_type);
            let table = result_table(
                report.path_type,
                self.catalog.grid_size(),
                &solution.removed_records(&self.catalog),
            );
            write_table_file(&path, &table)?;
            tracing::info!(file = %path.display(), "result written");
            written.push(path);
        }

        if format == OutputFormat::Json {
            let summaries: Vec<PathSummary> =
                reports.iter().map(|report| report.summary(&self.catalog)).collect();
            let json = serde_json::to_string_pretty(&summaries)
                .map_err(|e| RemovalError::Invariant(format!("summary serialization failed: {}", e)))?;
            let path = directory.join(format!("{}_summary.json", self.map_stem));
            write_text_file(&path, &json)?;
            written.push(path);
        }

        Ok(written)
    }
}
