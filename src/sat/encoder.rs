//! Encodes a path over an obstacle map as a Boolean formula

use super::{Clause, Formula, Var};
use crate::map::{ObstacleCatalog, Path, Point};
use std::fmt;

/// Builds path formulas over one variable per obstacle.
///
/// Each path point contributes one conjunct: the constant true when no obstacle
/// covers it, otherwise the disjunction of the variables of every covering
/// obstacle. A point covered by several overlapping obstacles is satisfied as
/// soon as any one of them is marked for removal; the others may still occupy
/// it (see `removal::validator`).
pub struct FormulaBuilder<'a> {
    catalog: &'a ObstacleCatalog,
}

impl<'a> FormulaBuilder<'a> {
    pub fn new(catalog: &'a ObstacleCatalog) -> Self {
        Self { catalog }
    }

    /// The conjunct for a single path point.
    pub fn point_clause(&self, point: Point) -> Clause {
        let covering = self.catalog.covering_obstacles(point);
        if covering.is_empty() {
            Clause::True
        } else {
            Clause::any_of(covering.into_iter().map(Var))
        }
    }

    /// Conjunction of the point clauses of every point on `path`.
    pub fn build(&self, path: &Path) -> Formula {
        let formula = Formula::new(
            path.points()
                .iter()
                .map(|&point| self.point_clause(point))
                .collect(),
        );

        tracing::info!(path = %path.path_type(), full = %formula, "boolean formula of path");
        tracing::info!(path = %path.path_type(), simplified = %formula.simplified(), "simplified formula");
        tracing::debug!(
            path = %path.path_type(),
            obstacles = ?formula.variables(),
            "variables in formula"
        );

        formula
    }

    /// Summary of how `path` is encoded.
    pub fn statistics(&self, path: &Path, formula: &Formula) -> EncodingStatistics {
        let covered_points = path
            .points()
            .iter()
            .filter(|&&point| !self.catalog.covering_obstacles(point).is_empty())
            .count();

        EncodingStatistics {
            grid_size: self.catalog.grid_size(),
            path_points: path.len(),
            covered_points,
            total_obstacles: self.catalog.len(),
            formula_variables: formula.variables().len(),
            total_clauses: formula.len(),
        }
    }
}

/// Statistics about a path encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingStatistics {
    pub grid_size: usize,
    pub path_points: usize,
    pub covered_points: usize,
    pub total_obstacles: usize,
    pub formula_variables: usize,
    pub total_clauses: usize,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Grid: {}x{}", self.grid_size, self.grid_size)?;
        writeln!(f, "  Path points: {} ({} covered)", self.path_points, self.covered_points)?;
        writeln!(
            f,
            "  Variables: {} of {} obstacles",
            self.formula_variables, self.total_obstacles
        )?;
        writeln!(f, "  Clauses: {}", self.total_clauses)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{ObstacleRecord, PathType};

    fn catalog(n: usize, records: Vec<ObstacleRecord>) -> ObstacleCatalog {
        ObstacleCatalog::new(n, records.len(), records).unwrap()
    }

    #[test]
    fn test_uncovered_point_is_true() {
        let catalog = catalog(3, vec![ObstacleRecord::new(2, 2, 2, 2, 1)]);
        let builder = FormulaBuilder::new(&catalog);
        assert_eq!(builder.point_clause(Point::new(0, 0)), Clause::True);
    }

    #[test]
    fn test_covered_point_is_disjunction() {
        let catalog = catalog(
            3,
            vec![
                ObstacleRecord::new(0, 1, 0, 1, 1),
                ObstacleRecord::new(2, 2, 2, 2, 1),
                ObstacleRecord::new(1, 2, 1, 2, 1),
            ],
        );
        let builder = FormulaBuilder::new(&catalog);
        assert_eq!(
            builder.point_clause(Point::new(1, 1)),
            Clause::any_of([Var(0), Var(2)])
        );
    }

    #[test]
    fn test_formula_has_one_clause_per_point() {
        let catalog = catalog(3, vec![ObstacleRecord::new(0, 0, 1, 2, 4)]);
        let builder = FormulaBuilder::new(&catalog);

        let path = Path::generate(3, PathType::UpThenRight).unwrap();
        let formula = builder.build(&path);
        assert_eq!(formula.len(), 5);
        assert_eq!(
            formula.clauses(),
            &[
                Clause::True,
                Clause::any_of([Var(0)]),
                Clause::any_of([Var(0)]),
                Clause::True,
                Clause::True,
            ]
        );

        let stats = builder.statistics(&path, &formula);
        assert_eq!(stats.covered_points, 2);
        assert_eq!(stats.formula_variables, 1);
        assert_eq!(stats.total_clauses, 5);
    }

    #[test]
    fn test_obstacle_off_path_has_no_variable() {
        let catalog = catalog(4, vec![ObstacleRecord::new(1, 2, 2, 3, 1)]);
        let builder = FormulaBuilder::new(&catalog);

        let path = Path::generate(4, PathType::RightThenUp).unwrap();
        let formula = builder.build(&path);
        assert!(formula.variables().is_empty());
        assert!(formula.clauses().iter().all(|clause| *clause == Clause::True));
    }
}
