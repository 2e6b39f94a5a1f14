//! Checks a chosen removal against the path it was computed for

use crate::map::{ObstacleCatalog, Path, Point};
use crate::sat::{Assignment, Var};
use std::fmt;

/// Result of checking an assignment against a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearanceReport {
    /// Every covered path point has at least one removed covering obstacle.
    pub satisfies_encoding: bool,
    /// Points with no removed covering obstacle at all.
    pub unresolved_points: Vec<Point>,
    /// Points that still lie inside obstacles that were kept.
    pub residual_obstructions: Vec<ResidualObstruction>,
}

/// A path point still occupied after removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidualObstruction {
    pub point: Point,
    pub kept_obstacles: Vec<usize>,
}

impl ClearanceReport {
    /// Whether no kept obstacle touches the path.
    pub fn is_fully_clear(&self) -> bool {
        self.residual_obstructions.is_empty()
    }
}

/// Validates removals point by point.
pub struct ClearanceValidator<'a> {
    catalog: &'a ObstacleCatalog,
}

impl<'a> ClearanceValidator<'a> {
    pub fn new(catalog: &'a ObstacleCatalog) -> Self {
        Self { catalog }
    }

    /// Check `assignment` against every point of `path`.
    ///
    /// Overlapping obstacles make the encoding weaker than full clearance: a
    /// point counts as handled once one covering obstacle is removed. Such
    /// points show up here as residual obstructions.
    pub fn validate(&self, path: &Path, assignment: &Assignment) -> ClearanceReport {
        let mut unresolved_points = Vec::new();
        let mut residual_obstructions = Vec::new();

        for &point in path.points() {
            let covering = self.catalog.covering_obstacles(point);
            if covering.is_empty() {
                continue;
            }

            let (removed, kept): (Vec<usize>, Vec<usize>) = covering
                .into_iter()
                .partition(|&id| assignment.is_true(Var(id)));

            if removed.is_empty() {
                unresolved_points.push(point);
            }
            if !kept.is_empty() {
                residual_obstructions.push(ResidualObstruction {
                    point,
                    kept_obstacles: kept,
                });
            }
        }

        let report = ClearanceReport {
            satisfies_encoding: unresolved_points.is_empty(),
            unresolved_points,
            residual_obstructions,
        };

        if !report.is_fully_clear() {
            tracing::warn!(
                path = %path.path_type(),
                points = report.residual_obstructions.len(),
                "path points remain inside kept obstacles"
            );
        }
        report
    }
}

impl fmt::Display for ClearanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Clearance Check:")?;
        writeln!(f, "  Satisfies encoding: {}", self.satisfies_encoding)?;
        writeln!(f, "  Fully clear: {}", self.is_fully_clear())?;
        for residual in &self.residual_obstructions {
            let kept: Vec<String> = residual
                .kept_obstacles
                .iter()
                .map(|id| format!("o{}", id))
                .collect();
            writeln!(f, "  {} still inside {}", residual.point, kept.join(", "))?;
        }
        Ok(())
    }
}
