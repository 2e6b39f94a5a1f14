//! Costed solutions and minimum-cost selection

use crate::map::{Obstacle, ObstacleCatalog, ObstacleRecord, PathType};
use crate::sat::{Assignment, SolutionSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Total weight of the obstacles whose variable is true in `assignment`.
pub fn cost(catalog: &ObstacleCatalog, assignment: &Assignment) -> u64 {
    assignment
        .true_vars()
        .filter_map(|var| catalog.get(var.id()))
        .map(|obstacle| obstacle.weight)
        .sum()
}

/// An assignment paired with its total obstacle weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostedSolution {
    pub total_weight: u64,
    pub assignment: Assignment,
}

impl CostedSolution {
    pub fn new(catalog: &ObstacleCatalog, assignment: Assignment) -> Self {
        Self {
            total_weight: cost(catalog, &assignment),
            assignment,
        }
    }

    /// Obstacles marked for removal, in id order.
    pub fn removed_obstacles<'a>(&self, catalog: &'a ObstacleCatalog) -> Vec<&'a Obstacle> {
        self.assignment
            .true_vars()
            .filter_map(|var| catalog.get(var.id()))
            .collect()
    }

    pub fn removed_records(&self, catalog: &ObstacleCatalog) -> Vec<ObstacleRecord> {
        self.removed_obstacles(catalog)
            .into_iter()
            .map(Obstacle::record)
            .collect()
    }
}

/// Pick the minimum-cost assignment of `solutions`.
///
/// Ties go to the assignment found last. Returns `None` for an empty set.
pub fn select_min_cost(catalog: &ObstacleCatalog, solutions: &SolutionSet) -> Option<CostedSolution> {
    let mut best: Option<CostedSolution> = None;

    for (index, assignment) in solutions.iter().enumerate() {
        let candidate = CostedSolution::new(catalog, assignment.clone());
        tracing::info!("cost of solution {}: {}", index + 1, candidate.total_weight);

        let replace = match &best {
            Some(current) => candidate.total_weight <= current.total_weight,
            None => true,
        };
        if replace {
            best = Some(candidate);
        }
    }

    match &best {
        Some(chosen) => tracing::info!("minimum cost found: {}", chosen.total_weight),
        None => tracing::warn!("no solutions to select from"),
    }
    best
}

/// Result of solving one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// The cheapest assignment clearing the path.
    Solved(CostedSolution),
    /// The path formula has no model.
    NoSolution,
}

impl PathOutcome {
    pub fn solution(&self) -> Option<&CostedSolution> {
        match self {
            PathOutcome::Solved(solution) => Some(solution),
            PathOutcome::NoSolution => None,
        }
    }

    pub fn cost(&self) -> Option<u64> {
        self.solution().map(|solution| solution.total_weight)
    }
}

/// Serializable digest of one path's outcome for summary files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSummary {
    pub path: PathType,
    pub label: String,
    pub status: String,
    pub cost: Option<u64>,
    pub solutions_found: Option<usize>,
    pub removed: Vec<ObstacleRecord>,
    pub error: Option<String>,
}

impl fmt::Display for CostedSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let removed: Vec<String> = self.assignment.true_vars().map(|var| var.to_string()).collect();
        write!(
            f,
            "cost {} removing [{}]",
            self.total_weight,
            removed.join(", ")
        )
    }
}
