//! Canonical monotone paths from `(0, 0)` to `(n-1, n-1)`

use super::obstacle::check_grid_size;
use super::Point;
use crate::error::{RemovalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three path shapes that are solved for every map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    /// Alternating right and up steps.
    Diagonal,
    /// Up the left edge, then right along the top edge.
    UpThenRight,
    /// Right along the bottom edge, then up the right edge.
    RightThenUp,
}

impl PathType {
    pub const ALL: [PathType; 3] = [
        PathType::Diagonal,
        PathType::UpThenRight,
        PathType::RightThenUp,
    ];

    /// Label written on the first line of result files.
    pub fn label(self) -> &'static str {
        match self {
            PathType::Diagonal => "diagonal",
            PathType::UpThenRight => "up",
            PathType::RightThenUp => "right",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|path_type| path_type.label() == label)
    }

    pub fn description(self) -> &'static str {
        match self {
            PathType::Diagonal => "diagonal",
            PathType::UpThenRight => "up -> right",
            PathType::RightThenUp => "right -> up",
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An ordered sequence of exactly `2n - 1` grid points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    path_type: PathType,
    points: Vec<Point>,
}

impl Path {
    /// Generate the point sequence of `path_type` on an `n x n` grid.
    pub fn generate(grid_size: usize, path_type: PathType) -> Result<Self> {
        check_grid_size(grid_size)?;

        let n = grid_size;
        let length = n
            .checked_mul(2)
            .map(|double| double - 1)
            .ok_or_else(|| RemovalError::Validation(format!("grid size {} is too large", n)))?;
        let points: Vec<Point> = match path_type {
            PathType::Diagonal => {
                let mut points = Vec::with_capacity(length);
                for step in 0..n - 1 {
                    points.push(Point::new(step, step));
                    points.push(Point::new(step + 1, step));
                }
                points.push(Point::new(n - 1, n - 1));
                points
            }
            PathType::UpThenRight => (0..n - 1)
                .map(|y| Point::new(0, y))
                .chain((0..n).map(|x| Point::new(x, n - 1)))
                .collect(),
            PathType::RightThenUp => (0..n - 1)
                .map(|x| Point::new(x, 0))
                .chain((0..n).map(|y| Point::new(n - 1, y)))
                .collect(),
        };

        let path = Self { path_type, points };
        path.check_shape(grid_size)?;

        tracing::info!(
            path = %path_type,
            length = path.len(),
            points = %path.points_string(),
            "generated path"
        );
        Ok(path)
    }

    /// Length, endpoints and bounds must hold for every generated path.
    fn check_shape(&self, grid_size: usize) -> Result<()> {
        let expected = 2 * grid_size - 1;
        if self.points.len() != expected {
            return Err(RemovalError::Invariant(format!(
                "{} path has length {}, expected {}",
                self.path_type,
                self.points.len(),
                expected
            )));
        }

        let end = Point::new(grid_size - 1, grid_size - 1);
        if self.points.first() != Some(&Point::new(0, 0)) || self.points.last() != Some(&end) {
            return Err(RemovalError::Invariant(format!(
                "{} path does not run from (0, 0) to {}",
                self.path_type, end
            )));
        }

        if let Some(point) = self
            .points
            .iter()
            .find(|point| point.x >= grid_size || point.y >= grid_size)
        {
            return Err(RemovalError::Invariant(format!(
                "{} path leaves the grid at {}",
                self.path_type, point
            )));
        }

        Ok(())
    }

    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.points.contains(&point)
    }

    fn points_string(&self) -> String {
        self.points
            .iter()
            .map(|point| point.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
