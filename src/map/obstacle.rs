//! Weighted rectangular obstacles and the read-only catalog that holds them

use crate::error::{RemovalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted grid side length.
pub const MAX_GRID_SIZE: usize = 1 << 16;

/// Reject grid sizes outside `1..=MAX_GRID_SIZE`.
pub fn check_grid_size(grid_size: usize) -> Result<()> {
    if grid_size == 0 {
        return Err(RemovalError::Validation(
            "grid size must be at least 1".to_string(),
        ));
    }
    if grid_size > MAX_GRID_SIZE {
        return Err(RemovalError::Validation(format!(
            "grid size {} exceeds the maximum of {}",
            grid_size, MAX_GRID_SIZE
        )));
    }
    Ok(())
}

/// A grid point `(x, y)` with `0 <= x, y < n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Raw `x_min,x_max,y_min,y_max,weight` record as it appears in map and result files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleRecord {
    pub x_min: i64,
    pub x_max: i64,
    pub y_min: i64,
    pub y_max: i64,
    pub weight: i64,
}

impl ObstacleRecord {
    pub const fn new(x_min: i64, x_max: i64, y_min: i64, y_max: i64, weight: i64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            weight,
        }
    }

    /// Whether the rectangle covers `point`, boundaries included.
    pub fn covers(&self, point: Point) -> bool {
        let (x, y) = (point.x as i64, point.y as i64);
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }
}

/// A validated obstacle. Bounds are inclusive on all four sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: usize,
    pub x_min: i64,
    pub x_max: i64,
    pub y_min: i64,
    pub y_max: i64,
    pub weight: u64,
}

impl Obstacle {
    fn from_record(id: usize, record: ObstacleRecord) -> Result<Self> {
        if record.x_min > record.x_max {
            return Err(RemovalError::Validation(format!(
                "obstacle {} has x_min {} > x_max {}",
                id, record.x_min, record.x_max
            )));
        }
        if record.y_min > record.y_max {
            return Err(RemovalError::Validation(format!(
                "obstacle {} has y_min {} > y_max {}",
                id, record.y_min, record.y_max
            )));
        }
        let weight = u64::try_from(record.weight).map_err(|_| {
            RemovalError::Validation(format!(
                "obstacle {} has negative weight {}",
                id, record.weight
            ))
        })?;

        Ok(Self {
            id,
            x_min: record.x_min,
            x_max: record.x_max,
            y_min: record.y_min,
            y_max: record.y_max,
            weight,
        })
    }

    /// Whether the rectangle covers `point`, boundaries included.
    pub fn covers(&self, point: Point) -> bool {
        self.record().covers(point)
    }

    /// The record this obstacle was built from.
    pub fn record(&self) -> ObstacleRecord {
        ObstacleRecord::new(
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max,
            self.weight as i64,
        )
    }
}

impl fmt::Display for Obstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "o{}: x [{}, {}], y [{}, {}], weight {}",
            self.id, self.x_min, self.x_max, self.y_min, self.y_max, self.weight
        )
    }
}

/// All obstacles of one problem instance, indexed by dense id.
///
/// Built once from parsed input and never mutated afterwards. The obstacle id
/// doubles as the identifier of its Boolean variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleCatalog {
    grid_size: usize,
    obstacles: Vec<Obstacle>,
}

impl ObstacleCatalog {
    /// Build a catalog from the grid size, the declared obstacle count and the records.
    pub fn new(grid_size: usize, num_obst: usize, records: Vec<ObstacleRecord>) -> Result<Self> {
        check_grid_size(grid_size)?;
        if num_obst != records.len() {
            return Err(RemovalError::Validation(format!(
                "declared {} obstacles but found {} records",
                num_obst,
                records.len()
            )));
        }
        // Variable ids are shifted by one for DIMACS literals
        if num_obst >= i32::MAX as usize {
            return Err(RemovalError::Validation(format!(
                "too many obstacles: {}",
                num_obst
            )));
        }

        let obstacles = records
            .into_iter()
            .enumerate()
            .map(|(id, record)| Obstacle::from_record(id, record))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            grid_size,
            obstacles,
        })
    }

    /// Side length `n` of the grid.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Length `k = 2n - 1` of every canonical path.
    pub fn path_length(&self) -> usize {
        // n is bounded by MAX_GRID_SIZE
        self.grid_size * 2 - 1
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Ids of every obstacle covering `point`, in ascending order.
    pub fn covering_obstacles(&self, point: Point) -> Vec<usize> {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.covers(point))
            .map(|obstacle| obstacle.id)
            .collect()
    }

    /// Sum of all obstacle weights.
    pub fn total_weight(&self) -> u64 {
        self.obstacles.iter().map(|obstacle| obstacle.weight).sum()
    }
}

impl fmt::Display for ObstacleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Obstacle map:")?;
        writeln!(f, "  Grid: {}x{}", self.grid_size, self.grid_size)?;
        writeln!(f, "  Path length: {}", self.path_length())?;
        writeln!(f, "  Obstacles: {}", self.obstacles.len())?;
        for obstacle in &self.obstacles {
            writeln!(f, "    {}", obstacle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> ObstacleCatalog {
        ObstacleCatalog::new(
            4,
            2,
            vec![
                ObstacleRecord::new(0, 1, 0, 1, 5),
                ObstacleRecord::new(2, 3, 1, 2, 3),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_creation() {
        let catalog = sample_catalog();
        assert_eq!(catalog.grid_size(), 4);
        assert_eq!(catalog.path_length(), 7);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().id, 1);
        assert_eq!(catalog.get(1).unwrap().weight, 3);
        assert_eq!(catalog.total_weight(), 8);
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let result = ObstacleCatalog::new(3, 2, vec![ObstacleRecord::new(0, 0, 0, 0, 1)]);
        assert!(matches!(result, Err(RemovalError::Validation(_))));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let x_inverted = ObstacleCatalog::new(3, 1, vec![ObstacleRecord::new(2, 1, 0, 0, 1)]);
        assert!(matches!(x_inverted, Err(RemovalError::Validation(_))));

        let y_inverted = ObstacleCatalog::new(3, 1, vec![ObstacleRecord::new(0, 0, 2, 1, 1)]);
        assert!(matches!(y_inverted, Err(RemovalError::Validation(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = ObstacleCatalog::new(3, 1, vec![ObstacleRecord::new(0, 0, 0, 0, -1)]);
        assert!(matches!(result, Err(RemovalError::Validation(_))));
    }

    #[test]
    fn test_zero_grid_rejected() {
        assert!(ObstacleCatalog::new(0, 0, vec![]).is_err());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        assert!(ObstacleCatalog::new(MAX_GRID_SIZE, 0, vec![]).is_ok());

        let result = ObstacleCatalog::new(MAX_GRID_SIZE + 1, 0, vec![]);
        assert!(matches!(result, Err(RemovalError::Validation(_))));

        let result = ObstacleCatalog::new(1 << 62, 0, vec![]);
        assert!(matches!(result, Err(RemovalError::Validation(_))));
    }

    #[test]
    fn test_record_and_obstacle_coverage_agree() {
        let record = ObstacleRecord::new(1, 2, 0, 1, 4);
        let catalog = ObstacleCatalog::new(4, 1, vec![record]).unwrap();
        let obstacle = catalog.get(0).unwrap();

        for x in 0..4 {
            for y in 0..4 {
                let point = Point::new(x, y);
                assert_eq!(record.covers(point), obstacle.covers(point), "at {}", point);
            }
        }
        assert!(record.covers(Point::new(2, 1)));
        assert!(!record.covers(Point::new(0, 0)));
    }

    #[test]
    fn test_coverage_is_inclusive() {
        let catalog = sample_catalog();

        // Corners of obstacle 0
        assert_eq!(catalog.covering_obstacles(Point::new(0, 0)), vec![0]);
        assert_eq!(catalog.covering_obstacles(Point::new(1, 1)), vec![0]);
        assert_eq!(catalog.covering_obstacles(Point::new(1, 0)), vec![0]);

        // Max bounds of obstacle 1
        assert_eq!(catalog.covering_obstacles(Point::new(3, 2)), vec![1]);
        assert_eq!(catalog.covering_obstacles(Point::new(2, 1)), vec![1]);

        // Just outside
        assert!(catalog.covering_obstacles(Point::new(3, 3)).is_empty());
        assert!(catalog.covering_obstacles(Point::new(0, 2)).is_empty());
    }

    #[test]
    fn test_overlapping_coverage() {
        let catalog = ObstacleCatalog::new(
            3,
            3,
            vec![
                ObstacleRecord::new(0, 2, 0, 2, 1),
                ObstacleRecord::new(1, 1, 1, 1, 2),
                ObstacleRecord::new(2, 2, 0, 0, 4),
            ],
        )
        .unwrap();

        assert_eq!(catalog.covering_obstacles(Point::new(1, 1)), vec![0, 1]);
        assert_eq!(catalog.covering_obstacles(Point::new(2, 0)), vec![0, 2]);
        assert_eq!(catalog.covering_obstacles(Point::new(0, 2)), vec![0]);
    }

    #[test]
    fn test_negative_bounds_cover_nothing_outside() {
        let catalog =
            ObstacleCatalog::new(2, 1, vec![ObstacleRecord::new(-3, -1, -3, -1, 1)]).unwrap();
        assert!(catalog.covering_obstacles(Point::new(0, 0)).is_empty());
    }

    #[test]
    fn test_record_round_trip() {
        let record = ObstacleRecord::new(1, 2, 3, 4, 9);
        let catalog = ObstacleCatalog::new(5, 1, vec![record]).unwrap();
        assert_eq!(catalog.get(0).unwrap().record(), record);
    }
}
