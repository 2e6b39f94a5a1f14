//! Random obstacle map generation for experiments

use super::io::{map_table, write_table_file};
use super::{ObstacleCatalog, ObstacleRecord};
use crate::error::{RemovalError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

/// Generate `blocks` random obstacles on an `n x n` grid.
///
/// The first obstacle is anchored at the start corner so that every path is
/// obstructed at least once. Weights are drawn from `[1, n)`.
pub fn generate_records<R: Rng>(grid_size: usize, blocks: usize, rng: &mut R) -> Vec<ObstacleRecord> {
    if blocks == 0 || grid_size == 0 {
        return Vec::new();
    }

    let n = grid_size as i64;
    let random_weight = |rng: &mut R| if n > 1 { rng.gen_range(1..n) } else { 1 };

    let mut records = Vec::with_capacity(blocks);
    let start_weight = random_weight(rng);
    records.push(ObstacleRecord::new(
        0,
        rng.gen_range(0..n),
        0,
        rng.gen_range(0..n),
        start_weight,
    ));

    for _ in 1..blocks {
        let (x_min, x_max) = sorted_pair(rng.gen_range(0..n), rng.gen_range(0..n));
        let (y_min, y_max) = sorted_pair(rng.gen_range(0..n), rng.gen_range(0..n));
        let weight = random_weight(rng);
        records.push(ObstacleRecord::new(x_min, x_max, y_min, y_max, weight));
    }

    records
}

fn sorted_pair(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Generate a map and write it to `<directory>/<n>x<n>_<blocks>blocks.csv`.
pub fn write_generated_map(
    directory: &Path,
    grid_size: usize,
    blocks: usize,
    seed: Option<u64>,
) -> Result<PathBuf> {
    if grid_size == 0 {
        return Err(RemovalError::Validation(
            "grid size must be at least 1".to_string(),
        ));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let records = generate_records(grid_size, blocks, &mut rng);
    let catalog = ObstacleCatalog::new(grid_size, records.len(), records)?;

    let path = directory.join(format!("{}x{}_{}blocks.csv", grid_size, grid_size, blocks));
    write_table_file(&path, &map_table(&catalog))?;

    tracing::info!(
        file = %path.display(),
        grid_size,
        blocks,
        "generated obstacle map"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::io::load_map_file;
    use tempfile::tempdir;

    #[test]
    fn test_generated_records_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate_records(10, 6, &mut rng);
        assert_eq!(records.len(), 6);

        // Anchored at the start corner
        assert_eq!(records[0].x_min, 0);
        assert_eq!(records[0].y_min, 0);

        for record in &records {
            assert!(record.x_min <= record.x_max);
            assert!(record.y_min <= record.y_max);
            assert!(record.x_max < 10 && record.y_max < 10);
            assert!((1..10).contains(&record.weight));
        }

        assert!(ObstacleCatalog::new(10, records.len(), records).is_ok());
    }

    #[test]
    fn test_generation_is_reproducible_with_seed() {
        let first = generate_records(8, 4, &mut StdRng::seed_from_u64(42));
        let second = generate_records(8, 4, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_cell_grid_weights() {
        let records = generate_records(1, 3, &mut StdRng::seed_from_u64(1));
        assert!(records.iter().all(|record| record.weight == 1));
    }

    #[test]
    fn test_write_generated_map() {
        let temp_dir = tempdir().unwrap();
        let path = write_generated_map(temp_dir.path(), 5, 3, Some(3)).unwrap();

        assert!(path.ends_with("5x5_3blocks.csv"));
        let catalog = load_map_file(&path).unwrap();
        assert_eq!(catalog.grid_size(), 5);
        assert_eq!(catalog.len(), 3);
    }
}
