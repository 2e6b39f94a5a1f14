//! CSV I/O for obstacle maps and removal results
//!
//! Both file kinds share one layout: an optional label line (`map` for
//! obstacle maps, the path label for results), the grid size `n`, a record
//! count `m`, then `m` lines of `x_min,x_max,y_min,y_max,weight`.

use super::obstacle::MAX_GRID_SIZE;
use super::{ObstacleCatalog, ObstacleRecord, PathType};
use crate::error::{RemovalError, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Label written on the first line of obstacle map files.
pub const MAP_LABEL: &str = "map";

/// The parsed contents of a map or result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleTable {
    pub label: Option<String>,
    pub grid_size: usize,
    pub records: Vec<ObstacleRecord>,
}

impl ObstacleTable {
    /// The path this table is a result for, if its label names one.
    pub fn path_type(&self) -> Option<PathType> {
        self.label.as_deref().and_then(PathType::from_label)
    }
}

/// `map` or one of the path labels.
fn is_label(field: &str) -> bool {
    field == MAP_LABEL || PathType::from_label(field).is_some()
}

/// Parse a map or result file's text.
pub fn parse_table(content: &str) -> Result<ObstacleTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line_no = record
            .position()
            .map_or(rows.len() + 1, |pos| pos.line() as usize);
        rows.push((line_no, record));
    }
    let mut rows = rows.into_iter().peekable();

    let label = match rows.peek() {
        Some((_, first)) if first.len() == 1 && is_label(&first[0]) => {
            rows.next().map(|(_, first)| first[0].to_string())
        }
        _ => None,
    };

    let (line_no, size_row) = rows
        .next()
        .ok_or_else(|| RemovalError::parse(1, "missing grid size line"))?;
    let grid_size = parse_single_count(line_no, &size_row, "grid size")?;
    if grid_size > MAX_GRID_SIZE {
        return Err(RemovalError::parse(
            line_no,
            format!("grid size {} exceeds the maximum of {}", grid_size, MAX_GRID_SIZE),
        ));
    }

    let (line_no, count_row) = rows
        .next()
        .ok_or_else(|| RemovalError::parse(line_no + 1, "missing obstacle count line"))?;
    let declared = parse_single_count(line_no, &count_row, "obstacle count")?;

    let records = rows
        .map(|(line_no, row)| parse_record(line_no, &row))
        .collect::<Result<Vec<_>>>()?;

    if records.len() != declared {
        return Err(RemovalError::Validation(format!(
            "header declares {} obstacles but {} records follow",
            declared,
            records.len()
        )));
    }

    Ok(ObstacleTable {
        label,
        grid_size,
        records,
    })
}

fn parse_single_count(line_no: usize, row: &StringRecord, what: &str) -> Result<usize> {
    if row.len() != 1 {
        return Err(RemovalError::parse(
            line_no,
            format!("expected a single {} field, found {}", what, row.len()),
        ));
    }
    row[0].parse::<usize>().map_err(|e| {
        RemovalError::parse(line_no, format!("invalid {} '{}': {}", what, &row[0], e))
    })
}

fn parse_record(line_no: usize, row: &StringRecord) -> Result<ObstacleRecord> {
    if row.len() != 5 {
        return Err(RemovalError::parse(
            line_no,
            format!("expected 5 fields, found {}", row.len()),
        ));
    }

    let mut values = [0i64; 5];
    for (value, field) in values.iter_mut().zip(row.iter()) {
        *value = field.parse::<i64>().map_err(|e| {
            RemovalError::parse(line_no, format!("invalid integer '{}': {}", field, e))
        })?;
    }

    let [x_min, x_max, y_min, y_max, weight] = values;
    Ok(ObstacleRecord::new(x_min, x_max, y_min, y_max, weight))
}

/// Parse an obstacle map and build its catalog.
pub fn parse_map_str(content: &str) -> Result<ObstacleCatalog> {
    let table = parse_table(content)?;
    if let Some(path_type) = table.path_type() {
        return Err(RemovalError::Validation(format!(
            "this is a result file for the {} path, not an obstacle map",
            path_type
        )));
    }
    let count = table.records.len();
    ObstacleCatalog::new(table.grid_size, count, table.records)
}

/// Load an obstacle map from disk.
pub fn load_map_file<P: AsRef<Path>>(path: P) -> Result<ObstacleCatalog> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| RemovalError::io(path, e))?;
    let catalog = parse_map_str(&content)?;

    tracing::info!(
        file = %path.display(),
        grid_size = catalog.grid_size(),
        path_length = catalog.path_length(),
        obstacles = catalog.len(),
        "obstacle map read"
    );
    for obstacle in catalog.iter() {
        tracing::debug!("{}", obstacle);
    }

    Ok(catalog)
}

/// Load any table (map or result) from disk.
pub fn load_table_file<P: AsRef<Path>>(path: P) -> Result<ObstacleTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| RemovalError::io(path, e))?;
    parse_table(&content)
}

/// Map table for `catalog`, labelled `map`.
pub fn map_table(catalog: &ObstacleCatalog) -> ObstacleTable {
    ObstacleTable {
        label: Some(MAP_LABEL.to_string()),
        grid_size: catalog.grid_size(),
        records: catalog.iter().map(|obstacle| obstacle.record()).collect(),
    }
}

/// Result table listing the removed obstacles for one path.
pub fn result_table(path_type: PathType, grid_size: usize, removed: &[ObstacleRecord]) -> ObstacleTable {
    ObstacleTable {
        label: Some(path_type.label().to_string()),
        grid_size,
        records: removed.to_vec(),
    }
}

/// Write `table` as CSV to `writer`.
pub fn write_table<W: Write>(writer: W, table: &ObstacleTable) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);

    if let Some(label) = &table.label {
        writer.write_record([label.as_str()])?;
    }
    writer.write_record([table.grid_size.to_string()])?;
    writer.write_record([table.records.len().to_string()])?;
    for record in &table.records {
        writer.write_record([
            record.x_min.to_string(),
            record.x_max.to_string(),
            record.y_min.to_string(),
            record.y_max.to_string(),
            record.weight.to_string(),
        ])?;
    }
    writer.flush().map_err(|e| RemovalError::io(PathBuf::new(), e))?;
    Ok(())
}

/// Serialize a table to its CSV text.
pub fn table_to_string(table: &ObstacleTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_table(&mut buffer, table)?;
    String::from_utf8(buffer)
        .map_err(|e| RemovalError::Invariant(format!("CSV output is not UTF-8: {}", e)))
}

/// Write `table` to `path`, creating parent directories and replacing any existing file.
pub fn write_table_file(path: &Path, table: &ObstacleTable) -> Result<()> {
    create_parent_dir(path)?;
    let file = File::create(path).map_err(|e| RemovalError::io(path, e))?;
    write_table(file, table).map_err(|e| e.at_path(path))
}

/// Location of the result file for `path_type`: `<dir>/<stem>_<label>.csv`.
pub fn result_file_path(directory: &Path, map_stem: &str, path_type: PathType) -> PathBuf {
    directory.join(format!("{}_{}.csv", map_stem, path_type.label()))
}

/// Write `content` to `path`, creating parent directories and replacing any existing file.
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    create_parent_dir(path)?;
    std::fs::write(path, content).map_err(|e| RemovalError::io(path, e))
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| RemovalError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Stem used to name result files for a map at `path`.
pub fn map_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.split('.').next().unwrap_or(stem).to_string())
        .unwrap_or_else(|| "map".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    const SAMPLE_MAP: &str = "map\n4\n2\n0,1,0,1,5\n2,3,1,2,3\n";

    #[test]
    fn test_parse_map_with_label() {
        let catalog = parse_map_str(SAMPLE_MAP).unwrap();
        assert_eq!(catalog.grid_size(), 4);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().weight, 5);
        assert_eq!(catalog.get(1).unwrap().x_max, 3);
    }

    #[test]
    fn test_parse_map_without_label() {
        let catalog = parse_map_str("3\n1\n0, 0, 1, 1, 5\n").unwrap();
        assert_eq!(catalog.grid_size(), 3);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().y_max, 1);
    }

    #[test]
    fn test_parse_empty_map() {
        let catalog = parse_map_str("2\n0\n").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_count_mismatch_is_validation_error() {
        let too_few = parse_map_str("3\n2\n0,0,0,0,1\n");
        assert!(matches!(too_few, Err(RemovalError::Validation(_))));

        let too_many = parse_map_str("3\n1\n0,0,0,0,1\n1,1,1,1,1\n");
        assert!(matches!(too_many, Err(RemovalError::Validation(_))));
    }

    #[test]
    fn test_malformed_records_are_parse_errors() {
        let wrong_fields = parse_map_str("3\n1\n0,0,0,1\n");
        assert!(matches!(wrong_fields, Err(RemovalError::Parse { line: 3, .. })));

        let not_integer = parse_map_str("3\n1\n0,0,a,1,1\n");
        assert!(matches!(not_integer, Err(RemovalError::Parse { line: 3, .. })));

        let bad_size = parse_map_str("map\nthree\n0\n");
        assert!(matches!(bad_size, Err(RemovalError::Parse { line: 2, .. })));

        let truncated = parse_map_str("map\n3\n");
        assert!(matches!(truncated, Err(RemovalError::Parse { .. })));

        assert!(parse_map_str("").is_err());
    }

    #[test]
    fn test_unknown_first_line_is_not_a_label() {
        // A mistyped size must not shift the header
        let mistyped = parse_map_str("3a\n2\n0\n");
        assert!(matches!(mistyped, Err(RemovalError::Parse { line: 1, .. })));

        let capitalized = parse_table("Map\n2\n0\n");
        assert!(matches!(capitalized, Err(RemovalError::Parse { line: 1, .. })));

        let overflow = parse_map_str("99999999999999999999999\n0\n");
        assert!(matches!(overflow, Err(RemovalError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_known_labels_accepted() {
        let table = parse_table("map\n2\n0\n").unwrap();
        assert_eq!(table.label.as_deref(), Some(MAP_LABEL));
        assert_eq!(table.path_type(), None);

        for path_type in PathType::ALL {
            let content = format!("{}\n2\n0\n", path_type.label());
            let table = parse_table(&content).unwrap();
            assert_eq!(table.path_type(), Some(path_type));
        }
    }

    #[test]
    fn test_oversized_grid_is_parse_error() {
        let huge = parse_map_str("4611686018427387904\n0\n");
        assert!(matches!(huge, Err(RemovalError::Parse { line: 1, .. })));

        let content = format!("map\n{}\n0\n", MAX_GRID_SIZE + 1);
        assert!(matches!(parse_table(&content), Err(RemovalError::Parse { line: 2, .. })));

        let content = format!("{}\n0\n", MAX_GRID_SIZE);
        assert_eq!(parse_map_str(&content).unwrap().grid_size(), MAX_GRID_SIZE);
    }

    #[test]
    fn test_blank_lines_keep_line_numbers() {
        let result = parse_map_str("map\n\n3\n1\n\n0,0,1\n");
        assert!(matches!(result, Err(RemovalError::Parse { line: 6, .. })));
    }

    #[test]
    fn test_written_text_layout() {
        let table = result_table(PathType::RightThenUp, 3, &[ObstacleRecord::new(0, 1, 2, 2, 4)]);
        assert_eq!(table_to_string(&table).unwrap(), "right\n3\n1\n0,1,2,2,4\n");
    }

    #[test]
    fn test_result_file_rejected_as_map() {
        let table = result_table(PathType::Diagonal, 3, &[ObstacleRecord::new(0, 0, 0, 0, 1)]);
        let content = table_to_string(&table).unwrap();
        assert!(matches!(parse_map_str(&content), Err(RemovalError::Validation(_))));
    }

    #[test]
    fn test_result_round_trip() {
        let removed = vec![
            ObstacleRecord::new(2, 3, 1, 2, 3),
            ObstacleRecord::new(0, 1, 0, 1, 5),
            ObstacleRecord::new(0, 0, 3, 3, 0),
        ];
        let content = table_to_string(&result_table(PathType::UpThenRight, 4, &removed)).unwrap();
        let table = parse_table(&content).unwrap();

        assert_eq!(table.path_type(), Some(PathType::UpThenRight));
        assert_eq!(table.grid_size, 4);
        let expected: BTreeSet<_> = removed.into_iter().collect();
        let parsed: BTreeSet<_> = table.records.into_iter().collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_map_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("maps/sample.csv");

        let catalog = parse_map_str(SAMPLE_MAP).unwrap();
        write_table_file(&file_path, &map_table(&catalog)).unwrap();

        let loaded = load_map_file(&file_path).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = tempdir().unwrap();
        let result = load_map_file(temp_dir.path().join("missing.csv"));
        assert!(matches!(result, Err(RemovalError::Io { .. })));
    }

    #[test]
    fn test_result_file_naming() {
        let path = result_file_path(Path::new("resultData"), "10x10_5blocks", PathType::RightThenUp);
        assert_eq!(path, PathBuf::from("resultData/10x10_5blocks_right.csv"));
        assert_eq!(map_stem(Path::new("mapData/10x10_5blocks.csv")), "10x10_5blocks");
    }
}
