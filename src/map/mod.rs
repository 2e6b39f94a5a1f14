//! Grid geometry: obstacles, canonical paths and map files

pub mod generator;
pub mod io;
pub mod obstacle;
pub mod path;

pub use generator::write_generated_map;
pub use io::{load_map_file, load_table_file, parse_map_str, ObstacleTable};
pub use obstacle::{Obstacle, ObstacleCatalog, ObstacleRecord, Point, MAX_GRID_SIZE};
pub use path::{Path, PathType};
