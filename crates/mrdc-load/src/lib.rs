//! Load seam of the pipeline: cleaned frames go out as CSV files and as
//! tables in a SQLite warehouse.

pub mod csv_out;
pub mod error;
pub mod sqlite_out;

pub use csv_out::{dataset_path, write_csv};
pub use error::{LoadError, Result};
pub use sqlite_out::SqliteWarehouse;
