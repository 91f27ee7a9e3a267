pub mod discovery;
pub mod error;
pub mod frame;
pub mod polars_utils;
pub mod table;

pub use discovery::{discover_datasets, find_dataset};
pub use error::{IngestError, Result};
pub use frame::{is_missing_token, table_to_frame};
pub use polars_utils::{
    any_to_f64, any_to_i64, any_to_string, format_numeric, parse_f64, parse_i64,
};
pub use table::{RawTable, read_csv_table, read_json_table, read_table};
