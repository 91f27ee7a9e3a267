//! SQLite warehouse output.
//!
//! Each cleaned frame lands in its star-schema table with a replace-style
//! load: drop the table, recreate it from the entity's canonical columns,
//! and insert every row inside one transaction. Re-running the pipeline
//! against the same database therefore never duplicates rows.
//!
//! Column names are always double-quoted in generated SQL because some of
//! them (`index`) collide with SQL keywords.

use std::fs;
use std::path::{Path, PathBuf};

use mrdc_ingest::any_to_string;
use mrdc_model::{Entity, canonical_columns};
use polars::prelude::{AnyValue, DataFrame};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use tracing::info;

use crate::error::{LoadError, Result};

/// Connection to the destination database.
pub struct SqliteWarehouse {
    conn: Connection,
    path: PathBuf,
}

impl SqliteWarehouse {
    /// Opens (or creates) the database file, creating parent directories
    /// as needed. The database runs in WAL mode.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| LoadError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let db_err = |source: rusqlite::Error| LoadError::Database {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(db_err)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(db_err)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// In-memory database, for tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|source| LoadError::Database {
            path: path.clone(),
            source,
        })?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the entity's warehouse table with the frame's rows and
    /// returns how many were inserted.
    ///
    /// The frame must carry exactly the entity's canonical columns in
    /// canonical order; a cleaned frame always does.
    pub fn replace_entity(&mut self, entity: Entity, df: &DataFrame) -> Result<usize> {
        check_columns(entity, df)?;

        let db_err = |source: rusqlite::Error| LoadError::Database {
            path: self.path.clone(),
            source,
        };

        let table = entity.table_name();
        self.conn
            .execute(&format!("DROP TABLE IF EXISTS \"{table}\""), [])
            .map_err(db_err)?;
        self.conn
            .execute(&create_table_sql(entity), [])
            .map_err(db_err)?;

        let columns = df.get_columns();
        let tx = self.conn.transaction().map_err(db_err)?;
        {
            let mut stmt = tx.prepare(&insert_sql(entity)).map_err(db_err)?;
            for idx in 0..df.height() {
                let row: Vec<Value> = columns
                    .iter()
                    .map(|col| cell_value(col.get(idx).unwrap_or(AnyValue::Null)))
                    .collect();
                stmt.execute(params_from_iter(row)).map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;

        info!(table, rows = df.height(), "replaced warehouse table");
        Ok(df.height())
    }
}

fn check_columns(entity: Entity, df: &DataFrame) -> Result<()> {
    let expected: Vec<&str> = canonical_columns(entity)
        .iter()
        .map(|spec| spec.name)
        .collect();
    let actual: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    if actual != expected {
        return Err(LoadError::Schema {
            entity,
            detail: format!("expected {expected:?}, frame has {actual:?}"),
        });
    }
    Ok(())
}

fn create_table_sql(entity: Entity) -> String {
    let columns: Vec<String> = canonical_columns(entity)
        .iter()
        .map(|spec| format!("\"{}\" {}", spec.name, spec.semantic.sql_affinity()))
        .collect();
    format!(
        "CREATE TABLE \"{}\" ({})",
        entity.table_name(),
        columns.join(", ")
    )
}

fn insert_sql(entity: Entity) -> String {
    let specs = canonical_columns(entity);
    let names: Vec<String> = specs
        .iter()
        .map(|spec| format!("\"{}\"", spec.name))
        .collect();
    let slots: Vec<String> = (1..=specs.len()).map(|n| format!("?{n}")).collect();
    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        entity.table_name(),
        names.join(", "),
        slots.join(", ")
    )
}

/// Frame cell to SQLite value. Anything outside the canonical storage
/// classes falls back to its display text.
fn cell_value(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Integer(i64::from(v)),
        AnyValue::Int8(v) => Value::Integer(i64::from(v)),
        AnyValue::Int16(v) => Value::Integer(i64::from(v)),
        AnyValue::Int32(v) => Value::Integer(i64::from(v)),
        AnyValue::Int64(v) => Value::Integer(v),
        AnyValue::UInt8(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Value::Integer(i64::from(v)),
        AnyValue::Float32(v) => Value::Real(f64::from(v)),
        AnyValue::Float64(v) => Value::Real(v),
        AnyValue::String(v) => Value::Text(v.to_string()),
        AnyValue::StringOwned(v) => Value::Text(v.to_string()),
        other => Value::Text(any_to_string(other)),
    }
}
