//! DuckDB connection wrapper for in-process queries over fetched market data.
//!
//! Series pulled from the APIs are written to NDJSON and loaded into
//! in-memory tables, one table per coin, so history queries can be answered
//! in SQL.

use crate::cache::CacheManager;
use crate::error::{CryptodashError, Result};
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;

/// Owns the DuckDB database and the cache that feeds it.
pub struct Connection {
    conn: DuckDbConnection,
    /// The cache manager used to fetch remote documents.
    pub cache: RefCell<CacheManager>,
    registered_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Create a connection backed by the given cache.
    ///
    /// Opens an in-memory DuckDB database.
    pub fn new(cache: CacheManager) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            cache: RefCell::new(cache),
            registered_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run
        let column_names: Vec<String> = match rows.as_ref() {
            Some(stmt) => stmt.column_names().into_iter().map(|s| s.to_string()).collect(),
            None => Vec::new(),
        };

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, name) in column_names.iter().enumerate() {
                map.insert(name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[String]) -> Result<Vec<T>> {
        self.execute(sql, params)?
            .into_iter()
            .map(|row| {
                let value = serde_json::Value::Object(row.into_iter().collect());
                serde_json::from_value(value).map_err(CryptodashError::from)
            })
            .collect()
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;
        match rows.next()? {
            Some(row) => Ok(Some(convert_value_ref(row.get_ref(0)?))),
            None => Ok(None),
        }
    }

    /// Create (or replace) a DuckDB table from a newline-delimited JSON file.
    pub fn register_table_from_ndjson(&self, table_name: &str, ndjson_path: &str) -> Result<()> {
        validate_table_name(table_name)?;
        let path_fwd = ndjson_path.replace('\\', "/");
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {}; \
             CREATE TABLE {} AS SELECT * FROM read_json_auto('{}', format='newline_delimited')",
            table_name, table_name, path_fwd
        ))?;
        self.registered_tables
            .borrow_mut()
            .insert(table_name.to_string());
        debug!(table = table_name, "registered table");
        Ok(())
    }

    /// Serialize rows to a temporary NDJSON file and load them as a table.
    ///
    /// DuckDB cannot infer a schema from zero rows, so an empty slice is an
    /// `InvalidArgument` error.
    pub fn register_rows<T: serde::Serialize>(&self, table_name: &str, rows: &[T]) -> Result<()> {
        if rows.is_empty() {
            return Err(CryptodashError::InvalidArgument(format!(
                "Cannot register empty table '{}'",
                table_name
            )));
        }
        let mut file = NamedTempFile::new()?;
        for row in rows {
            serde_json::to_writer(&mut file, row)?;
            writeln!(file)?;
        }
        file.flush()?;

        let path = file.path().to_string_lossy().to_string();
        // The table is materialized, so the temp file can go once this returns
        self.register_table_from_ndjson(table_name, &path)
    }

    /// Check whether a table has been registered.
    pub fn has_table(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }

    /// Return the registered table names, sorted.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registered_tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Drop every registered table so the next query reloads fresh data.
    pub fn reset_tables(&self) -> Result<()> {
        let names: Vec<String> = self.registered_tables.borrow_mut().drain().collect();
        for name in names {
            self.conn
                .execute_batch(&format!("DROP TABLE IF EXISTS {}", name))?;
        }
        Ok(())
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

/// Table names are interpolated into SQL, so only identifiers are accepted.
fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(CryptodashError::InvalidArgument(format!(
            "Invalid table name: '{}'",
            name
        )))
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    use serde_json::Value;

    match val {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => Value::from(n),
        ValueRef::SmallInt(n) => Value::from(n),
        ValueRef::Int(n) => Value::from(n),
        ValueRef::BigInt(n) => Value::from(n),
        ValueRef::UTinyInt(n) => Value::from(n),
        ValueRef::USmallInt(n) => Value::from(n),
        ValueRef::UInt(n) => Value::from(n),
        ValueRef::UBigInt(n) => Value::from(n),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => Value::from(i),
            Err(_) => Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).to_string()),
        // Dates, timestamps and nested types are selected as strings or numbers in SQL
        _ => Value::Null,
    }
}
