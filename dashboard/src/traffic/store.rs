//! SQLite access to the `traffic` table.
//!
//! A [`TrafficDb`] is opened per request and released when dropped, so every
//! exit path (success, empty result, or error) closes the handle. Reads go
//! through three primitives: count, select with limit/offset, and grouped
//! counts.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, params_from_iter};
use serde_json::{Map, Number, Value};
use tracing::warn;

use super::error::TrafficError;
use super::filter::SqlFilter;
use super::record::TrafficRecord;

pub const TRAFFIC_TABLE: &str = "traffic";

/// One row of a grouped count: the group key values in the order they were
/// requested, and the number of matching records. A key is `None` when its
/// expression evaluated to NULL, e.g. `strftime` on a timestamp outside
/// years 0000-9999.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub keys: Vec<Option<i64>>,
    pub count: u64,
}

pub struct TrafficDb {
    path: PathBuf,
    conn: Option<Connection>,
}

impl TrafficDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TrafficDb {
            path: path.into(),
            conn: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the database read-only. Returns `false` and logs a warning when
    /// the file is missing or cannot be opened; never errors.
    pub fn connect(&mut self) -> bool {
        match self.try_connect() {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "traffic database unavailable");
                false
            }
        }
    }

    /// Like [`connect`](Self::connect), but keeps the reason for failure.
    pub fn try_connect(&mut self) -> Result<(), TrafficError> {
        if self.conn.is_some() {
            return Ok(());
        }
        if !self.path.is_file() {
            return Err(TrafficError::StoreUnavailable {
                path: self.path.clone(),
                reason: "file does not exist".to_owned(),
            });
        }
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| TrafficError::StoreUnavailable {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        self.conn = Some(conn);
        Ok(())
    }

    /// Closes the handle. Safe to call repeatedly or when never connected.
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            // A failed close still releases the handle once the connection drops.
            let _ = conn.close();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&Connection, TrafficError> {
        self.conn
            .as_ref()
            .ok_or_else(|| TrafficError::StoreUnavailable {
                path: self.path.clone(),
                reason: "not connected".to_owned(),
            })
    }

    pub fn count(&self, filter: &SqlFilter) -> Result<u64, TrafficError> {
        let sql = format!("SELECT COUNT(*) FROM {TRAFFIC_TABLE}{}", filter.where_clause());
        let count: i64 = self.conn()?.query_row(
            &sql,
            params_from_iter(filter.params().iter()),
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Matching rows in the store's natural order; no `ORDER BY` is applied.
    pub fn select(
        &self,
        filter: &SqlFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<TrafficRecord>, TrafficError> {
        let sql = format!(
            "SELECT * FROM {TRAFFIC_TABLE}{} LIMIT ? OFFSET ?",
            filter.where_clause()
        );
        let mut params: Vec<i64> = filter.params().to_vec();
        params.push(i64::from(limit));
        params.push(i64::try_from(offset).unwrap_or(i64::MAX));

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            record_from_row(row, &columns)
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Counts matching records grouped by each SQL expression in `keys`,
    /// ordered by the keys ascending. Only non-empty groups are returned.
    pub fn group_count(
        &self,
        keys: &[&str],
        filter: &SqlFilter,
    ) -> Result<Vec<GroupCount>, TrafficError> {
        let aliases: Vec<String> = (0..keys.len()).map(|i| format!("g{i}")).collect();
        let select_keys: Vec<String> = keys
            .iter()
            .zip(&aliases)
            .map(|(expr, alias)| format!("{expr} AS {alias}"))
            .collect();
        let group_by = aliases.join(", ");
        let sql = format!(
            "SELECT {}, COUNT(*) FROM {TRAFFIC_TABLE}{} GROUP BY {group_by} ORDER BY {group_by}",
            select_keys.join(", "),
            filter.where_clause(),
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(filter.params().iter()), |row| {
            let keys = (0..aliases.len())
                .map(|i| row.get::<_, Option<i64>>(i))
                .collect::<Result<Vec<_>, _>>()?;
            let count: i64 = row.get(aliases.len())?;
            Ok(GroupCount {
                keys,
                count: count.max(0) as u64,
            })
        })?;
        let groups = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(groups)
    }
}

impl Drop for TrafficDb {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn record_from_row(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<TrafficRecord> {
    let mut time = None;
    let mut direction = None;
    let mut extra = Map::new();
    for (idx, name) in columns.iter().enumerate() {
        match name.as_str() {
            "time" => time = Some(row.get::<_, i64>(idx)?),
            "direction" => direction = Some(row.get::<_, i64>(idx)?),
            _ => {
                extra.insert(name.clone(), json_value(row.get_ref(idx)?));
            }
        }
    }
    match (time, direction) {
        (Some(time), Some(direction)) => Ok(TrafficRecord {
            time,
            direction,
            extra,
        }),
        _ => Err(rusqlite::Error::InvalidColumnName(
            "traffic rows need `time` and `direction` columns".to_owned(),
        )),
    }
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(text) => Value::from(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(bytes) => Value::from(bytes.to_vec()),
    }
}
