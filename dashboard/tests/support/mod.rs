#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::TimeZone;
use rusqlite::{Connection, params};
use tempfile::TempDir;
use tracing::Span;

use traffic_dashboard::traffic::TrafficService;
use traffic_dashboard::traffic::time_bucket::LOCAL_OFFSET;

/// UTC epoch seconds for a wall-clock time at UTC+8.
pub fn local_ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> i64 {
    LOCAL_OFFSET
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
        .timestamp()
}

/// 2024-01-08 is a Monday; 2024-01-13 a Saturday.
pub const MONDAY: u32 = 8;
pub const SATURDAY: u32 = 13;
pub const SUNDAY: u32 = 14;

pub fn monday_at(hour: u32, minute: u32) -> i64 {
    local_ts(2024, 1, MONDAY, hour, minute)
}

/// A `traffic` table in a throwaway SQLite file.
pub struct TestDb {
    _dir: TempDir,
    path: PathBuf,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traffic.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE traffic (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                time INTEGER NOT NULL,
                direction INTEGER NOT NULL,
                plate TEXT
            );",
        )
        .unwrap();
        TestDb { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn insert(&self, rows: &[(i64, i64)]) {
        let mut conn = Connection::open(&self.path).unwrap();
        let tx = conn.transaction().unwrap();
        {
            let mut stmt = tx
                .prepare("INSERT INTO traffic (time, direction, plate) VALUES (?1, ?2, ?3)")
                .unwrap();
            for (i, (time, direction)) in rows.iter().enumerate() {
                stmt.execute(params![time, direction, format!("PLATE-{i}")])
                    .unwrap();
            }
        }
        tx.commit().unwrap();
    }

    pub fn insert_repeated(&self, count: usize, time: i64, direction: i64) {
        self.insert(&vec![(time, direction); count]);
    }

    pub fn service(&self) -> TrafficService {
        TrafficService::new(&self.path, Span::none())
    }
}

/// A path inside a temp dir that was never created.
pub fn missing_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("traffic.db");
    (dir, path)
}
